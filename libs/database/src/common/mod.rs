//! Shared database utilities independent of any particular backend.

pub mod retry;

pub use retry::{RetryConfig, retry, retry_with_backoff};
