//! Custom extractors for Axum handlers.
//!
//! This module provides reusable extractors that standardize error
//! handling across the API.

pub mod json_payload;

pub use json_payload::JsonPayload;
