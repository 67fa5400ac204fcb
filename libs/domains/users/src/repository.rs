use async_trait::async_trait;

use crate::error::UserResult;
use crate::models::{NewUser, Pagination, User, UserFields};

/// Repository trait for User persistence
///
/// Identifiers are passed as opaque strings; implementations validate
/// well-formedness for their backend before issuing any query and
/// return `UserError::InvalidId` for malformed input.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch one page of users plus the total matching count.
    ///
    /// The two queries are issued together without a shared
    /// transaction, so the total may disagree with the page under
    /// concurrent writes.
    async fn list(&self, search: &str, pagination: Pagination) -> UserResult<(Vec<User>, u64)>;

    /// Insert a new user and return it with its assigned identifier.
    ///
    /// A uniqueness violation on email surfaces as
    /// `UserError::DuplicateEmail` even when the caller's pre-check
    /// passed (the backstop for the check-then-act race).
    async fn create(&self, input: NewUser) -> UserResult<User>;

    /// Apply the provided fields to an existing user and return the
    /// updated record. Absent fields keep their prior value.
    async fn update(&self, id: &str, fields: UserFields) -> UserResult<User>;

    /// Permanently remove a user.
    async fn delete(&self, id: &str) -> UserResult<()>;

    /// Whether a user with this normalized email exists, optionally
    /// excluding one record (for updates).
    async fn exists_by_email(&self, email: &str, exclude_id: Option<String>) -> UserResult<bool>;

    /// Create backing indexes (unique email). Called once at startup.
    async fn create_indexes(&self) -> UserResult<()>;
}
