//! User service - business logic layer
//!
//! Orchestrates normalization, validation, the email uniqueness
//! pre-check and the repository call for each operation.

use std::sync::Arc;

use tracing::instrument;

use crate::error::{UserError, UserResult};
use crate::models::{ListUsersParams, User, UserFields, UserPage, UserPayload};
use crate::normalize::normalize;
use crate::repository::UserRepository;
use crate::validate::{validate_new, validate_update};

pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> UserService<R> {
    /// Create a new UserService with the given repository
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// List one page of users with the total matching count.
    #[instrument(skip(self, params))]
    pub async fn list_users(&self, params: &ListUsersParams) -> UserResult<UserPage> {
        let pagination = params.pagination();
        let (data, total) = self.repository.list(params.search(), pagination).await?;

        Ok(UserPage {
            page: pagination.page,
            limit: pagination.limit,
            total,
            total_pages: pagination.total_pages(total),
            data,
        })
    }

    /// Create a user from a raw payload.
    ///
    /// The email pre-check is best-effort; the unique index is the
    /// final arbiter and a concurrent insert still surfaces as
    /// `DuplicateEmail` from the repository.
    #[instrument(skip(self, payload))]
    pub async fn create_user(&self, payload: UserPayload) -> UserResult<User> {
        let fields = normalize(payload);
        let input = validate_new(fields).map_err(UserError::Validation)?;

        if self.repository.exists_by_email(&input.email, None).await? {
            return Err(UserError::DuplicateEmail(input.email));
        }

        self.repository.create(input).await
    }

    /// Partially update a user from a raw payload.
    ///
    /// Only fields present in the payload are touched; empty names and
    /// emails are dropped from the update set (an empty address is a
    /// deliberate clear and is kept).
    #[instrument(skip(self, payload))]
    pub async fn update_user(&self, id: &str, payload: UserPayload) -> UserResult<User> {
        let fields = build_update_set(normalize(payload));

        if fields.is_empty() {
            return Err(UserError::EmptyUpdate);
        }

        validate_update(&fields).map_err(UserError::Validation)?;

        if let Some(ref email) = fields.email
            && self
                .repository
                .exists_by_email(email, Some(id.to_string()))
                .await?
        {
            return Err(UserError::DuplicateEmail(email.clone()));
        }

        self.repository.update(id, fields).await
    }

    /// Delete a user.
    #[instrument(skip(self))]
    pub async fn delete_user(&self, id: &str) -> UserResult<()> {
        self.repository.delete(id).await
    }

    /// Ensure backing indexes exist. Called once at startup.
    pub async fn init_indexes(&self) -> UserResult<()> {
        self.repository.create_indexes().await
    }
}

impl<R: UserRepository> Clone for UserService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

/// Reduce normalized fields to the effective update set.
///
/// Trimmed-to-empty names and emails are treated as absent rather than
/// invalid, matching the partial-update contract.
fn build_update_set(fields: UserFields) -> UserFields {
    UserFields {
        name: fields.name.filter(|n| !n.is_empty()),
        age: fields.age,
        email: fields.email.filter(|e| !e.is_empty()),
        address: fields.address,
    }
}
