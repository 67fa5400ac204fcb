use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Default page size when the client does not provide one
pub const DEFAULT_PAGE_SIZE: i64 = 5;

/// Upper bound on the page size a client may request
pub const MAX_PAGE_SIZE: i64 = 100;

/// User entity as exposed over the API.
///
/// The identifier is the hex form of the MongoDB ObjectId assigned at
/// creation; it is opaque to clients and immutable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct User {
    /// Unique identifier assigned by the store
    pub id: String,
    /// Display name, at least 2 characters
    pub name: String,
    /// Age in whole years, >= 0
    pub age: i64,
    /// Email address, stored trimmed and lowercased, globally unique
    pub email: String,
    /// Optional postal address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Raw request body for create and update.
///
/// Every field is optional; unknown keys are rejected at
/// deserialization time. No validation happens here - the payload is
/// first normalized into [`UserFields`] and then validated.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UserPayload {
    pub name: Option<String>,
    /// Accepts fractional input; normalization floors it
    pub age: Option<f64>,
    pub email: Option<String>,
    pub address: Option<String>,
}

/// Canonical field set produced by normalization.
///
/// Fields absent from the input stay `None`; present fields are
/// trimmed (name, email, address), lowercased (email), and floored
/// (age).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserFields {
    pub name: Option<String>,
    pub age: Option<i64>,
    pub email: Option<String>,
    pub address: Option<String>,
}

impl UserFields {
    /// True when no recognized field carries a value
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.age.is_none() && self.email.is_none() && self.address.is_none()
    }
}

/// Fully validated input for creating a user.
///
/// Produced by `validate::validate_new`; existence of this type means
/// all required fields were present and passed their constraints.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub name: String,
    pub age: i64,
    pub email: String,
    pub address: Option<String>,
}

/// Query parameters for the list endpoint.
///
/// Values are carried as raw strings so that malformed numbers fall
/// back to the defaults instead of failing the request; the list
/// endpoint only fails on store errors.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct ListUsersParams {
    /// 1-based page number (default 1; values below 1 are clamped up)
    pub page: Option<String>,
    /// Page size (default 5, clamped to [1, 100])
    pub limit: Option<String>,
    /// Case-insensitive substring match against name, email or address
    pub search: Option<String>,
}

impl ListUsersParams {
    /// Resolve the pagination window, applying defaults and clamps.
    pub fn pagination(&self) -> Pagination {
        let page = parse_or(self.page.as_deref(), 1).max(1);
        let limit = parse_or(self.limit.as_deref(), DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
        Pagination { page, limit }
    }

    /// The trimmed search term, empty when absent.
    pub fn search(&self) -> &str {
        self.search.as_deref().map(str::trim).unwrap_or("")
    }
}

fn parse_or(value: Option<&str>, default: i64) -> i64 {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}

/// A clamped pagination window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
}

impl Pagination {
    /// Number of documents to skip for this window
    pub fn skip(&self) -> u64 {
        ((self.page - 1) * self.limit) as u64
    }

    /// Total page count for `total` matching records (0 when empty)
    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(self.limit as u64)
    }
}

/// Response body for the list endpoint
#[derive(Debug, Serialize, ToSchema)]
pub struct UserPage {
    pub page: i64,
    pub limit: i64,
    pub total: u64,
    #[serde(rename = "totalPages")]
    pub total_pages: u64,
    pub data: Vec<User>,
}

/// Response body for successful create/update
#[derive(Debug, Serialize, ToSchema)]
pub struct UserEnvelope {
    pub message: String,
    pub data: User,
}

/// Response body for successful delete
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}
