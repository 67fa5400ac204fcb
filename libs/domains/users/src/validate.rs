//! Field validation.
//!
//! Pure validation functions, independent of the storage driver. They
//! run before every write and return every failed constraint rather
//! than stopping at the first.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{NewUser, UserFields};

/// Minimal `local@domain` shape; intentionally loose beyond that
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\S+@\S+\.\S+$").expect("email pattern is valid"));

/// A single failed field constraint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validate normalized fields for a create.
///
/// All required fields must be present and pass their constraints.
/// Returns the fully typed [`NewUser`] on success.
pub fn validate_new(fields: UserFields) -> Result<NewUser, Vec<FieldError>> {
    let mut errors = Vec::new();
    check_present_fields(&fields, &mut errors);

    if fields.name.is_none() {
        errors.push(FieldError::new("name", "Name is required"));
    }
    if fields.age.is_none() {
        errors.push(FieldError::new("age", "Age is required"));
    }
    if fields.email.is_none() {
        errors.push(FieldError::new("email", "Email is required"));
    }

    match (fields.name, fields.age, fields.email) {
        (Some(name), Some(age), Some(email)) if errors.is_empty() => Ok(NewUser {
            name,
            age,
            email,
            address: fields.address,
        }),
        _ => Err(errors),
    }
}

/// Validate normalized fields for a partial update.
///
/// Only fields that are present are checked.
pub fn validate_update(fields: &UserFields) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();
    check_present_fields(fields, &mut errors);

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// Constraint checks for whatever fields carry a value.
fn check_present_fields(fields: &UserFields, errors: &mut Vec<FieldError>) {
    if let Some(ref name) = fields.name
        && name.chars().count() < 2
    {
        errors.push(FieldError::new("name", "Name must be at least 2 characters"));
    }

    if let Some(age) = fields.age
        && age < 0
    {
        errors.push(FieldError::new("age", "Age must be >= 0"));
    }

    if let Some(ref email) = fields.email
        && !EMAIL_RE.is_match(email)
    {
        errors.push(FieldError::new("email", "Email is not valid"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_fields() -> UserFields {
        UserFields {
            name: Some("Ann".to_string()),
            age: Some(30),
            email: Some("ann@example.com".to_string()),
            address: None,
        }
    }

    #[test]
    fn test_validate_new_accepts_complete_input() {
        let user = validate_new(full_fields()).unwrap();
        assert_eq!(user.name, "Ann");
        assert_eq!(user.age, 30);
        assert_eq!(user.email, "ann@example.com");
        assert_eq!(user.address, None);
    }

    #[test]
    fn test_validate_new_requires_all_fields() {
        let errors = validate_new(UserFields::default()).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["name", "age", "email"]);
    }

    #[test]
    fn test_validate_new_rejects_short_name() {
        let mut fields = full_fields();
        fields.name = Some("A".to_string());
        let errors = validate_new(fields).unwrap_err();
        assert_eq!(errors[0].field, "name");
    }

    #[test]
    fn test_validate_new_rejects_negative_age() {
        let mut fields = full_fields();
        fields.age = Some(-1);
        let errors = validate_new(fields).unwrap_err();
        assert_eq!(errors[0].field, "age");
    }

    #[test]
    fn test_validate_new_rejects_bad_email_shape() {
        for bad in ["plainaddress", "a@b", "a b@c.com", "@x.com"] {
            let mut fields = full_fields();
            fields.email = Some(bad.to_string());
            let errors = validate_new(fields).unwrap_err();
            assert_eq!(errors[0].field, "email", "expected rejection for {bad}");
        }
    }

    #[test]
    fn test_validate_update_checks_only_present_fields() {
        let fields = UserFields {
            age: Some(31),
            ..Default::default()
        };
        assert!(validate_update(&fields).is_ok());
    }

    #[test]
    fn test_validate_update_rejects_bad_present_field() {
        let fields = UserFields {
            age: Some(-1),
            ..Default::default()
        };
        let errors = validate_update(&fields).unwrap_err();
        assert_eq!(errors[0].field, "age");
    }

    #[test]
    fn test_validate_update_accepts_empty_set() {
        // Emptiness is the service's concern, not a field constraint
        assert!(validate_update(&UserFields::default()).is_ok());
    }
}
