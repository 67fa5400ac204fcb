//! Input normalization.
//!
//! Turns a raw request payload into the canonical [`UserFields`] set.
//! Only shape normalization happens here; validation is a separate
//! step (see [`crate::validate`]).

use crate::models::{UserFields, UserPayload};

/// Normalize a raw payload into canonical field values.
///
/// - `name`: whitespace-trimmed
/// - `age`: floored toward negative infinity, then truncated to i64
/// - `email`: trimmed and lowercased
/// - `address`: whitespace-trimmed
///
/// Fields absent from the input stay absent in the output.
pub fn normalize(payload: UserPayload) -> UserFields {
    UserFields {
        name: payload.name.map(|n| n.trim().to_string()),
        age: payload.age.map(|a| a.floor() as i64),
        email: payload.email.map(|e| e.trim().to_lowercase()),
        address: payload.address.map(|a| a.trim().to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_trims_name_and_address() {
        let fields = normalize(UserPayload {
            name: Some("  Ann  ".to_string()),
            address: Some("\t1 Main St \n".to_string()),
            ..Default::default()
        });
        assert_eq!(fields.name.as_deref(), Some("Ann"));
        assert_eq!(fields.address.as_deref(), Some("1 Main St"));
    }

    #[test]
    fn test_normalize_floors_age() {
        let fields = normalize(UserPayload {
            age: Some(29.9),
            ..Default::default()
        });
        assert_eq!(fields.age, Some(29));
    }

    #[test]
    fn test_normalize_floors_age_toward_negative_infinity() {
        let fields = normalize(UserPayload {
            age: Some(-0.5),
            ..Default::default()
        });
        assert_eq!(fields.age, Some(-1));
    }

    #[test]
    fn test_normalize_lowercases_and_trims_email() {
        let fields = normalize(UserPayload {
            email: Some("  A@X.Com ".to_string()),
            ..Default::default()
        });
        assert_eq!(fields.email.as_deref(), Some("a@x.com"));
    }

    #[test]
    fn test_normalize_preserves_absence() {
        let fields = normalize(UserPayload::default());
        assert!(fields.is_empty());
    }
}
