//! JSON body extractor with a consistent `{error: ...}` rejection.

use crate::errors::AppError;
use axum::{
    extract::{FromRequest, Json, Request},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;

/// JSON body extractor.
///
/// Behaves like [`axum::Json`] but turns every rejection (missing
/// content type, malformed body, unknown fields) into a 400 response
/// with the standard `{error: ...}` body instead of axum's plain-text
/// rejection.
///
/// # Example
/// ```ignore
/// use axum_helpers::JsonPayload;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// #[serde(deny_unknown_fields)]
/// struct CreateUser {
///     name: String,
/// }
///
/// async fn create_user(JsonPayload(payload): JsonPayload<CreateUser>) {
///     // ...
/// }
/// ```
pub struct JsonPayload<T>(pub T);

impl<T, S> FromRequest<S> for JsonPayload<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::from(e).into_response())?;

        Ok(JsonPayload(data))
    }
}
