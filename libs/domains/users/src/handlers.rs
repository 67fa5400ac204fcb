use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use axum_helpers::JsonPayload;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::UserResult;
use crate::models::{
    ListUsersParams, MessageResponse, User, UserEnvelope, UserPage, UserPayload,
};
use crate::repository::UserRepository;
use crate::service::UserService;
use crate::validate::FieldError;

/// OpenAPI documentation for the Users API
#[derive(OpenApi)]
#[openapi(
    paths(list_users, create_user, update_user, delete_user),
    components(schemas(
        User,
        UserPayload,
        UserPage,
        UserEnvelope,
        MessageResponse,
        FieldError,
        axum_helpers::ErrorResponse
    )),
    tags(
        (name = "Users", description = "User management endpoints (MongoDB)")
    )
)]
pub struct ApiDoc;

/// Create the users router with all HTTP endpoints
pub fn router<R: UserRepository + 'static>(service: UserService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/{id}", axum::routing::put(update_user).delete(delete_user))
        .with_state(shared_service)
}

/// List users with search and pagination
#[utoipa::path(
    get,
    path = "",
    tag = "Users",
    params(ListUsersParams),
    responses(
        (status = 200, description = "One page of users with totals", body = UserPage),
        (status = 500, description = "Store error", body = axum_helpers::ErrorResponse)
    )
)]
async fn list_users<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Query(params): Query<ListUsersParams>,
) -> UserResult<Json<UserPage>> {
    let page = service.list_users(&params).await?;
    Ok(Json(page))
}

/// Create a new user
#[utoipa::path(
    post,
    path = "",
    tag = "Users",
    request_body = UserPayload,
    responses(
        (status = 201, description = "User created successfully", body = UserEnvelope),
        (status = 400, description = "Validation failure or duplicate email", body = axum_helpers::ErrorResponse),
        (status = 500, description = "Store error", body = axum_helpers::ErrorResponse)
    )
)]
async fn create_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    JsonPayload(payload): JsonPayload<UserPayload>,
) -> UserResult<impl IntoResponse> {
    let user = service.create_user(payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(UserEnvelope {
            message: "User created successfully".to_string(),
            data: user,
        }),
    ))
}

/// Partially update a user
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Users",
    params(
        ("id" = String, Path, description = "User id (ObjectId hex)")
    ),
    request_body = UserPayload,
    responses(
        (status = 200, description = "User updated successfully", body = UserEnvelope),
        (status = 400, description = "Invalid id, empty update, validation failure or duplicate email", body = axum_helpers::ErrorResponse),
        (status = 404, description = "User not found", body = axum_helpers::ErrorResponse),
        (status = 500, description = "Store error", body = axum_helpers::ErrorResponse)
    )
)]
async fn update_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Path(id): Path<String>,
    JsonPayload(payload): JsonPayload<UserPayload>,
) -> UserResult<Json<UserEnvelope>> {
    let user = service.update_user(&id, payload).await?;

    Ok(Json(UserEnvelope {
        message: "User updated successfully".to_string(),
        data: user,
    }))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Users",
    params(
        ("id" = String, Path, description = "User id (ObjectId hex)")
    ),
    responses(
        (status = 200, description = "User deleted successfully", body = MessageResponse),
        (status = 400, description = "Invalid id", body = axum_helpers::ErrorResponse),
        (status = 404, description = "User not found", body = axum_helpers::ErrorResponse),
        (status = 500, description = "Store error", body = axum_helpers::ErrorResponse)
    )
)]
async fn delete_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Path(id): Path<String>,
) -> UserResult<Json<MessageResponse>> {
    service.delete_user(&id).await?;

    Ok(Json(MessageResponse {
        message: "User deleted successfully".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UserError;
    use crate::models::Pagination;
    use crate::repository::MockUserRepository;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use tower::ServiceExt;

    fn app(repo: MockUserRepository) -> Router {
        router(UserService::new(repo))
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn sample_user() -> User {
        User {
            id: "652f0000000000000000aaaa".to_string(),
            name: "Ann".to_string(),
            age: 30,
            email: "a@x.com".to_string(),
            address: None,
        }
    }

    #[tokio::test]
    async fn test_list_returns_page_envelope() {
        let mut repo = MockUserRepository::new();
        repo.expect_list()
            .withf(|search, pagination| {
                search.is_empty() && *pagination == Pagination { page: 1, limit: 5 }
            })
            .return_once(|_, _| Ok((vec![], 0)));

        let response = app(repo)
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["page"], 1);
        assert_eq!(body["limit"], 5);
        assert_eq!(body["total"], 0);
        assert_eq!(body["totalPages"], 0);
        assert_eq!(body["data"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_list_clamps_query_params() {
        let mut repo = MockUserRepository::new();
        repo.expect_list()
            .withf(|_, pagination| *pagination == Pagination { page: 1, limit: 100 })
            .return_once(|_, _| Ok((vec![], 0)));

        let response = app(repo)
            .oneshot(
                Request::get("/?page=0&limit=1000")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_create_returns_201_with_envelope() {
        let mut repo = MockUserRepository::new();
        repo.expect_exists_by_email().return_once(|_, _| Ok(false));
        repo.expect_create().return_once(|_| Ok(sample_user()));

        let response = app(repo)
            .oneshot(
                Request::post("/")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        r#"{"name":"Ann","age":30,"email":"A@X.com"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["message"], "User created successfully");
        assert_eq!(body["data"]["email"], "a@x.com");
    }

    #[tokio::test]
    async fn test_create_duplicate_email_returns_400_error_body() {
        let mut repo = MockUserRepository::new();
        repo.expect_exists_by_email().return_once(|_, _| Ok(true));
        repo.expect_create().never();

        let response = app(repo)
            .oneshot(
                Request::post("/")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        r#"{"name":"Bob","age":25,"email":"a@x.com"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Email already exists");
    }

    #[tokio::test]
    async fn test_create_validation_failure_lists_field_errors() {
        let repo = MockUserRepository::new();

        let response = app(repo)
            .oneshot(
                Request::post("/")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"name":"A","age":-1,"email":"nope"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Validation failed");
        assert_eq!(body["details"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_create_unknown_field_rejected() {
        let repo = MockUserRepository::new();

        let response = app(repo)
            .oneshot(
                Request::post("/")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        r#"{"name":"Ann","age":30,"email":"a@x.com","role":"admin"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_update_empty_body_returns_400() {
        let mut repo = MockUserRepository::new();
        repo.expect_update().never();

        let response = app(repo)
            .oneshot(
                Request::put("/652f0000000000000000aaaa")
                    .header("content-type", "application/json")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "No fields to update");
    }

    #[tokio::test]
    async fn test_update_invalid_id_returns_400() {
        let mut repo = MockUserRepository::new();
        repo.expect_update()
            .return_once(|id, _| Err(UserError::InvalidId(id.to_string())));

        let response = app(repo)
            .oneshot(
                Request::put("/not-an-id")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"age":31}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_update_missing_user_returns_404() {
        let mut repo = MockUserRepository::new();
        repo.expect_update()
            .return_once(|id, _| Err(UserError::NotFound(id.to_string())));

        let response = app(repo)
            .oneshot(
                Request::put("/652f0000000000000000aaaa")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"age":31}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["error"], "User not found");
    }

    #[tokio::test]
    async fn test_delete_returns_200_with_message() {
        let mut repo = MockUserRepository::new();
        repo.expect_delete().return_once(|_| Ok(()));

        let response = app(repo)
            .oneshot(
                Request::delete("/652f0000000000000000aaaa")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["message"], "User deleted successfully");
    }

    #[tokio::test]
    async fn test_delete_missing_user_returns_404() {
        let mut repo = MockUserRepository::new();
        repo.expect_delete()
            .return_once(|id| Err(UserError::NotFound(id.to_string())));

        let response = app(repo)
            .oneshot(
                Request::delete("/652f0000000000000000bbbb")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_store_error_returns_500() {
        let mut repo = MockUserRepository::new();
        repo.expect_list()
            .return_once(|_, _| Err(UserError::Database("connection reset".to_string())));

        let response = app(repo)
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
