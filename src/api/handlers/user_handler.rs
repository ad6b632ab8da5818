//! User handlers.
//!
//! Each handler parses its input, makes exactly one service call and wraps
//! the outcome in the response envelope.

use axum::{
    extract::{Path, State},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::api::extractors::{CorrelationId, JsonBody, QueryParams, UserId};
use crate::api::state::AppState;
use crate::config::FIRST_PAGE;
use crate::domain::{NewUser, UserResponse};
use crate::errors::{AppError, AppResult};
use crate::types::ApiResponse;

/// Body for create and update
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    #[schema(example = "kong")]
    pub username: String,
    #[schema(example = "kong123")]
    pub password: String,
}

impl From<CreateUserRequest> for NewUser {
    fn from(req: CreateUserRequest) -> Self {
        NewUser::new(req.username, req.password)
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreateUserResponse {
    #[schema(example = "kong")]
    pub username: String,
}

/// List filter and page selection
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListUsersQuery {
    /// Substring match on username
    pub username: Option<String>,
    /// 1-indexed page number
    pub page: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListUsersResponse {
    pub total_count: u64,
    pub user_list: Vec<UserResponse>,
}

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        // One dynamic segment: a username for GET, a numeric id for PUT/DELETE
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
}

/// Create a user
#[utoipa::path(
    post,
    path = "/v1/user",
    tag = "user",
    request_body = CreateUserRequest,
    responses(
        (status = 200, description = "User created", body = CreateUserResponse),
        (status = 400, description = "Bind or validation error"),
        (status = 409, description = "Username already taken")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    correlation_id: CorrelationId,
    JsonBody(payload): JsonBody<CreateUserRequest>,
) -> AppResult<ApiResponse<CreateUserResponse>> {
    tracing::info!(request_id = %correlation_id, "User create called");

    let user = state.user_service.create_user(payload.into()).await?;

    Ok(ApiResponse::success(CreateUserResponse {
        username: user.username,
    }))
}

/// List users, newest first
#[utoipa::path(
    get,
    path = "/v1/user",
    tag = "user",
    params(ListUsersQuery),
    responses(
        (status = 200, description = "One page of users", body = ListUsersResponse),
        (status = 400, description = "Malformed query string")
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    correlation_id: CorrelationId,
    QueryParams(query): QueryParams<ListUsersQuery>,
) -> AppResult<ApiResponse<ListUsersResponse>> {
    tracing::info!(request_id = %correlation_id, "User list called");

    let (users, total_count) = state
        .user_service
        .list_users(query.username, query.page.unwrap_or(FIRST_PAGE))
        .await?;

    Ok(ApiResponse::success(ListUsersResponse {
        total_count,
        user_list: users.into_iter().map(UserResponse::from).collect(),
    }))
}

/// Get a user by username
#[utoipa::path(
    get,
    path = "/v1/user/{username}",
    tag = "user",
    params(("username" = String, Path, description = "Username")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    correlation_id: CorrelationId,
    Path(username): Path<String>,
) -> AppResult<ApiResponse<UserResponse>> {
    tracing::info!(request_id = %correlation_id, username = %username, "User get called");

    let user = state
        .user_service
        .get_user_by_name(&username)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(ApiResponse::success(UserResponse::from(user)))
}

/// Replace username and password
#[utoipa::path(
    put,
    path = "/v1/user/{id}",
    tag = "user",
    params(("id" = i64, Path, description = "User database id")),
    request_body = CreateUserRequest,
    responses(
        (status = 200, description = "User updated"),
        (status = 400, description = "Bind or validation error"),
        (status = 404, description = "User not found")
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    correlation_id: CorrelationId,
    UserId(id): UserId,
    JsonBody(payload): JsonBody<CreateUserRequest>,
) -> AppResult<ApiResponse<()>> {
    tracing::info!(request_id = %correlation_id, user_id = id, "User update called");

    state.user_service.update_user(id, payload.into()).await?;

    Ok(ApiResponse::empty())
}

/// Soft delete a user
#[utoipa::path(
    delete,
    path = "/v1/user/{id}",
    tag = "user",
    params(("id" = i64, Path, description = "User database id")),
    responses(
        (status = 200, description = "User deleted"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    correlation_id: CorrelationId,
    UserId(id): UserId,
) -> AppResult<ApiResponse<()>> {
    tracing::info!(request_id = %correlation_id, user_id = id, "User delete called");

    state.user_service.delete_user(id).await?;

    Ok(ApiResponse::empty())
}
