//! User handlers — thin glue over the user service. All routes except
//! registration sit behind the authorization gate.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use uuid::Uuid;
use validator::Validate;

use authgate_core::error::AppError;
use authgate_core::types::pagination::{PageRequest, PageResponse};
use authgate_entity::user::UserRole;

use crate::dto::request::{CreateUserRequest, UpdateUserRequest};
use crate::dto::response::{MessageResponse, UserResponse};
use crate::error::ApiResult;
use crate::state::AppState;

/// POST /api/users — registration.
pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let role = match req.role.as_deref() {
        Some(raw) => Some(
            raw.parse::<UserRole>()
                .map_err(|e| AppError::validation(e))?,
        ),
        None => None,
    };

    let user = state
        .user_service
        .create_user(&req.email, &req.password, role)
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// GET /api/users
pub async fn list_users(
    State(state): State<AppState>,
    Query(page): Query<PageRequest>,
) -> ApiResult<Json<PageResponse<UserResponse>>> {
    let users = state.user_service.list_users(&page).await?;
    let items = users.items.into_iter().map(UserResponse::from).collect();
    Ok(Json(PageResponse::new(
        items,
        users.page,
        users.page_size,
        users.total,
    )))
}

/// GET /api/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<UserResponse>> {
    let user = state.user_service.get_user(id).await?;
    Ok(Json(UserResponse::from(user)))
}

/// PUT /api/users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateUserRequest>,
) -> ApiResult<Json<UserResponse>> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let user = state.user_service.update_email(id, &req.email).await?;
    Ok(Json(UserResponse::from(user)))
}

/// DELETE /api/users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    if !state.user_service.delete_user(id).await? {
        return Err(AppError::not_found("User not found").into());
    }
    Ok(Json(MessageResponse {
        message: "User deleted".to_string(),
    }))
}
