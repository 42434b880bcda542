use axum::{extract::State, Json};
use validator::Validate;

use super::auth_dto::{ChangePasswordRequest, LoginRequest, LoginResponse, UpdateProfileRequest};
use crate::{
    error::{AppError, Result},
    extract::AppJson,
    middleware::AuthUser,
    response::{ok, ApiResponse},
    state::AppState,
    user::UserDto,
};

/// Login with email and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Invalid input data"),
        (status = 401, description = "Invalid email or password")
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>> {
    payload.validate()?;

    let response = state
        .auth_service
        .login(&payload.email, &payload.password)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid email or password".to_string()))?;

    Ok(ok(response, "Login successful"))
}

/// Get the authenticated user's profile
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user", body = UserDto),
        (status = 401, description = "Unauthorized")
    ),
    tag = "auth",
    security(("bearer_auth" = []))
)]
pub async fn me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<ApiResponse<UserDto>>> {
    let user = state.auth_service.current_user(user_id).await?;
    Ok(ok(user, "User retrieved successfully"))
}

/// Update the authenticated user's name and/or email
#[utoipa::path(
    put,
    path = "/api/auth/update-profile",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = UserDto),
        (status = 400, description = "Invalid input or email already in use"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "auth",
    security(("bearer_auth" = []))
)]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppJson(payload): AppJson<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<UserDto>>> {
    payload.validate()?;

    let user = state.auth_service.update_profile(user_id, payload).await?;
    Ok(ok(user, "Profile updated successfully"))
}

/// Change the authenticated user's password
#[utoipa::path(
    post,
    path = "/api/auth/change-password",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = bool),
        (status = 400, description = "Missing, too short or incorrect password"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "auth",
    security(("bearer_auth" = []))
)]
pub async fn change_password(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppJson(payload): AppJson<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<bool>>> {
    state.auth_service.change_password(user_id, payload).await?;
    Ok(ok(true, "Password changed successfully"))
}
