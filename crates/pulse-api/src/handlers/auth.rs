//! Auth handlers — register and login.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use tracing::info;
use validator::Validate;

use pulse_core::error::AppError;
use pulse_entity::NewUser;

use crate::dto::request::{LoginRequest, RegisterRequest};
use crate::dto::response::{ApiResponse, AuthResponse, UserResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AuthResponse>>), ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let min_length = state.config.auth.password_min_length;
    if req.password.chars().count() < min_length {
        return Err(AppError::validation(format!(
            "Password must be at least {min_length} characters"
        ))
        .into());
    }

    let password_hash = state.password_hasher.hash_password(&req.password)?;
    let user = state
        .user_repo
        .create(&NewUser {
            username: req.username,
            email: req.email,
            password_hash,
        })
        .await?;

    info!(user_id = %user.id, username = %user.username, "User registered");

    let (access_token, expires_at) = state
        .jwt_encoder
        .generate_token(user.id, &user.username)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(AuthResponse {
            access_token,
            expires_at,
            user: UserResponse::from(&user),
        })),
    ))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    // The same rejection for unknown email and wrong password.
    let user = state
        .user_repo
        .find_by_email(&req.email)
        .await?
        .ok_or_else(|| AppError::unauthorized("Invalid email or password"))?;

    let verified = state
        .password_hasher
        .verify_password(&req.password, &user.password_hash)?;
    if !verified {
        return Err(AppError::unauthorized("Invalid email or password").into());
    }

    let (access_token, expires_at) = state
        .jwt_encoder
        .generate_token(user.id, &user.username)?;

    info!(user_id = %user.id, "User logged in");

    Ok(Json(ApiResponse::ok(AuthResponse {
        access_token,
        expires_at,
        user: UserResponse::from(&user),
    })))
}
