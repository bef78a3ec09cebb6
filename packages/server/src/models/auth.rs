use crate::error::AppError;
use serde::{Deserialize, Serialize};

/// Request body for user login.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    /// Username of the account to log into.
    #[schema(example = "admin")]
    pub username: String,
    /// Account password.
    #[schema(example = "s3cure_P@ss!")]
    pub password: String,
}

pub fn validate_login_request(payload: &LoginRequest) -> Result<(), AppError> {
    if payload.username.trim().is_empty() {
        return Err(AppError::Validation("Username must not be empty".into()));
    }
    if payload.password.is_empty() {
        return Err(AppError::Validation("Password must not be empty".into()));
    }
    Ok(())
}

/// Successful login response.
#[derive(Serialize, utoipa::ToSchema)]
pub struct LoginResponse {
    /// JWT bearer token.
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
    #[schema(example = "admin")]
    pub username: String,
    #[schema(example = true)]
    pub is_admin: bool,
}

/// Current authenticated user's profile.
#[derive(Serialize, utoipa::ToSchema)]
pub struct MeResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "admin")]
    pub username: String,
    #[schema(example = true)]
    pub is_admin: bool,
}

/// Request body for changing the caller's password.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct ChangePasswordRequest {
    #[schema(example = "s3cure_P@ss!")]
    pub current_password: String,
    /// New password (8-128 characters).
    #[schema(example = "n3w_s3cure_P@ss!")]
    pub new_password: String,
}

pub fn validate_change_password(payload: &ChangePasswordRequest) -> Result<(), AppError> {
    if payload.current_password.is_empty() {
        return Err(AppError::Validation(
            "Current password must not be empty".into(),
        ));
    }
    if payload.new_password.len() < 8 || payload.new_password.len() > 128 {
        return Err(AppError::Validation(
            "Password must be 8-128 characters".into(),
        ));
    }
    Ok(())
}
