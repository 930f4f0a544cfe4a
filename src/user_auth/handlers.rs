use axum::{Json, extract::State};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use super::service::{AuthResponse, LoginRequest, RegisterRequest};
use crate::gateway::state::AppState;
use crate::gateway::types::{ApiError, ApiResult, created, ok};

/// Registration body
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterBody {
    #[validate(email(message = "Invalid email"))]
    pub email: String,
    #[validate(length(min = 1, max = 128, message = "Name is required"))]
    pub name: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginBody {
    #[validate(email(message = "Invalid email"))]
    pub email: String,
    pub password: String,
}

/// Register a new account
///
/// POST /api/v1/auth/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RegisterBody>,
) -> ApiResult<AuthResponse> {
    body.validate()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    let resp = state
        .user_auth
        .register(RegisterRequest {
            email: body.email,
            name: body.name,
            password: body.password,
        })
        .await?;
    created(resp)
}

/// Login
///
/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginBody>,
) -> ApiResult<AuthResponse> {
    if body.validate().is_err() {
        // Malformed email reads the same as an unknown one
        return ApiError::unauthorized("Invalid email or password").into_err();
    }

    match state
        .user_auth
        .login(LoginRequest {
            email: body.email,
            password: body.password,
        })
        .await
    {
        Ok(resp) => ok(resp),
        Err(e) => {
            tracing::warn!(error = %e, "Login failed");
            Err(e.into())
        }
    }
}
