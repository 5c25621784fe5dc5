//! Authentication Handlers
//!
//! Admin login against the configured credentials

use std::time::Duration;

use axum::{Json, extract::State};
use shared::models::{LoginRequest, LoginResponse, UserInfo};

use crate::AppError;
use crate::auth::CurrentUser;
use crate::auth::password::verify_password;
use crate::core::ServerState;
use crate::security_log;
use crate::utils::AppJson;

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 250;

const ADMIN_ROLE: &str = "admin";

/// Login handler
///
/// Verifies the admin username and Argon2 hash, then issues a JWT
pub async fn login(
    State(state): State<ServerState>,
    AppJson(req): AppJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let admin = state.admin.clone();
    let password = req.password;
    let hash = admin.password_hash.clone();

    // Argon2 is CPU-bound
    let password_ok = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| AppError::internal(format!("Password verification failed: {e}")))?;

    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    // Unified error to prevent username enumeration
    if req.username != admin.username || !password_ok {
        security_log!("WARN", "login_failed", username = req.username.as_str());
        tracing::warn!(username = %req.username, "Login failed - invalid credentials");
        return Err(AppError::invalid_credentials());
    }

    let token = state
        .jwt_service
        .generate_token(&admin.username, ADMIN_ROLE)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))?;

    security_log!("INFO", "login_success", username = admin.username.as_str());
    tracing::info!(username = %admin.username, "Admin logged in");

    Ok(Json(LoginResponse {
        token,
        expires_in: state.jwt_service.expires_in_seconds(),
        user: UserInfo {
            username: admin.username.clone(),
            role: ADMIN_ROLE.to_string(),
        },
    }))
}

/// Get current user info
pub async fn me(user: CurrentUser) -> Json<UserInfo> {
    Json(UserInfo {
        username: user.username,
        role: user.role,
    })
}
