//! Authentication routes for login, token refresh, and logout.

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post};
use chrono::{Duration, Utc};
use serde_json::json;
use tracing::{error, info};

use crate::{AppState, audit_trail};
use botica_core::audit::AuditAction;
use botica_core::auth::verify_password;
use botica_db::{SessionRepository, UserRepository};
use botica_shared::auth::{LoginRequest, LoginResponse, LogoutRequest, RefreshRequest, UserInfo};

/// Creates the auth router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .route("/auth/logout", post(logout))
}

/// POST /auth/login - Authenticate user and return tokens.
#[allow(clippy::too_many_lines)]
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> impl IntoResponse {
    let user_repo = UserRepository::new((*state.db).clone());

    // Find user by email
    let (user, role) = match user_repo.find_by_email(&payload.email).await {
        Ok(Some(row)) => row,
        Ok(None) => {
            info!(email = %payload.email, "Login attempt for non-existent user");
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "invalid_credentials",
                    "message": "Invalid email or password"
                })),
            )
                .into_response();
        }
        Err(e) => {
            error!(error = %e, "Database error during login");
            return internal_error();
        }
    };

    // Check if user is active
    if !user.is_active {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "account_disabled",
                "message": "This account has been disabled"
            })),
        )
            .into_response();
    }

    // Verify password
    match verify_password(&payload.password, &user.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            info!(user_id = %user.id, "Failed login attempt - invalid password");
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "invalid_credentials",
                    "message": "Invalid email or password"
                })),
            )
                .into_response();
        }
        Err(e) => {
            error!(error = %e, "Password verification error");
            return internal_error();
        }
    }

    let Some(role) = role else {
        error!(user_id = %user.id, "User has no role row");
        return internal_error();
    };

    // Generate tokens
    let access_token = match state.jwt_service.generate_access_token(user.id, &role.name) {
        Ok(t) => t,
        Err(e) => {
            error!(error = %e, "Failed to generate access token");
            return internal_error();
        }
    };

    let refresh_token = match state.jwt_service.generate_refresh_token(user.id, &role.name) {
        Ok(t) => t,
        Err(e) => {
            error!(error = %e, "Failed to generate refresh token");
            return internal_error();
        }
    };

    // Persist the refresh session (hashed)
    let session_repo = SessionRepository::new((*state.db).clone());
    let expires_at = Utc::now() + Duration::days(state.jwt_service.refresh_token_expires_days());
    if let Err(e) = session_repo
        .create(user.id, &refresh_token, expires_at, None, None)
        .await
    {
        error!(error = %e, "Failed to create session");
        return internal_error();
    }

    info!(user_id = %user.id, "User logged in successfully");

    audit_trail::record(
        &state,
        Some(user.id),
        AuditAction::Login,
        None,
        Some("users"),
        Some(user.id),
    )
    .await;

    let response = LoginResponse {
        user: UserInfo {
            id: user.id,
            name: user.name,
            email: user.email,
            role: role.name,
        },
        access_token,
        refresh_token,
        expires_in: state.jwt_service.access_token_expires_in(),
    };

    (StatusCode::OK, Json(response)).into_response()
}

/// POST /auth/refresh - Refresh access token using refresh token.
async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> impl IntoResponse {
    // Validate refresh token signature and expiry
    let claims = match state.jwt_service.validate_token(&payload.refresh_token) {
        Ok(c) => c,
        Err(e) => {
            let (error, message) = match e {
                botica_shared::JwtError::Expired => ("token_expired", "Refresh token has expired"),
                _ => ("invalid_token", "Invalid refresh token"),
            };
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": error, "message": message })),
            )
                .into_response();
        }
    };

    // The session must still be live (not revoked by logout or deactivation)
    let session_repo = SessionRepository::new((*state.db).clone());
    match session_repo.find_by_token(&payload.refresh_token).await {
        Ok(Some(session)) if session.expires_at >= Utc::now() => {}
        Ok(_) => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "session_revoked",
                    "message": "Session is no longer valid"
                })),
            )
                .into_response();
        }
        Err(e) => {
            error!(error = %e, "Database error during token refresh");
            return internal_error();
        }
    }

    // Generate new access token
    let access_token = match state
        .jwt_service
        .generate_access_token(claims.user_id(), &claims.role)
    {
        Ok(t) => t,
        Err(e) => {
            error!(error = %e, "Failed to generate access token");
            return internal_error();
        }
    };

    (
        StatusCode::OK,
        Json(json!({
            "access_token": access_token,
            "expires_in": state.jwt_service.access_token_expires_in()
        })),
    )
        .into_response()
}

/// POST /auth/logout - Revoke the refresh session.
async fn logout(
    State(state): State<AppState>,
    Json(payload): Json<LogoutRequest>,
) -> impl IntoResponse {
    let session_repo = SessionRepository::new((*state.db).clone());

    match session_repo.revoke_by_token(&payload.refresh_token).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({ "message": "Logged out" })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Database error during logout");
            internal_error()
        }
    }
}

fn internal_error() -> axum::response::Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "internal_error",
            "message": "An error occurred"
        })),
    )
        .into_response()
}
