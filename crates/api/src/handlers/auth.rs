//! Handlers for the `/auth` resource (login, logout, current session).

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use vitrine_core::error::CoreError;
use vitrine_core::types::DbId;
use vitrine_db::repositories::AdminUserRepo;

use crate::auth::jwt::clear_session_cookie;
use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    /// Session lifetime in seconds.
    pub expires_in: i64,
    pub user: UserInfo,
}

#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub role: String,
}

/// POST /api/v1/auth/login
///
/// Check credentials and start a session. The token is returned in the body
/// and set as the `admin_session` cookie.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let invalid = || {
        AppError::Core(CoreError::Unauthorized(
            "Invalid username or password".into(),
        ))
    };

    let user = AdminUserRepo::find_by_username(&state.pool, input.username.trim())
        .await?
        .ok_or_else(invalid)?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::warn!(username = %user.username, "Failed admin login");
        return Err(invalid());
    }

    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    AdminUserRepo::record_login(&state.pool, user.id).await?;

    let jwt = &state.config.jwt;
    let token = jwt
        .issue(user.id, &user.username, &user.role)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(user_id = user.id, role = %user.role, "Admin logged in");

    let body = LoginResponse {
        expires_in: jwt.session_secs(),
        user: UserInfo {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role,
        },
        token: token.clone(),
    };
    Ok((
        [(SET_COOKIE, jwt.session_cookie(&token))],
        Json(DataResponse { data: body }),
    ))
}

/// POST /api/v1/auth/logout
///
/// Sessions are stateless tokens; logging out clears the cookie.
pub async fn logout(user: AuthUser) -> impl IntoResponse {
    tracing::info!(user_id = user.user_id, "Admin logged out");
    (
        [(SET_COOKIE, clear_session_cookie())],
        Json(DataResponse {
            data: serde_json::json!({ "logged_out": true }),
        }),
    )
}

/// GET /api/v1/auth/me
///
/// The stored account behind the session. A deactivated or deleted account
/// ends the session.
pub async fn me(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<UserInfo>>> {
    let account = AdminUserRepo::find_by_id(&state.pool, user.user_id)
        .await?
        .filter(|account| account.is_active)
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Session is no longer valid".into()))
        })?;

    Ok(Json(DataResponse {
        data: UserInfo {
            id: account.id,
            username: account.username,
            email: account.email,
            role: account.role,
        },
    }))
}
