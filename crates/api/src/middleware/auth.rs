//! Request-scoped identity extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::request::Parts;
use axum::http::HeaderMap;
use vitrine_core::error::CoreError;
use vitrine_core::roles::is_valid_role;
use vitrine_core::types::DbId;

use crate::auth::jwt::SESSION_COOKIE;
use crate::error::AppError;
use crate::state::AppState;

/// The authenticated admin user for the current request.
///
/// The token is read from `Authorization: Bearer <token>` first and from the
/// `admin_session` cookie otherwise.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.user_id, role = %user.role, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DbId,
    pub username: String,
    pub role: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_token(&parts.headers)?;

        let claims = state.config.jwt.verify(&token).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired session".into()))
        })?;

        if !is_valid_role(&claims.role) {
            return Err(AppError::Core(CoreError::Unauthorized(
                "Session carries an unknown role".into(),
            )));
        }

        Ok(AuthUser {
            user_id: claims.sub,
            username: claims.username,
            role: claims.role,
        })
    }
}

fn extract_token(headers: &HeaderMap) -> Result<String, AppError> {
    if let Some(header) = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        return header
            .strip_prefix("Bearer ")
            .map(str::to_string)
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Invalid Authorization format. Expected: Bearer <token>".into(),
                ))
            });
    }

    session_cookie_value(headers).ok_or_else(|| {
        AppError::Core(CoreError::Unauthorized("Authentication required".into()))
    })
}

/// Find the session cookie among all `Cookie` headers.
fn session_cookie_value(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}
