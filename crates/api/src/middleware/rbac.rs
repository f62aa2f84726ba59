//! Role gates layered on top of [`AuthUser`].

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use vitrine_core::error::CoreError;
use vitrine_core::roles::{ALL_ROLES, ROLE_ADMIN};

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Roles allowed to run the database tools and edit the remote connection.
const DATABASE_ROLES: &[&str] = &[ROLE_ADMIN];

fn ensure_role(user: &AuthUser, allowed: &[&str], denied: &str) -> Result<(), AppError> {
    if allowed.contains(&user.role.as_str()) {
        Ok(())
    } else {
        tracing::warn!(user_id = user.user_id, role = %user.role, "Role check failed");
        Err(CoreError::Forbidden(denied.to_string()).into())
    }
}

/// A signed-in user with the `admin` role (403 otherwise).
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        ensure_role(&user, DATABASE_ROLES, "Admin role required")?;
        Ok(Self(user))
    }
}

/// Any signed-in content role (admin or editor).
pub struct RequireAuth(pub AuthUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        ensure_role(&user, ALL_ROLES, "Content role required")?;
        Ok(Self(user))
    }
}
