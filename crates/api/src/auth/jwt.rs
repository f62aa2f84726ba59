//! Admin session tokens.
//!
//! A successful login yields an HS256-signed JWT carrying [`Claims`]. The
//! same token is returned in the response body and set as the
//! `admin_session` cookie, so both API clients and the browser panel can
//! authenticate with it. Sessions are stateless: logging out only clears
//! the cookie.

use jsonwebtoken::errors::Error as JwtError;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use vitrine_core::types::DbId;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "admin_session";

const DEFAULT_SESSION_MINS: i64 = 480;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Admin user id.
    pub sub: DbId,
    pub username: String,
    /// `admin` or `editor`.
    pub role: String,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
}

/// Signing secret and session lifetime.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    /// Session lifetime in minutes, also used as the cookie `Max-Age`.
    pub access_token_expiry_mins: i64,
}

impl JwtConfig {
    /// Read `JWT_SECRET` (required, non-empty) and `JWT_ACCESS_EXPIRY_MINS`
    /// (default 480).
    ///
    /// # Panics
    ///
    /// On a missing secret or an unparsable lifetime; called once at startup.
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET").unwrap_or_default();
        assert!(!secret.is_empty(), "JWT_SECRET must be set to a non-empty value");

        let access_token_expiry_mins = match std::env::var("JWT_ACCESS_EXPIRY_MINS") {
            Ok(raw) => raw
                .parse()
                .expect("JWT_ACCESS_EXPIRY_MINS must be a whole number of minutes"),
            Err(_) => DEFAULT_SESSION_MINS,
        };

        Self {
            secret,
            access_token_expiry_mins,
        }
    }

    /// Session lifetime in seconds.
    pub fn session_secs(&self) -> i64 {
        self.access_token_expiry_mins * 60
    }

    /// Sign a new session token for an admin user.
    pub fn issue(&self, user_id: DbId, username: &str, role: &str) -> Result<String, JwtError> {
        let iat = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: user_id,
            username: username.to_string(),
            role: role.to_string(),
            exp: iat + self.session_secs(),
            iat,
            jti: Uuid::new_v4().to_string(),
        };
        self.sign(&claims)
    }

    /// Check signature and expiry, returning the claims.
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        let key = DecodingKey::from_secret(self.secret.as_bytes());
        jsonwebtoken::decode::<Claims>(token, &key, &Validation::default()).map(|data| data.claims)
    }

    /// `Set-Cookie` value carrying `token` for the session lifetime.
    pub fn session_cookie(&self, token: &str) -> String {
        format!(
            "{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
            self.session_secs()
        )
    }

    fn sign(&self, claims: &Claims) -> Result<String, JwtError> {
        let key = EncodingKey::from_secret(self.secret.as_bytes());
        jsonwebtoken::encode(&Header::default(), claims, &key)
    }
}

/// `Set-Cookie` value that expires the session cookie.
pub fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}
