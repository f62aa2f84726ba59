//! Remote (cPanel) database settings and connection handling.
//!
//! Credentials live in `site_options`. Connection failures are turned into
//! [`SyncError::Connection`] with suggestions an administrator can act on.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Serialize;
use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use sqlx::MySqlPool;
use vitrine_core::site_option::{
    KEY_CPANEL_DB_HOST, KEY_CPANEL_DB_NAME, KEY_CPANEL_DB_PASSWORD, KEY_CPANEL_DB_PORT,
    KEY_CPANEL_DB_USER, KEY_PRODUCTION_URL, REMOTE_DB_KEYS,
};
use vitrine_db::repositories::SiteOptionRepo;

use crate::error::{SyncError, SyncResult};
use crate::schema;

pub const DEFAULT_MYSQL_PORT: u16 = 3306;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings for the remote database.
#[derive(Clone, PartialEq, Eq)]
pub struct RemoteDbConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub username: String,
    pub password: String,
    /// Public base URL of the production site, used for URL rewriting.
    pub production_url: Option<String>,
}

impl std::fmt::Debug for RemoteDbConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteDbConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &"[redacted]")
            .field("production_url", &self.production_url)
            .finish()
    }
}

impl RemoteDbConfig {
    /// Build from site option values. Host, database name and username are
    /// required; the port defaults to 3306 and the password may be empty.
    pub fn from_options(options: &BTreeMap<String, String>) -> SyncResult<Self> {
        let value = |key: &str| {
            options
                .get(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let missing: Vec<&str> = [KEY_CPANEL_DB_HOST, KEY_CPANEL_DB_NAME, KEY_CPANEL_DB_USER]
            .into_iter()
            .filter(|key| value(key).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(SyncError::InvalidConfig(format!(
                "Remote database is not configured. Missing: {}",
                missing.join(", ")
            )));
        }

        let port = match value(KEY_CPANEL_DB_PORT) {
            None => DEFAULT_MYSQL_PORT,
            Some(raw) => raw.parse::<u16>().ok().filter(|p| *p > 0).ok_or_else(|| {
                SyncError::InvalidConfig(format!("Invalid remote database port '{raw}'"))
            })?,
        };

        Ok(Self {
            host: value(KEY_CPANEL_DB_HOST).unwrap_or_default(),
            port,
            database: value(KEY_CPANEL_DB_NAME).unwrap_or_default(),
            username: value(KEY_CPANEL_DB_USER).unwrap_or_default(),
            password: options.get(KEY_CPANEL_DB_PASSWORD).cloned().unwrap_or_default(),
            production_url: value(KEY_PRODUCTION_URL),
        })
    }

    /// Read the settings from the local `site_options` table.
    pub async fn load(pool: &MySqlPool) -> SyncResult<Self> {
        let options = SiteOptionRepo::get_many(pool, REMOTE_DB_KEYS).await?;
        Self::from_options(&options)
    }

    pub fn connect_options(&self) -> MySqlConnectOptions {
        MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.database)
            .username(&self.username)
            .password(&self.password)
            .charset("utf8mb4")
    }
}

/// What a successful connection test reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerInfo {
    pub version: String,
    pub database: String,
    pub table_count: usize,
}

/// Open a small pool to the remote database.
pub async fn connect(config: &RemoteDbConfig) -> SyncResult<MySqlPool> {
    MySqlPoolOptions::new()
        .max_connections(2)
        .acquire_timeout(CONNECT_TIMEOUT)
        .connect_with(config.connect_options())
        .await
        .map_err(|e| connection_error(&e, config))
}

/// Server version, current database and table count.
pub async fn server_info(pool: &MySqlPool) -> SyncResult<ServerInfo> {
    let mut conn = pool.acquire().await?;
    let version = sqlx::query_scalar::<_, String>("SELECT VERSION()")
        .fetch_one(&mut *conn)
        .await?;
    let database = schema::current_database(&mut conn).await?.unwrap_or_default();
    let table_count = schema::list_tables(&mut conn).await?.len();
    Ok(ServerInfo {
        version,
        database,
        table_count,
    })
}

/// Connect with `config`, query the server and close the pool.
pub async fn test_connection(config: &RemoteDbConfig) -> SyncResult<ServerInfo> {
    let pool = connect(config).await?;
    let info = server_info(&pool).await;
    pool.close().await;
    let info = info?;
    tracing::info!(
        host = %config.host,
        database = %info.database,
        version = %info.version,
        tables = info.table_count,
        "Remote connection test succeeded",
    );
    Ok(info)
}

/// Wrap a connect failure with suggestions.
pub fn connection_error(err: &sqlx::Error, config: &RemoteDbConfig) -> SyncError {
    let message = err.to_string();
    tracing::warn!(
        host = %config.host,
        port = config.port,
        error = %message,
        "Remote connection failed",
    );
    SyncError::Connection {
        suggestions: suggestions_for(&message, config),
        message,
    }
}

/// Map a driver error message to hints for the administrator.
pub fn suggestions_for(message: &str, config: &RemoteDbConfig) -> Vec<String> {
    let lower = message.to_lowercase();
    let mut suggestions = Vec::new();

    if lower.contains("access denied") {
        suggestions.push(format!(
            "Check the username '{}' and password for the remote database.",
            config.username
        ));
        suggestions.push(
            "In cPanel, add this server's IP address under Remote MySQL access hosts.".to_string(),
        );
        suggestions.push(format!(
            "Make sure the user has privileges on the database '{}'.",
            config.database
        ));
    }
    if lower.contains("unknown database") {
        suggestions.push(format!(
            "The database '{}' does not exist. cPanel database names usually carry \
             the account prefix (account_dbname).",
            config.database
        ));
    }
    if lower.contains("can't connect") || lower.contains("connection refused") {
        suggestions.push(format!(
            "Nothing is accepting connections at {}:{}. Check the host name and port.",
            config.host, config.port
        ));
        suggestions.push(
            "Remote MySQL access may be disabled or blocked by a firewall on the hosting side."
                .to_string(),
        );
    }
    if lower.contains("timed out") || lower.contains("timeout") {
        suggestions.push(
            "The connection timed out. The port may be firewalled or the host \
             unreachable from this server."
                .to_string(),
        );
    }
    if lower.contains("unknown mysql server host") || lower.contains("failed to lookup address") {
        suggestions.push(format!(
            "The host name '{}' could not be resolved. Check for typos.",
            config.host
        ));
    }
    if lower.contains("too many connections") {
        suggestions.push(
            "The remote server has reached its connection limit. Try again in a few minutes."
                .to_string(),
        );
    }

    if suggestions.is_empty() {
        suggestions.push(
            "Verify the host, port, database name, username and password in the \
             remote database settings."
                .to_string(),
        );
    }
    suggestions
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn options(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn complete() -> BTreeMap<String, String> {
        options(&[
            (KEY_CPANEL_DB_HOST, "db.example.com"),
            (KEY_CPANEL_DB_NAME, "acme_site"),
            (KEY_CPANEL_DB_USER, "acme_admin"),
            (KEY_CPANEL_DB_PASSWORD, "s3cret"),
            (KEY_PRODUCTION_URL, "https://www.example.com/"),
        ])
    }

    #[test]
    fn complete_options_build_a_config() {
        let config = RemoteDbConfig::from_options(&complete()).unwrap();
        assert_eq!(config.host, "db.example.com");
        assert_eq!(config.port, DEFAULT_MYSQL_PORT);
        assert_eq!(config.password, "s3cret");
        assert_eq!(config.production_url.as_deref(), Some("https://www.example.com/"));
    }

    #[test]
    fn missing_keys_are_listed() {
        let err = RemoteDbConfig::from_options(&options(&[(KEY_CPANEL_DB_HOST, "h")])).unwrap_err();
        assert_matches!(err, SyncError::InvalidConfig(msg)
            if msg.contains(KEY_CPANEL_DB_NAME) && msg.contains(KEY_CPANEL_DB_USER));
    }

    #[test]
    fn invalid_port_is_rejected() {
        let mut opts = complete();
        opts.insert(KEY_CPANEL_DB_PORT.to_string(), "99999".to_string());
        assert_matches!(RemoteDbConfig::from_options(&opts), Err(SyncError::InvalidConfig(_)));

        opts.insert(KEY_CPANEL_DB_PORT.to_string(), "3307".to_string());
        assert_eq!(RemoteDbConfig::from_options(&opts).unwrap().port, 3307);
    }

    #[test]
    fn debug_output_redacts_password() {
        let config = RemoteDbConfig::from_options(&complete()).unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("s3cret"));
        assert!(debug.contains("[redacted]"));
    }

    #[test]
    fn access_denied_suggests_credentials_and_remote_hosts() {
        let config = RemoteDbConfig::from_options(&complete()).unwrap();
        let hints = suggestions_for(
            "error returned from database: 1045 (28000): \
             Access denied for user 'acme_admin'@'1.2.3.4'",
            &config,
        );
        assert!(hints.iter().any(|h| h.contains("acme_admin")));
        assert!(hints.iter().any(|h| h.contains("Remote MySQL")));
    }

    #[test]
    fn unknown_database_and_dns_failures() {
        let config = RemoteDbConfig::from_options(&complete()).unwrap();
        let hints = suggestions_for("1049 (42000): Unknown database 'acme_site'", &config);
        assert!(hints[0].contains("acme_site"));

        let hints = suggestions_for(
            "error communicating with database: failed to lookup address information",
            &config,
        );
        assert!(hints[0].contains("db.example.com"));
    }

    #[test]
    fn unrecognized_errors_get_a_generic_hint() {
        let config = RemoteDbConfig::from_options(&complete()).unwrap();
        let hints = suggestions_for("something odd", &config);
        assert_eq!(hints.len(), 1);
    }
}
