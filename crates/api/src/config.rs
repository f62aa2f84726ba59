use std::path::PathBuf;

use vitrine_sync::options::DEFAULT_PAGE_SIZE;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. Remote database credentials are not configured here; they
/// live in `site_options` and are edited from the admin panel.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// JWT token configuration (secret, session lifetime).
    pub jwt: JwtConfig,
    /// Base URL of this site, rewritten to/from the production URL on sync.
    pub site_url: String,
    /// Where pre-sync backups are written.
    pub backup_dir: PathBuf,
    /// Rows fetched per page and per `INSERT` when dumping.
    pub dump_page_size: u32,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:8080`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `SITE_URL`             | `http://localhost:8080`    |
    /// | `BACKUP_DIR`           | `backups`                  |
    /// | `DUMP_PAGE_SIZE`       | `500`                      |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:8080".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let site_url = std::env::var("SITE_URL")
            .unwrap_or_else(|_| "http://localhost:8080".into())
            .trim_end_matches('/')
            .to_string();

        let backup_dir = PathBuf::from(
            std::env::var("BACKUP_DIR").unwrap_or_else(|_| "backups".into()),
        );

        let dump_page_size: u32 = std::env::var("DUMP_PAGE_SIZE")
            .unwrap_or_else(|_| DEFAULT_PAGE_SIZE.to_string())
            .parse()
            .expect("DUMP_PAGE_SIZE must be a valid u32");
        assert!(dump_page_size > 0, "DUMP_PAGE_SIZE must be at least 1");

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt,
            site_url,
            backup_dir,
            dump_page_size,
        }
    }
}
