use std::net::SocketAddr;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use vitrine_api::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use vitrine_api::config::ServerConfig;
use vitrine_api::router::build_app_router;
use vitrine_api::state::AppState;
use vitrine_core::roles::ROLE_ADMIN;
use vitrine_db::models::admin_user::CreateAdminUser;
use vitrine_db::repositories::AdminUserRepo;
use vitrine_db::DbPool;

const DEFAULT_LOG_FILTER: &str = "vitrine_api=debug,vitrine_sync=debug,tower_http=debug";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = config.port,
        site_url = %config.site_url,
        backup_dir = %config.backup_dir.display(),
        "Configuration loaded",
    );

    let pool = open_database().await;
    bootstrap_admin(&pool).await;

    tokio::fs::create_dir_all(&config.backup_dir)
        .await
        .unwrap_or_else(|e| panic!("Cannot create {}: {e}", config.backup_dir.display()));

    let app = build_app_router(AppState::new(pool.clone(), config.clone()), &config);

    let addr = SocketAddr::new(
        config.host.parse().expect("HOST must be an IP address"),
        config.port,
    );
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .unwrap_or_else(|e| panic!("Cannot bind {addr}: {e}"));
    tracing::info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    pool.close().await;
    tracing::info!("Shut down cleanly");
}

/// `RUST_LOG` filtering; `LOG_FORMAT=json` switches to JSON lines for log
/// shipping on the hosting server.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    let registry = tracing_subscriber::registry().with(filter);

    if std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json")) {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Connect to `DATABASE_URL`, verify it answers, and apply migrations.
async fn open_database() -> DbPool {
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = vitrine_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to the local database");
    vitrine_db::health_check(&pool)
        .await
        .expect("Local database did not answer");
    vitrine_db::run_migrations(&pool)
        .await
        .expect("Failed to apply migrations");

    tracing::info!("Local database ready");
    pool
}

/// Create the first admin account from `ADMIN_USERNAME` / `ADMIN_PASSWORD`
/// (and optional `ADMIN_EMAIL`) when no admin user exists yet.
async fn bootstrap_admin(pool: &DbPool) {
    let existing = AdminUserRepo::count(pool)
        .await
        .expect("Failed to count admin users");
    if existing > 0 {
        return;
    }

    let (Ok(username), Ok(password)) = (
        std::env::var("ADMIN_USERNAME"),
        std::env::var("ADMIN_PASSWORD"),
    ) else {
        tracing::warn!(
            "No admin users exist. Set ADMIN_USERNAME and ADMIN_PASSWORD to create one at startup"
        );
        return;
    };

    validate_password_strength(&password, MIN_PASSWORD_LENGTH)
        .unwrap_or_else(|e| panic!("ADMIN_PASSWORD is too weak: {e}"));
    let password_hash = hash_password(&password).expect("Failed to hash ADMIN_PASSWORD");

    let input = CreateAdminUser {
        username: username.trim().to_string(),
        email: std::env::var("ADMIN_EMAIL").unwrap_or_default(),
        password_hash,
        role: ROLE_ADMIN.to_string(),
    };
    let user = AdminUserRepo::create(pool, &input)
        .await
        .expect("Failed to create the initial admin user");
    tracing::info!(user_id = user.id, username = %user.username, "Initial admin user created");
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Ctrl-C received, draining connections"),
        () = terminate => tracing::info!("SIGTERM received, draining connections"),
    }
}
