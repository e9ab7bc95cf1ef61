//! hr-server: HR management service
//!
//! Long-running HTTP service that:
//! - Authenticates users and issues session tokens
//! - Gates every route family on the caller's role
//! - Stores people, attendance, leave, payroll and content in PostgreSQL
//! - Derives attendance, leave and payroll aggregates on read

mod api;
mod auth;
mod config;
mod db;
mod error;
mod state;
mod util;

use std::net::SocketAddr;

use config::{BootstrapAdmin, Config};
use error::BoxError;
use shared::models::{Role, UserCreate};
use state::AppState;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hr_server=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;

    tracing::info!(
        "Starting hr-server (env: {}, timezone: {})",
        config.environment,
        config.business_timezone
    );

    if config.is_development() {
        tracing::warn!("Development mode: unset secrets fall back to fixed values");
    }

    let state = AppState::new(&config).await?;

    if let Some(admin) = &config.bootstrap_admin {
        bootstrap_admin(&state, admin).await?;
    }

    // Periodic rate limiter cleanup (every 5 minutes)
    let rate_limiter = state.rate_limiter.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(300));
        loop {
            interval.tick().await;
            rate_limiter.cleanup().await;
        }
    });

    let app = api::create_router(state);

    let http_addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&http_addr).await?;
    tracing::info!("hr-server HTTP listening on {http_addr}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Create the first admin account when none exists yet
async fn bootstrap_admin(state: &AppState, admin: &BootstrapAdmin) -> Result<(), BoxError> {
    if db::users::admin_exists(&state.pool).await? {
        return Ok(());
    }

    let password_hash = util::hash_password(&admin.password)
        .map_err(|e| format!("Failed to hash bootstrap admin password: {e}"))?;
    let data = UserCreate {
        name: "Administrator".into(),
        email: admin.email.clone(),
        password: admin.password.clone(),
        role: Role::Admin,
        department_id: None,
        position: None,
        phone: None,
        join_date: None,
    };
    let user = db::users::create(&state.pool, &data, &password_hash).await?;
    tracing::info!(user_id = user.id, email = %user.email, "Bootstrap admin created");
    Ok(())
}
