//! Application state for hr-server

use chrono::NaiveTime;
use chrono_tz::Tz;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::auth::{RateLimiter, SessionKeys};
use crate::config::Config;
use crate::error::BoxError;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool
    pub pool: PgPool,
    /// Session token keys
    pub sessions: SessionKeys,
    /// Rate limiter for the login route
    pub rate_limiter: RateLimiter,
    /// Work-day rules for self-service attendance
    pub workday: Workday,
}

/// Local work-day settings
#[derive(Debug, Clone, Copy)]
pub struct Workday {
    pub start: NaiveTime,
    pub late_grace_minutes: u32,
    pub timezone: Tz,
}

impl AppState {
    /// Connect, run migrations and build the state
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(&config.database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");

        Ok(Self::with_pool(pool, config))
    }

    pub fn with_pool(pool: PgPool, config: &Config) -> Self {
        Self {
            pool,
            sessions: SessionKeys::new(&config.jwt_secret, config.jwt_expiry_hours),
            rate_limiter: RateLimiter::new(config.trust_proxy),
            workday: Workday {
                start: config.work_start_time,
                late_grace_minutes: config.late_grace_minutes,
                timezone: config.business_timezone,
            },
        }
    }
}
