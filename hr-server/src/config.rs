//! HR server configuration

use chrono::NaiveTime;
use chrono_tz::Tz;

use crate::error::BoxError;

/// HR server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection URL
    pub database_url: String,
    /// HTTP port
    pub http_port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    /// HS256 secret for session tokens
    pub jwt_secret: String,
    /// Session token lifetime
    pub jwt_expiry_hours: i64,
    /// Local time after which (plus grace) a check-in is late
    pub work_start_time: NaiveTime,
    pub late_grace_minutes: u32,
    /// Timezone used to derive "today" and local check-in time
    pub business_timezone: Tz,
    /// First admin account, created on start when no admin exists
    pub bootstrap_admin: Option<BootstrapAdmin>,
    /// Running behind a reverse proxy that appends `X-Forwarded-For`
    pub trust_proxy: bool,
}

#[derive(Debug, Clone)]
pub struct BootstrapAdmin {
    pub email: String,
    pub password: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, BoxError> {
        let environment = lookup("ENVIRONMENT").unwrap_or_else(|| "development".into());

        let work_start_time = match lookup("WORK_START_TIME") {
            Some(v) => NaiveTime::parse_from_str(&v, "%H:%M")
                .map_err(|e| format!("WORK_START_TIME must be HH:MM ({v}): {e}"))?,
            None => NaiveTime::from_hms_opt(9, 0, 0).ok_or("invalid default work start")?,
        };

        let business_timezone = match lookup("BUSINESS_TIMEZONE") {
            Some(v) => v
                .parse::<Tz>()
                .map_err(|e| format!("BUSINESS_TIMEZONE is not a valid IANA zone ({v}): {e}"))?,
            None => Tz::UTC,
        };

        let bootstrap_admin = match (
            lookup("BOOTSTRAP_ADMIN_EMAIL").filter(|s| !s.is_empty()),
            lookup("BOOTSTRAP_ADMIN_PASSWORD").filter(|s| !s.is_empty()),
        ) {
            (Some(email), Some(password)) => Some(BootstrapAdmin { email, password }),
            (None, None) => None,
            _ => {
                return Err(
                    "BOOTSTRAP_ADMIN_EMAIL and BOOTSTRAP_ADMIN_PASSWORD must be set together".into(),
                );
            }
        };

        Ok(Self {
            database_url: lookup("DATABASE_URL").ok_or("DATABASE_URL must be set")?,
            http_port: lookup("HTTP_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            jwt_secret: require_secret(&lookup, "JWT_SECRET", &environment)?,
            jwt_expiry_hours: lookup("JWT_EXPIRY_HOURS")
                .and_then(|h| h.parse().ok())
                .filter(|h| *h > 0)
                .unwrap_or(24),
            work_start_time,
            late_grace_minutes: lookup("LATE_GRACE_MINUTES")
                .and_then(|m| m.parse().ok())
                .unwrap_or(15),
            business_timezone,
            bootstrap_admin,
            trust_proxy: lookup("TRUST_PROXY")
                .map(|v| matches!(v.trim(), "1" | "true" | "yes"))
                .unwrap_or(false),
            environment,
        })
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

/// Require a secret env var: must be set and non-empty in non-development environments.
fn require_secret(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    environment: &str,
) -> Result<String, BoxError> {
    let val = match lookup(name) {
        Some(v) => v,
        None => {
            if environment != "development" {
                return Err(format!("{name} must be set in {environment} environment").into());
            }
            format!("dev-{name}-not-for-production")
        }
    };
    if val.is_empty() && environment != "development" {
        return Err(format!("{name} must not be empty in {environment} environment").into());
    }
    Ok(val)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, BoxError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("DATABASE_URL", "postgres://localhost/hr")]).unwrap();
        assert_eq!(config.http_port, 8080);
        assert_eq!(config.environment, "development");
        assert!(config.is_development());
        assert_eq!(config.jwt_expiry_hours, 24);
        assert_eq!(config.work_start_time, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        assert_eq!(config.late_grace_minutes, 15);
        assert_eq!(config.business_timezone, Tz::UTC);
        assert!(config.jwt_secret.starts_with("dev-JWT_SECRET"));
        assert!(config.bootstrap_admin.is_none());
        assert!(!config.trust_proxy);
    }

    #[test]
    fn test_database_url_required() {
        assert!(load(&[]).is_err());
    }

    #[test]
    fn test_secret_required_outside_development() {
        let err = load(&[
            ("DATABASE_URL", "postgres://localhost/hr"),
            ("ENVIRONMENT", "production"),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("JWT_SECRET"));

        let config = load(&[
            ("DATABASE_URL", "postgres://localhost/hr"),
            ("ENVIRONMENT", "production"),
            ("JWT_SECRET", "s3cret"),
        ])
        .unwrap();
        assert_eq!(config.jwt_secret, "s3cret");
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("DATABASE_URL", "postgres://localhost/hr"),
            ("HTTP_PORT", "9000"),
            ("WORK_START_TIME", "08:30"),
            ("LATE_GRACE_MINUTES", "5"),
            ("BUSINESS_TIMEZONE", "Europe/Madrid"),
            ("JWT_EXPIRY_HOURS", "8"),
            ("TRUST_PROXY", "true"),
        ])
        .unwrap();
        assert_eq!(config.http_port, 9000);
        assert_eq!(config.work_start_time, NaiveTime::from_hms_opt(8, 30, 0).unwrap());
        assert_eq!(config.late_grace_minutes, 5);
        assert_eq!(config.business_timezone, chrono_tz::Europe::Madrid);
        assert_eq!(config.jwt_expiry_hours, 8);
        assert!(config.trust_proxy);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(load(&[
            ("DATABASE_URL", "postgres://localhost/hr"),
            ("WORK_START_TIME", "9am"),
        ])
        .is_err());
        assert!(load(&[
            ("DATABASE_URL", "postgres://localhost/hr"),
            ("BUSINESS_TIMEZONE", "Mars/Olympus"),
        ])
        .is_err());
        assert!(load(&[
            ("DATABASE_URL", "postgres://localhost/hr"),
            ("BOOTSTRAP_ADMIN_EMAIL", "root@example.com"),
        ])
        .is_err());
    }
}
