use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub rust_log: String,
    pub db_max_connections: u32,
    /// Upper bound on jobs fetched for recommendation before scoring.
    pub recommendation_limit: i64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            db_max_connections: std::env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse::<u32>()
                .context("DB_MAX_CONNECTIONS must be a positive integer")?,
            recommendation_limit: parse_recommendation_limit(
                std::env::var("RECOMMENDATION_LIMIT").ok().as_deref(),
            )?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_recommendation_limit(raw: Option<&str>) -> Result<i64> {
    let limit = match raw {
        Some(value) => value
            .trim()
            .parse::<i64>()
            .context("RECOMMENDATION_LIMIT must be an integer")?,
        None => 10,
    };
    if limit < 1 {
        anyhow::bail!("RECOMMENDATION_LIMIT must be at least 1, got {limit}");
    }
    Ok(limit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        std::env::remove_var("PORT");
        std::env::remove_var("DB_MAX_CONNECTIONS");
        std::env::remove_var("RECOMMENDATION_LIMIT");
    }

    #[test]
    fn test_defaults_apply_when_optional_vars_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        std::env::set_var("DATABASE_URL", "postgres://localhost/recruit");

        let config = Config::from_env().expect("config loads with defaults");
        assert_eq!(config.port, 8080);
        assert_eq!(config.db_max_connections, 10);
        assert_eq!(config.recommendation_limit, 10);
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        std::env::set_var("DATABASE_URL", "postgres://localhost/recruit");
        std::env::set_var("PORT", "not-a-port");

        assert!(Config::from_env().is_err());
        reset_env();
    }

    #[test]
    fn test_recommendation_limit_must_be_positive() {
        assert_eq!(parse_recommendation_limit(Some(" 25 ")).unwrap(), 25);
        assert!(parse_recommendation_limit(Some("0")).is_err());
        assert!(parse_recommendation_limit(Some("ten")).is_err());
        assert_eq!(parse_recommendation_limit(None).unwrap(), 10);
    }
}
