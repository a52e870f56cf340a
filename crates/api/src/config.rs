//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

/// Where chat sessions are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionBackend {
    Memory,
    Sqlite,
}

/// API server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address.
    pub addr: SocketAddr,
    /// SQLite database URL.
    pub database_url: String,
    /// Chat session storage.
    pub session_backend: SessionBackend,
    /// Idle time after which a chat session is forgotten.
    pub session_ttl: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `API_ADDR` | Server bind address | `127.0.0.1:8000` |
    /// | `DATABASE_URL` | SQLite database URL | `sqlite:grievance.db?mode=rwc` |
    /// | `SESSION_BACKEND` | `memory` or `sqlite` | `memory` |
    /// | `SESSION_TTL_SECS` | Idle session expiry | `3600` |
    ///
    /// Classifier settings are read separately by `GeminiConfig::from_env`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let addr = env::var("API_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8000".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidAddr)?;

        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite:grievance.db?mode=rwc".to_string());

        let session_backend = match env::var("SESSION_BACKEND") {
            Err(_) => SessionBackend::Memory,
            Ok(value) => match value.trim().to_lowercase().as_str() {
                "" | "memory" => SessionBackend::Memory,
                "sqlite" => SessionBackend::Sqlite,
                _ => return Err(ConfigError::InvalidSessionBackend(value)),
            },
        };

        let session_ttl = match env::var("SESSION_TTL_SECS") {
            Err(_) => Duration::from_secs(3600),
            Ok(value) => value
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .ok_or(ConfigError::InvalidSessionTtl)?,
        };

        Ok(Self {
            addr,
            database_url,
            session_backend,
            session_ttl,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid API_ADDR format")]
    InvalidAddr,

    #[error("SESSION_BACKEND must be 'memory' or 'sqlite', got '{0}'")]
    InvalidSessionBackend(String),

    #[error("SESSION_TTL_SECS must be a positive integer")]
    InvalidSessionTtl,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const VARS: [&str; 4] = ["API_ADDR", "DATABASE_URL", "SESSION_BACKEND", "SESSION_TTL_SECS"];

    fn clear() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_defaults() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear();

        let config = Config::from_env().unwrap();
        assert_eq!(config.addr.to_string(), "127.0.0.1:8000");
        assert_eq!(config.database_url, "sqlite:grievance.db?mode=rwc");
        assert_eq!(config.session_backend, SessionBackend::Memory);
        assert_eq!(config.session_ttl, Duration::from_secs(3600));
    }

    #[test]
    fn test_overrides_and_errors() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear();

        env::set_var("SESSION_BACKEND", "SQLite");
        env::set_var("SESSION_TTL_SECS", "120");
        let config = Config::from_env().unwrap();
        assert_eq!(config.session_backend, SessionBackend::Sqlite);
        assert_eq!(config.session_ttl, Duration::from_secs(120));

        env::set_var("SESSION_BACKEND", "redis");
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::InvalidSessionBackend(_))
        ));

        env::set_var("SESSION_BACKEND", "memory");
        env::set_var("SESSION_TTL_SECS", "0");
        assert!(matches!(Config::from_env(), Err(ConfigError::InvalidSessionTtl)));

        env::set_var("API_ADDR", "not an address");
        assert!(matches!(Config::from_env(), Err(ConfigError::InvalidAddr)));

        clear();
    }
}
