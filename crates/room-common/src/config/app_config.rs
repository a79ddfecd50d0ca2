//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file if present).

use serde::Deserialize;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub invite: InviteConfig,
    pub sweeper: SweeperConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Seconds to wait for a pooled connection
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
    /// Per-statement timeout applied to every connection (0 disables)
    #[serde(default = "default_statement_timeout_ms")]
    pub statement_timeout_ms: u64,
}

impl DatabaseConfig {
    #[must_use]
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }
}

/// Identity provider token settings
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// HS256 secret shared with the identity provider
    pub jwt_secret: String,
    #[serde(default = "default_jwt_audience")]
    pub jwt_audience: String,
}

/// Invite token settings
#[derive(Debug, Clone, Deserialize)]
pub struct InviteConfig {
    #[serde(default = "default_invite_ttl_secs")]
    pub default_ttl_secs: i64,
    #[serde(default = "default_invite_max_ttl_secs")]
    pub max_ttl_secs: i64,
}

/// Token sweeper settings
#[derive(Debug, Clone, Deserialize)]
pub struct SweeperConfig {
    #[serde(default = "default_sweep_interval_secs")]
    pub interval_secs: u64,
}

impl SweeperConfig {
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

// Default value functions
fn default_app_name() -> String {
    "room-server".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    5
}

fn default_acquire_timeout_secs() -> u64 {
    5
}

fn default_statement_timeout_ms() -> u64 {
    10_000
}

fn default_jwt_audience() -> String {
    "authenticated".to_string()
}

fn default_invite_ttl_secs() -> i64 {
    604_800 // 7 days
}

fn default_invite_max_ttl_secs() -> i64 {
    2_592_000 // 30 days
}

fn default_sweep_interval_secs() -> u64 {
    300
}

/// Read an optional variable, failing only if it is present but unparsable
fn parse_var<T: FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue(name, raw)),
        Err(_) => Ok(None),
    }
}

fn require_var(name: &'static str) -> Result<String, ConfigError> {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::MissingVar(name))
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or
    /// a provided value cannot be parsed
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let config = Self {
            app: AppSettings {
                name: env::var("APP_NAME").unwrap_or_else(|_| default_app_name()),
                env: env::var("APP_ENV")
                    .ok()
                    .and_then(|s| Environment::parse(&s))
                    .unwrap_or_default(),
            },
            database: DatabaseConfig {
                url: require_var("DATABASE_URL")?,
                max_connections: parse_var("DATABASE_MAX_CONNECTIONS")?
                    .unwrap_or_else(default_max_connections),
                min_connections: parse_var("DATABASE_MIN_CONNECTIONS")?
                    .unwrap_or_else(default_min_connections),
                acquire_timeout_secs: parse_var("DATABASE_ACQUIRE_TIMEOUT_SECS")?
                    .unwrap_or_else(default_acquire_timeout_secs),
                statement_timeout_ms: parse_var("DATABASE_STATEMENT_TIMEOUT_MS")?
                    .unwrap_or_else(default_statement_timeout_ms),
            },
            auth: AuthConfig {
                jwt_secret: require_var("AUTH_JWT_SECRET")?,
                jwt_audience: env::var("AUTH_JWT_AUDIENCE")
                    .unwrap_or_else(|_| default_jwt_audience()),
            },
            invite: InviteConfig {
                default_ttl_secs: parse_var("INVITE_DEFAULT_TTL_SECS")?
                    .unwrap_or_else(default_invite_ttl_secs),
                max_ttl_secs: parse_var("INVITE_MAX_TTL_SECS")?
                    .unwrap_or_else(default_invite_max_ttl_secs),
            },
            sweeper: SweeperConfig {
                interval_secs: parse_var("SWEEP_INTERVAL_SECS")?
                    .unwrap_or_else(default_sweep_interval_secs),
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints
    ///
    /// # Errors
    /// Returns the first inconsistent setting
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.min_connections > self.database.max_connections {
            return Err(ConfigError::InvalidValue(
                "DATABASE_MIN_CONNECTIONS",
                format!(
                    "{} exceeds DATABASE_MAX_CONNECTIONS ({})",
                    self.database.min_connections, self.database.max_connections
                ),
            ));
        }
        if self.invite.max_ttl_secs <= 0 || self.invite.max_ttl_secs > default_invite_max_ttl_secs()
        {
            return Err(ConfigError::InvalidValue(
                "INVITE_MAX_TTL_SECS",
                self.invite.max_ttl_secs.to_string(),
            ));
        }
        if self.invite.default_ttl_secs <= 0
            || self.invite.default_ttl_secs > self.invite.max_ttl_secs
        {
            return Err(ConfigError::InvalidValue(
                "INVITE_DEFAULT_TTL_SECS",
                self.invite.default_ttl_secs.to_string(),
            ));
        }
        if self.sweeper.interval_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "SWEEP_INTERVAL_SECS",
                "0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AppConfig {
        AppConfig {
            app: AppSettings {
                name: default_app_name(),
                env: Environment::Development,
            },
            database: DatabaseConfig {
                url: "postgres://localhost/rooms".to_string(),
                max_connections: default_max_connections(),
                min_connections: default_min_connections(),
                acquire_timeout_secs: default_acquire_timeout_secs(),
                statement_timeout_ms: default_statement_timeout_ms(),
            },
            auth: AuthConfig {
                jwt_secret: "secret".to_string(),
                jwt_audience: default_jwt_audience(),
            },
            invite: InviteConfig {
                default_ttl_secs: default_invite_ttl_secs(),
                max_ttl_secs: default_invite_max_ttl_secs(),
            },
            sweeper: SweeperConfig {
                interval_secs: default_sweep_interval_secs(),
            },
        }
    }

    #[test]
    fn test_environment_is_production() {
        assert!(!Environment::Development.is_production());
        assert!(!Environment::Staging.is_production());
        assert!(Environment::Production.is_production());
    }

    #[test]
    fn test_environment_parse() {
        assert_eq!(Environment::parse("PRODUCTION"), Some(Environment::Production));
        assert_eq!(Environment::parse("staging"), Some(Environment::Staging));
        assert_eq!(Environment::parse("qa"), None);
    }

    #[test]
    fn test_default_values() {
        assert_eq!(default_app_name(), "room-server");
        assert_eq!(default_jwt_audience(), "authenticated");
        assert_eq!(default_invite_ttl_secs(), 7 * 24 * 3600);
        assert_eq!(default_invite_max_ttl_secs(), 30 * 24 * 3600);
        assert_eq!(sample().database.acquire_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_validate_defaults() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_inconsistent_values() {
        let mut config = sample();
        config.database.min_connections = 50;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue("DATABASE_MIN_CONNECTIONS", _))
        ));

        let mut config = sample();
        config.invite.default_ttl_secs = config.invite.max_ttl_secs + 1;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue("INVITE_DEFAULT_TTL_SECS", _))
        ));

        let mut config = sample();
        config.invite.max_ttl_secs = 31 * 24 * 3600;
        assert!(config.validate().is_err());

        let mut config = sample();
        config.sweeper.interval_secs = 0;
        assert!(config.validate().is_err());
    }
}
