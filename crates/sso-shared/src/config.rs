//! Configuration management

use std::time::Duration;

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::constants::{DEFAULT_BCRYPT_COST, DEFAULT_SESSION_TTL_SECONDS};
use crate::error::AppError;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub redis: RedisSettings,
    pub session: SessionSettings,
    pub security: SecuritySettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub env: String,
    pub host: String,
    pub port: u16,
    pub name: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RedisSettings {
    /// `redis://` / `rediss://` URL, or `memory://` for the in-process store
    pub url: String,
    pub max_connections: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionSettings {
    pub ttl_seconds: u64,
}

impl SessionSettings {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SecuritySettings {
    pub bcrypt_cost: u32,
}

impl AppConfig {
    pub fn load() -> Result<Self, AppError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let config = Config::builder()
            .set_default("app.env", "development")?
            .set_default("app.host", "127.0.0.1")?
            .set_default("app.port", 8080)?
            .set_default("app.name", "sso-server")?
            .set_default("redis.url", "redis://127.0.0.1:6379")?
            .set_default("redis.max_connections", 16)?
            .set_default("session.ttl_seconds", DEFAULT_SESSION_TTL_SECONDS)?
            .set_default("security.bcrypt_cost", DEFAULT_BCRYPT_COST)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::default().separator("__").try_parsing(true))
            // Heroku-style platform variables win over everything else
            .set_override_option("app.port", std::env::var("PORT").ok())?
            .set_override_option("redis.url", std::env::var("REDISCLOUD_URL").ok())?
            .build()?;
        let config: AppConfig = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.session.ttl_seconds == 0 {
            return Err(AppError::InvalidSetting {
                key: "session.ttl_seconds",
                reason: "must be greater than zero".into(),
            });
        }
        // bcrypt accepts work factors 4..=31
        if !(4..=31).contains(&self.security.bcrypt_cost) {
            return Err(AppError::InvalidSetting {
                key: "security.bcrypt_cost",
                reason: format!("{} is outside 4..=31", self.security.bcrypt_cost),
            });
        }
        if self.redis.max_connections == 0 {
            return Err(AppError::InvalidSetting {
                key: "redis.max_connections",
                reason: "must be greater than zero".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AppConfig {
        AppConfig {
            app: AppSettings {
                env: "test".into(),
                host: "127.0.0.1".into(),
                port: 8080,
                name: "sso-server".into(),
            },
            redis: RedisSettings {
                url: "memory://".into(),
                max_connections: 4,
            },
            session: SessionSettings { ttl_seconds: 3600 },
            security: SecuritySettings { bcrypt_cost: 14 },
        }
    }

    #[test]
    fn test_valid_config() {
        let config = sample();
        assert!(config.validate().is_ok());
        assert_eq!(config.session.ttl(), Duration::from_secs(3600));
    }

    #[test]
    fn test_rejects_zero_ttl() {
        let mut config = sample();
        config.session.ttl_seconds = 0;
        assert!(matches!(
            config.validate(),
            Err(AppError::InvalidSetting { key: "session.ttl_seconds", .. })
        ));
    }

    #[test]
    fn test_rejects_out_of_range_cost() {
        let mut config = sample();
        config.security.bcrypt_cost = 3;
        assert!(config.validate().is_err());
        config.security.bcrypt_cost = 32;
        assert!(config.validate().is_err());
    }
}
