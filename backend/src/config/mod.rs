//! Central module for application-wide configuration settings.
//!
//! Everything is read from the process environment (optionally seeded from a
//! `.env` file) once at startup. The token signing secret and lifetime are
//! handed to the token service through [`TokenSettings`]; nothing else in the
//! authentication core reads configuration.

use anyhow::{Context, Result, bail};
use std::env;
use std::fmt;
use std::time::Duration;

/// Longest accepted token lifetime: ten years.
pub const MAX_TOKEN_LIFETIME_SECONDS: u64 = 10 * 365 * 24 * 60 * 60;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    pub acquire_timeout_seconds: u64,
    pub jwt_secret: String,
    pub jwt_expires_in_seconds: u64,
    pub server_port: u16,
}

/// The slice of configuration consumed by the token service.
#[derive(Clone)]
pub struct TokenSettings {
    pub secret: String,
    pub lifetime: Duration,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL not set")?;

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "5".to_string())
            .parse::<u32>()
            .context("DB_MAX_CONNECTIONS must be a valid number")?;

        let acquire_timeout_seconds = env::var("DB_ACQUIRE_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| "3".to_string())
            .parse::<u64>()
            .context("DB_ACQUIRE_TIMEOUT_SECONDS must be a valid number")?;

        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET not set")?;
        if jwt_secret.trim().is_empty() {
            bail!("JWT_SECRET must not be empty");
        }

        let jwt_expires_in_seconds = parse_token_lifetime(
            &env::var("JWT_EXPIRES_IN_SECONDS").unwrap_or_else(|_| "86400".to_string()),
        )?;

        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .context("SERVER_PORT must be a valid number")?;

        Ok(Config {
            database_url,
            max_connections,
            acquire_timeout_seconds,
            jwt_secret,
            jwt_expires_in_seconds,
            server_port,
        })
    }

    pub fn token_settings(&self) -> TokenSettings {
        TokenSettings {
            secret: self.jwt_secret.clone(),
            lifetime: Duration::from_secs(self.jwt_expires_in_seconds),
        }
    }
}

fn parse_token_lifetime(raw: &str) -> Result<u64> {
    let seconds = raw
        .parse::<u64>()
        .context("JWT_EXPIRES_IN_SECONDS must be a valid number")?;
    if seconds == 0 {
        bail!("JWT_EXPIRES_IN_SECONDS must be greater than zero");
    }
    if seconds > MAX_TOKEN_LIFETIME_SECONDS {
        bail!(
            "JWT_EXPIRES_IN_SECONDS must be at most {}",
            MAX_TOKEN_LIFETIME_SECONDS
        );
    }
    Ok(seconds)
}

// The signing secret must never end up in logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &self.database_url)
            .field("max_connections", &self.max_connections)
            .field("acquire_timeout_seconds", &self.acquire_timeout_seconds)
            .field("jwt_secret", &"<redacted>")
            .field("jwt_expires_in_seconds", &self.jwt_expires_in_seconds)
            .field("server_port", &self.server_port)
            .finish()
    }
}

impl fmt::Debug for TokenSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSettings")
            .field("secret", &"<redacted>")
            .field("lifetime", &self.lifetime)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Config {
        Config {
            database_url: "sqlite::memory:".to_string(),
            max_connections: 1,
            acquire_timeout_seconds: 3,
            jwt_secret: "super-secret".to_string(),
            jwt_expires_in_seconds: 3600,
            server_port: 3000,
        }
    }

    #[test]
    fn test_token_settings_from_config() {
        let settings = sample().token_settings();
        assert_eq!(settings.secret, "super-secret");
        assert_eq!(settings.lifetime, Duration::from_secs(3600));
    }

    #[test]
    fn test_token_lifetime_bounds() {
        assert_eq!(parse_token_lifetime("86400").unwrap(), 86400);
        assert_eq!(
            parse_token_lifetime(&MAX_TOKEN_LIFETIME_SECONDS.to_string()).unwrap(),
            MAX_TOKEN_LIFETIME_SECONDS
        );
        assert!(parse_token_lifetime("0").is_err());
        assert!(parse_token_lifetime("-1").is_err());
        assert!(parse_token_lifetime("soon").is_err());
        assert!(parse_token_lifetime(&u64::MAX.to_string()).is_err());
        assert!(parse_token_lifetime(&(MAX_TOKEN_LIFETIME_SECONDS + 1).to_string()).is_err());
    }

    #[test]
    fn test_longest_lifetime_can_issue_tokens() {
        use crate::auth::identity::Identity;
        use crate::utils::jwt::JwtService;

        struct Subject;
        impl Identity for Subject {
            fn subject_id(&self) -> &str {
                "ada@example.com"
            }
            fn authorities(&self) -> Vec<String> {
                Vec::new()
            }
        }

        let mut config = sample();
        config.jwt_expires_in_seconds = MAX_TOKEN_LIFETIME_SECONDS;
        let jwt = JwtService::new(&config.token_settings());

        let token = jwt.issue(&Subject, serde_json::Map::new()).unwrap();
        assert!(jwt.is_valid(&token, &Subject));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = sample();
        assert!(!format!("{:?}", config).contains("super-secret"));
        assert!(!format!("{:?}", config.token_settings()).contains("super-secret"));
    }
}
