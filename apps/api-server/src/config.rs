//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use blog_core::domain::Role;
use blog_infra::{DatabaseConfig, JwtConfig, UploadConfig};

/// Deployment environment. Controls whether internal error details reach
/// clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn is_production(&self) -> bool {
        *self == Environment::Production
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(format!("unknown environment `{other}`")),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub database: Option<DatabaseConfig>,
    pub jwt: JwtConfig,
    pub uploads: UploadConfig,
    /// Role given to self-registered accounts.
    pub registration_role: Role,
    /// Origins allowed to call the API from a browser. Empty allows any.
    pub cors_allowed_origins: Vec<String>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let environment = env::var("APP_ENV")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(Environment::Development);

        let database = env::var("DATABASE_URL").ok().map(|url| DatabaseConfig {
            url,
            max_connections: parse_var("DB_MAX_CONNECTIONS").unwrap_or(20),
            min_connections: parse_var("DB_MIN_CONNECTIONS").unwrap_or(2),
        });

        let upload_defaults = UploadConfig::default();
        let uploads = UploadConfig {
            dir: env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(upload_defaults.dir),
            max_bytes: parse_var("MAX_UPLOAD_BYTES").unwrap_or(upload_defaults.max_bytes),
        };

        let registration_role = match env::var("REGISTRATION_ROLE") {
            Ok(value) => value.parse().unwrap_or_else(|e| {
                tracing::warn!("Ignoring REGISTRATION_ROLE: {}", e);
                Role::Reader
            }),
            Err(_) => Role::Reader,
        };

        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .map(|v| parse_origins(&v))
            .unwrap_or_default();

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("PORT").unwrap_or(5000),
            environment,
            database,
            jwt: JwtConfig::from_env(environment.is_production()),
            uploads,
            registration_role,
            cors_allowed_origins,
        }
    }

    /// In-memory configuration for tests.
    #[cfg(test)]
    pub fn for_tests(environment: Environment, upload_dir: PathBuf) -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0,
            environment,
            database: None,
            jwt: JwtConfig {
                secret: "test-secret".to_string(),
                expiration_hours: 1,
                issuer: "test".to_string(),
            },
            uploads: UploadConfig {
                dir: upload_dir,
                max_bytes: 64 * 1024,
            },
            registration_role: Role::Reader,
            cors_allowed_origins: Vec::new(),
        }
    }

    /// Log which settings are present without printing secrets.
    pub fn log_summary(&self) {
        let presence = |set: bool| if set { "set" } else { "not set" };
        let database = presence(self.database.is_some());
        let jwt_secret = presence(env::var("JWT_SECRET").is_ok());

        tracing::info!(
            environment = ?self.environment,
            database,
            jwt_secret,
            upload_dir = %self.uploads.dir.display(),
            registration_role = %self.registration_role,
            cors_origins = self.cors_allowed_origins.len(),
            "Environment check"
        );
    }
}

fn parse_var<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.parse().ok())
}

/// Comma-separated origins; `*` or an empty list means any origin.
fn parse_origins(raw: &str) -> Vec<String> {
    let origins: Vec<String> = raw
        .split(',')
        .map(|o| o.trim().trim_end_matches('/').to_string())
        .filter(|o| !o.is_empty())
        .collect();

    if origins.iter().any(|o| o == "*") {
        Vec::new()
    } else {
        origins
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_parsing() {
        assert_eq!("production".parse(), Ok(Environment::Production));
        assert_eq!("DEV".parse(), Ok(Environment::Development));
        assert!("staging".parse::<Environment>().is_err());
    }

    #[test]
    fn test_parse_cors_origins() {
        assert_eq!(
            parse_origins(" https://cyberwatch.example/ , http://localhost:3000,,"),
            vec!["https://cyberwatch.example", "http://localhost:3000"]
        );
        assert!(parse_origins("*").is_empty());
        assert!(parse_origins("").is_empty());
    }
}
