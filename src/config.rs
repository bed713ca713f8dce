use std::env;

use secrecy::{ExposeSecret, SecretString};

use crate::errors::{AppError, AppResult};

const DEV_JWT_SECRET: &str = "dev_secret_key_change_in_production";

#[derive(Clone, Debug)]
pub struct Config {
    pub mongo_conn_string: String,
    pub mongo_db_name: String,
    pub web_server_host: String,
    pub web_server_port: u16,
    pub jwt_secret: SecretString,
    pub jwt_expiration_hours: i64,
    pub cors_allowed_origin: String,
    pub app_env: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            mongo_conn_string: env::var("MONGO_CONN_STRING")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            mongo_db_name: env::var("MONGO_DB_NAME")
                .unwrap_or_else(|_| "learnhub-local".to_string()),
            web_server_host: env::var("WEB_SERVER_HOST")
                .unwrap_or_else(|_| "localhost".to_string()),
            web_server_port: env::var("WEB_SERVER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            jwt_secret: SecretString::from(
                env::var("JWT_SECRET").unwrap_or_else(|_| DEV_JWT_SECRET.to_string()),
            ),
            jwt_expiration_hours: env::var("JWT_EXPIRATION_HOURS")
                .ok()
                .and_then(|h| h.parse().ok())
                .unwrap_or(24),
            cors_allowed_origin: env::var("CORS_ALLOWED_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            app_env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        }
    }

    pub fn is_production(&self) -> bool {
        self.app_env.eq_ignore_ascii_case("production")
    }

    /// Rejects configurations that still carry development secrets.
    pub fn validate_for_production(&self) -> AppResult<()> {
        let jwt_secret = self.jwt_secret.expose_secret();

        if jwt_secret == DEV_JWT_SECRET {
            return Err(AppError::InternalError(
                "JWT_SECRET is using the default value".to_string(),
            ));
        }

        if jwt_secret.len() < 32 {
            return Err(AppError::InternalError(format!(
                "JWT_SECRET is too short ({}), must be at least 32 characters",
                jwt_secret.len()
            )));
        }

        if self.cors_allowed_origin == "*" {
            return Err(AppError::InternalError(
                "CORS_ALLOWED_ORIGIN must name a concrete origin in production".to_string(),
            ));
        }

        Ok(())
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            mongo_conn_string: "mongodb://localhost:27017".to_string(),
            mongo_db_name: "learnhub-test".to_string(),
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8080,
            jwt_secret: SecretString::from("test_jwt_secret_key".to_string()),
            jwt_expiration_hours: 1,
            cors_allowed_origin: "http://localhost:3000".to_string(),
            app_env: "test".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env_with_defaults() {
        let config = Config::from_env();

        assert!(!config.mongo_conn_string.is_empty());
        assert!(!config.mongo_db_name.is_empty());
        assert!(config.jwt_expiration_hours > 0);
    }

    #[test]
    fn test_test_config() {
        let config = Config::test_config();

        assert_eq!(config.mongo_db_name, "learnhub-test");
        assert!(!config.is_production());
    }

    #[test]
    fn production_validation_rejects_short_secret() {
        let config = Config::test_config();
        assert!(matches!(
            config.validate_for_production(),
            Err(AppError::InternalError(_))
        ));
    }

    #[test]
    fn production_validation_accepts_strong_secret() {
        let mut config = Config::test_config();
        config.jwt_secret =
            SecretString::from("a-very-long-and-random-production-secret-value".to_string());
        assert!(config.validate_for_production().is_ok());
    }
}
