use std::env;
use std::path::PathBuf;

use crate::database::database_name_from_uri;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{0} has an invalid value: {1}")]
    Invalid(&'static str, String),
}

/// Service configuration loaded from environment variables (after `.env`).
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// MongoDB connection string. Env var: `MONGO_URI`.
    pub mongo_uri: String,
    /// Env var `MONGO_DATABASE`, else the URI path, else `survey_app`.
    pub database_name: String,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub bcrypt_cost: u32,
    /// Empty means any origin.
    pub cors_allowed_origins: Vec<String>,
    /// Built frontend to serve, only when `APP_ENV=production`.
    /// Env var `STATIC_DIR`, default `client/build`.
    pub static_dir: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        let mongo_uri = required("MONGO_URI")?;
        let database_name = lookup("MONGO_DATABASE")
            .filter(|v| !v.is_empty())
            .or_else(|| database_name_from_uri(&mongo_uri))
            .unwrap_or_else(|| "survey_app".to_string());

        let port = match lookup("PORT") {
            Some(v) => v.parse().map_err(|_| ConfigError::Invalid("PORT", v))?,
            None => 5000,
        };

        let bcrypt_cost = match lookup("BCRYPT_COST") {
            Some(v) => match v.parse::<u32>() {
                Ok(cost) if (4..=31).contains(&cost) => cost,
                _ => return Err(ConfigError::Invalid("BCRYPT_COST", v)),
            },
            None => bcrypt::DEFAULT_COST,
        };

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|o| !o.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let static_dir = match lookup("APP_ENV").as_deref() {
            Some("production") => Some(PathBuf::from(
                lookup("STATIC_DIR")
                    .filter(|v| !v.is_empty())
                    .unwrap_or_else(|| "client/build".to_string()),
            )),
            _ => None,
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            mongo_uri,
            database_name,
            jwt_secret: required("JWT_SECRET")?,
            jwt_issuer: lookup("JWT_ISSUER").unwrap_or_else(|| "survey-service".to_string()),
            bcrypt_cost,
            cors_allowed_origins,
            static_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply() {
        let config = load(&[
            ("MONGO_URI", "mongodb://localhost:27017/migration"),
            ("JWT_SECRET", "s3cret"),
        ])
        .unwrap();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 5000);
        assert_eq!(config.database_name, "migration");
        assert_eq!(config.jwt_issuer, "survey-service");
        assert_eq!(config.bcrypt_cost, bcrypt::DEFAULT_COST);
        assert!(config.cors_allowed_origins.is_empty());
        assert!(config.static_dir.is_none());
    }

    #[test]
    fn frontend_is_served_only_in_production() {
        let base = [("MONGO_URI", "mongodb://localhost"), ("JWT_SECRET", "s")];

        let config = load(&[base[0], base[1], ("STATIC_DIR", "/srv/app")]).unwrap();
        assert!(config.static_dir.is_none());

        let config = load(&[base[0], base[1], ("APP_ENV", "production")]).unwrap();
        assert_eq!(config.static_dir, Some(PathBuf::from("client/build")));

        let config = load(&[base[0], base[1], ("APP_ENV", "production"), ("STATIC_DIR", "/srv/app")]).unwrap();
        assert_eq!(config.static_dir, Some(PathBuf::from("/srv/app")));
    }

    #[test]
    fn missing_secret_fails() {
        let err = load(&[("MONGO_URI", "mongodb://localhost:27017")]).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("JWT_SECRET")));
    }

    #[test]
    fn invalid_numbers_fail() {
        let base = [("MONGO_URI", "mongodb://localhost"), ("JWT_SECRET", "s")];

        let err = load(&[base[0], base[1], ("PORT", "http")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid("PORT", _)));

        let err = load(&[base[0], base[1], ("BCRYPT_COST", "2")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid("BCRYPT_COST", _)));
    }

    #[test]
    fn explicit_values_override() {
        let config = load(&[
            ("MONGO_URI", "mongodb://localhost:27017/ignored"),
            ("MONGO_DATABASE", "surveys_prod"),
            ("JWT_SECRET", "s3cret"),
            ("PORT", "8080"),
            ("CORS_ALLOWED_ORIGINS", "http://localhost:3000, https://app.example.org"),
        ])
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.database_name, "surveys_prod");
        assert_eq!(
            config.cors_allowed_origins,
            vec!["http://localhost:3000", "https://app.example.org"]
        );
    }
}
