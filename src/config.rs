use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to parse TOML from config file at {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
    #[error("Failed to load config from environment: {0}")]
    Env(#[from] envy::Error),
    #[error("{0} is required")]
    Missing(&'static str),
}

#[derive(Deserialize, Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub jwt_secret: String,

    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    #[serde(default = "default_log_dir")]
    pub log_dir: String,

    #[serde(default = "default_access_token_minutes")]
    pub access_token_minutes: i64,

    #[serde(default = "default_refresh_token_days")]
    pub refresh_token_days: i64,

    /// Allowed CORS origin. Any origin is accepted when unset.
    #[serde(default)]
    pub frontend_url: Option<String>,
}

// Partial config for layering
#[derive(Deserialize, Default, Debug)]
struct PartialServerConfig {
    database_url: Option<String>,
    jwt_secret: Option<String>,
    listen_addr: Option<String>,
    log_dir: Option<String>,
    access_token_minutes: Option<i64>,
    refresh_token_days: Option<i64>,
    frontend_url: Option<String>,
}

fn default_listen_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_log_dir() -> String {
    "logs".to_string()
}

fn default_access_token_minutes() -> i64 {
    60
}

fn default_refresh_token_days() -> i64 {
    1
}

impl ServerConfig {
    /// Loads the config file (if any), then lets environment variables override it.
    pub fn load(config_path: Option<&str>) -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        let file_config = match config_path {
            Some(path_str) if Path::new(path_str).exists() => {
                let contents = fs::read_to_string(path_str).map_err(|source| ConfigError::Read {
                    path: path_str.to_string(),
                    source,
                })?;
                Self::parse_file(path_str, &contents)?
            }
            _ => PartialServerConfig::default(),
        };

        let env_config: PartialServerConfig = envy::from_env::<PartialServerConfig>()?;

        Self::merge(env_config, file_config)
    }

    fn parse_file(path: &str, contents: &str) -> Result<PartialServerConfig, ConfigError> {
        toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })
    }

    // Environment wins over the file.
    fn merge(env: PartialServerConfig, file: PartialServerConfig) -> Result<Self, ConfigError> {
        Ok(ServerConfig {
            database_url: env
                .database_url
                .or(file.database_url)
                .ok_or(ConfigError::Missing("DATABASE_URL"))?,
            jwt_secret: env
                .jwt_secret
                .or(file.jwt_secret)
                .ok_or(ConfigError::Missing("JWT_SECRET"))?,
            listen_addr: env
                .listen_addr
                .or(file.listen_addr)
                .unwrap_or_else(default_listen_addr),
            log_dir: env.log_dir.or(file.log_dir).unwrap_or_else(default_log_dir),
            access_token_minutes: env
                .access_token_minutes
                .or(file.access_token_minutes)
                .unwrap_or_else(default_access_token_minutes),
            refresh_token_days: env
                .refresh_token_days
                .or(file.refresh_token_days)
                .unwrap_or_else(default_refresh_token_days),
            frontend_url: env.frontend_url.or(file.frontend_url),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_overrides_file() {
        let file = ServerConfig::parse_file(
            "triplog.toml",
            r#"
            database_url = "postgres://file/db"
            jwt_secret = "file-secret"
            log_dir = "/var/log/triplog"
            "#,
        )
        .unwrap();
        let env = PartialServerConfig {
            jwt_secret: Some("env-secret".to_string()),
            ..Default::default()
        };

        let config = ServerConfig::merge(env, file).unwrap();
        assert_eq!(config.database_url, "postgres://file/db");
        assert_eq!(config.jwt_secret, "env-secret");
        assert_eq!(config.log_dir, "/var/log/triplog");
        assert_eq!(config.listen_addr, "0.0.0.0:8080");
        assert_eq!(config.access_token_minutes, 60);
        assert_eq!(config.refresh_token_days, 1);
        assert!(config.frontend_url.is_none());
    }

    #[test]
    fn test_missing_secret_is_an_error() {
        let file = PartialServerConfig {
            database_url: Some("postgres://localhost/triplog".to_string()),
            ..Default::default()
        };
        let err = ServerConfig::merge(PartialServerConfig::default(), file).unwrap_err();
        assert_eq!(err.to_string(), "JWT_SECRET is required");
    }

    #[test]
    fn test_bad_toml_reports_path() {
        let err = ServerConfig::parse_file("broken.toml", "jwt_secret = ").unwrap_err();
        assert!(err.to_string().contains("broken.toml"));
    }
}
