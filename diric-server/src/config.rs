//! Configuration - database connection and HTTP server settings
//!
//! Values are resolved in this order, later sources winning:
//! - built-in defaults
//! - a TOML file (explicit path, or `./diric.toml` when present)
//! - environment: `DATABASE_URL`, `DIRIC_ENV=development`
//!
//! CLI flags are applied on top by the binary, which then calls
//! [`DiricConfig::validate`].

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Config file looked up in the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "diric.toml";

const REDACTED: &str = "********";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid value for {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiricConfig {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
}

/// Database connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub name: String,
    pub user: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    /// Log every statement with its compiled SQL
    pub log_queries: bool,
    pub max_connections: u32,
    /// Full connection URL; takes precedence over the discrete fields
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            name: "diric".to_string(),
            user: "dbuser".to_string(),
            password: "dbpass".to_string(),
            host: "127.0.0.1".to_string(),
            port: 5432,
            log_queries: false,
            max_connections: 5,
            url: None,
        }
    }
}

/// HTTP server settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Show error detail on the error page
    pub development: bool,
    /// Stop the server after the first database failure
    pub fail_fast: bool,
    /// Allow any CORS origin (default: localhost only)
    pub cors_permissive: bool,
    /// Directory served for paths no route claims
    #[serde(skip_serializing_if = "Option::is_none")]
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 8000,
            development: false,
            fail_fast: false,
            cors_permissive: false,
            static_dir: None,
        }
    }
}

impl DiricConfig {
    /// Load config from `path`, or from `./diric.toml` if it exists, then
    /// apply environment overrides.
    ///
    /// An explicit path that does not exist is an error; a missing default
    /// file is not.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::from_file(default_path)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_env();
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Apply `DATABASE_URL` and `DIRIC_ENV` from the process environment
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("DATABASE_URL").filter(|url| !url.is_empty()) {
            self.database.url = Some(url);
        }
        if let Some(env) = lookup("DIRIC_ENV") {
            self.server.development = env.eq_ignore_ascii_case("development");
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let db = &self.database;
        if db.url.is_none() {
            if db.name.trim().is_empty() {
                return Err(ConfigError::Invalid {
                    field: "database.name",
                    reason: "cannot be empty",
                });
            }
            if db.user.trim().is_empty() {
                return Err(ConfigError::Invalid {
                    field: "database.user",
                    reason: "cannot be empty",
                });
            }
            if db.host.trim().is_empty() {
                return Err(ConfigError::Invalid {
                    field: "database.host",
                    reason: "cannot be empty",
                });
            }
            if db.port == 0 {
                return Err(ConfigError::Invalid {
                    field: "database.port",
                    reason: "must be between 1 and 65535",
                });
            }
        }
        if db.max_connections == 0 {
            return Err(ConfigError::Invalid {
                field: "database.max_connections",
                reason: "must be at least 1",
            });
        }
        if self.server.host.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "server.host",
                reason: "cannot be empty",
            });
        }
        if self.server.port == 0 {
            return Err(ConfigError::Invalid {
                field: "server.port",
                reason: "must be between 1 and 65535",
            });
        }
        Ok(())
    }

    /// Copy with credentials masked, for display
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        config.database.password = REDACTED.to_string();
        if let Some(url) = config.database.url.as_mut() {
            *url = redact_url(url);
        }
        config
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Mask every password a connection URL can carry: the userinfo password
/// and a `password` query parameter. A URL that does not parse is masked
/// whole.
fn redact_url(raw: &str) -> String {
    let Ok(mut url) = Url::parse(raw) else {
        return REDACTED.to_string();
    };

    if url.password().is_some() && url.set_password(Some(REDACTED)).is_err() {
        return REDACTED.to_string();
    }

    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    if pairs.iter().any(|(key, _)| key == "password") {
        url.query_pairs_mut().clear().extend_pairs(pairs.iter().map(|(key, value)| {
            if key == "password" {
                (key.as_str(), REDACTED)
            } else {
                (key.as_str(), value.as_str())
            }
        }));
    }

    url.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_match_reference_deployment() {
        let config = DiricConfig::default();
        assert_eq!(config.database.name, "diric");
        assert_eq!(config.database.user, "dbuser");
        assert_eq!(config.server.port, 8000);
        assert!(!config.server.development);
        assert!(!config.server.fail_fast);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let config = DiricConfig::from_toml_str(
            r#"
            [database]
            name = "staff"
            log_queries = true

            [server]
            port = 9090
            development = true
            "#,
        )
        .unwrap();

        assert_eq!(config.database.name, "staff");
        assert!(config.database.log_queries);
        assert_eq!(config.database.user, "dbuser");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "localhost");
        assert!(config.server.development);
    }

    #[test]
    fn rejects_unparseable_toml() {
        let err = DiricConfig::from_toml_str("[server\nport = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = DiricConfig::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("diric.toml");
        fs::write(&path, "[server]\nfail_fast = true\n").unwrap();

        let config = DiricConfig::from_file(&path).unwrap();
        assert!(config.server.fail_fast);
    }

    #[test]
    fn env_overrides() {
        let env: HashMap<&str, &str> = [
            ("DATABASE_URL", "postgres://u:p@db/staff"),
            ("DIRIC_ENV", "Development"),
        ]
        .into_iter()
        .collect();

        let mut config = DiricConfig::default();
        config.apply_env_from(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.database.url.as_deref(), Some("postgres://u:p@db/staff"));
        assert!(config.server.development);
    }

    #[test]
    fn production_env_disables_development() {
        let mut config = DiricConfig::default();
        config.server.development = true;
        config.apply_env_from(|key| (key == "DIRIC_ENV").then(|| "production".to_string()));
        assert!(!config.server.development);
    }

    #[test]
    fn validation_failures() {
        let mut config = DiricConfig::default();
        config.database.max_connections = 0;
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "database.max_connections",
                ..
            }
        ));

        let mut config = DiricConfig::default();
        config.server.port = 0;
        assert!(config.validate().is_err());

        let mut config = DiricConfig::default();
        config.database.name = "  ".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn url_skips_discrete_field_checks() {
        let mut config = DiricConfig::default();
        config.database.name = String::new();
        config.database.url = Some("postgres://localhost/diric".into());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn redaction_hides_passwords() {
        let mut config = DiricConfig::default();
        config.database.url = Some("postgres://dbuser:secret@db:5432/diric".into());

        let shown = config.redacted().to_toml().unwrap();
        assert!(!shown.contains("dbpass"));
        assert!(!shown.contains("secret"));
        assert!(shown.contains("postgres://dbuser:********@db:5432/diric"));
    }

    #[test]
    fn redaction_uses_the_last_at_sign() {
        let mut config = DiricConfig::default();
        config.database.url = Some("postgres://app:p@ssw0rd@db:5432/diric".into());

        let shown = config.redacted().to_toml().unwrap();
        assert!(!shown.contains("ssw0rd"), "{shown}");
        assert!(shown.contains("postgres://app:********@db:5432/diric"));
    }

    #[test]
    fn redaction_masks_password_query_parameter() {
        let shown = redact_url("postgres://db:5432/diric?user=app&password=s3cret&sslmode=require");
        assert!(!shown.contains("s3cret"), "{shown}");
        assert!(shown.contains("user=app"));
        assert!(shown.contains("password=********"));
        assert!(shown.contains("sslmode=require"));
    }

    #[test]
    fn unparseable_url_is_masked_whole() {
        assert_eq!(redact_url("not a url with secret"), REDACTED);
    }

    #[test]
    fn redact_url_without_password_is_unchanged() {
        assert_eq!(redact_url("postgres://db/diric"), "postgres://db/diric");
        assert_eq!(redact_url("postgres://me@db/diric"), "postgres://me@db/diric");
    }
}
