//! Application configuration.
//!
//! Settings come from an optional TOML file; the bearer token is only ever read
//! from the process environment (after loading `.env` if one exists).

use crate::error::ConfigError;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const BEARER_TOKEN_VAR: &str = "BEARER_TOKEN";
pub const DEFAULT_CONFIG_FILE: &str = "sentiscope.toml";
/// Upper bound for every retry delay setting, in seconds.
pub const MAX_RETRY_DELAY_SECS: u64 = 86_400;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    pub max_attempts: u32,
    /// Longest rate-limit wait the fetcher will sit out before giving up.
    pub max_wait_secs: u64,
    /// Assumed reset delay when the API does not report one.
    pub default_reset_secs: u64,
    pub backoff_padding_secs: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            max_wait_secs: 60,
            default_reset_secs: 60,
            backoff_padding_secs: 1,
        }
    }
}

#[derive(Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    #[serde(skip)]
    pub bearer_token: Option<String>,
    pub api_base_url: String,
    pub user_agent: String,
    pub search_window_minutes: u32,
    pub sample_data_path: PathBuf,
    pub retry: RetrySettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bearer_token: None,
            api_base_url: "https://api.twitter.com".to_string(),
            user_agent: format!("sentiscope/{}", env!("CARGO_PKG_VERSION")),
            search_window_minutes: 60,
            sample_data_path: PathBuf::from("sample_data.json"),
            retry: RetrySettings::default(),
        }
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field(
                "bearer_token",
                &self.bearer_token.as_ref().map(|_| "<redacted>"),
            )
            .field("api_base_url", &self.api_base_url)
            .field("user_agent", &self.user_agent)
            .field("search_window_minutes", &self.search_window_minutes)
            .field("sample_data_path", &self.sample_data_path)
            .field("retry", &self.retry)
            .finish()
    }
}

impl AppConfig {
    /// Resolve the config file (explicit path, else `sentiscope.toml` in the
    /// working directory, else built-in defaults) and attach credentials.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::FileNotFound {
                        path: path.display().to_string(),
                    });
                }
                Self::from_file(path)?
            }
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::from_file(default_path)?
                } else {
                    debug!("No {} found, using defaults", DEFAULT_CONFIG_FILE);
                    Self::default()
                }
            }
        };

        Ok(config.with_env_credentials())
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        info!("Loading configuration from {}", path.display());
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Read the bearer token from the environment. A missing or blank token
    /// is not an error here: [`AppConfig::require_bearer_token`] reports it and
    /// every live fetch returns missing credentials.
    pub fn with_env_credentials(mut self) -> Self {
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file loaded: {}", e);
        }

        self.bearer_token = normalize_token(std::env::var(BEARER_TOKEN_VAR).ok());
        debug!("Bearer token present: {}", self.bearer_token.is_some());
        self
    }

    pub fn require_bearer_token(&self) -> Result<&str, ConfigError> {
        self.bearer_token
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvironmentVariable {
                var_name: BEARER_TOKEN_VAR.to_string(),
            })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "retry.max_attempts".to_string(),
                value: "0".to_string(),
            });
        }
        for (field, value) in [
            ("retry.max_wait_secs", self.retry.max_wait_secs),
            ("retry.default_reset_secs", self.retry.default_reset_secs),
            ("retry.backoff_padding_secs", self.retry.backoff_padding_secs),
        ] {
            if value > MAX_RETRY_DELAY_SECS {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    value: value.to_string(),
                });
            }
        }
        if self.search_window_minutes == 0 {
            return Err(ConfigError::InvalidValue {
                field: "search_window_minutes".to_string(),
                value: "0".to_string(),
            });
        }
        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://")
        {
            return Err(ConfigError::InvalidValue {
                field: "api_base_url".to_string(),
                value: self.api_base_url.clone(),
            });
        }
        Ok(())
    }
}

pub fn normalize_token(raw: Option<String>) -> Option<String> {
    raw.map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.api_base_url, "https://api.twitter.com");
        assert_eq!(config.search_window_minutes, 60);
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.retry.max_wait_secs, 60);
        assert!(config.bearer_token.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            search_window_minutes = 30

            [retry]
            max_attempts = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.search_window_minutes, 30);
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.retry.default_reset_secs, 60);
        assert_eq!(config.api_base_url, "https://api.twitter.com");
    }

    #[test]
    fn test_invalid_values_rejected() {
        let result = AppConfig::from_toml_str("[retry]\nmax_attempts = 0\n");
        assert!(matches!(result, Err(ConfigError::InvalidValue { field, .. }) if field == "retry.max_attempts"));

        let result = AppConfig::from_toml_str("api_base_url = \"ftp://example.com\"\n");
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));

        let result = AppConfig::from_toml_str("search_window_minutes = \"soon\"\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_retry_delays_are_bounded() {
        let result = AppConfig::from_toml_str("[retry]\nbackoff_padding_secs = 9223372036854775807\n");
        assert!(matches!(result, Err(ConfigError::InvalidValue { field, .. }) if field == "retry.backoff_padding_secs"));

        let result = AppConfig::from_toml_str("[retry]\ndefault_reset_secs = 86401\n");
        assert!(matches!(result, Err(ConfigError::InvalidValue { field, .. }) if field == "retry.default_reset_secs"));

        let config = AppConfig::from_toml_str("[retry]\nmax_wait_secs = 86400\n").unwrap();
        assert_eq!(config.retry.max_wait_secs, MAX_RETRY_DELAY_SECS);
    }

    #[test]
    fn test_token_not_read_from_file() {
        let config = AppConfig::from_toml_str("bearer_token = \"leaked\"\n").unwrap();
        assert!(config.bearer_token.is_none());
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = AppConfig {
            bearer_token: Some("super-secret".to_string()),
            ..AppConfig::default()
        };
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_normalize_token() {
        assert_eq!(normalize_token(None), None);
        assert_eq!(normalize_token(Some("   ".to_string())), None);
        assert_eq!(
            normalize_token(Some(" abc \n".to_string())),
            Some("abc".to_string())
        );
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let result = AppConfig::load(Some(Path::new("/definitely/not/here.toml")));
        assert!(matches!(result, Err(ConfigError::FileNotFound { .. })));
    }

    #[test]
    #[serial]
    fn test_load_from_file_with_env_token() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "user_agent = \"sentiscope-test\"").unwrap();

        std::env::set_var(BEARER_TOKEN_VAR, "token-from-env");
        let config = AppConfig::load(Some(file.path())).unwrap();
        std::env::remove_var(BEARER_TOKEN_VAR);

        assert_eq!(config.user_agent, "sentiscope-test");
        assert_eq!(config.require_bearer_token().unwrap(), "token-from-env");
    }

    #[test]
    #[serial]
    fn test_blank_env_token_means_no_credentials() {
        std::env::set_var(BEARER_TOKEN_VAR, "   ");
        let config = AppConfig::default().with_env_credentials();
        std::env::remove_var(BEARER_TOKEN_VAR);

        assert!(config.bearer_token.is_none());
        assert!(matches!(
            config.require_bearer_token(),
            Err(ConfigError::MissingEnvironmentVariable { .. })
        ));
    }
}
