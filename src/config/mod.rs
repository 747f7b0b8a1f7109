//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `NOTEWISE_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{DEFAULT_LLM_TIMEOUT_SECS, DEFAULT_PRIORITY_LIMIT};

/// Analyzer configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `NOTEWISE_*` overrides on top of defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// MiniLM model directory (`config.json`, `model.safetensors`, `tokenizer.json`).
    /// `None` runs the lexical stub embedder.
    pub model_path: Option<PathBuf>,

    /// Chat model used for concept extraction and classification.
    /// `None` keeps both on their deterministic strategies.
    pub llm_model: Option<String>,

    /// Timeout for one capability call. Default: 20s.
    pub llm_timeout: Duration,

    /// Number of priority concepts reported. Default: `5`.
    pub priority_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model_path: None,
            llm_model: None,
            llm_timeout: Duration::from_secs(DEFAULT_LLM_TIMEOUT_SECS),
            priority_limit: DEFAULT_PRIORITY_LIMIT,
        }
    }
}

impl Config {
    const ENV_MODEL_PATH: &'static str = "NOTEWISE_MODEL_PATH";
    const ENV_LLM_MODEL: &'static str = "NOTEWISE_LLM_MODEL";
    const ENV_LLM_TIMEOUT_SECS: &'static str = "NOTEWISE_LLM_TIMEOUT_SECS";
    const ENV_PRIORITY_LIMIT: &'static str = "NOTEWISE_PRIORITY_LIMIT";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let model_path = Self::parse_optional_path_from_env(Self::ENV_MODEL_PATH);
        let llm_model = Self::parse_optional_string_from_env(Self::ENV_LLM_MODEL);
        let llm_timeout = Self::parse_timeout_from_env(defaults.llm_timeout)?;
        let priority_limit =
            Self::parse_usize_from_env(Self::ENV_PRIORITY_LIMIT, defaults.priority_limit);

        Ok(Self {
            model_path,
            llm_model,
            llm_timeout,
            priority_limit,
        })
    }

    /// Validates paths and basic invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(ref path) = self.model_path {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_dir() {
                return Err(ConfigError::NotADirectory { path: path.clone() });
            }
        }

        if self.llm_timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout {
                value: "0".to_string(),
            });
        }

        Ok(())
    }

    /// Whether a capability backend is configured.
    pub fn llm_enabled(&self) -> bool {
        self.llm_model.is_some()
    }

    fn parse_timeout_from_env(default: Duration) -> Result<Duration, ConfigError> {
        match env::var(Self::ENV_LLM_TIMEOUT_SECS) {
            Ok(value) => {
                let secs: u64 =
                    value
                        .trim()
                        .parse()
                        .map_err(|e| ConfigError::TimeoutParseError {
                            value: value.clone(),
                            source: e,
                        })?;

                if secs == 0 {
                    return Err(ConfigError::InvalidTimeout { value });
                }

                Ok(Duration::from_secs(secs))
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
        Self::parse_optional_string_from_env(var_name).map(PathBuf::from)
    }

    fn parse_optional_string_from_env(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse_usize_from_env(var_name: &str, default: usize) -> usize {
        env::var(var_name)
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }
}
