//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `BIASLENS_*` environment
//! variables (the OpenAI key keeps its conventional `OPENAI_API_KEY` name).

pub mod error;


pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::path::PathBuf;

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `BIASLENS_*` overrides on top of
/// defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `8080`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// Checkpoint directory for the bias model. Unset runs the stub backend.
    pub model_dir: Option<PathBuf>,

    /// Tokenizer file override (defaults to `tokenizer.json` in `model_dir`).
    pub tokenizer_path: Option<PathBuf>,

    /// Source-priors CSV. Default: `data/allsides_priors.csv`.
    pub priors_path: PathBuf,

    /// Enables LLM summaries. Default: off (extractive fallback only).
    pub summary_enabled: bool,

    /// Chat-completions model for summaries. Default: `gpt-4o-mini`.
    pub summary_model: String,

    /// OpenAI API key for the summary path.
    pub openai_api_key: Option<String>,

    /// Character cap applied to fetched article bodies. Default: `8000`.
    pub max_fetch_chars: usize,
}

/// Default priors table location.
pub const DEFAULT_PRIORS_PATH: &str = "data/allsides_priors.csv";

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            model_dir: None,
            tokenizer_path: None,
            priors_path: PathBuf::from(DEFAULT_PRIORS_PATH),
            summary_enabled: false,
            summary_model: "gpt-4o-mini".to_string(),
            openai_api_key: None,
            max_fetch_chars: 8000,
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "BIASLENS_PORT";
    const ENV_BIND_ADDR: &'static str = "BIASLENS_BIND_ADDR";
    const ENV_MODEL_DIR: &'static str = "BIASLENS_MODEL_DIR";
    const ENV_TOKENIZER_PATH: &'static str = "BIASLENS_TOKENIZER_PATH";
    const ENV_PRIORS_PATH: &'static str = "BIASLENS_PRIORS_PATH";
    const ENV_SUMMARY_ENABLED: &'static str = "BIASLENS_SUMMARY_ENABLED";
    const ENV_SUMMARY_MODEL: &'static str = "BIASLENS_SUMMARY_MODEL";
    const ENV_OPENAI_API_KEY: &'static str = "OPENAI_API_KEY";
    const ENV_MAX_FETCH_CHARS: &'static str = "BIASLENS_MAX_FETCH_CHARS";

    /// Loads configuration from environment variables (falling back to
    /// defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let model_dir = Self::parse_optional_path_from_env(Self::ENV_MODEL_DIR);
        let tokenizer_path = Self::parse_optional_path_from_env(Self::ENV_TOKENIZER_PATH);
        let priors_path = Self::parse_path_from_env(Self::ENV_PRIORS_PATH, defaults.priors_path);
        let summary_enabled =
            Self::parse_bool_from_env(Self::ENV_SUMMARY_ENABLED, defaults.summary_enabled);
        let summary_model =
            Self::parse_string_from_env(Self::ENV_SUMMARY_MODEL, defaults.summary_model);
        let openai_api_key = env::var(Self::ENV_OPENAI_API_KEY)
            .ok()
            .filter(|v| !v.trim().is_empty());
        let max_fetch_chars =
            Self::parse_usize_from_env(Self::ENV_MAX_FETCH_CHARS, defaults.max_fetch_chars);

        Ok(Self {
            port,
            bind_addr,
            model_dir,
            tokenizer_path,
            priors_path,
            summary_enabled,
            summary_model,
            openai_api_key,
            max_fetch_chars,
        })
    }

    /// Validates paths and basic invariants (does not create anything).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(ref path) = self.model_dir {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_dir() {
                return Err(ConfigError::NotADirectory { path: path.clone() });
            }
        }

        if let Some(ref path) = self.tokenizer_path {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_file() {
                return Err(ConfigError::NotAFile { path: path.clone() });
            }
        }

        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    /// Classifier configuration derived from this config (stub when no
    /// checkpoint directory is set).
    pub fn classifier_config(&self) -> crate::classifier::ClassifierConfig {
        match &self.model_dir {
            Some(model_dir) => crate::classifier::ClassifierConfig {
                model_dir: Some(model_dir.clone()),
                tokenizer_path: self.tokenizer_path.clone(),
                ..Default::default()
            },
            None => crate::classifier::ClassifierConfig::stub(),
        }
    }

    /// Summarizer configuration derived from this config.
    pub fn summary_config(&self) -> crate::summary::SummaryConfig {
        crate::summary::SummaryConfig {
            enabled: self.summary_enabled,
            model: self.summary_model.clone(),
            api_key: self.openai_api_key.clone(),
        }
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        env::var(var_name).map(PathBuf::from).unwrap_or(default)
    }

    fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name).unwrap_or(default)
    }

    fn parse_bool_from_env(var_name: &str, default: bool) -> bool {
        match env::var(var_name) {
            Ok(value) => matches!(value.trim().to_lowercase().as_str(), "1" | "true" | "yes"),
            Err(_) => default,
        }
    }

    fn parse_usize_from_env(var_name: &str, default: usize) -> usize {
        env::var(var_name)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }
}
