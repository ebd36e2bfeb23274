// crates/gemchat-server/src/config/mod.rs
// Configuration layers merged into the relay's runtime settings

pub mod env;
pub mod file;

pub use env::{ApiKeys, ConfigValidation, EnvConfig, mask_key};
pub use file::{ConfigError, FileConfig};

use crate::http::DEFAULT_TIMEOUT;
use crate::llm::gemini::{DEFAULT_API_BASE, DEFAULT_MODEL};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;

/// Values given on the command line. Highest precedence.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub static_dir: Option<PathBuf>,
}

/// Fully resolved relay settings
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub host: String,
    pub port: u16,
    pub api_key: Option<String>,
    pub model: String,
    pub api_base: String,
    pub static_dir: Option<PathBuf>,
    pub request_timeout: Duration,
    /// Problems noticed while reading the environment
    pub(crate) env_problems: Vec<String>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            static_dir: None,
            request_timeout: DEFAULT_TIMEOUT,
            env_problems: Vec::new(),
        }
    }
}

impl RelayConfig {
    /// Load environment and file layers, then apply CLI overrides
    pub fn load(cli: CliOverrides) -> Self {
        Self::resolve(cli, EnvConfig::load(), FileConfig::load())
    }

    /// Merge layers: CLI > env > file > defaults
    pub fn resolve(cli: CliOverrides, env: EnvConfig, file: FileConfig) -> Self {
        let defaults = Self::default();
        let timeout_secs = env
            .request_timeout_secs
            .or(file.gemini.request_timeout_secs);

        Self {
            host: cli
                .host
                .or(env.host)
                .or(file.server.host)
                .unwrap_or(defaults.host),
            port: cli
                .port
                .or(env.port)
                .or(file.server.port)
                .unwrap_or(defaults.port),
            api_key: env.api_keys.gemini,
            model: env
                .model
                .or(file.gemini.model)
                .unwrap_or(defaults.model),
            api_base: env
                .api_base
                .or(file.gemini.api_base)
                .unwrap_or(defaults.api_base),
            static_dir: cli
                .static_dir
                .or(env.static_dir)
                .or(file.server.static_dir),
            request_timeout: timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            env_problems: env.invalid,
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Masked API key, safe to log
    pub fn masked_api_key(&self) -> Option<String> {
        self.api_key.as_deref().map(mask_key)
    }

    /// Validate the configuration
    pub fn validate(&self) -> ConfigValidation {
        let mut validation = ConfigValidation::new();

        if self.api_key.is_none() {
            validation.add_warning(
                "No Gemini API key configured. Set GEMINI_API_KEY; chat requests will fail until then.",
            );
        }

        for problem in &self.env_problems {
            validation.add_warning(problem.clone());
        }

        if !(self.api_base.starts_with("http://") || self.api_base.starts_with("https://")) {
            validation.add_error(format!(
                "GEMINI_API_BASE '{}' must be an http(s) URL",
                self.api_base
            ));
        }

        if self.model.trim().is_empty() {
            validation.add_error("Model name is empty");
        }

        if self.request_timeout.is_zero() {
            validation.add_error("Request timeout must be at least one second");
        }

        if let Some(dir) = &self.static_dir
            && !dir.is_dir()
        {
            validation.add_warning(format!(
                "Static directory {} does not exist",
                dir.display()
            ));
        }

        validation
    }
}
