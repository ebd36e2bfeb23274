// crates/gemchat-server/src/config/env.rs
// Environment-based configuration - single source of truth for all env vars

use std::path::PathBuf;
use tracing::{debug, info, warn};

/// API keys loaded from environment variables
#[derive(Debug, Clone, Default)]
pub struct ApiKeys {
    /// Gemini/Google API key (GEMINI_API_KEY or GOOGLE_API_KEY)
    pub gemini: Option<String>,
}

impl ApiKeys {
    /// Load API keys through an arbitrary lookup function
    pub fn from_lookup(lookup: &dyn Fn(&str) -> Option<String>) -> Self {
        let gemini =
            read_key(lookup, "GEMINI_API_KEY").or_else(|| read_key(lookup, "GOOGLE_API_KEY"));

        let keys = Self { gemini };
        keys.log_status();
        keys
    }

    /// Masked form of the Gemini key, safe to log
    pub fn masked_gemini(&self) -> Option<String> {
        self.gemini.as_deref().map(mask_key)
    }

    fn log_status(&self) {
        match self.masked_gemini() {
            Some(masked) => debug!(key = %masked, "Gemini API key loaded"),
            None => warn!("No Gemini API key configured - relay requests will fail"),
        }
    }
}

/// Show the first 8 and last 4 characters of a secret.
/// Keys too short to mask meaningfully are fully hidden.
pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 12 {
        return "****".to_string();
    }
    let head: String = chars[..8].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

/// Configuration validation result
#[derive(Debug)]
pub struct ConfigValidation {
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl Default for ConfigValidation {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigValidation {
    pub fn new() -> Self {
        Self {
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    pub fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    /// Format as a human-readable report
    pub fn report(&self) -> String {
        let mut lines = Vec::new();

        if !self.errors.is_empty() {
            lines.push("Errors:".to_string());
            for err in &self.errors {
                lines.push(format!("  - {}", err));
            }
        }

        if !self.warnings.is_empty() {
            lines.push("Warnings:".to_string());
            for warn in &self.warnings {
                lines.push(format!("  - {}", warn));
            }
        }

        if lines.is_empty() {
            "Configuration OK".to_string()
        } else {
            lines.join("\n")
        }
    }
}

/// Environment configuration - all env vars in one place
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    pub api_keys: ApiKeys,
    /// Model override (GEMINI_MODEL)
    pub model: Option<String>,
    /// API base URL override (GEMINI_API_BASE)
    pub api_base: Option<String>,
    /// Bind host (HOST)
    pub host: Option<String>,
    /// Bind port (PORT)
    pub port: Option<u16>,
    /// Static front-end directory (GEMCHAT_STATIC_DIR)
    pub static_dir: Option<PathBuf>,
    /// Outbound request timeout in seconds (GEMCHAT_REQUEST_TIMEOUT_SECS)
    pub request_timeout_secs: Option<u64>,
    /// Variables that were set but could not be parsed
    pub invalid: Vec<String>,
}

impl EnvConfig {
    /// Load all environment configuration (call once at startup)
    pub fn load() -> Self {
        info!("Loading environment configuration");
        Self::from_lookup(&process_env)
    }

    pub fn from_lookup(lookup: &dyn Fn(&str) -> Option<String>) -> Self {
        let mut invalid = Vec::new();
        let port = parse_var(lookup, "PORT", &mut invalid);
        let request_timeout_secs = parse_var(lookup, "GEMCHAT_REQUEST_TIMEOUT_SECS", &mut invalid);

        Self {
            api_keys: ApiKeys::from_lookup(lookup),
            model: read_key(lookup, "GEMINI_MODEL"),
            api_base: read_key(lookup, "GEMINI_API_BASE"),
            host: read_key(lookup, "HOST"),
            port,
            static_dir: read_key(lookup, "GEMCHAT_STATIC_DIR").map(PathBuf::from),
            request_timeout_secs,
            invalid,
        }
    }
}

fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Read a single value, filtering empty ones
fn read_key(lookup: &dyn Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_var<T: std::str::FromStr>(
    lookup: &dyn Fn(&str) -> Option<String>,
    name: &str,
    invalid: &mut Vec<String>,
) -> Option<T> {
    let raw = read_key(lookup, name)?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(var = name, value = %raw, "Ignoring unparseable environment value");
            invalid.push(format!("{} has an invalid value '{}'", name, raw));
            None
        }
    }
}
