//! Service configuration.
//!
//! `AdminConfig` has a default for every field. It loads from a JSON
//! document (missing keys keep their defaults) or from `ORGDESK_*`
//! environment variables layered over the defaults.

use std::env;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::auth::RefreshTokenStore;
use crate::filter::{ArabicFolding, RuleTranslator};

const ENV_PREFIX: &str = "ORGDESK_";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    pub bind_addr: String,
    pub default_page_size: u64,
    pub max_page_size: u64,
    pub notification_window_hours: u64,
    pub refresh_token_ttl_secs: u64,
    pub refresh_token_capacity: u64,
    pub arabic_folding: ArabicFolding,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
            default_page_size: 10,
            max_page_size: 100,
            notification_window_hours: 24,
            refresh_token_ttl_secs: 7 * 24 * 60 * 60,
            refresh_token_capacity: 10_000,
            arabic_folding: ArabicFolding::Passthrough,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The JSON document could not be parsed.
    Parse(String),
    /// An environment variable held a value of the wrong shape.
    InvalidVar { name: String, value: String },
    /// A value parsed but is out of range.
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(msg) => write!(f, "config parse error: {}", msg),
            ConfigError::InvalidVar { name, value } => {
                write!(f, "invalid value for {}: {:?}", name, value)
            }
            ConfigError::Invalid(msg) => write!(f, "invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

impl AdminConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()
    }

    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load from any variable source, e.g. a map in tests.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |suffix: &str| {
            let name = format!("{}{}", ENV_PREFIX, suffix);
            lookup(&name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .map(|v| (name, v))
        };

        let mut config = Self::default();
        if let Some((_, value)) = var("BIND_ADDR") {
            config.bind_addr = value;
        }
        if let Some((name, value)) = var("DEFAULT_PAGE_SIZE") {
            config.default_page_size = parse_var(name, value)?;
        }
        if let Some((name, value)) = var("MAX_PAGE_SIZE") {
            config.max_page_size = parse_var(name, value)?;
        }
        if let Some((name, value)) = var("NOTIFICATION_WINDOW_HOURS") {
            config.notification_window_hours = parse_var(name, value)?;
        }
        if let Some((name, value)) = var("REFRESH_TOKEN_TTL_SECS") {
            config.refresh_token_ttl_secs = parse_var(name, value)?;
        }
        if let Some((name, value)) = var("REFRESH_TOKEN_CAPACITY") {
            config.refresh_token_capacity = parse_var(name, value)?;
        }
        if let Some((name, value)) = var("ARABIC_FOLDING") {
            config.arabic_folding = match value.to_ascii_lowercase().as_str() {
                "passthrough" => ArabicFolding::Passthrough,
                "letter-classes" => ArabicFolding::LetterClasses,
                _ => return Err(ConfigError::InvalidVar { name, value }),
            };
        }
        config.validate()
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.default_page_size == 0 || self.max_page_size == 0 {
            return Err(ConfigError::Invalid("page sizes must be positive".into()));
        }
        if self.default_page_size > self.max_page_size {
            return Err(ConfigError::Invalid(
                "default_page_size exceeds max_page_size".into(),
            ));
        }
        if self.refresh_token_ttl_secs == 0
            || self.refresh_token_ttl_secs > RefreshTokenStore::MAX_TTL.as_secs()
        {
            return Err(ConfigError::Invalid(format!(
                "refresh_token_ttl_secs must be between 1 and {}",
                RefreshTokenStore::MAX_TTL.as_secs()
            )));
        }
        if self.refresh_token_capacity == 0 {
            return Err(ConfigError::Invalid(
                "refresh_token_capacity must be positive".into(),
            ));
        }
        Ok(self)
    }

    /// Clamp a requested page size; absent or zero means the default.
    pub fn page_limit(&self, requested: Option<u64>) -> u64 {
        match requested {
            Some(0) | None => self.default_page_size,
            Some(limit) => limit.min(self.max_page_size),
        }
    }

    pub fn notification_window_millis(&self) -> i64 {
        (self.notification_window_hours as i64).saturating_mul(60 * 60 * 1000)
    }

    pub fn translator(&self) -> RuleTranslator {
        RuleTranslator::new(self.arabic_folding)
    }
}

fn parse_var<T: FromStr>(name: String, value: String) -> Result<T, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::InvalidVar { name, value })
}
