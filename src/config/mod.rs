use crate::error::{RestError, Result};
use dashmap::DashMap;
use std::env;
use std::sync::Arc;

/// Prefix of the environment variables picked up by [`ConfigService::from_env`].
pub const ENV_PREFIX: &str = "REST_BLUEPRINT_";

/// Configuration service
///
/// Keys are stored lowercase without the environment prefix, so
/// `REST_BLUEPRINT_STRICT_SLASHES` becomes `strict_slashes`.
#[derive(Clone, Default)]
pub struct ConfigService {
    config: Arc<DashMap<String, String>>,
}

impl ConfigService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let service = Self::default();
        for (key, value) in env::vars() {
            if let Some(stripped) = key.strip_prefix(ENV_PREFIX) {
                service.set(&stripped.to_ascii_lowercase(), &value);
            }
        }
        service
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.config.get(key).map(|v| v.clone())
    }

    pub fn set(&self, key: &str, value: &str) {
        self.config.insert(key.to_string(), value.to_string());
    }

    pub fn get_bool(&self, key: &str) -> Result<Option<bool>> {
        let Some(raw) = self.get(key) else {
            return Ok(None);
        };
        match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(Some(true)),
            "0" | "false" | "no" | "off" => Ok(Some(false)),
            _ => Err(RestError::InvalidConfig {
                key: key.to_string(),
                value: raw,
            }),
        }
    }
}

/// Defaults applied by route groups to rules that leave an option unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub strict_slashes: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            strict_slashes: true,
        }
    }
}

impl Settings {
    pub fn from_config(config: &ConfigService) -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            strict_slashes: config
                .get_bool("strict_slashes")?
                .unwrap_or(defaults.strict_slashes),
        })
    }

    /// Reads settings from the environment, falling back to defaults when a
    /// value cannot be parsed.
    pub fn from_env() -> Self {
        Self::from_config(&ConfigService::from_env()).unwrap_or_else(|err| {
            tracing::warn!(error = %err, "Ignoring invalid route settings");
            Self::default()
        })
    }
}
