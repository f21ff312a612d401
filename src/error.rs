use crate::route::HttpMethod;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RestError>;

#[derive(Debug, Error)]
pub enum RestError {
    #[error("Malformed rule `{rule}`: {reason}")]
    MalformedRule { rule: String, reason: String },

    #[error("Rule `{rule}` is already registered for {method}")]
    DuplicateRule { rule: String, method: HttpMethod },

    #[error("Rule `{rule}` conflicts with registered rule `{existing}`")]
    ConflictingRule { rule: String, existing: String },

    #[error("Endpoint `{endpoint}` is already registered on blueprint `{blueprint}`")]
    DuplicateEndpoint { blueprint: String, endpoint: String },

    #[error("Blueprint `{name}` is already registered")]
    DuplicateBlueprint { name: String },

    #[error("Rule `{rule}` declares no HTTP methods")]
    NoMethods { rule: String },

    #[error("Invalid configuration value for {key}: {value}")]
    InvalidConfig { key: String, value: String },
}

impl RestError {
    pub fn malformed(rule: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedRule {
            rule: rule.into(),
            reason: reason.into(),
        }
    }
}
