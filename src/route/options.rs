use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Extra option keys that belong to the route descriptor itself and can
/// never be forwarded as framework extras.
pub const RESERVED_EXTRA_KEYS: &[&str] = &["methods"];

/// Options forwarded to the routing collaborator together with a rule.
///
/// The recognized options are typed fields. Anything framework-specific goes
/// through `extras`, which rejects the reserved keys so the HTTP verb of a
/// descriptor cannot be overridden by accident.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RouteOptions {
    /// `Some(false)` makes the rule match with and without a trailing slash.
    /// `None` defers to the route group's setting.
    pub strict_slashes: Option<bool>,
    /// Default values for path parameters, handed to the handler.
    pub defaults: BTreeMap<String, String>,
    extras: Map<String, Value>,
}

impl RouteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strict_slashes(mut self, strict: bool) -> Self {
        self.strict_slashes = Some(strict);
        self
    }

    pub fn default_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.defaults.insert(key.into(), value.into());
        self
    }

    /// Adds a framework-specific extra. Reserved keys are dropped.
    pub fn extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert_extra(key.into(), value.into());
        self
    }

    pub fn extras(&self) -> &Map<String, Value> {
        &self.extras
    }

    pub fn is_empty(&self) -> bool {
        self.strict_slashes.is_none() && self.defaults.is_empty() && self.extras.is_empty()
    }

    fn insert_extra(&mut self, key: String, value: Value) {
        if RESERVED_EXTRA_KEYS.contains(&key.as_str()) {
            tracing::warn!(key = %key, "Dropping reserved route option");
            return;
        }
        self.extras.insert(key, value);
    }
}
