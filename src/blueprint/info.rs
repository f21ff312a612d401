//! Route metadata for introspection.

use crate::route::{HttpMethod, RouteOptions};
use serde::Serialize;

/// A rule as it was registered, with the prefix already applied.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteInfo {
    pub method: HttpMethod,
    /// Full path, group prefix included.
    pub path: String,
    /// `<group>.<handler>`.
    pub endpoint: String,
    pub options: RouteOptions,
}

impl RouteInfo {
    pub fn new(
        method: HttpMethod,
        path: impl Into<String>,
        endpoint: impl Into<String>,
        options: RouteOptions,
    ) -> Self {
        Self {
            method,
            path: path.into(),
            endpoint: endpoint.into(),
            options,
        }
    }
}
