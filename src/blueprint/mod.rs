//! Seams to the routing framework that actually serves requests.
//!
//! A [`RouteGroup`] is a named, URL-prefixed collection of rules owned by one
//! controller. An [`Application`] accepts finished groups. Both traits are
//! implemented for axum by [`AxumBlueprint`] and [`AxumApp`]; tests and other
//! frameworks can provide their own.

mod info;
mod router;

pub use info::RouteInfo;
pub use router::{AxumApp, AxumBlueprint, AxumHandler, RouteDefaults};

use crate::route::{HttpMethod, RouteOptions};

/// A named group of rules sharing a URL prefix.
pub trait RouteGroup: Sized {
    /// What the group stores for each rule.
    type Handler;
    type Error: std::error::Error + Send + Sync + 'static;

    fn new(name: &str, import_name: &str, url_prefix: &str) -> Self;

    /// Constructor used when a controller builds its group. Implementations
    /// that read configuration report bad values here.
    fn try_new(name: &str, import_name: &str, url_prefix: &str) -> Result<Self, Self::Error> {
        Ok(Self::new(name, import_name, url_prefix))
    }

    fn name(&self) -> &str;

    /// Registers `handler` for `rule` under the endpoint name `endpoint`.
    ///
    /// Duplicate or malformed rules are reported by the implementation.
    fn add_rule(
        &mut self,
        rule: &str,
        endpoint: &str,
        handler: Self::Handler,
        methods: &[HttpMethod],
        options: &RouteOptions,
    ) -> Result<(), Self::Error>;
}

/// Something route groups can be attached to.
pub trait Application<G: RouteGroup> {
    type Error;

    fn register_blueprint(&mut self, group: G) -> Result<(), Self::Error>;
}

/// Joins a group prefix and a rule the way blueprints do: an empty rule maps
/// to the prefix itself, otherwise exactly one `/` separates the two.
pub fn join_rule(url_prefix: &str, rule: &str) -> String {
    if url_prefix.is_empty() {
        return rule.to_string();
    }
    if rule.is_empty() {
        return url_prefix.to_string();
    }
    format!(
        "{}/{}",
        url_prefix.trim_end_matches('/'),
        rule.trim_start_matches('/')
    )
}
