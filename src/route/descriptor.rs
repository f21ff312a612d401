use super::{HttpMethod, RouteOptions};
use std::fmt;

/// A handler paired with the routing metadata it was annotated with.
///
/// Descriptors are produced by [`RouteAnnotation::apply`](super::RouteAnnotation::apply)
/// and consumed once, when the owning controller builds its route group.
pub struct RouteDescriptor<H> {
    rule: String,
    http_method: HttpMethod,
    options: RouteOptions,
    handler_name: String,
    handler: H,
}

impl<H> RouteDescriptor<H> {
    pub(crate) fn new(
        rule: String,
        http_method: HttpMethod,
        options: RouteOptions,
        handler_name: String,
        handler: H,
    ) -> Self {
        Self {
            rule,
            http_method,
            options,
            handler_name,
            handler,
        }
    }

    pub fn rule(&self) -> &str {
        &self.rule
    }

    pub fn http_method(&self) -> HttpMethod {
        self.http_method
    }

    pub fn options(&self) -> &RouteOptions {
        &self.options
    }

    pub fn handler_name(&self) -> &str {
        &self.handler_name
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn into_parts(self) -> RouteParts<H> {
        RouteParts {
            rule: self.rule,
            http_method: self.http_method,
            options: self.options,
            handler_name: self.handler_name,
            handler: self.handler,
        }
    }
}

impl<H> fmt::Debug for RouteDescriptor<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteDescriptor")
            .field("rule", &self.rule)
            .field("http_method", &self.http_method)
            .field("options", &self.options)
            .field("handler_name", &self.handler_name)
            .finish_non_exhaustive()
    }
}

/// Owned fields of a [`RouteDescriptor`].
pub struct RouteParts<H> {
    pub rule: String,
    pub http_method: HttpMethod,
    pub options: RouteOptions,
    pub handler_name: String,
    pub handler: H,
}
