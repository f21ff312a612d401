use super::{HttpMethod, RouteDescriptor, RouteOptions};
use serde_json::Value;

/// Verb and rule metadata waiting to be applied to a handler.
///
/// Created by [`get`], [`post`], [`put`] or [`delete`]. The verb is fixed by
/// the constructor and no option can change it.
///
/// ```
/// use rest_blueprint::{get, HttpMethod};
///
/// let route = get("/items").strict_slashes(false).apply("list_items", ());
/// assert_eq!(route.http_method(), HttpMethod::Get);
/// assert_eq!(route.rule(), "/items");
/// ```
#[derive(Debug, Clone)]
pub struct RouteAnnotation {
    http_method: HttpMethod,
    rule: String,
    options: RouteOptions,
}

impl RouteAnnotation {
    pub fn new(http_method: HttpMethod, rule: impl Into<String>) -> Self {
        Self {
            http_method,
            rule: rule.into(),
            options: RouteOptions::default(),
        }
    }

    pub fn http_method(&self) -> HttpMethod {
        self.http_method
    }

    pub fn rule(&self) -> &str {
        &self.rule
    }

    pub fn strict_slashes(mut self, strict: bool) -> Self {
        self.options = self.options.strict_slashes(strict);
        self
    }

    pub fn default_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options = self.options.default_value(key, value);
        self
    }

    pub fn extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options = self.options.extra(key, value);
        self
    }

    /// Replaces all options at once.
    pub fn options(mut self, options: RouteOptions) -> Self {
        self.options = options;
        self
    }

    /// Pairs the annotation with a handler.
    pub fn apply<H>(self, handler_name: impl Into<String>, handler: H) -> RouteDescriptor<H> {
        RouteDescriptor::new(
            self.rule,
            self.http_method,
            self.options,
            handler_name.into(),
            handler,
        )
    }
}

/// Maps a GET request to a controller handler.
pub fn get(rule: impl Into<String>) -> RouteAnnotation {
    RouteAnnotation::new(HttpMethod::Get, rule)
}

/// Maps a POST request to a controller handler.
pub fn post(rule: impl Into<String>) -> RouteAnnotation {
    RouteAnnotation::new(HttpMethod::Post, rule)
}

/// Maps a PUT request to a controller handler.
pub fn put(rule: impl Into<String>) -> RouteAnnotation {
    RouteAnnotation::new(HttpMethod::Put, rule)
}

/// Maps a DELETE request to a controller handler.
pub fn delete(rule: impl Into<String>) -> RouteAnnotation {
    RouteAnnotation::new(HttpMethod::Delete, rule)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn handler() -> &'static str {
        "ok"
    }

    #[test]
    fn test_each_verb_is_fixed() {
        let cases = [
            (get("/a"), HttpMethod::Get),
            (post("/a"), HttpMethod::Post),
            (put("/a"), HttpMethod::Put),
            (delete("/a"), HttpMethod::Delete),
        ];

        for (annotation, expected) in cases {
            let route = annotation
                .extra("methods", json!(["PATCH"]))
                .apply("handler", handler);
            assert_eq!(route.http_method(), expected);
            assert!(!route.options().extras().contains_key("methods"));
        }
    }

    #[test]
    fn test_rule_is_not_normalized() {
        for rule in ["/items", "items/", "", "//double//", "/users/{id}"] {
            let route = get(rule).apply("handler", handler);
            assert_eq!(route.rule(), rule);
        }
    }

    #[test]
    fn test_options_are_copied_into_descriptor() {
        let route = put("/items/{id}")
            .strict_slashes(false)
            .default_value("id", "0")
            .extra("subdomain", "api")
            .apply("update_item", handler);

        assert_eq!(route.options().strict_slashes, Some(false));
        assert_eq!(route.options().defaults["id"], "0");
        assert_eq!(route.options().extras()["subdomain"], json!("api"));
        assert_eq!(route.handler_name(), "update_item");
        assert_eq!((route.handler())(), "ok");
    }

    #[test]
    fn test_options_replaces_previous_options() {
        let route = get("/a")
            .strict_slashes(true)
            .options(RouteOptions::new().default_value("x", "1"))
            .apply("handler", handler);

        assert_eq!(route.options().strict_slashes, None);
        assert_eq!(route.options().defaults.len(), 1);
    }
}
