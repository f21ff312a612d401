//! Route groups backed by [`axum::Router`].

use super::{Application, RouteGroup, RouteInfo, join_rule};
use crate::config::{ConfigService, Settings};
use crate::controller::Controller;
use crate::error::{RestError, Result};
use crate::route::{HttpMethod, RouteOptions};
use axum::handler::Handler;
use axum::routing::{MethodFilter, MethodRouter, on};
use axum::{Extension, Router};
use matchit::InsertError;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;
use std::sync::Arc;

type MakeRoute<S> = Box<dyn FnOnce(MethodFilter) -> MethodRouter<S> + Send>;

/// A type-erased axum handler, turned into a [`MethodRouter`] once the verbs
/// it serves are known.
pub struct AxumHandler<S = ()> {
    make: MakeRoute<S>,
}

impl<S> AxumHandler<S>
where
    S: Clone + Send + Sync + 'static,
{
    pub fn new<H, T>(handler: H) -> Self
    where
        H: Handler<T, S>,
        T: 'static,
    {
        Self {
            make: Box::new(move |filter| on(filter, handler)),
        }
    }

    fn into_method_router(self, filter: MethodFilter) -> MethodRouter<S> {
        (self.make)(filter)
    }
}

impl<S> fmt::Debug for AxumHandler<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AxumHandler").finish_non_exhaustive()
    }
}

/// Path parameter defaults of the matched rule.
///
/// Every handler registered through an [`AxumBlueprint`] can extract this with
/// `Extension<RouteDefaults>`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteDefaults(Arc<BTreeMap<String, String>>);

impl RouteDefaults {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn as_map(&self) -> &BTreeMap<String, String> {
        &self.0
    }
}

/// Paths already handed to an axum router, mirrored in the matcher axum uses
/// so conflicting captures are reported instead of panicking inside axum.
#[derive(Clone, Default)]
struct PathTable {
    paths: BTreeSet<String>,
    matcher: matchit::Router<()>,
}

impl PathTable {
    /// Inserts every path not seen yet, or none of them.
    fn insert_all<'a>(&mut self, paths: impl IntoIterator<Item = &'a String>) -> Result<()> {
        let mut next = self.clone();
        for path in paths {
            if next.paths.contains(path) {
                continue;
            }
            next.matcher
                .insert(path.clone(), ())
                .map_err(|err| match err {
                    InsertError::Conflict { with } => RestError::ConflictingRule {
                        rule: path.clone(),
                        existing: with,
                    },
                    other => RestError::malformed(path.as_str(), other.to_string()),
                })?;
            next.paths.insert(path.clone());
        }
        *self = next;
        Ok(())
    }
}

/// A named, prefixed group of axum routes.
pub struct AxumBlueprint<S = ()> {
    name: String,
    import_name: String,
    url_prefix: String,
    settings: Settings,
    router: Router<S>,
    endpoints: HashSet<String>,
    seen: BTreeSet<(String, HttpMethod)>,
    paths: PathTable,
    rules: Vec<RouteInfo>,
}

impl<S> AxumBlueprint<S>
where
    S: Clone + Send + Sync + 'static,
{
    pub fn with_settings(
        name: impl Into<String>,
        import_name: impl Into<String>,
        url_prefix: impl Into<String>,
        settings: Settings,
    ) -> Self {
        Self {
            name: name.into(),
            import_name: import_name.into(),
            url_prefix: url_prefix.into(),
            settings,
            router: Router::new(),
            endpoints: HashSet::new(),
            seen: BTreeSet::new(),
            paths: PathTable::default(),
            rules: Vec::new(),
        }
    }

    /// Creates a group whose settings are read from `config`.
    pub fn from_config(
        name: impl Into<String>,
        import_name: impl Into<String>,
        url_prefix: impl Into<String>,
        config: &ConfigService,
    ) -> Result<Self> {
        let settings = Settings::from_config(config)?;
        Ok(Self::with_settings(name, import_name, url_prefix, settings))
    }

    pub fn import_name(&self) -> &str {
        &self.import_name
    }

    pub fn url_prefix(&self) -> &str {
        &self.url_prefix
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    pub fn rules(&self) -> &[RouteInfo] {
        &self.rules
    }

    pub fn into_router(self) -> Router<S> {
        self.router
    }
}

impl<S> RouteGroup for AxumBlueprint<S>
where
    S: Clone + Send + Sync + 'static,
{
    type Handler = AxumHandler<S>;
    type Error = RestError;

    fn new(name: &str, import_name: &str, url_prefix: &str) -> Self {
        Self::with_settings(name, import_name, url_prefix, Settings::from_env())
    }

    fn try_new(name: &str, import_name: &str, url_prefix: &str) -> Result<Self> {
        Self::from_config(name, import_name, url_prefix, &ConfigService::from_env())
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn add_rule(
        &mut self,
        rule: &str,
        endpoint: &str,
        handler: AxumHandler<S>,
        methods: &[HttpMethod],
        options: &RouteOptions,
    ) -> Result<()> {
        let path = join_rule(&self.url_prefix, rule);

        let mut verbs: Vec<HttpMethod> = Vec::with_capacity(methods.len());
        for method in methods {
            if !verbs.contains(method) {
                verbs.push(*method);
            }
        }
        let Some((first, rest)) = verbs.split_first() else {
            return Err(RestError::NoMethods { rule: path });
        };

        if self.endpoints.contains(endpoint) {
            return Err(RestError::DuplicateEndpoint {
                blueprint: self.name.clone(),
                endpoint: endpoint.to_string(),
            });
        }

        let mut paths = vec![path.clone()];
        if !options.strict_slashes.unwrap_or(self.settings.strict_slashes) {
            paths.extend(toggle_trailing_slash(&path));
        }

        for candidate in &paths {
            validate_path(candidate)?;
            for method in &verbs {
                if self.seen.contains(&(candidate.clone(), *method)) {
                    return Err(RestError::DuplicateRule {
                        rule: candidate.clone(),
                        method: *method,
                    });
                }
            }
        }

        self.paths.insert_all(&paths)?;

        let filter = rest
            .iter()
            .fold(first.method_filter(), |filter, method| {
                filter.or(method.method_filter())
            });
        let defaults = RouteDefaults(Arc::new(options.defaults.clone()));
        let method_router: MethodRouter<S> = handler
            .into_method_router(filter)
            .layer(Extension(defaults));

        let mut router = std::mem::take(&mut self.router);
        for candidate in &paths {
            router = router.route(candidate, method_router.clone());
            for method in &verbs {
                self.seen.insert((candidate.clone(), *method));
            }
        }
        self.router = router;
        self.endpoints.insert(endpoint.to_string());

        let qualified = format!("{}.{}", self.name, endpoint);
        for method in &verbs {
            tracing::debug!(
                blueprint = %self.name,
                method = %method,
                path = %path,
                endpoint = %qualified,
                "Added route"
            );
            self.rules.push(RouteInfo::new(
                *method,
                path.clone(),
                qualified.clone(),
                options.clone(),
            ));
        }
        Ok(())
    }
}

impl<S> fmt::Debug for AxumBlueprint<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AxumBlueprint")
            .field("name", &self.name)
            .field("import_name", &self.import_name)
            .field("url_prefix", &self.url_prefix)
            .field("rules", &self.rules)
            .finish_non_exhaustive()
    }
}

/// An axum application assembled from route groups.
pub struct AxumApp<S = ()> {
    router: Router<S>,
    blueprints: Vec<String>,
    seen: BTreeSet<(String, HttpMethod)>,
    paths: PathTable,
    rules: Vec<RouteInfo>,
}

impl<S> AxumApp<S>
where
    S: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            router: Router::new(),
            blueprints: Vec::new(),
            seen: BTreeSet::new(),
            paths: PathTable::default(),
            rules: Vec::new(),
        }
    }

    /// Builds the controller's route group and registers it.
    pub fn register<C>(&mut self) -> Result<()>
    where
        C: Controller<Group = AxumBlueprint<S>>,
    {
        C::register_routes(self)
    }

    /// Names of the registered route groups, in registration order.
    pub fn blueprints(&self) -> &[String] {
        &self.blueprints
    }

    pub fn rules(&self) -> &[RouteInfo] {
        &self.rules
    }

    pub fn into_router(self) -> Router<S> {
        self.router
    }
}

impl<S> Default for AxumApp<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Application<AxumBlueprint<S>> for AxumApp<S>
where
    S: Clone + Send + Sync + 'static,
{
    type Error = RestError;

    fn register_blueprint(&mut self, group: AxumBlueprint<S>) -> Result<()> {
        if self.blueprints.iter().any(|name| *name == group.name) {
            return Err(RestError::DuplicateBlueprint { name: group.name });
        }
        if let Some((rule, method)) = group.seen.iter().find(|key| self.seen.contains(*key)) {
            return Err(RestError::DuplicateRule {
                rule: rule.clone(),
                method: *method,
            });
        }
        self.paths.insert_all(&group.paths.paths)?;

        let AxumBlueprint {
            name,
            url_prefix,
            router,
            seen,
            rules,
            ..
        } = group;

        tracing::info!(
            blueprint = %name,
            url_prefix = %url_prefix,
            routes = rules.len(),
            "Registered blueprint"
        );

        let app_router = std::mem::take(&mut self.router);
        self.router = app_router.merge(router);
        self.seen.extend(seen);
        self.rules.extend(rules);
        self.blueprints.push(name);
        Ok(())
    }
}

fn toggle_trailing_slash(path: &str) -> Option<String> {
    if path == "/" {
        None
    } else if let Some(trimmed) = path.strip_suffix('/') {
        Some(trimmed.to_string())
    } else {
        Some(format!("{path}/"))
    }
}

/// Rejects the legacy syntax axum refuses before it reaches the matcher.
fn validate_path(path: &str) -> Result<()> {
    if !path.starts_with('/') {
        return Err(RestError::malformed(path, "paths must start with `/`"));
    }

    for segment in path.split('/') {
        if segment.starts_with(':') {
            return Err(RestError::malformed(
                path,
                "use `{param}` instead of `:param` for captures",
            ));
        }
        if segment.starts_with('*') {
            return Err(RestError::malformed(
                path,
                "use `{*wildcard}` instead of `*wildcard`",
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blueprint(prefix: &str) -> AxumBlueprint {
        AxumBlueprint::with_settings("Items", module_path!(), prefix, Settings::default())
    }

    async fn list() -> &'static str {
        "list"
    }

    #[test]
    fn test_validate_path() {
        assert!(validate_path("/items/{id}").is_ok());
        assert!(validate_path("/files/{*path}").is_ok());
        assert!(validate_path("items").is_err());
        assert!(validate_path("/items/:id").is_err());
        assert!(validate_path("/files/*path").is_err());
    }

    #[test]
    fn test_toggle_trailing_slash() {
        assert_eq!(toggle_trailing_slash("/a"), Some("/a/".to_string()));
        assert_eq!(toggle_trailing_slash("/a/"), Some("/a".to_string()));
        assert_eq!(toggle_trailing_slash("/"), None);
    }

    #[test]
    fn test_add_rule_records_prefixed_path() {
        let mut bp = blueprint("/api");
        bp.add_rule(
            "/items",
            "list_items",
            AxumHandler::new(list),
            &[HttpMethod::Get],
            &RouteOptions::default(),
        )
        .unwrap();

        assert_eq!(bp.rules().len(), 1);
        assert_eq!(bp.rules()[0].path, "/api/items");
        assert_eq!(bp.rules()[0].endpoint, "Items.list_items");
    }

    #[test]
    fn test_duplicate_rule_is_rejected() {
        let mut bp = blueprint("/api");
        let options = RouteOptions::default();
        bp.add_rule("/items", "a", AxumHandler::new(list), &[HttpMethod::Get], &options)
            .unwrap();
        let err = bp
            .add_rule("items", "b", AxumHandler::new(list), &[HttpMethod::Get], &options)
            .unwrap_err();

        assert!(matches!(
            err,
            RestError::DuplicateRule { ref rule, method: HttpMethod::Get } if rule == "/api/items"
        ));
        assert_eq!(bp.rules().len(), 1);
    }

    #[test]
    fn test_same_rule_other_verb_is_accepted() {
        let mut bp = blueprint("/api");
        let options = RouteOptions::default();
        bp.add_rule("/items", "a", AxumHandler::new(list), &[HttpMethod::Get], &options)
            .unwrap();
        bp.add_rule("/items", "b", AxumHandler::new(list), &[HttpMethod::Post], &options)
            .unwrap();
        assert_eq!(bp.rules().len(), 2);
    }

    #[test]
    fn test_duplicate_endpoint_is_rejected() {
        let mut bp = blueprint("/api");
        let options = RouteOptions::default();
        bp.add_rule("/a", "same", AxumHandler::new(list), &[HttpMethod::Get], &options)
            .unwrap();
        let err = bp
            .add_rule("/b", "same", AxumHandler::new(list), &[HttpMethod::Get], &options)
            .unwrap_err();
        assert!(matches!(err, RestError::DuplicateEndpoint { .. }));
    }

    #[test]
    fn test_empty_methods_is_rejected() {
        let mut bp = blueprint("/api");
        let err = bp
            .add_rule("/a", "a", AxumHandler::new(list), &[], &RouteOptions::default())
            .unwrap_err();
        assert!(matches!(err, RestError::NoMethods { .. }));
    }

    #[test]
    fn test_lenient_slashes_reserve_both_paths() {
        let mut bp = blueprint("/api");
        bp.add_rule(
            "/items",
            "a",
            AxumHandler::new(list),
            &[HttpMethod::Get],
            &RouteOptions::new().strict_slashes(false),
        )
        .unwrap();
        let err = bp
            .add_rule(
                "/items/",
                "b",
                AxumHandler::new(list),
                &[HttpMethod::Get],
                &RouteOptions::default(),
            )
            .unwrap_err();
        assert!(matches!(err, RestError::DuplicateRule { ref rule, .. } if rule == "/api/items/"));
    }

    #[test]
    fn test_app_rejects_duplicate_blueprint_name() {
        let mut app: AxumApp = AxumApp::new();
        app.register_blueprint(blueprint("/a")).unwrap();
        let err = app.register_blueprint(blueprint("/b")).unwrap_err();
        assert!(matches!(err, RestError::DuplicateBlueprint { ref name } if name == "Items"));
        assert_eq!(app.blueprints().to_vec(), vec!["Items".to_string()]);
    }

    #[test]
    fn test_app_rejects_rule_served_by_other_blueprint() {
        let options = RouteOptions::default();
        let mut first: AxumBlueprint =
            AxumBlueprint::with_settings("First", "", "/api", Settings::default());
        first
            .add_rule("/items", "a", AxumHandler::new(list), &[HttpMethod::Get], &options)
            .unwrap();
        let mut second: AxumBlueprint =
            AxumBlueprint::with_settings("Second", "", "/api", Settings::default());
        second
            .add_rule("/items", "b", AxumHandler::new(list), &[HttpMethod::Get], &options)
            .unwrap();

        let mut app: AxumApp = AxumApp::new();
        app.register_blueprint(first).unwrap();
        let err = app.register_blueprint(second).unwrap_err();
        assert!(matches!(err, RestError::DuplicateRule { .. }));
        assert_eq!(app.rules().len(), 1);
    }

    fn add(bp: &mut AxumBlueprint, rule: &str, endpoint: &str, method: HttpMethod) -> Result<()> {
        bp.add_rule(rule, endpoint, AxumHandler::new(list), &[method], &RouteOptions::default())
    }

    #[test]
    fn test_capture_name_clash_is_reported() {
        let mut bp = blueprint("/api");
        add(&mut bp, "/items/{id}", "update", HttpMethod::Put).unwrap();
        let err = add(&mut bp, "/items/{item_id}", "show", HttpMethod::Get).unwrap_err();

        assert!(matches!(
            err,
            RestError::ConflictingRule { ref rule, ref existing }
                if rule == "/api/items/{item_id}" && existing.contains("{id}")
        ));
        assert_eq!(bp.rules().len(), 1);
        assert_eq!(bp.paths.paths.len(), 1);
    }

    #[test]
    fn test_inner_catch_all_is_malformed() {
        let mut bp = blueprint("/api");
        let err = add(&mut bp, "/a/{*rest}/b", "nested", HttpMethod::Get).unwrap_err();
        assert!(matches!(err, RestError::MalformedRule { ref rule, .. } if rule == "/api/a/{*rest}/b"));
        assert!(bp.rules().is_empty());
    }

    #[test]
    fn test_lenient_slashes_on_catch_all_are_reported() {
        let mut bp = blueprint("/api");
        let err = bp
            .add_rule(
                "/files/{*path}",
                "files",
                AxumHandler::new(list),
                &[HttpMethod::Get],
                &RouteOptions::new().strict_slashes(false),
            )
            .unwrap_err();

        assert!(matches!(
            err,
            RestError::ConflictingRule { .. } | RestError::MalformedRule { .. }
        ));
        assert!(bp.rules().is_empty());
        assert!(bp.paths.paths.is_empty());

        // The group is still usable after the rejected rule.
        add(&mut bp, "/files/{*path}", "files", HttpMethod::Get).unwrap();
    }

    #[test]
    fn test_escaped_braces_are_literal() {
        let mut bp = blueprint("/api");
        add(&mut bp, "/literal/{{braces}}", "literal", HttpMethod::Get).unwrap();
        assert_eq!(bp.rules()[0].path, "/api/literal/{{braces}}");
    }

    #[test]
    fn test_app_reports_capture_clash_across_blueprints() {
        let mut first: AxumBlueprint =
            AxumBlueprint::with_settings("First", "", "/api", Settings::default());
        add(&mut first, "/items/{id}", "update", HttpMethod::Put).unwrap();
        let mut second: AxumBlueprint =
            AxumBlueprint::with_settings("Second", "", "/api", Settings::default());
        add(&mut second, "/items/{name}", "show", HttpMethod::Get).unwrap();

        let mut app: AxumApp = AxumApp::new();
        app.register_blueprint(first).unwrap();
        let err = app.register_blueprint(second).unwrap_err();

        assert!(matches!(err, RestError::ConflictingRule { ref rule, .. } if rule == "/api/items/{name}"));
        assert_eq!(app.blueprints().to_vec(), vec!["First".to_string()]);
        assert_eq!(app.rules().len(), 1);
    }

    #[test]
    fn test_app_accepts_same_path_other_verb_across_blueprints() {
        let mut first: AxumBlueprint =
            AxumBlueprint::with_settings("First", "", "/api", Settings::default());
        add(&mut first, "/items/{id}", "update", HttpMethod::Put).unwrap();
        let mut second: AxumBlueprint =
            AxumBlueprint::with_settings("Second", "", "/api", Settings::default());
        add(&mut second, "/items/{id}", "show", HttpMethod::Get).unwrap();

        let mut app: AxumApp = AxumApp::new();
        app.register_blueprint(first).unwrap();
        app.register_blueprint(second).unwrap();
        assert_eq!(app.rules().len(), 2);
    }

    #[test]
    fn test_from_config_reports_invalid_settings() {
        let config = ConfigService::new();
        config.set("strict_slashes", "sometimes");
        let err = AxumBlueprint::<()>::from_config("Items", "", "/api", &config).unwrap_err();
        assert!(matches!(err, RestError::InvalidConfig { .. }));

        config.set("strict_slashes", "false");
        let bp = AxumBlueprint::<()>::from_config("Items", "", "/api", &config).unwrap();
        assert!(!bp.settings().strict_slashes);
    }
}
