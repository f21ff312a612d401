// Controllers are usually declared with the `#[controller]` macro, which
// collects `#[get]`, `#[post]`, `#[put]` and `#[delete]` handlers of an impl
// block into a `ControllerBuilder` and implements `Controller` on top of it.
// The builder can also be driven by hand.

use crate::blueprint::{Application, RouteGroup};
use crate::route::RouteDescriptor;

/// Starts a controller mounted at `endpoint`.
///
/// ```
/// use rest_blueprint::{controller, get, post, AxumBlueprint, AxumHandler};
///
/// async fn list_items() -> &'static str { "[]" }
/// async fn create_item() -> &'static str { "created" }
///
/// let group: AxumBlueprint = controller("/api")
///     .named("ItemController")
///     .route(get("/items").apply("list_items", AxumHandler::new(list_items)))
///     .route(post("/items").apply("create_item", AxumHandler::new(create_item)))
///     .build()
///     .unwrap();
/// assert_eq!(group.rules().len(), 2);
/// ```
pub fn controller<H>(endpoint: impl Into<String>) -> ControllerBuilder<H> {
    ControllerBuilder::new(endpoint)
}

/// Collects route descriptors for one controller.
///
/// A handler carries at most one descriptor: adding a second one for the same
/// handler name replaces the first, keeping its position.
#[derive(Debug)]
pub struct ControllerBuilder<H> {
    endpoint: String,
    name: Option<String>,
    import_name: String,
    routes: Vec<RouteDescriptor<H>>,
}

impl<H> ControllerBuilder<H> {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            name: None,
            import_name: String::new(),
            routes: Vec::new(),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn import_name(mut self, import_name: impl Into<String>) -> Self {
        self.import_name = import_name.into();
        self
    }

    pub fn route(mut self, route: RouteDescriptor<H>) -> Self {
        match self
            .routes
            .iter_mut()
            .find(|existing| existing.handler_name() == route.handler_name())
        {
            Some(existing) => {
                tracing::warn!(
                    handler = route.handler_name(),
                    replaced = %existing.http_method(),
                    method = %route.http_method(),
                    rule = route.rule(),
                    "Handler annotated more than once, keeping the last route"
                );
                *existing = route;
            }
            None => self.routes.push(route),
        }
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// The group name, falling back to the endpoint when unnamed.
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.endpoint)
    }

    pub fn routes(&self) -> &[RouteDescriptor<H>] {
        &self.routes
    }

    /// Creates the route group and adds every collected route to it, in the
    /// order they were collected. The first error from the group aborts the
    /// build and is returned as is.
    pub fn build<G>(self) -> Result<G, G::Error>
    where
        G: RouteGroup<Handler = H>,
    {
        let group = G::try_new(self.name(), &self.import_name, &self.endpoint)?;
        self.build_into(group)
    }

    /// Like [`build`](Self::build), but adds the routes to a group created by
    /// the caller.
    pub fn build_into<G>(self, mut group: G) -> Result<G, G::Error>
    where
        G: RouteGroup<Handler = H>,
    {
        for route in self.routes {
            let parts = route.into_parts();
            group.add_rule(
                &parts.rule,
                &parts.handler_name,
                parts.handler,
                &[parts.http_method],
                &parts.options,
            )?;
        }
        Ok(group)
    }
}

type HandlerOf<C> = <<C as Controller>::Group as RouteGroup>::Handler;
type GroupError<C> = <<C as Controller>::Group as RouteGroup>::Error;

/// A type whose handlers form one route group.
pub trait Controller {
    type Group: RouteGroup;

    /// URL prefix shared by every route of the controller.
    const ENDPOINT: &'static str;

    /// Route group name. Defaults to the unqualified type name, without
    /// generic arguments.
    fn name() -> &'static str {
        let full = std::any::type_name::<Self>();
        let base = full.split('<').next().unwrap_or(full);
        base.rsplit("::").next().unwrap_or(base)
    }

    fn import_name() -> &'static str {
        ""
    }

    fn routes() -> ControllerBuilder<HandlerOf<Self>>;

    /// Builds a fresh route group for this controller.
    fn blueprint() -> Result<Self::Group, GroupError<Self>> {
        Self::routes().build()
    }

    /// Builds the route group and attaches it to `app`.
    fn register_routes<A>(app: &mut A) -> Result<(), A::Error>
    where
        A: Application<Self::Group>,
        A::Error: From<GroupError<Self>>,
    {
        let group = Self::blueprint()?;
        app.register_blueprint(group)
    }
}
