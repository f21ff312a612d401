use proc_macro::TokenStream;

mod controller;
mod http_methods;

/// Attribute macro turning an impl block into a REST controller
///
/// Every associated function annotated with `#[get]`, `#[post]`, `#[put]` or
/// `#[delete]` becomes one route of the controller's blueprint, in declaration
/// order. The macro implements `rest_blueprint::Controller` for the type.
///
/// Arguments: the URL prefix (positional or `path = "..."`), plus optional
/// `state = Type` for handlers extracting `State<Type>` and `name = "..."` to
/// override the blueprint name (the type name by default).
///
/// # Example
/// ```ignore
/// use rest_blueprint::prelude::*;
///
/// pub struct ItemController;
///
/// #[controller("/api", state = AppState)]
/// impl ItemController {
///     #[get("/items")]
///     async fn list_items(State(state): State<AppState>) -> Json<Vec<Item>> {
///         // ...
///     }
///
///     #[delete("/items/{id}", strict_slashes = false)]
///     async fn delete_item(Path(id): Path<u64>) -> StatusCode {
///         // ...
///     }
/// }
/// ```
#[proc_macro_attribute]
pub fn controller(attr: TokenStream, item: TokenStream) -> TokenStream {
    controller::controller_attribute(attr, item)
}

/// HTTP GET method attribute for controller handlers
///
/// Accepts the rule followed by optional `strict_slashes = bool`,
/// `defaults(param = "value", ..)` and `extra(key = literal, ..)`.
#[proc_macro_attribute]
pub fn get(attr: TokenStream, item: TokenStream) -> TokenStream {
    http_methods::http_method_attribute("get", attr, item)
}

/// HTTP POST method attribute for controller handlers
#[proc_macro_attribute]
pub fn post(attr: TokenStream, item: TokenStream) -> TokenStream {
    http_methods::http_method_attribute("post", attr, item)
}

/// HTTP PUT method attribute for controller handlers
#[proc_macro_attribute]
pub fn put(attr: TokenStream, item: TokenStream) -> TokenStream {
    http_methods::http_method_attribute("put", attr, item)
}

/// HTTP DELETE method attribute for controller handlers
#[proc_macro_attribute]
pub fn delete(attr: TokenStream, item: TokenStream) -> TokenStream {
    http_methods::http_method_attribute("delete", attr, item)
}
