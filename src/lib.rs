//! # rest-blueprint
//!
//! Declarative REST controllers for axum.
//!
//! Handlers are annotated with an HTTP verb and a rule. A controller collects
//! the annotated handlers and registers all of them, under one URL prefix, as
//! a single named route group (a "blueprint"). The group is then attached to
//! the application in one call.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rest_blueprint::prelude::*;
//!
//! pub struct ItemController;
//!
//! #[controller("/api")]
//! impl ItemController {
//!     #[get("/items")]
//!     async fn list_items() -> &'static str {
//!         "[]"
//!     }
//!
//!     #[post("/items", strict_slashes = false)]
//!     async fn create_item(Json(item): Json<serde_json::Value>) -> Json<serde_json::Value> {
//!         Json(item)
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut app = AxumApp::new();
//!     ItemController::register_routes(&mut app)?;
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//!     axum::serve(listener, app.into_router()).await?;
//!     Ok(())
//! }
//! ```
//!
//! Registration order is the declaration order of the handlers. Conflicting
//! rules are reported as [`RestError`] when the group is built or registered.

pub mod blueprint;
pub mod config;
pub mod controller;
pub mod error;
pub mod route;

pub use blueprint::{
    Application, AxumApp, AxumBlueprint, AxumHandler, RouteDefaults, RouteGroup, RouteInfo,
};
pub use config::{ConfigService, Settings};
pub use controller::{Controller, ControllerBuilder, controller};
pub use error::{RestError, Result};
pub use route::{
    HttpMethod, RouteAnnotation, RouteDescriptor, RouteOptions, delete, get, post, put,
};

// Attribute macros live in the macro namespace, next to the functions above.
pub use rest_blueprint_macro::{controller, delete, get, post, put};

pub use axum;

/// Prelude module for convenient imports
///
/// ```
/// use rest_blueprint::prelude::*;
/// ```
pub mod prelude {
    pub use crate::blueprint::{
        Application, AxumApp, AxumBlueprint, AxumHandler, RouteDefaults, RouteGroup,
    };
    pub use crate::controller::{Controller, ControllerBuilder};
    pub use crate::error::{RestError, Result};
    pub use crate::route::{HttpMethod, RouteOptions};
    pub use crate::{controller, delete, get, post, put};
    pub use axum::{
        Extension, Json, Router,
        extract::{Path, Query, State},
        http::StatusCode,
        response::{IntoResponse, Response},
    };
}
