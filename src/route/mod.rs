//! Route annotations and the descriptors they produce.

mod annotation;
mod descriptor;
mod method;
mod options;

pub use annotation::{RouteAnnotation, delete, get, post, put};
pub use descriptor::{RouteDescriptor, RouteParts};
pub use method::HttpMethod;
pub use options::{RESERVED_EXTRA_KEYS, RouteOptions};
