mod error;
mod forward;
pub mod http;
mod link;
mod options;
mod record;
mod route;
mod service;
mod upstream;
mod validate;

pub use error::{MAX_BODY_BYTES, ProxyError};
pub use forward::forward;
pub use http::{HEALTH_TEXT, ProxyHttp};
pub use link::{LinkedField, ensure_linked_record, eq_formula};
pub use options::{FieldOptions, fetch_field_options};
pub use record::{Record, Submission};
pub use route::{CATEGORY_LINK, ROUTES, ResourceRoute, route_for};
pub use service::ProxyService;
pub use upstream::Upstream;
pub use validate::{Invalid, ValidationError, validate_fields};
