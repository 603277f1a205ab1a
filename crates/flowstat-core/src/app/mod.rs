//! App - evaluates status queries against a `StatusProvider`.
//!
//! # Components
//! - **ReporterConfig**: tunables for the reporter
//! - **Resolver**: target -> status records, with per-query id lookup tables
//! - **FacetRenderer**: record + facets -> text fragments
//! - **StatusReporter**: query -> report string, one block per item

pub mod config;
pub mod render;
pub mod report;
pub mod resolver;

pub use self::config::{ReporterConfig, UnknownKindPolicy};
pub use self::render::FacetRenderer;
pub use self::report::{EMPTY_REQUEST_MESSAGE, PROVIDER_UNAVAILABLE_MESSAGE, StatusReporter};
pub use self::resolver::{Resolver, StatusRecord};
