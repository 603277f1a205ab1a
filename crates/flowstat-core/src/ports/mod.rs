//! Ports - abstraction over the systems the engine talks to.
//!
//! The engine has a single port: the status provider it queries.

pub mod status_provider;

pub use self::status_provider::StatusProvider;
