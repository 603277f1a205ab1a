//! Impls - port implementations for development, tests and the CLI.
//!
//! # Included
//! - **InMemoryStatusProvider**: answers from a `StatusSnapshot` held in memory

pub mod inmem_provider;

pub use self::inmem_provider::{InMemoryStatusProvider, StatusSnapshot};
