//! flowstat-core
//!
//! Status query engine for a dataflow runtime. A query such as
//! `processor:all:health,stats; systemdiagnostics:heap` is parsed, resolved
//! against a `StatusProvider`, and rendered into a bracketed text report.
//!
//! # Modules
//! - **domain**: status records, the query model and parser, errors
//! - **ports**: the `StatusProvider` trait
//! - **impls**: `InMemoryStatusProvider` backed by a `StatusSnapshot`
//! - **app**: resolver, facet renderer, report assembler, configuration

pub mod app;
pub mod domain;
pub mod impls;
pub mod ports;
