//! Routing module
//!
//! Maps request paths to movie endpoints. Method dispatch and id parsing
//! happen in the `api` module.

mod matcher;

pub use matcher::{match_path, Endpoint};
