//! Test Utilities Crate
//!
//! Shared test fixtures and builders for the registry test suite.
//!
//! # Modules
//!
//! - `fixtures`: postal codes, dates and a preloaded CEP lookup
//! - `builders`: builder patterns for test entity construction

pub mod builders;
pub mod fixtures;

pub use builders::*;
pub use fixtures::*;
