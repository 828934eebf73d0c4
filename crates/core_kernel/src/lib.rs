//! Core Kernel - Foundational types for the registry system
//!
//! This crate provides the fundamental building blocks used across all domain modules:
//! - Strongly-typed entity identifiers
//! - The shared port error type all store adapters return
//! - Pagination primitives for list endpoints

pub mod identifiers;
pub mod page;
pub mod ports;

pub use identifiers::{CompanyId, SupplierId};
pub use page::{Page, PageRequest};
pub use ports::{DomainPort, StoreError};
