//! Registry domain - companies, suppliers and the rules that bind them
//!
//! The domain keeps a bidirectional many-to-many relationship between
//! companies and suppliers consistent across saves and deletes, and
//! enforces the registration rules: unique registry numbers, postal codes
//! that resolve through a CEP lookup service, and age eligibility for
//! individual suppliers of companies in the restricted state.

pub mod adapters;
pub mod cep;
pub mod company;
pub mod error;
pub mod ports;
pub mod services;
pub mod supplier;
pub mod sync;
pub mod validation;

pub use cep::{CepAddress, CepLookup};
pub use company::Company;
pub use error::RegistryError;
pub use ports::{CompanyStore, SupplierFilter, SupplierStore};
pub use services::{CompanyService, SupplierService};
pub use supplier::{Supplier, SupplierKind};
pub use sync::RelationshipSync;
