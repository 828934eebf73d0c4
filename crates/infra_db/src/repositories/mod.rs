//! Store adapters backed by PostgreSQL

pub mod company;
pub mod supplier;

pub use company::CompanyRepository;
pub use supplier::SupplierRepository;
