//! Outbound adapters backed by external services

pub mod viacep;
