//! Postal code (CEP) lookup port
//!
//! Registration rules need to know whether a CEP exists and which state it
//! belongs to. The HTTP adapter against ViaCEP lives in
//! [`crate::adapters::viacep`]; the in-memory adapter below serves tests.

use async_trait::async_trait;
use core_kernel::DomainPort;
use serde::{Deserialize, Serialize};

/// Address data returned by a successful lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CepAddress {
    pub cep: String,
    pub street: String,
    pub district: String,
    pub city: String,
    /// Two-letter state code, e.g. "PR"
    pub uf: String,
}

/// Strips formatting from a CEP and validates its shape
///
/// Returns the 8-digit form, or `None` when the input does not contain
/// exactly eight digits.
pub fn normalize_cep(cep: &str) -> Option<String> {
    let digits: String = cep.chars().filter(char::is_ascii_digit).collect();
    (digits.len() == 8).then_some(digits)
}

/// Resolves postal codes to addresses
///
/// Lookup failures of any kind (malformed code, unknown code, transport
/// error) collapse to `None`; callers treat an unresolvable CEP as invalid.
#[async_trait]
pub trait CepLookup: DomainPort {
    async fn lookup(&self, cep: &str) -> Option<CepAddress>;

    /// True when the CEP resolves and its state matches `uf`
    /// (case-insensitive)
    async fn resolves_to_region(&self, cep: &str, uf: &str) -> bool {
        self.lookup(cep)
            .await
            .is_some_and(|address| address.uf.eq_ignore_ascii_case(uf))
    }
}

/// Static in-memory lookup for tests
pub mod memory {
    use std::collections::HashMap;

    use super::*;

    #[derive(Debug, Clone, Default)]
    pub struct StaticCepLookup {
        entries: HashMap<String, CepAddress>,
    }

    impl StaticCepLookup {
        pub fn new() -> Self {
            Self::default()
        }

        /// Registers a CEP resolving to the given state
        pub fn with_cep(mut self, cep: &str, uf: &str) -> Self {
            self.entries.insert(
                cep.to_string(),
                CepAddress {
                    cep: cep.to_string(),
                    street: String::new(),
                    district: String::new(),
                    city: String::new(),
                    uf: uf.to_string(),
                },
            );
            self
        }
    }

    impl DomainPort for StaticCepLookup {}

    #[async_trait]
    impl CepLookup for StaticCepLookup {
        async fn lookup(&self, cep: &str) -> Option<CepAddress> {
            let normalized = normalize_cep(cep)?;
            self.entries.get(&normalized).cloned()
        }
    }
}
