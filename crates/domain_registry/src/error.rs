//! Registry domain errors

use core_kernel::StoreError;
use thiserror::Error;
use uuid::Uuid;

/// Errors surfaced by the registry services
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The entity a request targets does not exist
    #[error("{entity} not found with id {id}")]
    NotFound { entity: &'static str, id: String },

    /// A request referenced related entities that do not exist; `ids`
    /// holds exactly the unknown subset, sorted
    #[error("{entity} not found for ids {ids:?}")]
    RelatedNotFound { entity: &'static str, ids: Vec<Uuid> },

    /// A domain rule was violated (uniqueness, postal code, eligibility)
    #[error("{0}")]
    BusinessRule(String),

    /// The underlying store failed
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl RegistryError {
    pub fn not_found(entity: &'static str, id: impl std::fmt::Display) -> Self {
        RegistryError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn related_not_found(entity: &'static str, mut ids: Vec<Uuid>) -> Self {
        ids.sort();
        RegistryError::RelatedNotFound { entity, ids }
    }

    pub fn business_rule(message: impl Into<String>) -> Self {
        RegistryError::BusinessRule(message.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            RegistryError::NotFound { .. } | RegistryError::RelatedNotFound { .. }
        )
    }

    pub fn is_business_rule(&self) -> bool {
        matches!(self, RegistryError::BusinessRule(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_related_not_found_sorts_ids() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let error = RegistryError::related_not_found("Supplier", vec![a.max(b), a.min(b)]);
        match error {
            RegistryError::RelatedNotFound { ids, .. } => {
                assert_eq!(ids, vec![a.min(b), a.max(b)]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_store_error_converts() {
        let error: RegistryError = StoreError::conflict("duplicate cnpj").into();
        assert!(!error.is_business_rule());
        assert!(error.to_string().contains("duplicate cnpj"));
    }
}
