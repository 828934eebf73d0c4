//! Supplier DTOs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use domain_registry::{Supplier, SupplierKind};

use crate::dto::require_digits;
use crate::error::ApiError;

/// Supplier variant on the wire
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SupplierKindDto {
    Individual {
        government_id: String,
        #[serde(default)]
        birth_date: Option<NaiveDate>,
    },
    Corporate,
}

impl From<SupplierKindDto> for SupplierKind {
    fn from(dto: SupplierKindDto) -> Self {
        match dto {
            SupplierKindDto::Individual {
                government_id,
                birth_date,
            } => SupplierKind::Individual {
                government_id,
                birth_date,
            },
            SupplierKindDto::Corporate => SupplierKind::Corporate,
        }
    }
}

impl From<SupplierKind> for SupplierKindDto {
    fn from(kind: SupplierKind) -> Self {
        match kind {
            SupplierKind::Individual {
                government_id,
                birth_date,
            } => SupplierKindDto::Individual {
                government_id,
                birth_date,
            },
            SupplierKind::Corporate => SupplierKindDto::Corporate,
        }
    }
}

/// Body for creating and updating suppliers
#[derive(Debug, Deserialize, Validate)]
pub struct SupplierRequest {
    /// Taxpayer number: 11 digits for individuals, 14 for corporate entities
    #[validate(length(min = 11, max = 14))]
    pub fiscal_id: String,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    /// 8-digit postal code
    #[validate(length(equal = 8))]
    pub cep: String,
    pub kind: SupplierKindDto,
    /// Complete set of company ids this supplier should be linked to
    #[serde(default)]
    pub company_ids: Vec<Uuid>,
}

impl SupplierRequest {
    /// Validates the request shape beyond what the derive covers
    pub fn check(&self) -> Result<(), ApiError> {
        self.validate()?;
        require_digits("fiscal_id", &self.fiscal_id)?;
        require_digits("cep", &self.cep)?;
        if let SupplierKindDto::Individual { government_id, .. } = &self.kind {
            if government_id.trim().is_empty() {
                return Err(ApiError::BadRequest(
                    "government_id is required for individual suppliers".into(),
                ));
            }
        }
        Ok(())
    }
}

/// Query parameters for the supplier listing endpoint
#[derive(Debug, Default, Deserialize)]
pub struct SupplierListQuery {
    /// Case-insensitive name prefix
    pub name: Option<String>,
    /// Fiscal id prefix
    pub fiscal_id: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct SupplierResponse {
    pub id: Uuid,
    pub fiscal_id: String,
    pub name: String,
    pub email: String,
    pub cep: String,
    #[serde(flatten)]
    pub kind: SupplierKindDto,
    pub company_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Supplier> for SupplierResponse {
    fn from(supplier: Supplier) -> Self {
        let mut company_ids: Vec<Uuid> = supplier
            .company_ids
            .iter()
            .map(|id| *id.as_uuid())
            .collect();
        company_ids.sort();
        Self {
            id: *supplier.id.as_uuid(),
            fiscal_id: supplier.fiscal_id,
            name: supplier.name,
            email: supplier.email,
            cep: supplier.cep,
            kind: supplier.kind.into(),
            company_ids,
            created_at: supplier.created_at,
            updated_at: supplier.updated_at,
        }
    }
}
