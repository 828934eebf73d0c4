//! Company DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use domain_registry::Company;

use crate::dto::require_digits;
use crate::error::ApiError;

/// Body for creating and updating companies
#[derive(Debug, Deserialize, Validate)]
pub struct CompanyRequest {
    /// 14-digit national company registry number
    #[validate(length(equal = 14))]
    pub cnpj: String,
    #[validate(length(min = 1, max = 255))]
    pub trade_name: String,
    /// 8-digit postal code
    #[validate(length(equal = 8))]
    pub cep: String,
    /// Complete set of supplier ids this company should be linked to
    #[serde(default)]
    pub supplier_ids: Vec<Uuid>,
}

impl CompanyRequest {
    /// Validates the request shape beyond what the derive covers
    pub fn check(&self) -> Result<(), ApiError> {
        self.validate()?;
        require_digits("cnpj", &self.cnpj)?;
        require_digits("cep", &self.cep)?;
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct CompanyResponse {
    pub id: Uuid,
    pub cnpj: String,
    pub trade_name: String,
    pub cep: String,
    pub supplier_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Company> for CompanyResponse {
    fn from(company: Company) -> Self {
        let mut supplier_ids: Vec<Uuid> = company
            .supplier_ids
            .iter()
            .map(|id| *id.as_uuid())
            .collect();
        supplier_ids.sort();
        Self {
            id: *company.id.as_uuid(),
            cnpj: company.cnpj,
            trade_name: company.trade_name,
            cep: company.cep,
            supplier_ids,
            created_at: company.created_at,
            updated_at: company.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> CompanyRequest {
        CompanyRequest {
            cnpj: "12345678000190".into(),
            trade_name: "Acme Ltda".into(),
            cep: "80010000".into(),
            supplier_ids: vec![],
        }
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(valid_request().check().is_ok());
    }

    #[test]
    fn test_short_cnpj_rejected() {
        let mut request = valid_request();
        request.cnpj = "1234567800019".into();
        assert!(request.check().is_err());
    }

    #[test]
    fn test_formatted_cep_rejected() {
        let mut request = valid_request();
        request.cep = "80010-00".into();
        assert!(request.check().is_err());
    }

    #[test]
    fn test_response_sorts_supplier_ids() {
        let mut company = Company::new("12345678000190", "Acme", "80010000");
        for _ in 0..3 {
            company.add_supplier(core_kernel::SupplierId::new());
        }
        let response = CompanyResponse::from(company);
        let mut sorted = response.supplier_ids.clone();
        sorted.sort();
        assert_eq!(response.supplier_ids, sorted);
    }
}
