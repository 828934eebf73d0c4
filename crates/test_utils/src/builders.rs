//! Test data builders
//!
//! Builders for constructing test entities with sensible defaults, so
//! tests only spell out the fields they care about.

use std::collections::HashSet;

use chrono::NaiveDate;
use core_kernel::{CompanyId, SupplierId};
use domain_registry::{Company, Supplier, SupplierKind};

use crate::fixtures::{birth_date_years_ago, CEP_SAO_PAULO};

/// Builder for test companies
pub struct CompanyBuilder {
    cnpj: String,
    trade_name: String,
    cep: String,
    supplier_ids: HashSet<SupplierId>,
}

impl Default for CompanyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CompanyBuilder {
    pub fn new() -> Self {
        Self {
            cnpj: "12345678000190".to_string(),
            trade_name: "Acme Ltda".to_string(),
            cep: CEP_SAO_PAULO.to_string(),
            supplier_ids: HashSet::new(),
        }
    }

    pub fn with_cnpj(mut self, cnpj: impl Into<String>) -> Self {
        self.cnpj = cnpj.into();
        self
    }

    pub fn with_trade_name(mut self, name: impl Into<String>) -> Self {
        self.trade_name = name.into();
        self
    }

    pub fn with_cep(mut self, cep: impl Into<String>) -> Self {
        self.cep = cep.into();
        self
    }

    pub fn with_supplier(mut self, id: SupplierId) -> Self {
        self.supplier_ids.insert(id);
        self
    }

    pub fn build(self) -> Company {
        let mut company = Company::new(self.cnpj, self.trade_name, self.cep);
        company.supplier_ids = self.supplier_ids;
        company
    }
}

/// Builder for test suppliers; defaults to a corporate supplier
pub struct SupplierBuilder {
    fiscal_id: String,
    name: String,
    email: String,
    cep: String,
    kind: SupplierKind,
    company_ids: HashSet<CompanyId>,
}

impl Default for SupplierBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SupplierBuilder {
    pub fn new() -> Self {
        Self {
            fiscal_id: "98765432000155".to_string(),
            name: "Fornecedora Geral".to_string(),
            email: "contact@fornecedora.com".to_string(),
            cep: CEP_SAO_PAULO.to_string(),
            kind: SupplierKind::Corporate,
            company_ids: HashSet::new(),
        }
    }

    pub fn with_fiscal_id(mut self, fiscal_id: impl Into<String>) -> Self {
        self.fiscal_id = fiscal_id.into();
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    pub fn with_cep(mut self, cep: impl Into<String>) -> Self {
        self.cep = cep.into();
        self
    }

    pub fn corporate(mut self) -> Self {
        self.kind = SupplierKind::Corporate;
        self
    }

    /// Switches to an individual supplier with the given birth date
    pub fn individual(mut self, birth_date: Option<NaiveDate>) -> Self {
        self.kind = SupplierKind::Individual {
            government_id: "123456789".to_string(),
            birth_date,
        };
        self
    }

    /// An individual who is comfortably of age
    pub fn adult(self) -> Self {
        self.individual(Some(birth_date_years_ago(30)))
    }

    /// An individual under the minimum age
    pub fn minor(self) -> Self {
        self.individual(Some(birth_date_years_ago(16)))
    }

    pub fn with_company(mut self, id: CompanyId) -> Self {
        self.company_ids.insert(id);
        self
    }

    pub fn build(self) -> Supplier {
        let mut supplier = Supplier::new(
            self.fiscal_id,
            self.name,
            self.email,
            self.cep,
            self.kind,
        );
        supplier.company_ids = self.company_ids;
        supplier
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_company_builder_defaults() {
        let company = CompanyBuilder::new().build();
        assert_eq!(company.cnpj.len(), 14);
        assert!(company.supplier_ids.is_empty());
    }

    #[test]
    fn test_supplier_builder_age_presets() {
        let adult = SupplierBuilder::new().adult().build();
        assert!(adult.age().unwrap() >= 18);

        let minor = SupplierBuilder::new().minor().build();
        assert!(minor.age().unwrap() < 18);

        let corporate = SupplierBuilder::new().build();
        assert_eq!(corporate.age(), None);
    }
}
