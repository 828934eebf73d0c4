//! Registry services
//!
//! The services own the save pipelines: every rule is checked before the
//! first write, then the owning side is persisted and the synchronizer
//! brings the opposite side of the relationship in line.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use core_kernel::{CompanyId, Page, PageRequest, SupplierId};

use crate::cep::CepLookup;
use crate::company::Company;
use crate::error::RegistryError;
use crate::ports::{CompanyStore, SupplierFilter, SupplierStore};
use crate::supplier::Supplier;
use crate::sync::RelationshipSync;
use crate::validation;

/// Company use cases: lookup, listing, save with relationship sync, delete
#[derive(Clone)]
pub struct CompanyService {
    companies: Arc<dyn CompanyStore>,
    cep: Arc<dyn CepLookup>,
    sync: RelationshipSync,
}

impl CompanyService {
    pub fn new(
        companies: Arc<dyn CompanyStore>,
        suppliers: Arc<dyn SupplierStore>,
        cep: Arc<dyn CepLookup>,
    ) -> Self {
        let sync = RelationshipSync::new(companies.clone(), suppliers);
        Self {
            companies,
            cep,
            sync,
        }
    }

    pub async fn get(&self, id: CompanyId) -> Result<Company, RegistryError> {
        self.companies
            .find_by_id(id)
            .await?
            .ok_or_else(|| RegistryError::not_found("Company", id))
    }

    pub async fn list_all(&self) -> Result<Vec<Company>, RegistryError> {
        Ok(self.companies.find_all().await?)
    }

    /// Creates or updates a company, rewiring its supplier links
    ///
    /// `desired_suppliers` is the complete set of suppliers the company
    /// should be linked to after this call; links absent from it are
    /// removed. All rules are checked before anything is persisted.
    pub async fn save(
        &self,
        mut company: Company,
        desired_suppliers: HashSet<SupplierId>,
    ) -> Result<Company, RegistryError> {
        validation::ensure_cep_resolves(self.cep.as_ref(), &company.cep).await?;
        validation::ensure_unique_cnpj(self.companies.as_ref(), &company).await?;
        let resolved = self.sync.resolve_suppliers(&desired_suppliers).await?;

        let previous = self
            .companies
            .find_by_id(company.id)
            .await?
            .map(|existing| existing.supplier_ids)
            .unwrap_or_default();

        company.supplier_ids = resolved.iter().map(|supplier| supplier.id).collect();
        company.updated_at = Utc::now();
        let saved = self.companies.save(&company).await?;
        self.sync.reconcile_company(&saved, &previous).await?;

        tracing::info!(id = %saved.id, cnpj = %saved.cnpj, "company saved");
        Ok(saved)
    }

    /// Deletes a company after detaching it from every linked supplier
    pub async fn delete(&self, id: CompanyId) -> Result<(), RegistryError> {
        let company = self.get(id).await?;
        self.sync.detach_company(&company).await?;
        self.companies.delete(id).await?;
        tracing::info!(%id, "company deleted");
        Ok(())
    }
}

/// Supplier use cases: lookup, filtered listing, save with relationship
/// sync and eligibility checks, delete
#[derive(Clone)]
pub struct SupplierService {
    suppliers: Arc<dyn SupplierStore>,
    cep: Arc<dyn CepLookup>,
    sync: RelationshipSync,
}

impl SupplierService {
    pub fn new(
        companies: Arc<dyn CompanyStore>,
        suppliers: Arc<dyn SupplierStore>,
        cep: Arc<dyn CepLookup>,
    ) -> Self {
        let sync = RelationshipSync::new(companies, suppliers.clone());
        Self {
            suppliers,
            cep,
            sync,
        }
    }

    pub async fn get(&self, id: SupplierId) -> Result<Supplier, RegistryError> {
        self.suppliers
            .find_by_id(id)
            .await?
            .ok_or_else(|| RegistryError::not_found("Supplier", id))
    }

    pub async fn list(
        &self,
        filter: SupplierFilter,
        page: PageRequest,
    ) -> Result<Page<Supplier>, RegistryError> {
        Ok(self.suppliers.list(&filter, page).await?)
    }

    /// Creates or updates a supplier, rewiring its company links
    ///
    /// On updates the supplier kind must stay what it was; individuals
    /// under the minimum age (or with an unknown age) cannot be linked to
    /// companies in the restricted state. All rules are checked before
    /// anything is persisted.
    pub async fn save(
        &self,
        mut supplier: Supplier,
        desired_companies: HashSet<CompanyId>,
    ) -> Result<Supplier, RegistryError> {
        validation::ensure_cep_resolves(self.cep.as_ref(), &supplier.cep).await?;
        validation::ensure_unique_fiscal_id(self.suppliers.as_ref(), &supplier).await?;
        validation::ensure_unique_email(self.suppliers.as_ref(), &supplier).await?;

        let existing = self.suppliers.find_by_id(supplier.id).await?;
        if let Some(existing) = &existing {
            if !existing.kind.matches(&supplier.kind) {
                return Err(RegistryError::business_rule(format!(
                    "Supplier kind cannot change from {} to {}",
                    existing.kind.label(),
                    supplier.kind.label()
                )));
            }
        }

        let resolved = self.sync.resolve_companies(&desired_companies).await?;
        validation::ensure_age_eligibility(self.cep.as_ref(), &supplier, &resolved).await?;

        let previous = existing
            .map(|existing| existing.company_ids)
            .unwrap_or_default();

        supplier.company_ids = resolved.iter().map(|company| company.id).collect();
        supplier.updated_at = Utc::now();
        let saved = self.suppliers.save(&supplier).await?;
        self.sync.reconcile_supplier(&saved, &previous).await?;

        tracing::info!(id = %saved.id, fiscal_id = %saved.fiscal_id, "supplier saved");
        Ok(saved)
    }

    /// Deletes a supplier after detaching it from every linked company
    pub async fn delete(&self, id: SupplierId) -> Result<(), RegistryError> {
        let supplier = self.get(id).await?;
        self.sync.detach_supplier(&supplier).await?;
        self.suppliers.delete(id).await?;
        tracing::info!(%id, "supplier deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cep::memory::StaticCepLookup;
    use crate::ports::memory::{InMemoryCompanyStore, InMemorySupplierStore};
    use crate::supplier::SupplierKind;
    use chrono::{Datelike, NaiveDate, Utc};

    struct Fixture {
        companies: Arc<InMemoryCompanyStore>,
        suppliers: Arc<InMemorySupplierStore>,
        company_service: CompanyService,
        supplier_service: SupplierService,
    }

    fn fixture() -> Fixture {
        let companies = Arc::new(InMemoryCompanyStore::new());
        let suppliers = Arc::new(InMemorySupplierStore::new());
        let cep: Arc<dyn CepLookup> = Arc::new(
            StaticCepLookup::new()
                .with_cep("80010000", "PR")
                .with_cep("01001000", "SP"),
        );
        Fixture {
            company_service: CompanyService::new(
                companies.clone(),
                suppliers.clone(),
                cep.clone(),
            ),
            supplier_service: SupplierService::new(
                companies.clone(),
                suppliers.clone(),
                cep,
            ),
            companies,
            suppliers,
        }
    }

    fn corporate(fiscal_id: &str, email: &str) -> Supplier {
        Supplier::new(fiscal_id, "Supplier", email, "01001000", SupplierKind::Corporate)
    }

    fn birth_years_ago(years: i32) -> NaiveDate {
        let today = Utc::now().date_naive();
        NaiveDate::from_ymd_opt(today.year() - years, 1, 1).unwrap()
    }

    #[tokio::test]
    async fn test_save_company_links_both_sides() {
        let fx = fixture();
        let supplier = corporate("11111111000111", "a@x.com");
        fx.suppliers.save(&supplier).await.unwrap();

        let company = Company::new("12345678000190", "Acme", "01001000");
        let saved = fx
            .company_service
            .save(company, [supplier.id].into_iter().collect())
            .await
            .unwrap();

        assert!(saved.has_supplier(supplier.id));
        let supplier = fx.suppliers.find_by_id(supplier.id).await.unwrap().unwrap();
        assert!(supplier.has_company(saved.id));
    }

    #[tokio::test]
    async fn test_save_company_unknown_supplier_persists_nothing() {
        let fx = fixture();
        let company = Company::new("12345678000190", "Acme", "01001000");
        let ghost = SupplierId::new_v7();

        let error = fx
            .company_service
            .save(company, [ghost].into_iter().collect())
            .await
            .unwrap_err();

        assert!(matches!(error, RegistryError::RelatedNotFound { .. }));
        assert!(fx.companies.is_empty().await);
    }

    #[tokio::test]
    async fn test_save_company_invalid_cep_persists_nothing() {
        let fx = fixture();
        let company = Company::new("12345678000190", "Acme", "99999999");

        let error = fx
            .company_service
            .save(company, HashSet::new())
            .await
            .unwrap_err();

        assert!(error.is_business_rule());
        assert!(fx.companies.is_empty().await);
    }

    #[tokio::test]
    async fn test_save_company_duplicate_cnpj_rejected() {
        let fx = fixture();
        let first = Company::new("12345678000190", "Acme", "01001000");
        fx.company_service
            .save(first, HashSet::new())
            .await
            .unwrap();

        let duplicate = Company::new("12345678000190", "Clone", "01001000");
        let error = fx
            .company_service
            .save(duplicate, HashSet::new())
            .await
            .unwrap_err();
        assert!(error.is_business_rule());
    }

    #[tokio::test]
    async fn test_update_company_keeps_own_cnpj() {
        let fx = fixture();
        let company = Company::new("12345678000190", "Acme", "01001000");
        let mut saved = fx
            .company_service
            .save(company, HashSet::new())
            .await
            .unwrap();

        saved.trade_name = "Acme Renamed".into();
        let updated = fx
            .company_service
            .save(saved, HashSet::new())
            .await
            .unwrap();
        assert_eq!(updated.trade_name, "Acme Renamed");
    }

    #[tokio::test]
    async fn test_update_company_unlinks_dropped_suppliers() {
        let fx = fixture();
        let keep = corporate("11111111000111", "keep@x.com");
        let drop = corporate("22222222000122", "drop@x.com");
        fx.suppliers.save(&keep).await.unwrap();
        fx.suppliers.save(&drop).await.unwrap();

        let company = Company::new("12345678000190", "Acme", "01001000");
        let saved = fx
            .company_service
            .save(company, [keep.id, drop.id].into_iter().collect())
            .await
            .unwrap();

        let updated = fx
            .company_service
            .save(saved, [keep.id].into_iter().collect())
            .await
            .unwrap();

        assert!(updated.has_supplier(keep.id));
        assert!(!updated.has_supplier(drop.id));
        let dropped = fx.suppliers.find_by_id(drop.id).await.unwrap().unwrap();
        assert!(!dropped.has_company(updated.id));
    }

    #[tokio::test]
    async fn test_delete_company_clears_supplier_side() {
        let fx = fixture();
        let supplier = corporate("11111111000111", "a@x.com");
        fx.suppliers.save(&supplier).await.unwrap();

        let company = Company::new("12345678000190", "Acme", "01001000");
        let saved = fx
            .company_service
            .save(company, [supplier.id].into_iter().collect())
            .await
            .unwrap();

        fx.company_service.delete(saved.id).await.unwrap();

        assert!(fx.companies.is_empty().await);
        let supplier = fx.suppliers.find_by_id(supplier.id).await.unwrap().unwrap();
        assert!(!supplier.has_company(saved.id));
    }

    #[tokio::test]
    async fn test_delete_missing_company_is_not_found() {
        let fx = fixture();
        let error = fx
            .company_service
            .delete(CompanyId::new_v7())
            .await
            .unwrap_err();
        assert!(matches!(error, RegistryError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_save_supplier_links_both_sides() {
        let fx = fixture();
        let company = Company::new("12345678000190", "Acme", "01001000");
        fx.companies.save(&company).await.unwrap();

        let supplier = corporate("11111111000111", "a@x.com");
        let saved = fx
            .supplier_service
            .save(supplier, [company.id].into_iter().collect())
            .await
            .unwrap();

        assert!(saved.has_company(company.id));
        let company = fx.companies.find_by_id(company.id).await.unwrap().unwrap();
        assert!(company.has_supplier(saved.id));
    }

    #[tokio::test]
    async fn test_supplier_kind_change_rejected_and_nothing_written() {
        let fx = fixture();
        let supplier = Supplier::new(
            "12345678901",
            "Maria Silva",
            "maria@x.com",
            "01001000",
            SupplierKind::Individual {
                government_id: "123456789".into(),
                birth_date: Some(birth_years_ago(30)),
            },
        );
        let saved = fx
            .supplier_service
            .save(supplier, HashSet::new())
            .await
            .unwrap();

        let mut mutated = saved.clone();
        mutated.kind = SupplierKind::Corporate;
        mutated.name = "Should Not Persist".into();
        let error = fx
            .supplier_service
            .save(mutated, HashSet::new())
            .await
            .unwrap_err();
        assert!(error.is_business_rule());

        let stored = fx.suppliers.find_by_id(saved.id).await.unwrap().unwrap();
        assert_eq!(stored.name, "Maria Silva");
        assert!(stored.kind.is_individual());
    }

    #[tokio::test]
    async fn test_minor_cannot_link_to_restricted_state_company() {
        let fx = fixture();
        let parana = Company::new("12345678000190", "Curitiba Co", "80010000");
        fx.companies.save(&parana).await.unwrap();

        let minor = Supplier::new(
            "12345678901",
            "Joao",
            "joao@x.com",
            "01001000",
            SupplierKind::Individual {
                government_id: "123456789".into(),
                birth_date: Some(birth_years_ago(16)),
            },
        );
        let error = fx
            .supplier_service
            .save(minor, [parana.id].into_iter().collect())
            .await
            .unwrap_err();
        assert!(error.is_business_rule());
        assert!(fx.suppliers.is_empty().await);
    }

    #[tokio::test]
    async fn test_unknown_birth_date_blocked_like_a_minor() {
        let fx = fixture();
        let parana = Company::new("12345678000190", "Curitiba Co", "80010000");
        fx.companies.save(&parana).await.unwrap();

        let unknown = Supplier::new(
            "12345678901",
            "Joao",
            "joao@x.com",
            "01001000",
            SupplierKind::Individual {
                government_id: "123456789".into(),
                birth_date: None,
            },
        );
        let error = fx
            .supplier_service
            .save(unknown, [parana.id].into_iter().collect())
            .await
            .unwrap_err();
        assert!(error.is_business_rule());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let fx = fixture();
        let first = corporate("11111111000111", "same@x.com");
        fx.supplier_service
            .save(first, HashSet::new())
            .await
            .unwrap();

        let second = corporate("22222222000122", "same@x.com");
        let error = fx
            .supplier_service
            .save(second, HashSet::new())
            .await
            .unwrap_err();
        assert!(error.is_business_rule());
    }

    #[tokio::test]
    async fn test_delete_supplier_clears_company_side() {
        let fx = fixture();
        let company = Company::new("12345678000190", "Acme", "01001000");
        fx.companies.save(&company).await.unwrap();

        let supplier = corporate("11111111000111", "a@x.com");
        let saved = fx
            .supplier_service
            .save(supplier, [company.id].into_iter().collect())
            .await
            .unwrap();

        fx.supplier_service.delete(saved.id).await.unwrap();

        assert!(fx.suppliers.is_empty().await);
        let company = fx.companies.find_by_id(company.id).await.unwrap().unwrap();
        assert!(!company.has_supplier(saved.id));
    }

    #[tokio::test]
    async fn test_list_suppliers_by_name_prefix() {
        let fx = fixture();
        for (fiscal, name, email) in [
            ("11111111000111", "Alpha Parts", "a@x.com"),
            ("22222222000122", "alphabet Supply", "b@x.com"),
            ("33333333000133", "Beta Goods", "c@x.com"),
        ] {
            let supplier = Supplier::new(fiscal, name, email, "01001000", SupplierKind::Corporate);
            fx.supplier_service
                .save(supplier, HashSet::new())
                .await
                .unwrap();
        }

        let page = fx
            .supplier_service
            .list(
                SupplierFilter {
                    name_prefix: Some("Alpha".into()),
                    ..Default::default()
                },
                PageRequest::default(),
            )
            .await
            .unwrap();
        assert_eq!(page.total, 2);
    }
}
