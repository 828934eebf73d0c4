//! Relationship synchronizer
//!
//! Companies and suppliers each persist their own side of the many-to-many
//! relationship. After either side is saved, the synchronizer reconciles the
//! opposite side so that `supplier in company.supplier_ids` iff
//! `company in supplier.company_ids`. Reconciliation runs as individual
//! saves after the owning side is persisted; a crash in between can leave
//! the sides briefly divergent until the next save of either entity.

use std::collections::HashSet;
use std::sync::Arc;

use core_kernel::{CompanyId, SupplierId};
use uuid::Uuid;

use crate::company::Company;
use crate::error::RegistryError;
use crate::ports::{CompanyStore, SupplierStore};
use crate::supplier::Supplier;

#[derive(Clone)]
pub struct RelationshipSync {
    companies: Arc<dyn CompanyStore>,
    suppliers: Arc<dyn SupplierStore>,
}

impl RelationshipSync {
    pub fn new(companies: Arc<dyn CompanyStore>, suppliers: Arc<dyn SupplierStore>) -> Self {
        Self {
            companies,
            suppliers,
        }
    }

    /// Loads every supplier in `ids`, failing with the exact unknown subset
    pub async fn resolve_suppliers(
        &self,
        ids: &HashSet<SupplierId>,
    ) -> Result<Vec<Supplier>, RegistryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let found = self.suppliers.find_all_by_ids(ids).await?;
        if found.len() != ids.len() {
            let found_ids: HashSet<SupplierId> = found.iter().map(|s| s.id).collect();
            let missing: Vec<Uuid> = ids
                .difference(&found_ids)
                .map(|id| *id.as_uuid())
                .collect();
            return Err(RegistryError::related_not_found("Supplier", missing));
        }
        Ok(found)
    }

    /// Loads every company in `ids`, failing with the exact unknown subset
    pub async fn resolve_companies(
        &self,
        ids: &HashSet<CompanyId>,
    ) -> Result<Vec<Company>, RegistryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let found = self.companies.find_all_by_ids(ids).await?;
        if found.len() != ids.len() {
            let found_ids: HashSet<CompanyId> = found.iter().map(|c| c.id).collect();
            let missing: Vec<Uuid> = ids
                .difference(&found_ids)
                .map(|id| *id.as_uuid())
                .collect();
            return Err(RegistryError::related_not_found("Company", missing));
        }
        Ok(found)
    }

    /// Brings supplier back-references in line with a just-saved company
    ///
    /// `previous` is the supplier set the company carried before this save;
    /// suppliers dropped from it lose their back-reference, suppliers in the
    /// new set gain one. Both directions are idempotent.
    pub async fn reconcile_company(
        &self,
        saved: &Company,
        previous: &HashSet<SupplierId>,
    ) -> Result<(), RegistryError> {
        for supplier_id in previous.difference(&saved.supplier_ids) {
            if let Some(mut supplier) = self.suppliers.find_by_id(*supplier_id).await? {
                if supplier.remove_company(saved.id) {
                    self.suppliers.save(&supplier).await?;
                }
            }
        }
        for supplier_id in &saved.supplier_ids {
            if let Some(mut supplier) = self.suppliers.find_by_id(*supplier_id).await? {
                if supplier.add_company(saved.id) {
                    self.suppliers.save(&supplier).await?;
                }
            }
        }
        Ok(())
    }

    /// Brings company back-references in line with a just-saved supplier
    pub async fn reconcile_supplier(
        &self,
        saved: &Supplier,
        previous: &HashSet<CompanyId>,
    ) -> Result<(), RegistryError> {
        for company_id in previous.difference(&saved.company_ids) {
            if let Some(mut company) = self.companies.find_by_id(*company_id).await? {
                if company.remove_supplier(saved.id) {
                    self.companies.save(&company).await?;
                }
            }
        }
        for company_id in &saved.company_ids {
            if let Some(mut company) = self.companies.find_by_id(*company_id).await? {
                if company.add_supplier(saved.id) {
                    self.companies.save(&company).await?;
                }
            }
        }
        Ok(())
    }

    /// Removes a company from every supplier that references it, ahead of
    /// deleting the company itself
    pub async fn detach_company(&self, company: &Company) -> Result<(), RegistryError> {
        for supplier_id in &company.supplier_ids {
            if let Some(mut supplier) = self.suppliers.find_by_id(*supplier_id).await? {
                if supplier.remove_company(company.id) {
                    self.suppliers.save(&supplier).await?;
                }
            }
        }
        Ok(())
    }

    /// Removes a supplier from every company that references it, ahead of
    /// deleting the supplier itself
    pub async fn detach_supplier(&self, supplier: &Supplier) -> Result<(), RegistryError> {
        for company_id in &supplier.company_ids {
            if let Some(mut company) = self.companies.find_by_id(*company_id).await? {
                if company.remove_supplier(supplier.id) {
                    self.companies.save(&company).await?;
                }
            }
        }
        Ok(())
    }
}
