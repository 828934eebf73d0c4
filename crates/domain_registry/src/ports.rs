//! Store ports for the registry domain
//!
//! Each entity gets its own async store trait; the PostgreSQL adapters live
//! in `infra_db`, and the in-memory adapters below back unit tests and local
//! development without a database.

use std::collections::HashSet;

use async_trait::async_trait;
use core_kernel::{CompanyId, DomainPort, Page, PageRequest, StoreError, SupplierId};

use crate::company::Company;
use crate::supplier::Supplier;

/// Filters for supplier listing; both prefixes are optional and combined
/// with AND when present
#[derive(Debug, Clone, Default)]
pub struct SupplierFilter {
    /// Case-insensitive prefix on the supplier name
    pub name_prefix: Option<String>,
    /// Prefix on the fiscal id
    pub fiscal_id_prefix: Option<String>,
}

impl SupplierFilter {
    pub fn matches(&self, supplier: &Supplier) -> bool {
        if let Some(prefix) = &self.name_prefix {
            let name = supplier.name.to_lowercase();
            if !name.starts_with(&prefix.to_lowercase()) {
                return false;
            }
        }
        if let Some(prefix) = &self.fiscal_id_prefix {
            if !supplier.fiscal_id.starts_with(prefix.as_str()) {
                return false;
            }
        }
        true
    }
}

/// Persistence port for companies
#[async_trait]
pub trait CompanyStore: DomainPort {
    async fn find_by_id(&self, id: CompanyId) -> Result<Option<Company>, StoreError>;

    async fn find_by_cnpj(&self, cnpj: &str) -> Result<Option<Company>, StoreError>;

    /// Fetches every company whose id is in `ids`; unknown ids are simply
    /// absent from the result
    async fn find_all_by_ids(&self, ids: &HashSet<CompanyId>) -> Result<Vec<Company>, StoreError>;

    async fn find_all(&self) -> Result<Vec<Company>, StoreError>;

    /// Inserts or fully replaces the company, including its supplier links
    async fn save(&self, company: &Company) -> Result<Company, StoreError>;

    async fn delete(&self, id: CompanyId) -> Result<(), StoreError>;
}

/// Persistence port for suppliers
#[async_trait]
pub trait SupplierStore: DomainPort {
    async fn find_by_id(&self, id: SupplierId) -> Result<Option<Supplier>, StoreError>;

    async fn find_by_fiscal_id(&self, fiscal_id: &str) -> Result<Option<Supplier>, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Supplier>, StoreError>;

    /// Fetches every supplier whose id is in `ids`; unknown ids are simply
    /// absent from the result
    async fn find_all_by_ids(&self, ids: &HashSet<SupplierId>)
        -> Result<Vec<Supplier>, StoreError>;

    /// Lists suppliers matching `filter`, ordered by name, paginated
    async fn list(
        &self,
        filter: &SupplierFilter,
        page: PageRequest,
    ) -> Result<Page<Supplier>, StoreError>;

    /// Inserts or fully replaces the supplier, including its company links
    async fn save(&self, supplier: &Supplier) -> Result<Supplier, StoreError>;

    async fn delete(&self, id: SupplierId) -> Result<(), StoreError>;
}

/// In-memory adapters for tests and local runs
pub mod memory {
    use std::collections::HashMap;
    use std::sync::Arc;

    use tokio::sync::RwLock;

    use super::*;

    #[derive(Debug, Clone, Default)]
    pub struct InMemoryCompanyStore {
        rows: Arc<RwLock<HashMap<CompanyId, Company>>>,
    }

    impl InMemoryCompanyStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub async fn len(&self) -> usize {
            self.rows.read().await.len()
        }

        pub async fn is_empty(&self) -> bool {
            self.rows.read().await.is_empty()
        }
    }

    impl DomainPort for InMemoryCompanyStore {}

    #[async_trait]
    impl CompanyStore for InMemoryCompanyStore {
        async fn find_by_id(&self, id: CompanyId) -> Result<Option<Company>, StoreError> {
            Ok(self.rows.read().await.get(&id).cloned())
        }

        async fn find_by_cnpj(&self, cnpj: &str) -> Result<Option<Company>, StoreError> {
            Ok(self
                .rows
                .read()
                .await
                .values()
                .find(|company| company.cnpj == cnpj)
                .cloned())
        }

        async fn find_all_by_ids(
            &self,
            ids: &HashSet<CompanyId>,
        ) -> Result<Vec<Company>, StoreError> {
            let rows = self.rows.read().await;
            Ok(ids.iter().filter_map(|id| rows.get(id).cloned()).collect())
        }

        async fn find_all(&self) -> Result<Vec<Company>, StoreError> {
            let mut companies: Vec<Company> = self.rows.read().await.values().cloned().collect();
            companies.sort_by(|a, b| a.trade_name.cmp(&b.trade_name).then(a.id.cmp(&b.id)));
            Ok(companies)
        }

        async fn save(&self, company: &Company) -> Result<Company, StoreError> {
            self.rows
                .write()
                .await
                .insert(company.id, company.clone());
            Ok(company.clone())
        }

        async fn delete(&self, id: CompanyId) -> Result<(), StoreError> {
            self.rows
                .write()
                .await
                .remove(&id)
                .map(|_| ())
                .ok_or_else(|| StoreError::not_found("Company", id))
        }
    }

    #[derive(Debug, Clone, Default)]
    pub struct InMemorySupplierStore {
        rows: Arc<RwLock<HashMap<SupplierId, Supplier>>>,
    }

    impl InMemorySupplierStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub async fn len(&self) -> usize {
            self.rows.read().await.len()
        }

        pub async fn is_empty(&self) -> bool {
            self.rows.read().await.is_empty()
        }
    }

    impl DomainPort for InMemorySupplierStore {}

    #[async_trait]
    impl SupplierStore for InMemorySupplierStore {
        async fn find_by_id(&self, id: SupplierId) -> Result<Option<Supplier>, StoreError> {
            Ok(self.rows.read().await.get(&id).cloned())
        }

        async fn find_by_fiscal_id(&self, fiscal_id: &str) -> Result<Option<Supplier>, StoreError> {
            Ok(self
                .rows
                .read()
                .await
                .values()
                .find(|supplier| supplier.fiscal_id == fiscal_id)
                .cloned())
        }

        async fn find_by_email(&self, email: &str) -> Result<Option<Supplier>, StoreError> {
            Ok(self
                .rows
                .read()
                .await
                .values()
                .find(|supplier| supplier.email == email)
                .cloned())
        }

        async fn find_all_by_ids(
            &self,
            ids: &HashSet<SupplierId>,
        ) -> Result<Vec<Supplier>, StoreError> {
            let rows = self.rows.read().await;
            Ok(ids.iter().filter_map(|id| rows.get(id).cloned()).collect())
        }

        async fn list(
            &self,
            filter: &SupplierFilter,
            page: PageRequest,
        ) -> Result<Page<Supplier>, StoreError> {
            let mut matching: Vec<Supplier> = self
                .rows
                .read()
                .await
                .values()
                .filter(|supplier| filter.matches(supplier))
                .cloned()
                .collect();
            matching.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
            let total = matching.len() as u64;
            let items: Vec<Supplier> = matching
                .into_iter()
                .skip(page.offset() as usize)
                .take(page.per_page as usize)
                .collect();
            Ok(Page::new(items, page, total))
        }

        async fn save(&self, supplier: &Supplier) -> Result<Supplier, StoreError> {
            self.rows
                .write()
                .await
                .insert(supplier.id, supplier.clone());
            Ok(supplier.clone())
        }

        async fn delete(&self, id: SupplierId) -> Result<(), StoreError> {
            self.rows
                .write()
                .await
                .remove(&id)
                .map(|_| ())
                .ok_or_else(|| StoreError::not_found("Supplier", id))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::memory::*;
    use super::*;
    use crate::supplier::SupplierKind;

    fn corporate(fiscal_id: &str, name: &str, email: &str) -> Supplier {
        Supplier::new(fiscal_id, name, email, "01001000", SupplierKind::Corporate)
    }

    #[tokio::test]
    async fn test_company_store_round_trip() {
        let store = InMemoryCompanyStore::new();
        let company = Company::new("12345678000190", "Acme Ltda", "80010000");

        store.save(&company).await.unwrap();
        let loaded = store.find_by_id(company.id).await.unwrap().unwrap();
        assert_eq!(loaded.cnpj, "12345678000190");

        let by_cnpj = store.find_by_cnpj("12345678000190").await.unwrap();
        assert_eq!(by_cnpj.unwrap().id, company.id);

        store.delete(company.id).await.unwrap();
        assert!(store.find_by_id(company.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_missing_company_is_not_found() {
        let store = InMemoryCompanyStore::new();
        let error = store.delete(CompanyId::new_v7()).await.unwrap_err();
        assert!(error.is_not_found());
    }

    #[tokio::test]
    async fn test_find_all_by_ids_skips_unknown() {
        let store = InMemorySupplierStore::new();
        let known = corporate("12345678000190", "Acme", "a@acme.com");
        store.save(&known).await.unwrap();

        let ids: HashSet<SupplierId> = [known.id, SupplierId::new_v7()].into_iter().collect();
        let found = store.find_all_by_ids(&ids).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, known.id);
    }

    #[tokio::test]
    async fn test_list_filters_by_name_prefix_case_insensitive() {
        let store = InMemorySupplierStore::new();
        store
            .save(&corporate("11111111000111", "Alpha Parts", "a@x.com"))
            .await
            .unwrap();
        store
            .save(&corporate("22222222000122", "alphabet Supply", "b@x.com"))
            .await
            .unwrap();
        store
            .save(&corporate("33333333000133", "Beta Goods", "c@x.com"))
            .await
            .unwrap();

        let filter = SupplierFilter {
            name_prefix: Some("ALPHA".into()),
            ..Default::default()
        };
        let page = store.list(&filter, PageRequest::default()).await.unwrap();
        assert_eq!(page.total, 2);
        assert!(page.items.iter().all(|s| s
            .name
            .to_lowercase()
            .starts_with("alpha")));
    }

    #[tokio::test]
    async fn test_list_treats_wildcard_characters_as_literals() {
        let store = InMemorySupplierStore::new();
        store
            .save(&corporate("11111111000111", "Alpha Parts", "a@x.com"))
            .await
            .unwrap();
        store
            .save(&corporate("22222222000122", "%Odd Name", "b@x.com"))
            .await
            .unwrap();

        // "%" is a literal prefix, not a match-everything wildcard.
        let filter = SupplierFilter {
            name_prefix: Some("%".into()),
            ..Default::default()
        };
        let page = store.list(&filter, PageRequest::default()).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].name, "%Odd Name");

        let filter = SupplierFilter {
            fiscal_id_prefix: Some("_".into()),
            ..Default::default()
        };
        let page = store.list(&filter, PageRequest::default()).await.unwrap();
        assert_eq!(page.total, 0);
    }

    #[tokio::test]
    async fn test_list_paginates_in_name_order() {
        let store = InMemorySupplierStore::new();
        for (i, name) in ["Carla", "Ana", "Bruno"].iter().enumerate() {
            store
                .save(&corporate(
                    &format!("1111111100011{i}"),
                    name,
                    &format!("{name}@x.com"),
                ))
                .await
                .unwrap();
        }

        let filter = SupplierFilter::default();
        let first = store
            .list(&filter, PageRequest::new(0, 2))
            .await
            .unwrap();
        assert_eq!(first.total, 3);
        assert_eq!(first.items[0].name, "Ana");
        assert_eq!(first.items[1].name, "Bruno");

        let second = store
            .list(&filter, PageRequest::new(1, 2))
            .await
            .unwrap();
        assert_eq!(second.items.len(), 1);
        assert_eq!(second.items[0].name, "Carla");
    }
}
