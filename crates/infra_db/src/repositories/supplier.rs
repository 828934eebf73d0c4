//! Supplier store adapter
//!
//! Suppliers own the `supplier_companies` association table. The two
//! supplier kinds share one table; `government_id` and `birth_date` are
//! null for corporate rows.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use core_kernel::{CompanyId, DomainPort, Page, PageRequest, StoreError, SupplierId};
use domain_registry::{Supplier, SupplierFilter, SupplierKind, SupplierStore};

use crate::error::map_sqlx;

#[derive(Debug, Clone)]
pub struct SupplierRepository {
    pool: PgPool,
}

#[derive(Debug, FromRow)]
struct SupplierRow {
    id: Uuid,
    fiscal_id: String,
    name: String,
    email: String,
    cep: String,
    kind: String,
    government_id: Option<String>,
    birth_date: Option<NaiveDate>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl SupplierRow {
    fn into_supplier(self, company_ids: HashSet<CompanyId>) -> Result<Supplier, StoreError> {
        let kind = match self.kind.as_str() {
            "individual" => SupplierKind::Individual {
                government_id: self.government_id.unwrap_or_default(),
                birth_date: self.birth_date,
            },
            "corporate" => SupplierKind::Corporate,
            other => {
                return Err(StoreError::internal(format!(
                    "unknown supplier kind '{other}' for id {}",
                    self.id
                )))
            }
        };
        Ok(Supplier {
            id: SupplierId::from_uuid(self.id),
            fiscal_id: self.fiscal_id,
            name: self.name,
            email: self.email,
            cep: self.cep,
            kind,
            company_ids,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const SELECT_SUPPLIER: &str = "SELECT id, fiscal_id, name, email, cep, kind, government_id, \
                               birth_date, created_at, updated_at FROM suppliers";

/// Escapes LIKE wildcards so a filter prefix always matches literally
fn escape_like(prefix: &str) -> String {
    prefix
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

impl SupplierRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load_links(
        &self,
        supplier_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, HashSet<CompanyId>>, StoreError> {
        let rows: Vec<(Uuid, Uuid)> = sqlx::query_as(
            "SELECT supplier_id, company_id FROM supplier_companies WHERE supplier_id = ANY($1)",
        )
        .bind(supplier_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)?;

        let mut links: HashMap<Uuid, HashSet<CompanyId>> = HashMap::new();
        for (supplier_id, company_id) in rows {
            links
                .entry(supplier_id)
                .or_default()
                .insert(CompanyId::from_uuid(company_id));
        }
        Ok(links)
    }

    async fn hydrate(&self, rows: Vec<SupplierRow>) -> Result<Vec<Supplier>, StoreError> {
        let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
        let mut links = self.load_links(&ids).await?;
        rows.into_iter()
            .map(|row| {
                let company_ids = links.remove(&row.id).unwrap_or_default();
                row.into_supplier(company_ids)
            })
            .collect()
    }
}

impl DomainPort for SupplierRepository {}

#[async_trait]
impl SupplierStore for SupplierRepository {
    async fn find_by_id(&self, id: SupplierId) -> Result<Option<Supplier>, StoreError> {
        let row: Option<SupplierRow> =
            sqlx::query_as(&format!("{SELECT_SUPPLIER} WHERE id = $1"))
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(map_sqlx)?;
        match row {
            Some(row) => Ok(self.hydrate(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn find_by_fiscal_id(&self, fiscal_id: &str) -> Result<Option<Supplier>, StoreError> {
        let row: Option<SupplierRow> =
            sqlx::query_as(&format!("{SELECT_SUPPLIER} WHERE fiscal_id = $1"))
                .bind(fiscal_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(map_sqlx)?;
        match row {
            Some(row) => Ok(self.hydrate(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Supplier>, StoreError> {
        let row: Option<SupplierRow> =
            sqlx::query_as(&format!("{SELECT_SUPPLIER} WHERE email = $1"))
                .bind(email)
                .fetch_optional(&self.pool)
                .await
                .map_err(map_sqlx)?;
        match row {
            Some(row) => Ok(self.hydrate(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn find_all_by_ids(
        &self,
        ids: &HashSet<SupplierId>,
    ) -> Result<Vec<Supplier>, StoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let uuids: Vec<Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();
        let rows: Vec<SupplierRow> =
            sqlx::query_as(&format!("{SELECT_SUPPLIER} WHERE id = ANY($1)"))
                .bind(&uuids)
                .fetch_all(&self.pool)
                .await
                .map_err(map_sqlx)?;
        self.hydrate(rows).await
    }

    async fn list(
        &self,
        filter: &SupplierFilter,
        page: PageRequest,
    ) -> Result<Page<Supplier>, StoreError> {
        const FILTER: &str =
            "($1::text IS NULL OR lower(name) LIKE lower($1) || '%' ESCAPE '\\') \
             AND ($2::text IS NULL OR fiscal_id LIKE $2 || '%' ESCAPE '\\')";

        let name_prefix = filter.name_prefix.as_deref().map(escape_like);
        let fiscal_id_prefix = filter.fiscal_id_prefix.as_deref().map(escape_like);

        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT count(*) FROM suppliers WHERE {FILTER}"
        ))
        .bind(name_prefix.as_deref())
        .bind(fiscal_id_prefix.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx)?;

        let rows: Vec<SupplierRow> = sqlx::query_as(&format!(
            "{SELECT_SUPPLIER} WHERE {FILTER} ORDER BY name, id LIMIT $3 OFFSET $4"
        ))
        .bind(name_prefix.as_deref())
        .bind(fiscal_id_prefix.as_deref())
        .bind(i64::from(page.per_page))
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)?;

        let items = self.hydrate(rows).await?;
        Ok(Page::new(items, page, total as u64))
    }

    async fn save(&self, supplier: &Supplier) -> Result<Supplier, StoreError> {
        let (government_id, birth_date) = match &supplier.kind {
            SupplierKind::Individual {
                government_id,
                birth_date,
            } => (Some(government_id.as_str()), *birth_date),
            SupplierKind::Corporate => (None, None),
        };

        let mut tx = self.pool.begin().await.map_err(map_sqlx)?;

        sqlx::query(
            r#"
            INSERT INTO suppliers
                (id, fiscal_id, name, email, cep, kind, government_id, birth_date,
                 created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (id) DO UPDATE SET
                fiscal_id = EXCLUDED.fiscal_id,
                name = EXCLUDED.name,
                email = EXCLUDED.email,
                cep = EXCLUDED.cep,
                kind = EXCLUDED.kind,
                government_id = EXCLUDED.government_id,
                birth_date = EXCLUDED.birth_date,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(supplier.id.as_uuid())
        .bind(&supplier.fiscal_id)
        .bind(&supplier.name)
        .bind(&supplier.email)
        .bind(&supplier.cep)
        .bind(supplier.kind.label())
        .bind(government_id)
        .bind(birth_date)
        .bind(supplier.created_at)
        .bind(supplier.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx)?;

        sqlx::query("DELETE FROM supplier_companies WHERE supplier_id = $1")
            .bind(supplier.id.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx)?;
        for company_id in &supplier.company_ids {
            sqlx::query(
                "INSERT INTO supplier_companies (supplier_id, company_id) VALUES ($1, $2)",
            )
            .bind(supplier.id.as_uuid())
            .bind(company_id.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx)?;
        }

        tx.commit().await.map_err(map_sqlx)?;
        Ok(supplier.clone())
    }

    async fn delete(&self, id: SupplierId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM suppliers WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;
        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("Supplier", id));
        }
        Ok(())
    }
}
