//! Company store adapter
//!
//! Companies own the `company_suppliers` association table; a save rewrites
//! the company row and its link rows in one transaction.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use core_kernel::{CompanyId, DomainPort, StoreError, SupplierId};
use domain_registry::{Company, CompanyStore};

use crate::error::map_sqlx;

#[derive(Debug, Clone)]
pub struct CompanyRepository {
    pool: PgPool,
}

#[derive(Debug, FromRow)]
struct CompanyRow {
    id: Uuid,
    cnpj: String,
    trade_name: String,
    cep: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CompanyRow {
    fn into_company(self, supplier_ids: HashSet<SupplierId>) -> Company {
        Company {
            id: CompanyId::from_uuid(self.id),
            cnpj: self.cnpj,
            trade_name: self.trade_name,
            cep: self.cep,
            supplier_ids,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

const SELECT_COMPANY: &str =
    "SELECT id, cnpj, trade_name, cep, created_at, updated_at FROM companies";

impl CompanyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load_links(
        &self,
        company_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, HashSet<SupplierId>>, StoreError> {
        let rows: Vec<(Uuid, Uuid)> = sqlx::query_as(
            "SELECT company_id, supplier_id FROM company_suppliers WHERE company_id = ANY($1)",
        )
        .bind(company_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)?;

        let mut links: HashMap<Uuid, HashSet<SupplierId>> = HashMap::new();
        for (company_id, supplier_id) in rows {
            links
                .entry(company_id)
                .or_default()
                .insert(SupplierId::from_uuid(supplier_id));
        }
        Ok(links)
    }

    async fn hydrate(&self, rows: Vec<CompanyRow>) -> Result<Vec<Company>, StoreError> {
        let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
        let mut links = self.load_links(&ids).await?;
        Ok(rows
            .into_iter()
            .map(|row| {
                let supplier_ids = links.remove(&row.id).unwrap_or_default();
                row.into_company(supplier_ids)
            })
            .collect())
    }
}

impl DomainPort for CompanyRepository {}

#[async_trait]
impl CompanyStore for CompanyRepository {
    async fn find_by_id(&self, id: CompanyId) -> Result<Option<Company>, StoreError> {
        let row: Option<CompanyRow> =
            sqlx::query_as(&format!("{SELECT_COMPANY} WHERE id = $1"))
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(map_sqlx)?;
        match row {
            Some(row) => Ok(self.hydrate(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn find_by_cnpj(&self, cnpj: &str) -> Result<Option<Company>, StoreError> {
        let row: Option<CompanyRow> =
            sqlx::query_as(&format!("{SELECT_COMPANY} WHERE cnpj = $1"))
                .bind(cnpj)
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
        ids: &HashSet<CompanyId>,
    ) -> Result<Vec<Company>, StoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let uuids: Vec<Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();
        let rows: Vec<CompanyRow> =
            sqlx::query_as(&format!("{SELECT_COMPANY} WHERE id = ANY($1)"))
                .bind(&uuids)
                .fetch_all(&self.pool)
                .await
                .map_err(map_sqlx)?;
        self.hydrate(rows).await
    }

    async fn find_all(&self) -> Result<Vec<Company>, StoreError> {
        let rows: Vec<CompanyRow> =
            sqlx::query_as(&format!("{SELECT_COMPANY} ORDER BY trade_name, id"))
                .fetch_all(&self.pool)
                .await
                .map_err(map_sqlx)?;
        self.hydrate(rows).await
    }

    async fn save(&self, company: &Company) -> Result<Company, StoreError> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx)?;

        sqlx::query(
            r#"
            INSERT INTO companies (id, cnpj, trade_name, cep, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO UPDATE SET
                cnpj = EXCLUDED.cnpj,
                trade_name = EXCLUDED.trade_name,
                cep = EXCLUDED.cep,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(company.id.as_uuid())
        .bind(&company.cnpj)
        .bind(&company.trade_name)
        .bind(&company.cep)
        .bind(company.created_at)
        .bind(company.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx)?;

        sqlx::query("DELETE FROM company_suppliers WHERE company_id = $1")
            .bind(company.id.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx)?;
        for supplier_id in &company.supplier_ids {
            sqlx::query(
                "INSERT INTO company_suppliers (company_id, supplier_id) VALUES ($1, $2)",
            )
            .bind(company.id.as_uuid())
            .bind(supplier_id.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx)?;
        }

        tx.commit().await.map_err(map_sqlx)?;
        Ok(company.clone())
    }

    async fn delete(&self, id: CompanyId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM companies WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;
        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("Company", id));
        }
        Ok(())
    }
}
