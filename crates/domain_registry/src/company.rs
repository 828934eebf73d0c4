//! Company entity
//!
//! A company holds the set of supplier identifiers it works with; the
//! reverse side of that relationship lives on [`crate::supplier::Supplier`]
//! and is kept consistent by [`crate::sync::RelationshipSync`].

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use core_kernel::{CompanyId, SupplierId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    /// National registry number, 14 digits, unique across companies
    pub cnpj: String,
    pub trade_name: String,
    /// Postal code, 8 digits
    pub cep: String,
    #[serde(default)]
    pub supplier_ids: HashSet<SupplierId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Company {
    pub fn new(
        cnpj: impl Into<String>,
        trade_name: impl Into<String>,
        cep: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: CompanyId::new_v7(),
            cnpj: cnpj.into(),
            trade_name: trade_name.into(),
            cep: cep.into(),
            supplier_ids: HashSet::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Links a supplier; returns false if it was already linked
    pub fn add_supplier(&mut self, id: SupplierId) -> bool {
        self.supplier_ids.insert(id)
    }

    /// Unlinks a supplier; returns false if it was not linked
    pub fn remove_supplier(&mut self, id: SupplierId) -> bool {
        self.supplier_ids.remove(&id)
    }

    pub fn has_supplier(&self, id: SupplierId) -> bool {
        self.supplier_ids.contains(&id)
    }
}
