//! Supplier entity
//!
//! Suppliers come in two kinds: individuals (natural persons, carrying a
//! government id and optionally a birth date) and corporate entities. The
//! kind is fixed at creation; updates that change it are rejected by
//! [`crate::services::SupplierService`].

use std::collections::HashSet;
use std::mem;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use core_kernel::{CompanyId, SupplierId};
use serde::{Deserialize, Serialize};

/// The two supplier variants
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SupplierKind {
    Individual {
        government_id: String,
        birth_date: Option<NaiveDate>,
    },
    Corporate,
}

impl SupplierKind {
    pub fn is_individual(&self) -> bool {
        matches!(self, SupplierKind::Individual { .. })
    }

    /// True when both values are the same variant, regardless of fields
    pub fn matches(&self, other: &SupplierKind) -> bool {
        mem::discriminant(self) == mem::discriminant(other)
    }

    pub fn label(&self) -> &'static str {
        match self {
            SupplierKind::Individual { .. } => "individual",
            SupplierKind::Corporate => "corporate",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Supplier {
    pub id: SupplierId,
    /// Taxpayer number, 11 digits for individuals and 14 for corporate
    /// entities, unique across suppliers
    pub fiscal_id: String,
    pub name: String,
    /// Unique across suppliers
    pub email: String,
    /// Postal code, 8 digits
    pub cep: String,
    #[serde(flatten)]
    pub kind: SupplierKind,
    #[serde(default)]
    pub company_ids: HashSet<CompanyId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Supplier {
    pub fn new(
        fiscal_id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        cep: impl Into<String>,
        kind: SupplierKind,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: SupplierId::new_v7(),
            fiscal_id: fiscal_id.into(),
            name: name.into(),
            email: email.into(),
            cep: cep.into(),
            kind,
            company_ids: HashSet::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Age in whole years, if this is an individual with a known birth date
    pub fn age(&self) -> Option<u32> {
        let birth_date = match &self.kind {
            SupplierKind::Individual {
                birth_date: Some(date),
                ..
            } => date,
            _ => return None,
        };
        let today = Utc::now().date_naive();
        let mut age = today.year() - birth_date.year();
        if (today.month(), today.day()) < (birth_date.month(), birth_date.day()) {
            age -= 1;
        }
        u32::try_from(age).ok()
    }

    /// Links a company; returns false if it was already linked
    pub fn add_company(&mut self, id: CompanyId) -> bool {
        self.company_ids.insert(id)
    }

    /// Unlinks a company; returns false if it was not linked
    pub fn remove_company(&mut self, id: CompanyId) -> bool {
        self.company_ids.remove(&id)
    }

    pub fn has_company(&self, id: CompanyId) -> bool {
        self.company_ids.contains(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn individual(birth_date: Option<NaiveDate>) -> Supplier {
        Supplier::new(
            "12345678901",
            "Maria Silva",
            "maria@example.com",
            "01001000",
            SupplierKind::Individual {
                government_id: "123456789".into(),
                birth_date,
            },
        )
    }

    #[test]
    fn test_age_for_known_birth_date() {
        let today = Utc::now().date_naive();
        let birth = NaiveDate::from_ymd_opt(today.year() - 30, today.month(), 1).unwrap();
        let supplier = individual(Some(birth));
        let age = supplier.age().unwrap();
        assert!(age == 29 || age == 30);
    }

    #[test]
    fn test_age_counts_whole_years_only() {
        // Born 18 years ago tomorrow: still 17 until the birthday passes.
        let tomorrow = Utc::now().date_naive().succ_opt().unwrap();
        let not_yet =
            NaiveDate::from_ymd_opt(tomorrow.year() - 18, tomorrow.month(), tomorrow.day())
                .unwrap_or_else(|| {
                    // Feb 29 birthday in a non-leap year; treat it as Mar 1.
                    NaiveDate::from_ymd_opt(tomorrow.year() - 18, 3, 1).unwrap()
                });
        let supplier = individual(Some(not_yet));
        assert_eq!(supplier.age(), Some(17));
    }

    #[test]
    fn test_age_on_birthday_is_reached() {
        // The 18th birthday itself already counts as 18.
        let today = Utc::now().date_naive();
        let birthday =
            NaiveDate::from_ymd_opt(today.year() - 18, today.month(), today.day())
                .unwrap_or_else(|| {
                    // Feb 29 in a non-leap year; use Feb 28.
                    NaiveDate::from_ymd_opt(today.year() - 18, 2, 28).unwrap()
                });
        let supplier = individual(Some(birthday));
        assert_eq!(supplier.age(), Some(18));
    }

    #[test]
    fn test_age_unknown_without_birth_date() {
        assert_eq!(individual(None).age(), None);
    }

    #[test]
    fn test_age_none_for_corporate() {
        let supplier = Supplier::new(
            "12345678000190",
            "Acme Ltda",
            "contact@acme.com",
            "01001000",
            SupplierKind::Corporate,
        );
        assert_eq!(supplier.age(), None);
    }

    #[test]
    fn test_kind_matches_ignores_fields() {
        let a = SupplierKind::Individual {
            government_id: "1".into(),
            birth_date: None,
        };
        let b = SupplierKind::Individual {
            government_id: "2".into(),
            birth_date: NaiveDate::from_ymd_opt(1990, 1, 1),
        };
        assert!(a.matches(&b));
        assert!(!a.matches(&SupplierKind::Corporate));
    }
}
