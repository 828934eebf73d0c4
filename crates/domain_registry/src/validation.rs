//! Registration rules shared by the company and supplier services
//!
//! All checks here run before anything is written, so a failed save leaves
//! no partial state behind.

use crate::cep::CepLookup;
use crate::company::Company;
use crate::error::RegistryError;
use crate::ports::{CompanyStore, SupplierStore};
use crate::supplier::Supplier;

/// State whose companies may only register adult individual suppliers
pub const RESTRICTED_UF: &str = "PR";

/// Minimum age for individual suppliers of companies in the restricted state
pub const MINIMUM_AGE: u32 = 18;

/// Fails unless the CEP resolves through the lookup service
pub async fn ensure_cep_resolves(
    lookup: &dyn CepLookup,
    cep: &str,
) -> Result<(), RegistryError> {
    if lookup.lookup(cep).await.is_none() {
        return Err(RegistryError::business_rule(format!(
            "CEP {cep} is invalid or could not be found"
        )));
    }
    Ok(())
}

/// Fails when another company (a different id) already uses this CNPJ
pub async fn ensure_unique_cnpj(
    store: &dyn CompanyStore,
    company: &Company,
) -> Result<(), RegistryError> {
    if let Some(existing) = store.find_by_cnpj(&company.cnpj).await? {
        if existing.id != company.id {
            return Err(RegistryError::business_rule(format!(
                "CNPJ {} is already registered",
                company.cnpj
            )));
        }
    }
    Ok(())
}

/// Fails when another supplier (a different id) already uses this fiscal id
pub async fn ensure_unique_fiscal_id(
    store: &dyn SupplierStore,
    supplier: &Supplier,
) -> Result<(), RegistryError> {
    if let Some(existing) = store.find_by_fiscal_id(&supplier.fiscal_id).await? {
        if existing.id != supplier.id {
            return Err(RegistryError::business_rule(format!(
                "Fiscal id {} is already registered",
                supplier.fiscal_id
            )));
        }
    }
    Ok(())
}

/// Fails when another supplier (a different id) already uses this email
pub async fn ensure_unique_email(
    store: &dyn SupplierStore,
    supplier: &Supplier,
) -> Result<(), RegistryError> {
    if let Some(existing) = store.find_by_email(&supplier.email).await? {
        if existing.id != supplier.id {
            return Err(RegistryError::business_rule(format!(
                "Email {} is already registered",
                supplier.email
            )));
        }
    }
    Ok(())
}

/// Companies located in the restricted state may not register individual
/// suppliers under the minimum age; an unknown age counts as under-age
pub async fn ensure_age_eligibility(
    lookup: &dyn CepLookup,
    supplier: &Supplier,
    companies: &[Company],
) -> Result<(), RegistryError> {
    if !supplier.kind.is_individual() {
        return Ok(());
    }
    if supplier.age().is_some_and(|age| age >= MINIMUM_AGE) {
        return Ok(());
    }
    for company in companies {
        if lookup.resolves_to_region(&company.cep, RESTRICTED_UF).await {
            return Err(RegistryError::business_rule(format!(
                "Companies in {RESTRICTED_UF} cannot register individual suppliers under {MINIMUM_AGE}"
            )));
        }
    }
    Ok(())
}
