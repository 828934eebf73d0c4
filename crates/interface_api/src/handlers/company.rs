//! Company handlers

use std::collections::HashSet;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use core_kernel::{CompanyId, SupplierId};
use domain_registry::Company;

use crate::dto::company::{CompanyRequest, CompanyResponse};
use crate::error::ApiError;
use crate::AppState;

fn desired_suppliers(ids: &[Uuid]) -> HashSet<SupplierId> {
    ids.iter().copied().map(SupplierId::from_uuid).collect()
}

/// Lists all companies
pub async fn list_companies(
    State(state): State<AppState>,
) -> Result<Json<Vec<CompanyResponse>>, ApiError> {
    let companies = state.companies.list_all().await?;
    Ok(Json(companies.into_iter().map(Into::into).collect()))
}

/// Gets a company by id
pub async fn get_company(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CompanyResponse>, ApiError> {
    let company = state.companies.get(CompanyId::from_uuid(id)).await?;
    Ok(Json(company.into()))
}

/// Creates a company
pub async fn create_company(
    State(state): State<AppState>,
    Json(request): Json<CompanyRequest>,
) -> Result<(StatusCode, Json<CompanyResponse>), ApiError> {
    request.check()?;
    let desired = desired_suppliers(&request.supplier_ids);
    let company = Company::new(request.cnpj, request.trade_name, request.cep);
    let saved = state.companies.save(company, desired).await?;
    Ok((StatusCode::CREATED, Json(saved.into())))
}

/// Updates a company; the target must already exist
pub async fn update_company(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<CompanyRequest>,
) -> Result<Json<CompanyResponse>, ApiError> {
    request.check()?;
    let mut company = state.companies.get(CompanyId::from_uuid(id)).await?;
    company.cnpj = request.cnpj;
    company.trade_name = request.trade_name;
    company.cep = request.cep;
    let desired = desired_suppliers(&request.supplier_ids);
    let saved = state.companies.save(company, desired).await?;
    Ok(Json(saved.into()))
}

/// Deletes a company, detaching it from its suppliers
pub async fn delete_company(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.companies.delete(CompanyId::from_uuid(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
