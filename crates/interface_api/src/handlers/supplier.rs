//! Supplier handlers

use std::collections::HashSet;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use core_kernel::{CompanyId, PageRequest, SupplierId};
use domain_registry::{Supplier, SupplierFilter};

use crate::dto::supplier::{SupplierListQuery, SupplierRequest, SupplierResponse};
use crate::dto::PageResponse;
use crate::error::ApiError;
use crate::AppState;

fn desired_companies(ids: &[Uuid]) -> HashSet<CompanyId> {
    ids.iter().copied().map(CompanyId::from_uuid).collect()
}

/// Lists suppliers, optionally filtered by name and fiscal id prefix
pub async fn list_suppliers(
    State(state): State<AppState>,
    Query(query): Query<SupplierListQuery>,
) -> Result<Json<PageResponse<SupplierResponse>>, ApiError> {
    let filter = SupplierFilter {
        name_prefix: query.name,
        fiscal_id_prefix: query.fiscal_id,
    };
    let page = PageRequest::new(
        query.page.unwrap_or(0),
        query.per_page.unwrap_or(PageRequest::DEFAULT_PER_PAGE),
    );
    let result = state.suppliers.list(filter, page).await?;
    Ok(Json(PageResponse::from_page(result, SupplierResponse::from)))
}

/// Gets a supplier by id
pub async fn get_supplier(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SupplierResponse>, ApiError> {
    let supplier = state.suppliers.get(SupplierId::from_uuid(id)).await?;
    Ok(Json(supplier.into()))
}

/// Creates a supplier
pub async fn create_supplier(
    State(state): State<AppState>,
    Json(request): Json<SupplierRequest>,
) -> Result<(StatusCode, Json<SupplierResponse>), ApiError> {
    request.check()?;
    let desired = desired_companies(&request.company_ids);
    let supplier = Supplier::new(
        request.fiscal_id,
        request.name,
        request.email,
        request.cep,
        request.kind.into(),
    );
    let saved = state.suppliers.save(supplier, desired).await?;
    Ok((StatusCode::CREATED, Json(saved.into())))
}

/// Updates a supplier; the target must already exist and keep its kind
pub async fn update_supplier(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SupplierRequest>,
) -> Result<Json<SupplierResponse>, ApiError> {
    request.check()?;
    let existing = state.suppliers.get(SupplierId::from_uuid(id)).await?;
    let supplier = Supplier {
        id: existing.id,
        fiscal_id: request.fiscal_id,
        name: request.name,
        email: request.email,
        cep: request.cep,
        kind: request.kind.into(),
        company_ids: existing.company_ids,
        created_at: existing.created_at,
        updated_at: existing.updated_at,
    };
    let desired = desired_companies(&request.company_ids);
    let saved = state.suppliers.save(supplier, desired).await?;
    Ok(Json(saved.into()))
}

/// Deletes a supplier, detaching it from its companies
pub async fn delete_supplier(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.suppliers.delete(SupplierId::from_uuid(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
