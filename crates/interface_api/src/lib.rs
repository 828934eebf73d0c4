//! HTTP API Layer
//!
//! REST API for the company/supplier registry using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: request handlers for companies, suppliers and health
//! - **Middleware**: request-id propagation, tracing, request logging
//! - **DTOs**: request/response data transfer objects with validation
//! - **Error Handling**: consistent JSON error responses
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState, config::ApiConfig};
//!
//! let state = AppState::new(pool, ApiConfig::default())?;
//! let app = create_router(state);
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use domain_registry::adapters::viacep::{ViaCepClient, ViaCepConfig};
use domain_registry::cep::CepLookup;
use domain_registry::{CompanyService, CompanyStore, SupplierService, SupplierStore};
use infra_db::{CompanyRepository, SupplierRepository};

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::handlers::{company, health, supplier};
use crate::middleware::request_logging_middleware;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: ApiConfig,
    pub companies: CompanyService,
    pub suppliers: SupplierService,
}

impl AppState {
    /// Wires the services to their PostgreSQL stores and the configured
    /// postal-code lookup
    pub fn new(pool: PgPool, config: ApiConfig) -> Result<Self, ApiError> {
        let company_store: Arc<dyn CompanyStore> =
            Arc::new(CompanyRepository::new(pool.clone()));
        let supplier_store: Arc<dyn SupplierStore> =
            Arc::new(SupplierRepository::new(pool.clone()));
        let cep: Arc<dyn CepLookup> = Arc::new(
            ViaCepClient::new(ViaCepConfig {
                base_url: config.cep_base_url.clone(),
                timeout: Duration::from_secs(config.cep_timeout_secs),
            })
            .map_err(|e| ApiError::Internal(format!("failed to build CEP client: {e}")))?,
        );

        Ok(Self {
            companies: CompanyService::new(
                company_store.clone(),
                supplier_store.clone(),
                cep.clone(),
            ),
            suppliers: SupplierService::new(company_store, supplier_store, cep),
            pool,
            config,
        })
    }
}

/// Creates the main API router
pub fn create_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    let company_routes = Router::new()
        .route("/", get(company::list_companies))
        .route("/", post(company::create_company))
        .route("/:id", get(company::get_company))
        .route("/:id", put(company::update_company))
        .route("/:id", delete(company::delete_company));

    let supplier_routes = Router::new()
        .route("/", get(supplier::list_suppliers))
        .route("/", post(supplier::create_supplier))
        .route("/:id", get(supplier::get_supplier))
        .route("/:id", put(supplier::update_supplier))
        .route("/:id", delete(supplier::delete_supplier));

    let api_routes = Router::new()
        .nest("/companies", company_routes)
        .nest("/suppliers", supplier_routes)
        .layer(axum_middleware::from_fn(request_logging_middleware));

    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(state)
}
