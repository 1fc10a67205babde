//! API route definitions.

use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers::{health, scan, validate};
use crate::state::AppState;

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "RevokeScan API",
        version = "0.1.0",
        description = "Token approval scanner and risk assessment"
    ),
    paths(
        health::health_check,
        scan::scan,
        scan::share_card,
        validate::validate_address,
        validate::validate_chain,
    ),
    components(schemas(
        scan::ScanRequest,
        validate::ValidateRequest,
        validate::ValidateResponse,
        validate::ChainValidateRequest,
        validate::ChainValidateResponse,
        crate::error::ErrorResponse,
    ))
)]
pub struct ApiDoc;

/// Build the application router.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(health::health_check))
        .route("/api/scan", post(scan::scan))
        .route("/api/share-card", post(scan::share_card))
        .route("/api/validate", post(validate::validate_address))
        .route("/api/validate-chain", post(validate::validate_chain))
        .with_state(state)
}
