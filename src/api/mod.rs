//! Admin API layer: route handlers, DTOs, router composition and the
//! OpenAPI document.
//!
//! Resource endpoints are mounted under `/api/v1`.

pub mod dto;
pub mod handlers;

use axum::Router;
use utoipa::OpenApi;

use crate::app_state::AppState;

/// OpenAPI document for the admin surface.
#[derive(Debug, OpenApi)]
#[openapi(
    info(title = "hwregistry admin API"),
    paths(
        handlers::system::health_handler,
        handlers::instance::list_instances,
        handlers::instance::get_instance,
    ),
    components(schemas(
        dto::InstanceDto,
        dto::InstanceListResponse,
        handlers::system::HealthResponse,
        crate::error::ErrorResponse,
        crate::error::ErrorBody,
    )),
    tags(
        (name = "System", description = "Health"),
        (name = "Instances", description = "Registered service instances"),
    )
)]
pub struct ApiDoc;

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    Router::new()
        .nest("/api/v1", handlers::routes())
        .merge(handlers::system::routes())
}
