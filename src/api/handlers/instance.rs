//! Instance introspection handlers: list and detail.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{InstanceDto, InstanceListResponse};
use crate::app_state::AppState;
use crate::domain::ServiceIdentity;
use crate::error::{ErrorResponse, RegistryError};

/// `GET /instances` — List every known instance.
#[utoipa::path(
    get,
    path = "/api/v1/instances",
    tag = "Instances",
    summary = "List instances",
    description = "Returns every registered or placeholder instance, ordered by name.",
    responses(
        (status = 200, description = "Instance list", body = InstanceListResponse),
    )
)]
pub async fn list_instances(State(state): State<AppState>) -> impl IntoResponse {
    let data: Vec<InstanceDto> = state
        .service_manager
        .list()
        .await
        .into_iter()
        .map(InstanceDto::from)
        .collect();
    let total = data.len();
    Json(InstanceListResponse { data, total })
}

/// `GET /instances/{interface}/{instance}` — Describe one instance.
///
/// # Errors
///
/// Returns [`RegistryError::InvalidIdentity`] for empty names and
/// [`RegistryError::InstanceNotFound`] for unknown ones.
#[utoipa::path(
    get,
    path = "/api/v1/instances/{interface}/{instance}",
    tag = "Instances",
    summary = "Describe instance",
    description = "Returns registration, presence and observer details for one instance.",
    params(
        ("interface" = String, Path, description = "Fully-qualified interface name"),
        ("instance" = String, Path, description = "Instance name"),
    ),
    responses(
        (status = 200, description = "Instance details", body = InstanceDto),
        (status = 404, description = "Instance not found", body = ErrorResponse),
    )
)]
pub async fn get_instance(
    State(state): State<AppState>,
    Path((interface, instance)): Path<(String, String)>,
) -> Result<Json<InstanceDto>, RegistryError> {
    let identity = ServiceIdentity::new(interface, instance)?;
    let summary = state.service_manager.describe(&identity).await?;
    Ok(Json(InstanceDto::from(summary)))
}

/// Instance routes, nested under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/instances", get(list_instances))
        .route("/instances/{interface}/{instance}", get(get_instance))
}
