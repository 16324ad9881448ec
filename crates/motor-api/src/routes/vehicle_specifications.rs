//! Vehicle specification routes.
//!
//! ## Routes
//!
//! - `GET /v1/vehicle-specifications/{vehicleToEngineConfigId}` - Get the display projection
//! - `GET /v1/vehicle-specifications/{vehicleToEngineConfigId}/parts/{productCategoryCode}` - List parts for a product category

use std::sync::Arc;

use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::http::Uri;
use axum::routing::get;
use axum::{Json, Router};

use motor_core::VehicleToEngineConfigId;
use motor_core::vehicle::{MotorPart, VehicleSpecification};

use crate::context::RequestContext;
use crate::error::{ApiError, ApiResult};
use crate::routes::motor_data::path_rejection;
use crate::server::AppState;

/// Creates vehicle specification routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/v1/vehicle-specifications/:vehicleToEngineConfigId",
            get(get_vehicle_specification),
        )
        .route(
            "/v1/vehicle-specifications/:vehicleToEngineConfigId/parts/:productCategoryCode",
            get(get_parts_specifications),
        )
}

/// Get the specification of a vehicle/engine configuration.
///
/// GET /v1/vehicle-specifications/{vehicleToEngineConfigId}
#[utoipa::path(
    get,
    path = "/v1/vehicle-specifications/{vehicleToEngineConfigId}",
    tag = "Vehicle",
    operation_id = "get_vehicle_specification",
    params(
        ("vehicleToEngineConfigId" = i32, Path, description = "Vehicle/engine configuration id")
    ),
    responses(
        (status = 200, description = "OK", body = VehicleSpecification),
    )
)]
pub async fn get_vehicle_specification(
    ctx: RequestContext,
    State(state): State<Arc<AppState>>,
    uri: Uri,
    raw: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<VehicleSpecification>> {
    let Path(raw) = raw.map_err(|e| path_rejection(e, &uri).with_request_id(&ctx.request_id))?;
    let id = VehicleToEngineConfigId::parse(&raw)
        .map_err(|e| ApiError::from(e).with_request_id(&ctx.request_id))?;

    let specification = state
        .backend()
        .find_by_id(id)
        .await
        .map_err(|e| ApiError::from(e).with_request_id(&ctx.request_id))?;

    specification.map(Json).ok_or_else(|| {
        ApiError::not_found(format!("VehicleToEngineConfig not found: {id}"))
            .with_request_id(&ctx.request_id)
    })
}

/// List the parts of a product category for a vehicle/engine configuration.
///
/// The category is resolved through the configured parts category mapping;
/// an unmapped category has no parts.
///
/// GET /v1/vehicle-specifications/{vehicleToEngineConfigId}/parts/{productCategoryCode}
#[utoipa::path(
    get,
    path = "/v1/vehicle-specifications/{vehicleToEngineConfigId}/parts/{productCategoryCode}",
    tag = "Vehicle",
    operation_id = "get_parts_specifications",
    params(
        ("vehicleToEngineConfigId" = i32, Path, description = "Vehicle/engine configuration id"),
        ("productCategoryCode" = String, Path, description = "Store product category code")
    ),
    responses(
        (status = 200, description = "OK", body = [MotorPart]),
    )
)]
pub async fn get_parts_specifications(
    ctx: RequestContext,
    State(state): State<Arc<AppState>>,
    raw: Result<Path<(String, String)>, PathRejection>,
) -> ApiResult<Json<Vec<MotorPart>>> {
    let Path((raw_id, category)) =
        raw.map_err(|e| ApiError::from(e).with_request_id(&ctx.request_id))?;
    let id = VehicleToEngineConfigId::parse(&raw_id)
        .map_err(|e| ApiError::from(e).with_request_id(&ctx.request_id))?;

    if category.trim().is_empty() {
        return Err(ApiError::bad_request("productCategoryCode must not be empty")
            .with_rejected_value(category)
            .with_request_id(&ctx.request_id));
    }

    let Some(table_maps) = state.config.parts_category_mapping.get(&category) else {
        tracing::debug!(category = %category, "unmapped product category");
        return Ok(Json(Vec::new()));
    };

    let backend = state.backend();
    let reference = backend.get_reference_by_id(id);
    let parts = backend
        .find_parts_by_engine_and_motor_category(&reference, table_maps)
        .await
        .map_err(|e| ApiError::from(e).with_request_id(&ctx.request_id))?;

    Ok(Json(parts))
}
