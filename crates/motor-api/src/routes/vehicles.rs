//! VIN lookup routes.
//!
//! ## Routes
//!
//! - `GET /v1/vehicles?vin={vin}` - List vehicle/engine configurations for a VIN

use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use utoipa::IntoParams;

use motor_core::vehicle::VehicleToEngineConfig;

use crate::context::RequestContext;
use crate::error::{ApiError, ApiResult};
use crate::server::AppState;

/// Query parameters for VIN lookups.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct VinQuery {
    /// Vehicle identification number.
    pub vin: String,
}

/// Creates VIN lookup routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/v1/vehicles", get(find_vehicle_to_engine_configs))
}

/// Find the vehicle/engine configurations matching a VIN.
///
/// GET /v1/vehicles?vin={vin}
#[utoipa::path(
    get,
    path = "/v1/vehicles",
    tag = "Motor",
    operation_id = "find_vehicle_to_engine_configs",
    params(VinQuery),
    responses(
        (status = 200, description = "OK", body = [VehicleToEngineConfig]),
    )
)]
pub async fn find_vehicle_to_engine_configs(
    ctx: RequestContext,
    State(state): State<Arc<AppState>>,
    query: Result<Query<VinQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<VehicleToEngineConfig>>> {
    let Query(VinQuery { vin }) =
        query.map_err(|e| ApiError::from(e).with_request_id(&ctx.request_id))?;

    let configs = state
        .backend()
        .find_vehicle_to_engine_configs(&vin)
        .await
        .map_err(|e| ApiError::from(e).with_request_id(&ctx.request_id))?;

    Ok(Json(configs))
}
