//! Generic motor data dispatcher.
//!
//! Every registered provider is served by the same handler shape:
//!
//! - `GET /v1/vehicle-specifications/{vehicleToEngineConfigId}/<slug>` - list the
//!   provider's data for a configuration
//!
//! The id is coerced before any collaborator is called. Delegated failures
//! keep their status class.

use std::sync::Arc;

use axum::Json;
use axum::extract::Path;
use axum::extract::rejection::PathRejection;
use axum::http::{StatusCode, Uri};
use axum::routing::{MethodRouter, get};
use futures::FutureExt;
use futures::future::BoxFuture;
use tracing::Instrument;

use motor_core::motor::{
    DrainPlugMap, EngineDrainPlugTorqueMap, FinalDriveTorqueMap, ManualTransmissionTorqueMap,
    OilFilterTorqueMap, TransferCaseTorqueMap,
};
use motor_core::observability::motor_data_span;
use motor_core::{
    FindMotorData, MotorApplicationMap, MotorDataBackend, VehicleToEngineConfigId,
    VehicleToEngineConfigRef,
};

use crate::context::RequestContext;
use crate::error::{ApiError, ApiResult};
use crate::metrics::record_motor_data_lookup;
use crate::paths::raw_id_segment;
use crate::registry::{MotorDataFetch, ReferenceResolver, RegistrationError, RouteTable};

/// Builds the route table for the standard provider set.
///
/// # Errors
///
/// Returns a [`RegistrationError`] if any provider fails to register.
pub fn motor_data_routes(
    backend: Arc<dyn MotorDataBackend>,
) -> Result<RouteTable, RegistrationError> {
    Ok(RouteTable::builder(Arc::clone(&backend))
        .register::<EngineDrainPlugTorqueMap>(find_motor_data::<EngineDrainPlugTorqueMap>(&backend))?
        .register::<FinalDriveTorqueMap>(find_motor_data::<FinalDriveTorqueMap>(&backend))?
        .register::<ManualTransmissionTorqueMap>(find_motor_data::<ManualTransmissionTorqueMap>(
            &backend,
        ))?
        .register::<OilFilterTorqueMap>(find_motor_data::<OilFilterTorqueMap>(&backend))?
        .register::<TransferCaseTorqueMap>(find_motor_data::<TransferCaseTorqueMap>(&backend))?
        .register::<DrainPlugMap>(find_motor_data::<DrainPlugMap>(&backend))?
        .build())
}

/// Returns a fetch function delegating to the backend's `FindMotorData<M>`
/// without a sort.
pub fn find_motor_data<M>(
    backend: &Arc<dyn MotorDataBackend>,
) -> impl Fn(VehicleToEngineConfigRef) -> BoxFuture<'static, motor_core::Result<Vec<M::Data>>>
+ Send
+ Sync
+ 'static
where
    M: MotorApplicationMap,
    dyn MotorDataBackend: FindMotorData<M>,
{
    let backend = Arc::clone(backend);
    move |reference| {
        let backend = Arc::clone(&backend);
        async move { FindMotorData::<M>::find_motor_data(backend.as_ref(), &reference, None).await }
            .boxed()
    }
}

pub(crate) fn dispatcher<M: MotorApplicationMap>(
    resolve: ReferenceResolver,
    fetch: MotorDataFetch<M::Data>,
) -> MethodRouter {
    get(
        move |ctx: RequestContext, uri: Uri, raw: Result<Path<String>, PathRejection>| {
            let resolve = Arc::clone(&resolve);
            let fetch = Arc::clone(&fetch);
            async move { dispatch::<M>(ctx, uri, raw, resolve, fetch).await }
        },
    )
}

async fn dispatch<M: MotorApplicationMap>(
    ctx: RequestContext,
    uri: Uri,
    raw: Result<Path<String>, PathRejection>,
    resolve: ReferenceResolver,
    fetch: MotorDataFetch<M::Data>,
) -> ApiResult<Json<Vec<M::Data>>> {
    let Path(raw) = raw.map_err(|e| path_rejection(e, &uri).with_request_id(&ctx.request_id))?;

    let id = VehicleToEngineConfigId::parse(&raw).map_err(|e| {
        tracing::debug!(provider = M::TYPE_NAME, rejected = %raw, error = %e, "invalid id");
        ApiError::from(e).with_request_id(&ctx.request_id)
    })?;

    let span = motor_data_span(M::TYPE_NAME, id.get());
    let reference = resolve(id);
    let records = fetch(reference).instrument(span).await.map_err(|e| {
        let err = ApiError::from(e);
        record_motor_data_lookup(M::TYPE_NAME, err.status());
        if err.status().is_server_error() {
            tracing::error!(
                provider = M::TYPE_NAME,
                vehicle_to_engine_config_id = id.get(),
                error = %err.message(),
                "motor data lookup failed"
            );
        }
        err.with_request_id(&ctx.request_id)
    })?;

    record_motor_data_lookup(M::TYPE_NAME, StatusCode::OK);
    tracing::debug!(
        provider = M::TYPE_NAME,
        vehicle_to_engine_config_id = id.get(),
        count = records.len(),
        "motor data served"
    );
    Ok(Json(records))
}

/// Maps a path extraction failure, attaching the raw id segment when present.
pub(crate) fn path_rejection(rejection: PathRejection, uri: &Uri) -> ApiError {
    let err = ApiError::from(rejection);
    match raw_id_segment(uri.path()) {
        Some(segment) => err.with_rejected_value(segment),
        None => err,
    }
}
