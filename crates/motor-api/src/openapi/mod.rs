//! `OpenAPI` (3.1) catalog for `motor-api`.
//!
//! Hand-written routes are described statically by [`ApiDoc`]; motor data
//! endpoints are added from the finished [`RouteTable`] by [`synthesize`].
//! Every operation documents the shared 400/403/404/500 error responses.

mod synthesis;

use std::sync::Arc;

use utoipa::openapi::{
    Components, ContentBuilder, OpenApi as OpenApiDocument, Ref, Response, ResponseBuilder,
};
use utoipa::{Modify, OpenApi, PartialSchema, ToSchema};

use motor_core::MemoryMotorDataStore;

use crate::error::ApiErrorResponse;
use crate::registry::{RegistrationError, RouteTable};

pub use synthesis::{operation_id, synthesize};

/// Tag of the vehicle specification operations.
pub const VEHICLE_TAG: &str = "Vehicle";

/// Tag of the VIN lookup operations.
pub const MOTOR_TAG: &str = "Motor";

pub(crate) const JSON_CONTENT_TYPE: &str = "application/json";

const ERROR_RESPONSES: [(&str, &str); 4] = [
    ("400", "Bad Request"),
    ("403", "Forbidden"),
    ("404", "Not Found"),
    ("500", "Internal Server Error"),
];

/// `OpenAPI` documentation for the hand-written motor API routes.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Motor API",
        description = "Vehicle specification and motor quick lube data"
    ),
    paths(
        crate::routes::vehicle_specifications::get_vehicle_specification,
        crate::routes::vehicle_specifications::get_parts_specifications,
        crate::routes::vehicles::find_vehicle_to_engine_configs,
    ),
    components(
        schemas(
            crate::error::ApiErrorResponse,
            motor_core::vehicle::VehicleSpecification,
            motor_core::vehicle::VehicleToEngineConfig,
            motor_core::vehicle::IdRef,
            motor_core::vehicle::MotorPart,
        )
    ),
    tags(
        (name = "Vehicle", description = "Retrieves vehicle specification for the given vehicleToEngineConfigId"),
        (name = "Motor", description = "Retrieves vehicle engine configuration for the given vin"),
    ),
    modifiers(&DefaultApiResponses),
)]
pub struct ApiDoc;

/// Adds the shared error responses to every operation that lacks them.
struct DefaultApiResponses;

impl Modify for DefaultApiResponses {
    fn modify(&self, openapi: &mut OpenApiDocument) {
        openapi
            .components
            .get_or_insert_with(Components::default)
            .schemas
            .entry(ApiErrorResponse::name().into_owned())
            .or_insert_with(ApiErrorResponse::schema);

        for item in openapi.paths.paths.values_mut() {
            let operations = [
                item.get.as_mut(),
                item.put.as_mut(),
                item.post.as_mut(),
                item.delete.as_mut(),
                item.patch.as_mut(),
            ];
            for operation in operations.into_iter().flatten() {
                for (status, response) in error_responses() {
                    operation
                        .responses
                        .responses
                        .entry(status.to_string())
                        .or_insert_with(|| response.into());
                }
            }
        }
    }
}

pub(crate) fn error_responses() -> Vec<(&'static str, Response)> {
    ERROR_RESPONSES
        .iter()
        .map(|(status, description)| {
            let response = ResponseBuilder::new()
                .description(*description)
                .content(
                    JSON_CONTENT_TYPE,
                    ContentBuilder::new()
                        .schema(Some(Ref::from_schema_name(ApiErrorResponse::name())))
                        .build(),
                )
                .build();
            (*status, response)
        })
        .collect()
}

/// Returns the static documentation of the hand-written routes.
#[must_use]
pub fn openapi() -> OpenApiDocument {
    ApiDoc::openapi()
}

/// Returns the full catalog: static routes plus synthesized motor data endpoints.
///
/// # Errors
///
/// Returns a [`RegistrationError`] if synthesis fails.
pub fn catalog(table: &RouteTable) -> Result<OpenApiDocument, RegistrationError> {
    let mut openapi = openapi();
    synthesize(table, &mut openapi)?;
    Ok(openapi)
}

/// Returns the catalog of the standard provider set serialized as pretty JSON.
///
/// # Errors
///
/// Returns an error if registration, synthesis, or serialization fails.
pub fn openapi_json() -> anyhow::Result<String> {
    let backend: Arc<dyn motor_core::MotorDataBackend> = Arc::new(MemoryMotorDataStore::new());
    let table = crate::routes::motor_data::motor_data_routes(backend)?;
    let catalog = catalog(&table)?;
    Ok(serde_json::to_string_pretty(&catalog)?)
}
