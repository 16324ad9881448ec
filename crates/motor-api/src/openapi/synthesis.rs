//! Catalog synthesis for registered motor data endpoints.
//!
//! Turns a finished [`RouteTable`] into `OpenAPI` operations and component
//! schemas. Schemas are merged insert-if-absent by name, so running the
//! synthesis again over the same table leaves the document unchanged.

use utoipa::openapi::path::{
    HttpMethod, Operation, OperationBuilder, ParameterBuilder, ParameterIn,
};
use utoipa::openapi::schema::{Array, KnownFormat, ObjectBuilder, SchemaFormat, Type};
use utoipa::openapi::{
    Components, ContentBuilder, OpenApi, Ref, RefOr, Required, ResponseBuilder,
    ResponsesBuilder, Schema,
};
use utoipa::{PartialSchema, ToSchema};

use crate::error::ApiErrorResponse;
use crate::paths::ID_VARIABLE_NAME;
use crate::registry::{DataProviderDescriptor, RegistrationError, RouteTable};

use super::{JSON_CONTENT_TYPE, VEHICLE_TAG, error_responses};

/// Adds one GET operation per descriptor, plus every schema it references.
///
/// # Errors
///
/// Returns [`RegistrationError::SchemaConflict`] if a schema name is already
/// taken by a different definition and
/// [`RegistrationError::UnmappableSchema`] if a data type's root schema is a
/// bare reference. Schemas already in the document are never modified.
pub fn synthesize(table: &RouteTable, openapi: &mut OpenApi) -> Result<(), RegistrationError> {
    let components = openapi.components.get_or_insert_with(Components::default);
    merge_schemas(
        components,
        vec![(
            ApiErrorResponse::name().into_owned(),
            ApiErrorResponse::schema(),
        )],
    )?;

    for descriptor in table {
        let data_type = descriptor.data_type();
        let schema_name = data_type.schema_name().into_owned();
        let root = data_type.schema();
        if matches!(root, RefOr::Ref(_)) {
            return Err(RegistrationError::UnmappableSchema {
                type_name: data_type.type_name(),
                schema_name,
            });
        }

        let mut schemas = vec![(schema_name.clone(), root)];
        schemas.extend(data_type.referenced_schemas());
        let components = openapi.components.get_or_insert_with(Components::default);
        merge_schemas(components, schemas)?;

        openapi.paths.add_path_operation(
            descriptor.path(),
            vec![HttpMethod::Get],
            operation(descriptor, &schema_name),
        );
    }

    Ok(())
}

/// Returns the `operationId` of a synthesized endpoint.
#[must_use]
pub fn operation_id(slug: &str) -> String {
    format!("get_{}", slug.replace('-', "_"))
}

// A batch is checked against the document and against its own earlier
// entries before anything is inserted.
fn merge_schemas(
    components: &mut Components,
    schemas: Vec<(String, RefOr<Schema>)>,
) -> Result<(), RegistrationError> {
    let mut pending: Vec<(String, RefOr<Schema>)> = Vec::with_capacity(schemas.len());
    for (name, schema) in schemas {
        let known = components
            .schemas
            .get(&name)
            .or_else(|| pending.iter().find(|(n, _)| *n == name).map(|(_, s)| s));
        match known {
            Some(existing) if same_schema(existing, &schema) => {}
            Some(_) => return Err(RegistrationError::SchemaConflict { name }),
            None => pending.push((name, schema)),
        }
    }
    for (name, schema) in pending {
        components.schemas.insert(name, schema);
    }
    Ok(())
}

fn same_schema(a: &RefOr<Schema>, b: &RefOr<Schema>) -> bool {
    match (serde_json::to_value(a), serde_json::to_value(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn operation(descriptor: &DataProviderDescriptor, schema_name: &str) -> Operation {
    let id_parameter = ParameterBuilder::new()
        .name(ID_VARIABLE_NAME)
        .parameter_in(ParameterIn::Path)
        .required(Required::True)
        .description(Some("Vehicle/engine configuration id"))
        .schema(Some(
            ObjectBuilder::new()
                .schema_type(Type::Integer)
                .format(Some(SchemaFormat::KnownFormat(KnownFormat::Int32))),
        ));

    let ok = ResponseBuilder::new()
        .description("OK")
        .content(
            JSON_CONTENT_TYPE,
            ContentBuilder::new()
                .schema(Some(RefOr::T(Schema::Array(Array::new(
                    Ref::from_schema_name(schema_name),
                )))))
                .build(),
        )
        .build();

    let responses = error_responses()
        .into_iter()
        .fold(ResponsesBuilder::new().response("200", ok), |builder, (status, response)| {
            builder.response(status, response)
        });

    OperationBuilder::new()
        .tag(VEHICLE_TAG)
        .operation_id(Some(operation_id(descriptor.slug())))
        .summary(Some(format!(
            "List {schema_name} for a vehicle/engine configuration"
        )))
        .parameter(id_parameter)
        .responses(responses)
        .build()
}
