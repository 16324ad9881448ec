//! `OpenAPI` catalog contract tests.
//!
//! Checks the synthesized operations and the idempotence of re-synthesis.

use std::collections::BTreeSet;
use std::sync::Arc;

use anyhow::{Context, Result};
use futures::FutureExt;
use futures::future::BoxFuture;
use proptest::prelude::*;
use serde_json::Value;
use utoipa::openapi::schema::Object;
use utoipa::openapi::{Components, RefOr, Schema};

use motor_api::openapi::{self, synthesize};
use motor_api::registry::{RegistrationError, RouteTable};
use motor_core::motor::{
    DrainPlugMap, EngineDrainPlugTorqueMap, FinalDriveTorqueMap, ManualTransmissionTorqueMap,
    OilFilterTorqueMap, TransferCaseTorqueMap,
};
use motor_core::{MemoryMotorDataStore, VehicleToEngineConfigRef};

const SLUGS: [(&str, &str); 6] = [
    ("engine-drain-plug-torque", "EngineDrainPlugTorque"),
    ("final-drive-torque", "FinalDriveTorque"),
    ("manual-transmission-torque", "ManualTransmissionTorque"),
    ("oil-filter-torque", "OilFilterTorque"),
    ("transfer-case-torque", "TransferCaseTorque"),
    ("drain-plug", "DrainPlug"),
];

const ERROR_REF: &str = "#/components/schemas/ApiErrorResponse";

fn empty<D: Send + 'static>(
    _reference: VehicleToEngineConfigRef,
) -> BoxFuture<'static, motor_core::Result<Vec<D>>> {
    async { Ok(Vec::new()) }.boxed()
}

/// Builds a table holding the providers whose bit is set in `mask`.
fn table_for(mask: u8) -> Result<RouteTable, RegistrationError> {
    let mut builder = RouteTable::builder(Arc::new(MemoryMotorDataStore::new()));
    if mask & 0b00_0001 != 0 {
        builder = builder.register::<EngineDrainPlugTorqueMap>(empty)?;
    }
    if mask & 0b00_0010 != 0 {
        builder = builder.register::<FinalDriveTorqueMap>(empty)?;
    }
    if mask & 0b00_0100 != 0 {
        builder = builder.register::<ManualTransmissionTorqueMap>(empty)?;
    }
    if mask & 0b00_1000 != 0 {
        builder = builder.register::<OilFilterTorqueMap>(empty)?;
    }
    if mask & 0b01_0000 != 0 {
        builder = builder.register::<TransferCaseTorqueMap>(empty)?;
    }
    if mask & 0b10_0000 != 0 {
        builder = builder.register::<DrainPlugMap>(empty)?;
    }
    Ok(builder.build())
}

fn catalog_json() -> Result<Value> {
    let json = openapi::openapi_json().context("generate OpenAPI JSON")?;
    serde_json::from_str(&json).context("parse OpenAPI JSON")
}

fn motor_data_operation<'a>(catalog: &'a Value, slug: &str) -> Result<&'a Value> {
    let path = format!("/v1/vehicle-specifications/{{vehicleToEngineConfigId}}/{slug}");
    catalog["paths"]
        .get(&path)
        .and_then(|item| item.get("get"))
        .with_context(|| format!("missing GET {path}"))
}

#[test]
fn test_every_provider_has_a_documented_operation() -> Result<()> {
    let catalog = catalog_json()?;

    for (slug, schema) in SLUGS {
        let operation = motor_data_operation(&catalog, slug)?;
        assert_eq!(
            operation["operationId"],
            format!("get_{}", slug.replace('-', "_"))
        );
        assert_eq!(operation["tags"][0], "Vehicle");

        let ok_schema = &operation["responses"]["200"]["content"]["application/json"]["schema"];
        assert_eq!(ok_schema["type"], "array");
        assert_eq!(
            ok_schema["items"]["$ref"],
            format!("#/components/schemas/{schema}")
        );
        assert!(
            catalog["components"]["schemas"].get(schema).is_some(),
            "schema {schema} not registered"
        );
    }
    Ok(())
}

#[test]
fn test_operations_document_exactly_the_shared_responses() -> Result<()> {
    let catalog = catalog_json()?;
    let expected: BTreeSet<&str> = ["200", "400", "403", "404", "500"].into_iter().collect();

    for (slug, _) in SLUGS {
        let operation = motor_data_operation(&catalog, slug)?;
        let responses = operation["responses"]
            .as_object()
            .context("responses must be an object")?;
        let statuses: BTreeSet<&str> = responses.keys().map(String::as_str).collect();
        assert_eq!(statuses, expected, "slug {slug}");

        for status in ["400", "403", "404", "500"] {
            assert_eq!(
                responses[status]["content"]["application/json"]["schema"]["$ref"],
                ERROR_REF,
                "slug {slug} status {status}"
            );
        }
    }
    Ok(())
}

#[test]
fn test_id_parameter_is_a_required_int32_path_variable() -> Result<()> {
    let catalog = catalog_json()?;

    for (slug, _) in SLUGS {
        let operation = motor_data_operation(&catalog, slug)?;
        let parameters = operation["parameters"]
            .as_array()
            .context("parameters must be an array")?;
        assert_eq!(parameters.len(), 1);
        let parameter = &parameters[0];
        assert_eq!(parameter["name"], "vehicleToEngineConfigId");
        assert_eq!(parameter["in"], "path");
        assert_eq!(parameter["required"], true);
        assert_eq!(parameter["schema"]["type"], "integer");
        assert_eq!(parameter["schema"]["format"], "int32");
    }
    Ok(())
}

#[test]
fn test_hand_written_operations_share_the_error_responses() -> Result<()> {
    let catalog = catalog_json()?;

    for (path, tag) in [
        ("/v1/vehicle-specifications/{vehicleToEngineConfigId}", "Vehicle"),
        (
            "/v1/vehicle-specifications/{vehicleToEngineConfigId}/parts/{productCategoryCode}",
            "Vehicle",
        ),
        ("/v1/vehicles", "Motor"),
    ] {
        let operation = catalog["paths"][path]
            .get("get")
            .with_context(|| format!("missing GET {path}"))?;
        assert_eq!(operation["tags"][0], tag);
        for status in ["400", "403", "404", "500"] {
            assert_eq!(
                operation["responses"][status]["content"]["application/json"]["schema"]["$ref"],
                ERROR_REF,
                "path {path} status {status}"
            );
        }
    }
    Ok(())
}

#[test]
fn test_nested_schemas_are_registered() -> Result<()> {
    let catalog = catalog_json()?;
    let schemas = &catalog["components"]["schemas"];
    for name in ["QuickLubeNote", "OilFilterProcedure", "OilFilterType", "ApiErrorResponse"] {
        assert!(schemas.get(name).is_some(), "schema {name} not registered");
    }
    Ok(())
}

#[test]
fn test_conflicting_schema_leaves_document_untouched() -> Result<()> {
    let table = table_for(0b00_1000)?;
    let mut document = openapi::openapi();
    let components = document
        .components
        .get_or_insert_with(Components::default);
    components.schemas.insert(
        "OilFilterTorque".to_string(),
        RefOr::T(Schema::Object(Object::new())),
    );
    let before = serde_json::to_value(&document)?;

    let err = synthesize(&table, &mut document).unwrap_err();

    assert_eq!(
        err,
        RegistrationError::SchemaConflict {
            name: "OilFilterTorque".to_string()
        }
    );
    assert_eq!(serde_json::to_value(&document)?, before);
    Ok(())
}

proptest! {
    #[test]
    fn prop_resynthesis_is_idempotent(mask in 0u8..64, repetitions in 1usize..5) {
        let table = table_for(mask).map_err(|e| TestCaseError::fail(e.to_string()))?;

        let mut once = openapi::openapi();
        synthesize(&table, &mut once).map_err(|e| TestCaseError::fail(e.to_string()))?;

        let mut repeated = openapi::openapi();
        for _ in 0..repetitions {
            synthesize(&table, &mut repeated).map_err(|e| TestCaseError::fail(e.to_string()))?;
        }

        let once = serde_json::to_value(&once).map_err(|e| TestCaseError::fail(e.to_string()))?;
        let repeated =
            serde_json::to_value(&repeated).map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(once, repeated);
    }

    #[test]
    fn prop_one_operation_per_registered_provider(mask in 0u8..64) {
        let table = table_for(mask).map_err(|e| TestCaseError::fail(e.to_string()))?;
        let mut document = openapi::openapi();
        let static_paths = document.paths.paths.len();
        synthesize(&table, &mut document).map_err(|e| TestCaseError::fail(e.to_string()))?;

        prop_assert_eq!(table.len(), mask.count_ones() as usize);
        prop_assert_eq!(document.paths.paths.len(), static_paths + table.len());
        for descriptor in &table {
            prop_assert!(document.paths.paths.contains_key(descriptor.path()));
        }
    }
}
