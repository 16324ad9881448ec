//! Vehicle specification, parts, and VIN route integration tests.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde::de::DeserializeOwned;
use tower::ServiceExt;

use motor_api::config::PartsCategoryMapping;
use motor_api::server::ServerBuilder;
use motor_core::MemoryMotorDataStore;
use motor_core::vehicle::{
    MotorPart, ProductCategoryTableMap, VehicleSpecification, VehicleToEngineConfig,
};

const FIXTURES: &str = r#"{
  "vehicles": [
    {
      "id": 537152,
      "specification": {
        "vehicleToEngineConfigId": 537152,
        "year": 2006,
        "model": "Accord",
        "makeName": "Honda",
        "description": "EX Sedan",
        "engine": "2.4L L4",
        "displayText": "2006 Honda Accord EX Sedan 2.4L L4"
      },
      "parts": [
        { "table": "Filters", "part": { "id": 1, "partNumber": "PH7317", "description": "Oil filter", "motorCategory": "Oil Filter" } },
        { "table": "Filters", "part": { "id": 2, "partNumber": "CA10165", "description": "Air filter", "motorCategory": "Air Filter" } },
        { "table": "Wipers", "part": { "id": 3, "partNumber": "W-26", "description": "Wiper blade", "motorCategory": "Oil Filter" } }
      ]
    }
  ],
  "vins": {
    "1hgcm82633a004352": [ { "id": 537152, "vehicle": { "id": 11 }, "engineConfig": { "id": 22 } } ]
  }
}"#;

fn mapping() -> PartsCategoryMapping {
    let mut mapping = PartsCategoryMapping::new();
    mapping.insert(
        "OIL_FILTER".to_string(),
        vec![ProductCategoryTableMap {
            table: "Filters".to_string(),
            motor_category: "Oil Filter".to_string(),
        }],
    );
    mapping
}

fn test_router() -> Result<axum::Router> {
    let store = MemoryMotorDataStore::from_fixture_json(FIXTURES)?;
    Ok(ServerBuilder::new()
        .debug(true)
        .parts_category_mapping(mapping())
        .backend(Arc::new(store))
        .build()
        .test_router()?)
}

async fn get_json<T: DeserializeOwned>(uri: &str) -> Result<(StatusCode, T)> {
    let request = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .context("build request")?;
    let response = test_router()?
        .oneshot(request)
        .await
        .map_err(|err| match err {})?;
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .context("read response body")?;
    let value = serde_json::from_slice(&body).context("parse JSON body")?;
    Ok((status, value))
}

#[tokio::test]
async fn test_vehicle_specification_found() -> Result<()> {
    let (status, spec): (_, VehicleSpecification) =
        get_json("/v1/vehicle-specifications/537152").await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(spec.vehicle_to_engine_config_id, 537_152);
    assert_eq!(spec.make_name, "Honda");
    assert_eq!(spec.display_text, "2006 Honda Accord EX Sedan 2.4L L4");
    Ok(())
}

#[tokio::test]
async fn test_vehicle_specification_missing_is_404() -> Result<()> {
    let (status, body): (_, serde_json::Value) =
        get_json("/v1/vehicle-specifications/1").await?;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
    Ok(())
}

#[tokio::test]
async fn test_vehicle_specification_rejects_malformed_id() -> Result<()> {
    let (status, body): (_, serde_json::Value) =
        get_json("/v1/vehicle-specifications/123ABC").await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["rejectedValue"], "123ABC");
    Ok(())
}

#[tokio::test]
async fn test_vehicle_specification_rejects_undecodable_id() -> Result<()> {
    let (status, body): (_, serde_json::Value) =
        get_json("/v1/vehicle-specifications/%FF").await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
    assert_eq!(body["rejectedValue"], "%FF");
    Ok(())
}

#[tokio::test]
async fn test_parts_are_filtered_by_mapped_table_and_category() -> Result<()> {
    let (status, parts): (_, Vec<MotorPart>) =
        get_json("/v1/vehicle-specifications/537152/parts/OIL_FILTER").await?;

    assert_eq!(status, StatusCode::OK);
    let numbers: Vec<_> = parts.iter().map(|p| p.part_number.as_str()).collect();
    assert_eq!(numbers, ["PH7317"]);
    Ok(())
}

#[tokio::test]
async fn test_unmapped_category_has_no_parts() -> Result<()> {
    let (status, parts): (_, Vec<MotorPart>) =
        get_json("/v1/vehicle-specifications/537152/parts/WIPER_BLADE").await?;

    assert_eq!(status, StatusCode::OK);
    assert!(parts.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_parts_for_unknown_vehicle_is_404() -> Result<()> {
    let (status, _): (_, serde_json::Value) =
        get_json("/v1/vehicle-specifications/1/parts/OIL_FILTER").await?;

    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn test_vin_lookup_is_case_insensitive() -> Result<()> {
    let (status, configs): (_, Vec<VehicleToEngineConfig>) =
        get_json("/v1/vehicles?vin=1HGCM82633A004352").await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(configs.len(), 1);
    assert_eq!(configs[0].id, 537_152);
    assert_eq!(configs[0].engine_config.id, 22);
    Ok(())
}

#[tokio::test]
async fn test_unknown_vin_has_no_configurations() -> Result<()> {
    let (status, configs): (_, Vec<VehicleToEngineConfig>) =
        get_json("/v1/vehicles?vin=2T1BURHE0JC000000").await?;

    assert_eq!(status, StatusCode::OK);
    assert!(configs.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_vin_lookup_rejects_missing_or_malformed_vin() -> Result<()> {
    for uri in ["/v1/vehicles", "/v1/vehicles?vin=SHORT", "/v1/vehicles?vin=1HGCM82633A00435!"] {
        let (status, body): (_, serde_json::Value) = get_json(uri).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST, "uri {uri}");
        assert_eq!(body["code"], "BAD_REQUEST");
    }
    Ok(())
}

#[tokio::test]
async fn test_catalog_route_serves_json() -> Result<()> {
    let request = Request::builder()
        .uri("/v3/api-docs")
        .body(Body::empty())
        .context("build request")?;
    let response = test_router()?
        .oneshot(request)
        .await
        .map_err(|err| match err {})?;

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok());
    assert!(content_type.is_some_and(|value| value.starts_with("application/json")));

    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .context("read response body")?;
    let catalog: serde_json::Value = serde_json::from_slice(&body).context("parse JSON body")?;
    assert_eq!(catalog["info"]["title"], "Motor API");
    assert!(
        catalog["paths"]
            .get("/v1/vehicle-specifications/{vehicleToEngineConfigId}/drain-plug")
            .is_some()
    );
    Ok(())
}

#[tokio::test]
async fn test_generated_request_id_is_returned() -> Result<()> {
    let request = Request::builder()
        .uri("/v1/vehicle-specifications/AAAA")
        .body(Body::empty())
        .context("build request")?;
    let response = test_router()?
        .oneshot(request)
        .await
        .map_err(|err| match err {})?;

    let header_id = response
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .context("missing x-request-id header")?;
    let body = axum::body::to_bytes(response.into_body(), 4096)
        .await
        .context("read response body")?;
    let body: serde_json::Value = serde_json::from_slice(&body).context("parse JSON body")?;

    assert_eq!(header_id.len(), 26);
    assert_eq!(body["requestId"], header_id);
    Ok(())
}
