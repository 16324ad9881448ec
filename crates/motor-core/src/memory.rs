//! In-memory motor data collaborator for local runs and tests.
//!
//! Implements every collaborator contract in [`crate::service`] over data
//! seeded programmatically or loaded from a JSON fixture file. Not suitable
//! for production.
//!
//! # Fixture format
//!
//! ```json
//! {
//!   "vehicles": [
//!     {
//!       "id": 537152,
//!       "specification": { "vehicleToEngineConfigId": 537152, "year": 2006, "...": "..." },
//!       "motorData": { "OilFilterTorqueMap": [ { "id": 10001, "...": "..." } ] },
//!       "parts": [ { "table": "Filters", "part": { "id": 1, "...": "..." } } ]
//!     }
//!   ],
//!   "vins": { "1HGCM82633A004352": [ { "id": 537152, "vehicle": { "id": 1 }, "engineConfig": { "id": 2 } } ] }
//! }
//! ```

use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::id::VehicleToEngineConfigId;
use crate::motor::MotorApplicationMap;
use crate::service::{FindMotorData, MotorDataService, VehicleToEngineConfigRepository};
use crate::vehicle::{
    Direction, MotorPart, ProductCategoryTableMap, Sort, VehicleSpecification,
    VehicleToEngineConfig, VehicleToEngineConfigRef,
};

const RESOURCE_TYPE: &str = "VehicleToEngineConfig";

/// In-memory implementation of the motor data collaborators.
///
/// Thread-safe via `RwLock`. Motor data is kept as JSON values keyed by the
/// provider type name, so any [`MotorApplicationMap`] can be served without
/// changing the store.
#[derive(Debug, Default, Clone)]
pub struct MemoryMotorDataStore {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    vehicles: HashMap<i32, VehicleRecord>,
    vins: HashMap<String, Vec<VehicleToEngineConfig>>,
}

#[derive(Debug, Default)]
struct VehicleRecord {
    specification: Option<VehicleSpecification>,
    motor_data: HashMap<String, Vec<Value>>,
    parts: Vec<StoredPart>,
}

#[derive(Debug, Clone, Deserialize)]
struct StoredPart {
    table: String,
    part: MotorPart,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Fixtures {
    #[serde(default)]
    vehicles: Vec<VehicleFixture>,
    #[serde(default)]
    vins: HashMap<String, Vec<VehicleToEngineConfig>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VehicleFixture {
    id: i32,
    #[serde(default)]
    specification: Option<VehicleSpecification>,
    #[serde(default)]
    motor_data: HashMap<String, Vec<Value>>,
    #[serde(default)]
    parts: Vec<StoredPart>,
}

impl MemoryMotorDataStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a store from a JSON fixture file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the file is missing and
    /// [`Error::Serialization`] if it is not a valid fixture document.
    pub fn from_fixtures(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => {
                Error::NotFound(format!("fixture file not found: {}", path.display()))
            }
            _ => Error::internal(format!("failed to read {}: {e}", path.display())),
        })?;
        Self::from_fixture_json(&raw)
    }

    /// Loads a store from a JSON fixture document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialization`] if the document is malformed.
    pub fn from_fixture_json(raw: &str) -> Result<Self> {
        let fixtures: Fixtures = serde_json::from_str(raw)?;
        let mut inner = Inner {
            vins: fixtures
                .vins
                .into_iter()
                .map(|(vin, configs)| (vin.to_ascii_uppercase(), configs))
                .collect(),
            ..Inner::default()
        };
        for vehicle in fixtures.vehicles {
            inner.vehicles.insert(
                vehicle.id,
                VehicleRecord {
                    specification: vehicle.specification,
                    motor_data: vehicle.motor_data,
                    parts: vehicle.parts,
                },
            );
        }
        tracing::debug!(
            vehicles = inner.vehicles.len(),
            vins = inner.vins.len(),
            "loaded motor data fixtures"
        );
        Ok(Self {
            inner: Arc::new(RwLock::new(inner)),
        })
    }

    /// Registers a configuration, optionally with its display projection.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Internal`] if the store lock is poisoned.
    pub fn insert_vehicle(
        &self,
        id: VehicleToEngineConfigId,
        specification: Option<VehicleSpecification>,
    ) -> Result<()> {
        self.write()?
            .vehicles
            .entry(id.get())
            .or_default()
            .specification = specification;
        Ok(())
    }

    /// Replaces the `M` records of a configuration, registering it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if a record cannot be serialized or the lock is poisoned.
    pub fn insert_motor_data<M: MotorApplicationMap>(
        &self,
        id: VehicleToEngineConfigId,
        records: &[M::Data],
    ) -> Result<()> {
        let values = records
            .iter()
            .map(serde_json::to_value)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        self.write()?
            .vehicles
            .entry(id.get())
            .or_default()
            .motor_data
            .insert(M::TYPE_NAME.to_string(), values);
        Ok(())
    }

    /// Files a part under `table` for a configuration, registering it if needed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Internal`] if the store lock is poisoned.
    pub fn insert_part(
        &self,
        id: VehicleToEngineConfigId,
        table: impl Into<String>,
        part: MotorPart,
    ) -> Result<()> {
        self.write()?
            .vehicles
            .entry(id.get())
            .or_default()
            .parts
            .push(StoredPart {
                table: table.into(),
                part,
            });
        Ok(())
    }

    /// Maps a VIN onto configurations.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Internal`] if the store lock is poisoned.
    pub fn insert_vin(
        &self,
        vin: impl Into<String>,
        configs: Vec<VehicleToEngineConfig>,
    ) -> Result<()> {
        self.write()?
            .vins
            .insert(vin.into().to_ascii_uppercase(), configs);
        Ok(())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Inner>> {
        self.inner.read().map_err(|_| Error::Internal {
            message: "lock poisoned".into(),
        })
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Inner>> {
        self.inner.write().map_err(|_| Error::Internal {
            message: "lock poisoned".into(),
        })
    }
}

#[async_trait]
impl VehicleToEngineConfigRepository for MemoryMotorDataStore {
    async fn find_by_id(
        &self,
        id: VehicleToEngineConfigId,
    ) -> Result<Option<VehicleSpecification>> {
        let inner = self.read()?;
        Ok(inner
            .vehicles
            .get(&id.get())
            .and_then(|vehicle| vehicle.specification.clone()))
    }
}

#[async_trait]
impl MotorDataService for MemoryMotorDataStore {
    async fn find_vehicle_to_engine_configs(&self, vin: &str) -> Result<Vec<VehicleToEngineConfig>> {
        validate_vin(vin)?;
        let inner = self.read()?;
        Ok(inner
            .vins
            .get(&vin.to_ascii_uppercase())
            .cloned()
            .unwrap_or_default())
    }

    async fn find_parts_by_engine_and_motor_category(
        &self,
        vehicle: &VehicleToEngineConfigRef,
        table_maps: &[ProductCategoryTableMap],
    ) -> Result<Vec<MotorPart>> {
        let inner = self.read()?;
        let record = inner
            .vehicles
            .get(&vehicle.id().get())
            .ok_or_else(|| Error::resource_not_found(RESOURCE_TYPE, vehicle.id()))?;

        Ok(record
            .parts
            .iter()
            .filter(|stored| {
                table_maps.iter().any(|map| {
                    map.table == stored.table && map.motor_category == stored.part.motor_category
                })
            })
            .map(|stored| stored.part.clone())
            .collect())
    }
}

#[async_trait]
impl<M: MotorApplicationMap> FindMotorData<M> for MemoryMotorDataStore {
    async fn find_motor_data(
        &self,
        vehicle: &VehicleToEngineConfigRef,
        sort: Option<&Sort>,
    ) -> Result<Vec<M::Data>> {
        let mut values = {
            let inner = self.read()?;
            let record = inner
                .vehicles
                .get(&vehicle.id().get())
                .ok_or_else(|| Error::resource_not_found(RESOURCE_TYPE, vehicle.id()))?;
            record
                .motor_data
                .get(M::TYPE_NAME)
                .cloned()
                .unwrap_or_default()
        };

        if let Some(sort) = sort {
            values.sort_by(|a, b| {
                let ordering = compare_json(a.get(&sort.property), b.get(&sort.property));
                match sort.direction {
                    Direction::Asc => ordering,
                    Direction::Desc => ordering.reverse(),
                }
            });
        }

        values
            .into_iter()
            .map(|value| serde_json::from_value(value).map_err(Error::from))
            .collect()
    }
}

fn validate_vin(vin: &str) -> Result<()> {
    let len = vin.len();
    if !(17..=18).contains(&len) || !vin.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(Error::InvalidInput(format!(
            "VIN must be 17 or 18 alphanumeric characters: {vin}"
        )));
    }
    Ok(())
}

// Missing values sort first; numbers before strings before everything else.
fn compare_json(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(Value::Number(a)), Some(Value::Number(b))) => {
            let a = a.as_f64().unwrap_or(f64::NAN);
            let b = b.as_f64().unwrap_or(f64::NAN);
            a.partial_cmp(&b).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        (Some(Value::Number(_)), Some(_)) => Ordering::Less,
        (Some(_), Some(Value::Number(_))) => Ordering::Greater,
        (Some(Value::String(_)), Some(_)) => Ordering::Less,
        (Some(_), Some(Value::String(_))) => Ordering::Greater,
        (Some(_), Some(_)) => Ordering::Equal,
    }
}
