//! Vehicle, engine configuration and part records.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::id::VehicleToEngineConfigId;

/// Lazy reference to a vehicle/engine configuration.
///
/// Holds only the id; obtaining one never touches the data store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VehicleToEngineConfigRef {
    id: VehicleToEngineConfigId,
}

impl VehicleToEngineConfigRef {
    /// Creates a reference for `id`.
    #[must_use]
    pub const fn new(id: VehicleToEngineConfigId) -> Self {
        Self { id }
    }

    /// Returns the referenced id.
    #[must_use]
    pub const fn id(&self) -> VehicleToEngineConfigId {
        self.id
    }
}

/// Projection of a vehicle/engine configuration for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VehicleSpecification {
    /// Vehicle/engine configuration id.
    pub vehicle_to_engine_config_id: i32,
    /// Model year.
    pub year: i32,
    /// Model name.
    pub model: String,
    /// Make name.
    pub make_name: String,
    /// Submodel or trim description.
    pub description: String,
    /// Engine description.
    pub engine: String,
    /// Human readable summary, e.g. `2006 Honda Accord LX 2.4L`.
    pub display_text: String,
}

/// Reference to a related record by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct IdRef {
    /// Related record id.
    pub id: i32,
}

/// A vehicle/engine configuration returned by VIN lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VehicleToEngineConfig {
    /// Configuration id.
    pub id: i32,
    /// Vehicle the configuration belongs to.
    pub vehicle: IdRef,
    /// Engine configuration.
    pub engine_config: IdRef,
}

/// A part applicable to a vehicle/engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MotorPart {
    /// Part record id.
    pub id: i32,
    /// Manufacturer part number.
    pub part_number: String,
    /// Part description.
    pub description: String,
    /// Motor category the part is filed under.
    pub motor_category: String,
}

/// Maps a store product category onto a motor data table and category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductCategoryTableMap {
    /// Motor table the parts live in.
    pub table: String,
    /// Category within that table.
    pub motor_category: String,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    /// Ascending.
    #[default]
    Asc,
    /// Descending.
    Desc,
}

/// Ordering requested from a motor data lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    /// JSON property to order by.
    pub property: String,
    /// Direction.
    #[serde(default)]
    pub direction: Direction,
}

impl Sort {
    /// Ascending order on `property`.
    pub fn asc(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            direction: Direction::Asc,
        }
    }

    /// Descending order on `property`.
    pub fn desc(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            direction: Direction::Desc,
        }
    }
}
