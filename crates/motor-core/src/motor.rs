//! Motor data records and the provider ("map") types that select them.
//!
//! A *map* type is a zero-sized marker whose name follows the
//! `<DataName>Map` convention and whose [`MotorApplicationMap::Data`] fixes
//! the record type it produces for a vehicle/engine configuration. The HTTP
//! layer derives an endpoint path from the map's name and a documentation
//! schema from its data type.
//!
//! ```rust
//! use motor_core::motor::{MotorApplicationMap, OilFilterTorque, OilFilterTorqueMap};
//!
//! assert_eq!(OilFilterTorqueMap::TYPE_NAME, "OilFilterTorqueMap");
//! let _: Vec<<OilFilterTorqueMap as MotorApplicationMap>::Data> = Vec::<OilFilterTorque>::new();
//! ```

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A record type served by a motor data provider.
pub trait MotorData:
    Serialize + DeserializeOwned + ToSchema + Clone + Send + Sync + 'static
{
}

/// Binds a provider type to the motor data it produces.
pub trait MotorApplicationMap: Send + Sync + 'static {
    /// Simple (unqualified) name of the provider type, e.g. `OilFilterTorqueMap`.
    const TYPE_NAME: &'static str;

    /// Record type produced for a vehicle/engine configuration.
    type Data: MotorData;
}

/// Declares provider marker types.
///
/// ```rust
/// use motor_core::motor::{DrainPlug, MotorApplicationMap};
///
/// motor_core::motor_application_map! {
///     /// Drain plugs, served under a second name.
///     pub struct SpareDrainPlugMap => DrainPlug;
/// }
///
/// assert_eq!(SpareDrainPlugMap::TYPE_NAME, "SpareDrainPlugMap");
/// ```
#[macro_export]
macro_rules! motor_application_map {
    ($($(#[$meta:meta])* $vis:vis struct $name:ident => $data:ty;)+) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
            $vis struct $name;

            impl $crate::motor::MotorApplicationMap for $name {
                const TYPE_NAME: &'static str = stringify!($name);
                type Data = $data;
            }
        )+
    };
}

motor_application_map! {
    /// Engine oil drain plug torque specifications.
    pub struct EngineDrainPlugTorqueMap => EngineDrainPlugTorque;
    /// Final drive (differential) drain/fill plug torque specifications.
    pub struct FinalDriveTorqueMap => FinalDriveTorque;
    /// Manual transmission drain/fill plug torque specifications.
    pub struct ManualTransmissionTorqueMap => ManualTransmissionTorque;
    /// Oil filter torque specifications.
    pub struct OilFilterTorqueMap => OilFilterTorque;
    /// Transfer case drain/fill plug torque specifications.
    pub struct TransferCaseTorqueMap => TransferCaseTorque;
    /// Drain plug part fitments.
    pub struct DrainPlugMap => DrainPlug;
}

/// Free-text note attached to a quick lube specification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct QuickLubeNote {
    /// Note identifier.
    pub id: String,
    /// Note text.
    pub value: String,
}

impl QuickLubeNote {
    /// Creates a note.
    pub fn new(id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            value: value.into(),
        }
    }
}

/// How the oil filter is removed and installed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct OilFilterProcedure {
    /// Procedure code.
    pub id: String,
    /// Procedure description.
    pub value: String,
}

/// Oil filter construction (spin-on, cartridge, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct OilFilterType {
    /// Type code.
    pub id: String,
    /// Type description.
    pub value: String,
}

/// Oil filter torque specification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OilFilterTorque {
    /// Record id.
    pub id: i32,
    /// Applicability qualifier.
    pub qualifier: String,
    /// Torque in foot-pounds, including the unit.
    pub torque_ft_lbs: String,
    /// Torque in newton-metres, including the unit.
    pub torque_nm: String,
    /// Removal/installation procedure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oil_filter_procedure: Option<OilFilterProcedure>,
    /// Filter construction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oil_filter_type: Option<OilFilterType>,
    /// Notes for the technician.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<QuickLubeNote>,
}

/// Engine oil drain plug torque specification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EngineDrainPlugTorque {
    /// Record id.
    pub id: i32,
    /// Drain plug type.
    #[serde(rename = "type")]
    pub kind: String,
    /// Torque in foot-pounds, including the unit.
    pub torque_ft_lbs: String,
    /// Notes for the technician.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<QuickLubeNote>,
}

/// Final drive drain/fill plug torque specification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FinalDriveTorque {
    /// Record id.
    pub id: i32,
    /// Final drive type.
    #[serde(rename = "type")]
    pub kind: String,
    /// Fill plug torque, including the unit.
    pub fill_plug_torque_ft_lbs: String,
    /// Drain plug torque, including the unit.
    pub drain_plug_torque_ft_lbs: String,
    /// Notes for the technician.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<QuickLubeNote>,
}

/// Manual transmission drain/fill plug torque specification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ManualTransmissionTorque {
    /// Record id.
    pub id: i32,
    /// Transmission type.
    #[serde(rename = "type")]
    pub kind: String,
    /// Fill plug torque, including the unit.
    pub fill_plug_torque_ft_lbs: String,
    /// Drain plug torque, including the unit.
    pub drain_plug_torque_ft_lbs: String,
    /// Notes for the technician.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<QuickLubeNote>,
}

/// Transfer case drain/fill plug torque specification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransferCaseTorque {
    /// Record id.
    pub id: i32,
    /// Transfer case type.
    #[serde(rename = "type")]
    pub kind: String,
    /// Fill plug torque, including the unit.
    pub fill_plug_torque_ft_lbs: String,
    /// Drain plug torque, including the unit.
    pub drain_plug_torque_ft_lbs: String,
    /// Notes for the technician.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<QuickLubeNote>,
}

/// Drain plug part fitment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DrainPlug {
    /// Record id.
    pub id: i32,
    /// Store product code.
    pub product_code: String,
    /// Thread size.
    pub size: String,
}

impl MotorData for OilFilterTorque {}
impl MotorData for EngineDrainPlugTorque {}
impl MotorData for FinalDriveTorque {}
impl MotorData for ManualTransmissionTorque {}
impl MotorData for TransferCaseTorque {}
impl MotorData for DrainPlug {}
