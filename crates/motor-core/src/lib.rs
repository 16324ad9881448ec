//! # motor-core
//!
//! Domain types and collaborator contracts for the motor vehicle
//! specification API.
//!
//! - **Identifiers**: [`VehicleToEngineConfigId`] and its path coercion rules
//! - **Motor data**: record types and the provider (`…Map`) marker types that select them
//! - **Collaborators**: async traits for the repository and data service
//! - **Error Types**: shared error definitions and result types
//! - **In-memory store**: a fixture-backed collaborator for local runs and tests
//!
//! ## Example
//!
//! ```rust
//! use motor_core::prelude::*;
//!
//! let id = VehicleToEngineConfigId::parse("537152").unwrap();
//! assert_eq!(OilFilterTorqueMap::TYPE_NAME, "OilFilterTorqueMap");
//! let _reference = VehicleToEngineConfigRef::new(id);
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod id;
pub mod memory;
pub mod motor;
pub mod observability;
pub mod service;
pub mod vehicle;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust
/// use motor_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::id::{IdParseError, IdParseErrorKind, VehicleToEngineConfigId};
    pub use crate::memory::MemoryMotorDataStore;
    pub use crate::motor::{
        DrainPlug, DrainPlugMap, EngineDrainPlugTorque, EngineDrainPlugTorqueMap,
        FinalDriveTorque, FinalDriveTorqueMap, ManualTransmissionTorque,
        ManualTransmissionTorqueMap, MotorApplicationMap, MotorData, OilFilterTorque,
        OilFilterTorqueMap, TransferCaseTorque, TransferCaseTorqueMap,
    };
    pub use crate::service::{
        FindMotorData, MotorDataBackend, MotorDataService, VehicleToEngineConfigRepository,
    };
    pub use crate::vehicle::{
        MotorPart, ProductCategoryTableMap, Sort, VehicleSpecification, VehicleToEngineConfig,
        VehicleToEngineConfigRef,
    };
}

// Re-export key types at crate root for ergonomics
pub use error::{Error, Result};
pub use id::{IdParseError, IdParseErrorKind, VehicleToEngineConfigId};
pub use memory::MemoryMotorDataStore;
pub use motor::{MotorApplicationMap, MotorData};
pub use observability::{LogFormat, init_logging};
pub use service::{
    FindMotorData, MotorDataBackend, MotorDataService, VehicleToEngineConfigRepository,
};
pub use vehicle::{Sort, VehicleToEngineConfigRef};
