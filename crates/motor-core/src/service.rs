//! Collaborator contracts.
//!
//! The HTTP layer never fetches data itself: it resolves a lazy
//! configuration reference through a [`VehicleToEngineConfigRepository`] and
//! delegates the lookup to the matching [`FindMotorData`] implementation.
//! Errors raised here are passed through to clients with their status class
//! unchanged.

use async_trait::async_trait;

use crate::error::Result;
use crate::id::VehicleToEngineConfigId;
use crate::motor::{
    DrainPlugMap, EngineDrainPlugTorqueMap, FinalDriveTorqueMap, ManualTransmissionTorqueMap,
    MotorApplicationMap, OilFilterTorqueMap, TransferCaseTorqueMap,
};
use crate::vehicle::{
    MotorPart, ProductCategoryTableMap, Sort, VehicleSpecification, VehicleToEngineConfig,
    VehicleToEngineConfigRef,
};

/// Vehicle/engine configuration lookups.
#[async_trait]
pub trait VehicleToEngineConfigRepository: Send + Sync + 'static {
    /// Returns a lazy reference to the configuration with `id`.
    ///
    /// Must not perform I/O; existence is only checked by later lookups.
    fn get_reference_by_id(&self, id: VehicleToEngineConfigId) -> VehicleToEngineConfigRef {
        VehicleToEngineConfigRef::new(id)
    }

    /// Loads the display projection of a configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    async fn find_by_id(&self, id: VehicleToEngineConfigId)
    -> Result<Option<VehicleSpecification>>;
}

/// VIN decoding and part lookups.
#[async_trait]
pub trait MotorDataService: Send + Sync + 'static {
    /// Finds the configurations matching a VIN.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidInput`] if the VIN is rejected.
    async fn find_vehicle_to_engine_configs(&self, vin: &str) -> Result<Vec<VehicleToEngineConfig>>;

    /// Finds parts for a configuration across the given table mappings.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is unknown or the store fails.
    async fn find_parts_by_engine_and_motor_category(
        &self,
        vehicle: &VehicleToEngineConfigRef,
        table_maps: &[ProductCategoryTableMap],
    ) -> Result<Vec<MotorPart>>;
}

/// Fetches the motor data selected by the provider type `M`.
#[async_trait]
pub trait FindMotorData<M: MotorApplicationMap>: Send + Sync + 'static {
    /// Returns every record of `M::Data` for the configuration.
    ///
    /// An empty vector means the configuration has no such data.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Forbidden`], a not-found variant, or a store
    /// failure; callers pass these through untouched.
    async fn find_motor_data(
        &self,
        vehicle: &VehicleToEngineConfigRef,
        sort: Option<&Sort>,
    ) -> Result<Vec<M::Data>>;
}

/// Everything the HTTP layer needs from a backend.
///
/// Implemented automatically for any type that provides the individual
/// contracts for the standard provider set.
pub trait MotorDataBackend:
    VehicleToEngineConfigRepository
    + MotorDataService
    + FindMotorData<EngineDrainPlugTorqueMap>
    + FindMotorData<FinalDriveTorqueMap>
    + FindMotorData<ManualTransmissionTorqueMap>
    + FindMotorData<OilFilterTorqueMap>
    + FindMotorData<TransferCaseTorqueMap>
    + FindMotorData<DrainPlugMap>
{
}

impl<T> MotorDataBackend for T where
    T: VehicleToEngineConfigRepository
        + MotorDataService
        + FindMotorData<EngineDrainPlugTorqueMap>
        + FindMotorData<FinalDriveTorqueMap>
        + FindMotorData<ManualTransmissionTorqueMap>
        + FindMotorData<OilFilterTorqueMap>
        + FindMotorData<TransferCaseTorqueMap>
        + FindMotorData<DrainPlugMap>
{
}
