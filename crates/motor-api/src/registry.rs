//! Motor data provider registry.
//!
//! A [`RouteTable`] is the ordered set of provider descriptors built once at
//! startup. Each descriptor binds a derived endpoint path to a data type
//! token and the dispatcher handler that serves it. The table is read-only
//! after [`RouteTableBuilder::build`] and drives both routing and the
//! `OpenAPI` catalog.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use futures::FutureExt;
//! use motor_api::registry::RouteTable;
//! use motor_core::motor::OilFilterTorqueMap;
//! use motor_core::MemoryMotorDataStore;
//!
//! let table = RouteTable::builder(Arc::new(MemoryMotorDataStore::new()))
//!     .register::<OilFilterTorqueMap>(|_reference| async { Ok(Vec::new()) }.boxed())
//!     .unwrap()
//!     .build();
//!
//! assert_eq!(
//!     table.descriptors()[0].path(),
//!     "/v1/vehicle-specifications/{vehicleToEngineConfigId}/oil-filter-torque"
//! );
//! ```

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use axum::Router;
use axum::routing::MethodRouter;
use futures::future::BoxFuture;
use utoipa::openapi::{RefOr, Schema};
use utoipa::{PartialSchema, ToSchema};

use motor_core::{
    MotorApplicationMap, VehicleToEngineConfigId, VehicleToEngineConfigRef,
    VehicleToEngineConfigRepository,
};

use crate::paths::{derive_path, motor_data_path, route_template, validate_slug};

/// Errors raised while building the route table or its catalog.
///
/// All of these are startup failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    /// A provider type name does not follow the `<Name>Map` convention.
    #[error("malformed provider type name `{type_name}`: {reason}")]
    MalformedTypeName {
        /// The offending type name.
        type_name: String,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// An explicit slug is not lower-hyphen case.
    #[error("malformed endpoint slug `{slug}`")]
    MalformedSlug {
        /// The offending slug.
        slug: String,
    },

    /// Two providers resolved to the same endpoint path.
    #[error("duplicate motor data path `{path}` (registered by `{existing}` and `{type_name}`)")]
    DuplicatePath {
        /// The contested path.
        path: String,
        /// Provider already registered under the path.
        existing: &'static str,
        /// Provider that was rejected.
        type_name: &'static str,
    },

    /// A data type reported an empty schema name.
    #[error("data type of `{type_name}` has an empty schema name")]
    EmptySchemaName {
        /// Provider whose data type is unnamed.
        type_name: &'static str,
    },

    /// A different schema is already registered under the same name.
    #[error("schema `{name}` is already registered with a different definition")]
    SchemaConflict {
        /// The contested schema name.
        name: String,
    },

    /// A data type's schema cannot be described as a component.
    #[error("schema `{schema_name}` of `{type_name}` is a bare reference and cannot be registered")]
    UnmappableSchema {
        /// Provider whose data type is unmappable.
        type_name: &'static str,
        /// The data type's schema name.
        schema_name: String,
    },
}

impl From<RegistrationError> for motor_core::Error {
    fn from(value: RegistrationError) -> Self {
        Self::internal(value.to_string())
    }
}

/// Fetch function registered for a provider.
pub type MotorDataFetch<D> = Arc<
    dyn Fn(VehicleToEngineConfigRef) -> BoxFuture<'static, motor_core::Result<Vec<D>>>
        + Send
        + Sync,
>;

/// Resolves a lazy configuration reference without I/O.
pub type ReferenceResolver =
    Arc<dyn Fn(VehicleToEngineConfigId) -> VehicleToEngineConfigRef + Send + Sync>;

/// Type token for a provider's data type.
///
/// Carries the data type's schema functions so the catalog can be built from
/// a descriptor without knowing the concrete type.
#[derive(Clone, Copy)]
pub struct MotorDataType {
    type_name: &'static str,
    schema_name: fn() -> Cow<'static, str>,
    schema: fn() -> RefOr<Schema>,
    schemas: fn(&mut Vec<(String, RefOr<Schema>)>),
}

impl MotorDataType {
    /// Returns the token for the data produced by `M`.
    #[must_use]
    pub fn of<M: MotorApplicationMap>() -> Self {
        Self {
            type_name: M::TYPE_NAME,
            schema_name: <M::Data as ToSchema>::name,
            schema: <M::Data as PartialSchema>::schema,
            schemas: <M::Data as ToSchema>::schemas,
        }
    }

    /// Simple name of the provider type.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Component name of the data schema.
    #[must_use]
    pub fn schema_name(&self) -> Cow<'static, str> {
        (self.schema_name)()
    }

    /// The data type's own schema.
    #[must_use]
    pub fn schema(&self) -> RefOr<Schema> {
        (self.schema)()
    }

    /// Schemas transitively referenced by the data schema, in discovery order.
    #[must_use]
    pub fn referenced_schemas(&self) -> Vec<(String, RefOr<Schema>)> {
        let mut schemas = Vec::new();
        (self.schemas)(&mut schemas);
        schemas
    }
}

impl fmt::Debug for MotorDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MotorDataType")
            .field("type_name", &self.type_name)
            .field("schema_name", &self.schema_name())
            .finish()
    }
}

/// One registered motor data endpoint.
#[derive(Clone)]
pub struct DataProviderDescriptor {
    path: String,
    slug: String,
    data_type: MotorDataType,
    handler: MethodRouter,
}

impl DataProviderDescriptor {
    /// Documented endpoint path (`{vehicleToEngineConfigId}` template).
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Last path segment, derived from the provider type name.
    #[must_use]
    pub fn slug(&self) -> &str {
        &self.slug
    }

    /// Data type token.
    #[must_use]
    pub const fn data_type(&self) -> MotorDataType {
        self.data_type
    }
}

impl fmt::Debug for DataProviderDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataProviderDescriptor")
            .field("path", &self.path)
            .field("data_type", &self.data_type)
            .field("handler", &"<MethodRouter>")
            .finish()
    }
}

/// Ordered, immutable set of motor data endpoints.
#[derive(Clone, Debug, Default)]
pub struct RouteTable {
    descriptors: Vec<DataProviderDescriptor>,
}

impl RouteTable {
    /// Starts a table whose handlers resolve references through `repository`.
    pub fn builder<R>(repository: Arc<R>) -> RouteTableBuilder
    where
        R: VehicleToEngineConfigRepository + ?Sized,
    {
        RouteTableBuilder {
            resolve: Arc::new(move |id: VehicleToEngineConfigId| {
                repository.get_reference_by_id(id)
            }),
            descriptors: Vec::new(),
        }
    }

    /// Descriptors in registration order.
    #[must_use]
    pub fn descriptors(&self) -> &[DataProviderDescriptor] {
        &self.descriptors
    }

    /// Iterates descriptors in registration order.
    pub fn iter(&self) -> std::slice::Iter<'_, DataProviderDescriptor> {
        self.descriptors.iter()
    }

    /// Number of registered endpoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Looks up a descriptor by documented path.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&DataProviderDescriptor> {
        self.descriptors.iter().find(|d| d.path == path)
    }

    /// Builds the router serving every registered endpoint.
    #[must_use]
    pub fn router(&self) -> Router {
        self.descriptors
            .iter()
            .fold(Router::new(), |router, descriptor| {
                router.route(&route_template(&descriptor.path), descriptor.handler.clone())
            })
    }
}

impl<'a> IntoIterator for &'a RouteTable {
    type Item = &'a DataProviderDescriptor;
    type IntoIter = std::slice::Iter<'a, DataProviderDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Builder for [`RouteTable`].
pub struct RouteTableBuilder {
    resolve: ReferenceResolver,
    descriptors: Vec<DataProviderDescriptor>,
}

impl fmt::Debug for RouteTableBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteTableBuilder")
            .field("resolve", &"<ReferenceResolver>")
            .field("descriptors", &self.descriptors)
            .finish()
    }
}

impl RouteTableBuilder {
    /// Registers provider `M` under the slug derived from its type name.
    ///
    /// # Errors
    ///
    /// Returns a [`RegistrationError`] if the type name is malformed, the
    /// resulting path is already taken, or the data schema is unnamed.
    pub fn register<M: MotorApplicationMap>(
        self,
        fetch: impl Fn(VehicleToEngineConfigRef) -> BoxFuture<'static, motor_core::Result<Vec<M::Data>>>
        + Send
        + Sync
        + 'static,
    ) -> Result<Self, RegistrationError> {
        let slug = derive_path(M::TYPE_NAME)?;
        self.insert::<M>(slug, Arc::new(fetch))
    }

    /// Registers provider `M` under an explicit slug.
    ///
    /// # Errors
    ///
    /// Returns a [`RegistrationError`] if the slug is malformed, the path is
    /// already taken, or the data schema is unnamed.
    pub fn register_at<M: MotorApplicationMap>(
        self,
        slug: &str,
        fetch: impl Fn(VehicleToEngineConfigRef) -> BoxFuture<'static, motor_core::Result<Vec<M::Data>>>
        + Send
        + Sync
        + 'static,
    ) -> Result<Self, RegistrationError> {
        validate_slug(slug)?;
        self.insert::<M>(slug.to_string(), Arc::new(fetch))
    }

    /// Finishes the table.
    #[must_use]
    pub fn build(self) -> RouteTable {
        RouteTable {
            descriptors: self.descriptors,
        }
    }

    fn insert<M: MotorApplicationMap>(
        mut self,
        slug: String,
        fetch: MotorDataFetch<M::Data>,
    ) -> Result<Self, RegistrationError> {
        let data_type = MotorDataType::of::<M>();
        if data_type.schema_name().is_empty() {
            return Err(RegistrationError::EmptySchemaName {
                type_name: M::TYPE_NAME,
            });
        }

        let path = motor_data_path(&slug);
        if let Some(existing) = self.descriptors.iter().find(|d| d.path == path) {
            return Err(RegistrationError::DuplicatePath {
                path,
                existing: existing.data_type.type_name(),
                type_name: M::TYPE_NAME,
            });
        }

        tracing::debug!(provider = M::TYPE_NAME, path = %path, "registered motor data endpoint");
        let handler = crate::routes::motor_data::dispatcher::<M>(Arc::clone(&self.resolve), fetch);
        self.descriptors.push(DataProviderDescriptor {
            path,
            slug,
            data_type,
            handler,
        });
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context as _;
    use futures::FutureExt;
    use motor_core::MemoryMotorDataStore;
    use motor_core::motor::{DrainPlug, DrainPlugMap, FinalDriveTorqueMap, OilFilterTorqueMap};

    motor_core::motor_application_map! {
        struct SecondDrainPlugMap => DrainPlug;
        #[allow(non_camel_case_types)]
        struct lowercaseMap => DrainPlug;
    }

    fn empty<D: Send + 'static>(
        _reference: VehicleToEngineConfigRef,
    ) -> BoxFuture<'static, motor_core::Result<Vec<D>>> {
        async { Ok(Vec::new()) }.boxed()
    }

    fn builder() -> RouteTableBuilder {
        RouteTable::builder(Arc::new(MemoryMotorDataStore::new()))
    }

    #[test]
    fn test_registration_order_is_preserved() -> Result<(), RegistrationError> {
        let table = builder()
            .register::<OilFilterTorqueMap>(empty)?
            .register::<DrainPlugMap>(empty)?
            .register::<FinalDriveTorqueMap>(empty)?
            .build();

        let slugs: Vec<_> = table.iter().map(DataProviderDescriptor::slug).collect();
        assert_eq!(slugs, ["oil-filter-torque", "drain-plug", "final-drive-torque"]);
        assert_eq!(table.len(), 3);
        Ok(())
    }

    #[test]
    fn test_descriptor_carries_data_type_token() -> anyhow::Result<()> {
        let table = builder().register::<DrainPlugMap>(empty)?.build();
        let descriptor = table
            .get("/v1/vehicle-specifications/{vehicleToEngineConfigId}/drain-plug")
            .context("drain plug descriptor")?;
        assert_eq!(descriptor.data_type().type_name(), "DrainPlugMap");
        assert_eq!(descriptor.data_type().schema_name(), "DrainPlug");
        Ok(())
    }

    #[test]
    fn test_duplicate_path_is_rejected() -> Result<(), RegistrationError> {
        let err = builder()
            .register::<DrainPlugMap>(empty)?
            .register_at::<SecondDrainPlugMap>("drain-plug", empty)
            .unwrap_err();
        assert!(matches!(
            err,
            RegistrationError::DuplicatePath {
                existing: "DrainPlugMap",
                type_name: "SecondDrainPlugMap",
                ..
            }
        ));
        Ok(())
    }

    #[test]
    fn test_explicit_slug_registers_second_endpoint() -> Result<(), RegistrationError> {
        let table = builder()
            .register::<DrainPlugMap>(empty)?
            .register_at::<SecondDrainPlugMap>("spare-drain-plug", empty)?
            .build();
        assert_eq!(table.len(), 2);
        assert!(table.get(&motor_data_path("spare-drain-plug")).is_some());
        Ok(())
    }

    #[test]
    fn test_malformed_type_name_is_rejected() {
        let err = builder().register::<lowercaseMap>(empty).unwrap_err();
        assert!(matches!(err, RegistrationError::MalformedTypeName { .. }));
    }
}
