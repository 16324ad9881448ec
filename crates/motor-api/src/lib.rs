//! # motor-api
//!
//! HTTP surface for motor vehicle specification data.
//!
//! - **Registry**: motor data providers declared once, each bound to a path
//!   derived from its type name
//! - **Dispatch**: one generic handler coercing the id and delegating the lookup
//! - **Catalog**: an `OpenAPI` document synthesized from the registered providers
//! - **Observability**: metrics, tracing, and health checks
//!
//! ## Endpoints
//!
//! ```text
//! GET /health                                   - Health check
//! GET /ready                                    - Readiness check
//! GET /metrics                                  - Prometheus metrics
//! GET /v3/api-docs                              - OpenAPI catalog
//! GET /v1/vehicles?vin={vin}                    - VIN lookup
//! GET /v1/vehicle-specifications/{id}           - Vehicle specification
//! GET /v1/vehicle-specifications/{id}/parts/{productCategoryCode}
//! GET /v1/vehicle-specifications/{id}/<slug>    - Motor data, one per provider
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use motor_api::server::Server;
//!
//! let server = Server::builder().http_port(8080).debug(true).build();
//! server.serve().await?;
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod context;
pub mod error;
pub mod metrics;
pub mod openapi;
pub mod paths;
pub mod registry;
pub mod routes;
pub mod server;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::context::RequestContext;
    pub use crate::error::{ApiError, ApiResult};
    pub use crate::registry::{RegistrationError, RouteTable};
    pub use crate::server::Server;
}
