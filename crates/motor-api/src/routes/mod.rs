//! HTTP route handlers.

pub mod docs;
pub mod motor_data;
pub mod vehicle_specifications;
pub mod vehicles;

use std::sync::Arc;

use axum::Router;

use crate::server::AppState;

/// Hand-written routes sharing the application state.
///
/// Motor data endpoints are not part of this router; they come from the
/// [`crate::registry::RouteTable`].
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(vehicle_specifications::routes())
        .merge(vehicles::routes())
        .merge(docs::routes())
}
