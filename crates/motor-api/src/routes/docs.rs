//! Catalog route.
//!
//! - `GET /v3/api-docs` - The `OpenAPI` document, computed once at startup

use std::sync::Arc;

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;

use crate::server::AppState;

/// Creates the catalog route.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/v3/api-docs", get(api_docs))
}

async fn api_docs(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/json")],
        state.catalog_json().to_string(),
    )
}
