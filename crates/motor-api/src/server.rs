//! API server implementation.
//!
//! Provides health, ready, catalog, and motor API endpoints.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::middleware;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use motor_core::{MemoryMotorDataStore, MotorDataBackend, Result, VehicleToEngineConfigId};

use crate::config::{Config, CorsConfig, PartsCategoryMapping};
use crate::context::{REQUEST_ID_HEADER, RequestContext, request_id_middleware};
use crate::error::ApiError;
use crate::registry::RouteTable;

/// Health check response.
#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(serde::Deserialize))]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
}

/// Readiness check response.
#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(serde::Deserialize))]
pub struct ReadyResponse {
    /// Service readiness status.
    pub ready: bool,
    /// Optional message about readiness state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Shared application state for the hand-written handlers.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Config,
    backend: Arc<dyn MotorDataBackend>,
    catalog_json: Arc<str>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("backend", &"<MotorDataBackend>")
            .field("catalog_json_len", &self.catalog_json.len())
            .finish()
    }
}

impl AppState {
    /// Creates application state, rendering the catalog of `table`.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be synthesized or serialized.
    pub fn new(
        config: Config,
        backend: Arc<dyn MotorDataBackend>,
        table: &RouteTable,
    ) -> Result<Self> {
        let catalog = crate::openapi::catalog(table)?;
        let catalog_json = serde_json::to_string(&catalog)?;
        Ok(Self {
            config,
            backend,
            catalog_json: catalog_json.into(),
        })
    }

    /// Returns the motor data backend.
    #[must_use]
    pub fn backend(&self) -> Arc<dyn MotorDataBackend> {
        Arc::clone(&self.backend)
    }

    /// Returns the serialized `OpenAPI` catalog.
    #[must_use]
    pub fn catalog_json(&self) -> &str {
        &self.catalog_json
    }
}

async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

async fn ready(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state
        .backend()
        .find_by_id(VehicleToEngineConfigId::from(0))
        .await
    {
        Ok(_) => (
            StatusCode::OK,
            Json(ReadyResponse {
                ready: true,
                message: None,
            }),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ReadyResponse {
                ready: false,
                message: Some(format!("backend check failed: {e}")),
            }),
        ),
    }
}

async fn route_not_found(ctx: RequestContext) -> ApiError {
    ApiError::not_found("no route matches the request path").with_request_id(ctx.request_id)
}

/// The motor API HTTP server.
pub struct Server {
    config: Config,
    backend: Arc<dyn MotorDataBackend>,
}

impl std::fmt::Debug for Server {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Server")
            .field("config", &self.config)
            .field("backend", &"<MotorDataBackend>")
            .finish()
    }
}

impl Server {
    /// Creates a server over an empty in-memory store.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self::with_backend(config, Arc::new(MemoryMotorDataStore::new()))
    }

    /// Creates a server over the given collaborators.
    #[must_use]
    pub fn with_backend(config: Config, backend: Arc<dyn MotorDataBackend>) -> Self {
        Self { config, backend }
    }

    /// Returns a builder.
    #[must_use]
    pub fn builder() -> ServerBuilder {
        ServerBuilder::new()
    }

    /// Returns the server configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    fn create_router(&self) -> Result<Router> {
        let table = crate::routes::motor_data::motor_data_routes(Arc::clone(&self.backend))?;
        tracing::info!(
            providers = table.len(),
            paths = ?table.iter().map(|d| d.path()).collect::<Vec<_>>(),
            "motor data providers registered"
        );

        let state = Arc::new(AppState::new(
            self.config.clone(),
            Arc::clone(&self.backend),
            &table,
        )?);

        let cors = self.build_cors_layer();
        let metrics_layer = middleware::from_fn(crate::metrics::metrics_middleware);

        Ok(Router::new()
            .route("/health", get(health))
            .route("/ready", get(ready))
            .route("/metrics", get(crate::metrics::serve_metrics))
            .merge(crate::routes::api_routes())
            .with_state(state)
            .merge(table.router())
            .fallback(route_not_found)
            .layer(middleware::from_fn(request_id_middleware))
            .layer(cors)
            .layer(TraceLayer::new_for_http())
            .layer(metrics_layer))
    }

    fn build_cors_layer(&self) -> CorsLayer {
        let cors_config = &self.config.cors;
        let cors = Self::build_cors_base(cors_config);
        Self::apply_cors_allowed_origins(cors, cors_config)
    }

    fn build_cors_base(cors_config: &CorsConfig) -> CorsLayer {
        CorsLayer::new()
            .allow_methods([Method::GET, Method::HEAD, Method::OPTIONS])
            .allow_headers([
                header::CONTENT_TYPE,
                header::ACCEPT,
                header::HeaderName::from_static(REQUEST_ID_HEADER),
            ])
            .expose_headers([
                header::CONTENT_TYPE,
                header::CONTENT_LENGTH,
                header::HeaderName::from_static(REQUEST_ID_HEADER),
            ])
            .max_age(Duration::from_secs(cors_config.max_age_seconds))
    }

    fn cors_allows_any_origin(cors_config: &CorsConfig) -> bool {
        cors_config.allowed_origins.len() == 1
            && cors_config
                .allowed_origins
                .first()
                .is_some_and(|origin| origin == "*")
    }

    fn apply_cors_allowed_origins(cors: CorsLayer, cors_config: &CorsConfig) -> CorsLayer {
        if cors_config.allowed_origins.is_empty() {
            return cors;
        }

        if Self::cors_allows_any_origin(cors_config) {
            return cors.allow_origin(Any);
        }

        if cors_config
            .allowed_origins
            .iter()
            .any(|origin| origin == "*")
        {
            tracing::error!(
                origins = ?cors_config.allowed_origins,
                "Invalid CORS config: '*' must be the only allowed origin"
            );
            return cors;
        }

        let allowed: Vec<HeaderValue> = cors_config
            .allowed_origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::error!(origin = %origin, "Invalid CORS origin; expected a valid HeaderValue");
                    None
                }
            })
            .collect();

        if allowed.is_empty() {
            tracing::warn!("All configured CORS origins were invalid; disabling CORS");
            cors
        } else {
            tracing::info!(origins = ?cors_config.allowed_origins, "CORS configured");
            cors.allow_origin(AllowOrigin::list(allowed))
        }
    }

    /// Starts the HTTP server and serves until the process is stopped.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, a provider fails to
    /// register, or the listener cannot bind.
    pub async fn serve(&self) -> Result<()> {
        self.validate_config()?;

        crate::metrics::init_metrics();

        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        let router = self.create_router()?;

        tracing::info!(http_port = self.config.http_port, "Starting motor API server");

        let listener =
            tokio::net::TcpListener::bind(addr)
                .await
                .map_err(|e| motor_core::Error::Internal {
                    message: format!("failed to bind to {addr}: {e}"),
                })?;

        axum::serve(listener, router)
            .await
            .map_err(|e| motor_core::Error::Internal {
                message: format!("server error: {e}"),
            })?;

        Ok(())
    }

    /// Builds the router without binding a listener.
    ///
    /// # Errors
    ///
    /// Returns an error if a provider fails to register.
    #[doc(hidden)]
    pub fn test_router(&self) -> Result<Router> {
        self.create_router()
    }

    fn validate_config(&self) -> Result<()> {
        if !self.config.debug
            && self
                .config
                .cors
                .allowed_origins
                .iter()
                .any(|origin| origin == "*")
        {
            return Err(motor_core::Error::InvalidInput(
                "cors.allowed_origins cannot include '*' when debug=false".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for [`Server`].
pub struct ServerBuilder {
    config: Config,
    backend: Arc<dyn MotorDataBackend>,
}

impl std::fmt::Debug for ServerBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerBuilder")
            .field("config", &self.config)
            .field("backend", &"<MotorDataBackend>")
            .finish()
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self {
            config: Config::default(),
            backend: Arc::new(MemoryMotorDataStore::new()),
        }
    }
}

impl ServerBuilder {
    /// Creates a builder with default configuration and an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the HTTP port.
    #[must_use]
    pub fn http_port(mut self, port: u16) -> Self {
        self.config.http_port = port;
        self
    }

    /// Enables or disables debug mode.
    #[must_use]
    pub fn debug(mut self, enabled: bool) -> Self {
        self.config.debug = enabled;
        self
    }

    /// Sets the allowed CORS origins.
    #[must_use]
    pub fn cors_allowed_origins(mut self, origins: Vec<String>) -> Self {
        self.config.cors.allowed_origins = origins;
        self
    }

    /// Sets the product category mapping of the parts route.
    #[must_use]
    pub fn parts_category_mapping(mut self, mapping: PartsCategoryMapping) -> Self {
        self.config.parts_category_mapping = mapping;
        self
    }

    /// Sets the collaborators serving data.
    #[must_use]
    pub fn backend(mut self, backend: Arc<dyn MotorDataBackend>) -> Self {
        self.backend = backend;
        self
    }

    /// Builds the server.
    #[must_use]
    pub fn build(self) -> Server {
        Server {
            config: self.config,
            backend: self.backend,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Context, Result};
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_health_endpoint() -> Result<()> {
        let router = ServerBuilder::new().build().test_router()?;

        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .context("build request")?;

        let response = router.oneshot(request).await.map_err(|err| match err {})?;

        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), 1024)
            .await
            .context("read response body")?;
        let health: HealthResponse = serde_json::from_slice(&body).context("parse JSON body")?;
        assert_eq!(health.status, "ok");
        Ok(())
    }

    #[tokio::test]
    async fn test_ready_endpoint() -> Result<()> {
        let router = ServerBuilder::new().build().test_router()?;

        let request = Request::builder()
            .uri("/ready")
            .body(Body::empty())
            .context("build request")?;

        let response = router.oneshot(request).await.map_err(|err| match err {})?;

        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), 1024)
            .await
            .context("read response body")?;
        let ready: ReadyResponse = serde_json::from_slice(&body).context("parse JSON body")?;
        assert!(ready.ready);
        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_route_is_json_404() -> Result<()> {
        let router = ServerBuilder::new().build().test_router()?;

        let request = Request::builder()
            .uri("/v1/unknown")
            .header(REQUEST_ID_HEADER, "req-404")
            .body(Body::empty())
            .context("build request")?;

        let response = router.oneshot(request).await.map_err(|err| match err {})?;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = axum::body::to_bytes(response.into_body(), 4096)
            .await
            .context("read response body")?;
        let payload: serde_json::Value =
            serde_json::from_slice(&body).context("parse JSON body")?;
        assert_eq!(payload["code"], "NOT_FOUND");
        assert_eq!(payload["requestId"], "req-404");
        Ok(())
    }

    #[test]
    fn test_wildcard_cors_rejected_outside_debug() {
        let server = ServerBuilder::new()
            .cors_allowed_origins(vec!["*".to_string()])
            .build();
        assert!(server.validate_config().is_err());

        let server = ServerBuilder::new()
            .debug(true)
            .cors_allowed_origins(vec!["*".to_string()])
            .build();
        assert!(server.validate_config().is_ok());
    }

    #[test]
    fn test_cors_any_origin_detection() {
        let any = CorsConfig {
            allowed_origins: vec!["*".to_string()],
            max_age_seconds: 60,
        };
        assert!(Server::cors_allows_any_origin(&any));

        let mixed = CorsConfig {
            allowed_origins: vec!["*".to_string(), "https://a.example".to_string()],
            max_age_seconds: 60,
        };
        assert!(!Server::cors_allows_any_origin(&mixed));
    }
}
