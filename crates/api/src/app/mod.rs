//! HTTP application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store backends and auth services
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request/response DTOs
//! - `errors.rs`: consistent error responses

use std::sync::Arc;
use std::time::Duration;

use axum::{Extension, Router};
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub async fn build_app(config: &AppConfig) -> anyhow::Result<Router> {
    let services = Arc::new(services::build_services(config).await?);
    Ok(router(services, config.request_timeout))
}

/// Assemble the router around already-built services.
///
/// Request flow, outermost first: trace, timeout, session extraction,
/// authorization gate, handler.
pub fn router(services: Arc<AppServices>, request_timeout: Duration) -> Router {
    routes::router()
        .layer(axum::middleware::from_fn(middleware::gate_middleware))
        .layer(axum::middleware::from_fn_with_state(
            services.clone(),
            middleware::session_middleware,
        ))
        .layer(Extension(services))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(request_timeout)),
        )
}

pub use services::AppServices;
