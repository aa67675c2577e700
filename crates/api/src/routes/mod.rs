pub mod content;
pub mod health;

use axum::Router;
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;

use crate::middleware;
use crate::state::AppState;

/// Section payloads are small JSON objects; anything bigger is a client bug.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Assemble the full router with all route groups.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(health::routes())
        .merge(content::routes())
        .with_state(state)
}

/// The router wrapped in the middleware stack the server runs with.
///
/// The body limit sits outside CORS: `Cors` needs a response body with
/// `Default`, which the limit's body does not provide.
pub fn app(state: AppState) -> Router {
    build_router(state).layer(
        ServiceBuilder::new()
            .layer(middleware::request_tracing::trace_layer())
            .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
            .layer(middleware::cors::cors_layer()),
    )
}
