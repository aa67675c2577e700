use axum::http::Method;
use tower_http::cors::{Any, CorsLayer};

/// CORS for the dashboard, which calls the content API from another origin.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
        .allow_headers(Any)
}
