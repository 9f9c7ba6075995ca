use axum::http::Method;
use axum::http::header::CONTENT_TYPE;
use tower_http::cors::{Any, CorsLayer};

pub(super) fn build_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
}
