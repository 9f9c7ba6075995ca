use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

mod cors;

#[cfg(test)]
mod tests;

pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route(
            "/queue-wait-time",
            get(handlers::queue_wait_time::queue_wait_time_handler),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors::build_cors_layer())
        .with_state(app_state)
}
