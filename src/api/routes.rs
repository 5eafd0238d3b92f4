use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use super::handlers::{api_refresh, dashboard, refresh, runes, select_sort, stats, status};
use super::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/status", get(status))
        .route("/runes", get(runes))
        .route("/stats", get(stats))
        .route("/refresh", post(api_refresh))
        .layer(CorsLayer::permissive());

    Router::new()
        .route("/", get(dashboard))
        .route("/sort/:key", get(select_sort))
        .route("/refresh", post(refresh))
        .nest("/api", api)
        .with_state(state)
}
