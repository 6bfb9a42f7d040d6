pub mod leaderboard;
pub mod session;

use axum::{Router, response::IntoResponse, routing::get};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::upstream::StatsClient;

pub use leaderboard::leaderboard_routes;

#[derive(Debug, Clone)]
pub struct AppState {
    pub stats: StatsClient,
}

pub fn build_router(state: AppState, cors_allow_any: bool) -> Router {
    let api_routes = Router::new()
        .nest("/api/leaderboard", leaderboard_routes())
        .route("/api/health", get(health_check));

    let mut app = Router::new()
        .merge(api_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if cors_allow_any {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        app = app.layer(cors);
    }

    app
}

async fn health_check() -> impl IntoResponse {
    axum::Json(serde_json::json!({"status": "healthy"}))
}
