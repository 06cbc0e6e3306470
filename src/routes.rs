// routes.rs
use std::sync::Arc;

use axum::{routing::get, Extension, Json, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::{
    handler::{
        chat::chat_handler, jobs::jobs_handler, notification_handler::notification_handler,
        users::users_handler, wallet::wallet_handler,
    },
    AppState,
};

// Health check handler
async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "message": "Server is running"
    }))
}

pub fn create_router(app_state: Arc<AppState>) -> Router {
    let api_route = Router::new()
        .nest("/jobs", jobs_handler())
        .nest("/users", users_handler())
        .nest("/wallets", wallet_handler())
        .nest("/notifications", notification_handler())
        .nest("/conversations", chat_handler())
        .layer(TraceLayer::new_for_http())
        .layer(Extension(app_state));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_route)
}
