// handlers/notification_handler.rs
use std::sync::Arc;

use axum::{
    extract::Path,
    response::IntoResponse,
    routing::{get, put},
    Extension, Json, Router,
};
use serde_json::json;
use uuid::Uuid;

use crate::{error::HttpError, AppState};

pub fn notification_handler() -> Router {
    Router::new()
        .route("/:user_id", get(get_user_notifications))
        .route("/:user_id/read", put(mark_all_read))
}

pub async fn get_user_notifications(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let notifications = app_state
        .notification_service
        .get_user_notifications(user_id)
        .await?;

    Ok(Json(notifications))
}

pub async fn mark_all_read(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let marked = app_state.notification_service.mark_all_read(user_id).await?;

    Ok(Json(json!({
        "message": "Notifications marked as read",
        "marked": marked
    })))
}
