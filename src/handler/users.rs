// handlers/users.rs
//
// Chain-backed review reads. These resolve the user's wallet address; the
// review history itself lives on the reviews contract.
use std::sync::Arc;

use axum::{extract::Path, response::IntoResponse, routing::get, Extension, Json, Router};
use serde_json::json;
use uuid::Uuid;

use crate::{error::HttpError, service::error::ServiceError, AppState};

pub fn users_handler() -> Router {
    Router::new()
        .route("/:user_id/reviews", get(get_user_reviews))
        .route("/:user_id/average-rating", get(get_average_rating))
}

pub async fn get_user_reviews(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    match app_state.review_service.user_reviews(user_id).await {
        Ok(data) => Ok(Json(json!(data.reviews))),
        // A user without a wallet simply has no on-chain reviews.
        Err(ServiceError::Validation(_)) => Ok(Json(json!([]))),
        Err(err) => Err(err.into()),
    }
}

pub async fn get_average_rating(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    match app_state.review_service.average_rating(user_id).await {
        Ok(summary) => Ok(Json(json!(summary))),
        Err(ServiceError::Validation(_)) => Ok(Json(json!({
            "average_rating": 0.0,
            "total_reviews": 0,
            "user_address": null
        }))),
        Err(err) => Err(err.into()),
    }
}
