// handlers/chat.rs
use std::sync::Arc;

use axum::{
    extract::Path,
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::chatdb::ConversationExt,
    dtos::{chatdtos::SendMessageDto, jobdtos::ApiResponse},
    error::HttpError,
    AppState,
};

pub fn chat_handler() -> Router {
    Router::new()
        .route("/:id", get(get_user_conversations))
        .route(
            "/:id/messages",
            get(get_conversation_messages).post(send_message),
        )
}

pub async fn get_user_conversations(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let conversations = app_state
        .db_client
        .get_user_conversations(user_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(conversations))
}

pub async fn get_conversation_messages(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(conversation_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let messages = app_state
        .db_client
        .get_conversation_messages(conversation_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(messages))
}

pub async fn send_message(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(conversation_id): Path<Uuid>,
    Json(body): Json<SendMessageDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    app_state
        .db_client
        .get_conversation_by_id(conversation_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Conversation not found"))?;

    let message = app_state
        .db_client
        .create_message(conversation_id, body.sender_id, body.content)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success(
        "Message sent successfully",
        message,
    )))
}
