// handlers/wallet.rs
use std::sync::Arc;

use axum::{
    extract::Path,
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::walletdb::WalletExt,
    dtos::walletdtos::{AddWalletDto, DeleteWalletDto},
    error::HttpError,
    AppState,
};

pub fn wallet_handler() -> Router {
    Router::new()
        .route("/", post(add_wallet))
        .route("/:id", get(get_user_wallets).delete(delete_wallet))
}

fn validate_stellar_address(address: &str) -> Result<(), String> {
    stellar_strkey::ed25519::PublicKey::from_string(address)
        .map(|_| ())
        .map_err(|_| "Invalid Stellar wallet address".to_string())
}

pub async fn add_wallet(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<AddWalletDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    validate_stellar_address(&body.address).map_err(HttpError::bad_request)?;

    let wallet = app_state
        .db_client
        .add_wallet(body.user_id, body.address, body.label)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "message": "Wallet added successfully",
        "data": {
            "wallet": wallet
        }
    })))
}

pub async fn get_user_wallets(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let wallets = app_state
        .db_client
        .get_user_wallets(user_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": {
            "wallets": wallets
        }
    })))
}

pub async fn delete_wallet(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(wallet_id): Path<Uuid>,
    Json(body): Json<DeleteWalletDto>,
) -> Result<impl IntoResponse, HttpError> {
    let deleted = app_state
        .db_client
        .delete_wallet(wallet_id, body.user_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    if deleted == 0 {
        return Err(HttpError::not_found("Wallet not found"));
    }

    Ok(Json(serde_json::json!({
        "message": "Wallet deleted successfully"
    })))
}
