use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct AddWalletDto {
    pub user_id: Uuid,

    #[validate(length(min = 1, message = "Wallet address is required"))]
    pub address: String,

    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteWalletDto {
    pub user_id: Uuid,
}
