// db/walletdb.rs
use async_trait::async_trait;
use sqlx::Error;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::walletmodels::UserWallet;

#[async_trait]
pub trait WalletExt {
    async fn add_wallet(
        &self,
        user_id: Uuid,
        address: String,
        label: Option<String>,
    ) -> Result<UserWallet, Error>;

    /// All wallets for a user, oldest first. The lifecycle engine never
    /// mutates wallets; it only reads them.
    async fn get_user_wallets(&self, user_id: Uuid) -> Result<Vec<UserWallet>, Error>;

    async fn delete_wallet(&self, wallet_id: Uuid, user_id: Uuid) -> Result<u64, Error>;
}

#[async_trait]
impl WalletExt for DBClient {
    async fn add_wallet(
        &self,
        user_id: Uuid,
        address: String,
        label: Option<String>,
    ) -> Result<UserWallet, Error> {
        sqlx::query_as::<_, UserWallet>(
            r#"
            INSERT INTO wallets (user_id, address, label)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, address, label, created_at
            "#,
        )
        .bind(user_id)
        .bind(address)
        .bind(label)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_user_wallets(&self, user_id: Uuid) -> Result<Vec<UserWallet>, Error> {
        sqlx::query_as::<_, UserWallet>(
            r#"
            SELECT id, user_id, address, label, created_at
            FROM wallets
            WHERE user_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn delete_wallet(&self, wallet_id: Uuid, user_id: Uuid) -> Result<u64, Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM wallets
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(wallet_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
