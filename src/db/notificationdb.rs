// db/notificationdb.rs
use async_trait::async_trait;
use sqlx::Error;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::notificationmodel::Notification;

#[async_trait]
pub trait NotificationExt {
    async fn create_notification(
        &self,
        user_id: Uuid,
        notification_type: String,
        job_id: Option<Uuid>,
        metadata: Option<serde_json::Value>,
        message: String,
    ) -> Result<Notification, Error>;

    async fn get_user_notifications(&self, user_id: Uuid) -> Result<Vec<Notification>, Error>;

    /// Bulk-marks every unread notification for the user. Returns the
    /// number of rows touched.
    async fn mark_all_notifications_read(&self, user_id: Uuid) -> Result<u64, Error>;
}

#[async_trait]
impl NotificationExt for DBClient {
    async fn create_notification(
        &self,
        user_id: Uuid,
        notification_type: String,
        job_id: Option<Uuid>,
        metadata: Option<serde_json::Value>,
        message: String,
    ) -> Result<Notification, Error> {
        sqlx::query_as::<_, Notification>(
            r#"
            INSERT INTO notifications (user_id, type, job_id, metadata, message)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, type, job_id, metadata, message, is_read, created_at
            "#,
        )
        .bind(user_id)
        .bind(notification_type)
        .bind(job_id)
        .bind(metadata)
        .bind(message)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_user_notifications(&self, user_id: Uuid) -> Result<Vec<Notification>, Error> {
        sqlx::query_as::<_, Notification>(
            r#"
            SELECT id, user_id, type, job_id, metadata, message, is_read, created_at
            FROM notifications
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn mark_all_notifications_read(&self, user_id: Uuid) -> Result<u64, Error> {
        let result = sqlx::query(
            r#"
            UPDATE notifications
            SET is_read = true
            WHERE user_id = $1 AND is_read = false
            "#,
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
