// services/notification_service.rs
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    db::{notificationdb::NotificationExt, MarketStore},
    models::{jobmodel::Job, notificationmodel::Notification},
    service::error::ServiceError,
};

#[derive(Clone)]
pub struct NotificationService {
    store: Arc<dyn MarketStore>,
}

impl NotificationService {
    pub fn new(store: Arc<dyn MarketStore>) -> Self {
        Self { store }
    }

    pub async fn notify_job_claimed(
        &self,
        job: &Job,
        employee_id: Uuid,
    ) -> Result<(), ServiceError> {
        tracing::info!(
            "Claim notification: job {} claimed by {}",
            job.id,
            employee_id
        );

        self.store
            .create_notification(
                job.employer_id,
                "job_claimed".to_string(),
                Some(job.id),
                Some(serde_json::json!({
                    "job_title": job.title,
                    "employee_id": employee_id,
                })),
                format!("Your job \"{}\" was claimed", job.title),
            )
            .await?;

        Ok(())
    }

    pub async fn notify_work_approved(
        &self,
        employee_id: Uuid,
        job: &Job,
    ) -> Result<(), ServiceError> {
        tracing::info!(
            "Approval notification: job {} approved for {}",
            job.id,
            employee_id
        );

        self.store
            .create_notification(
                employee_id,
                "work_approved".to_string(),
                Some(job.id),
                Some(serde_json::json!({
                    "job_title": job.title,
                    "amount": job.price,
                })),
                format!("Your work on \"{}\" was approved", job.title),
            )
            .await?;

        Ok(())
    }

    pub async fn notify_job_withdrawn(
        &self,
        employee_id: Uuid,
        job: &Job,
    ) -> Result<(), ServiceError> {
        tracing::info!(
            "Withdrawal notification: job {} withdrawn from {}",
            job.id,
            employee_id
        );

        self.store
            .create_notification(
                employee_id,
                "job_withdrawn".to_string(),
                Some(job.id),
                Some(serde_json::json!({
                    "job_title": job.title,
                })),
                format!("The job \"{}\" was withdrawn by the employer", job.title),
            )
            .await?;

        Ok(())
    }

    pub async fn get_user_notifications(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<Notification>, ServiceError> {
        Ok(self.store.get_user_notifications(user_id).await?)
    }

    pub async fn mark_all_read(&self, user_id: Uuid) -> Result<u64, ServiceError> {
        Ok(self.store.mark_all_notifications_read(user_id).await?)
    }
}
