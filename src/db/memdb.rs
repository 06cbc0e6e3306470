// db/memdb.rs
//
// In-memory MarketStore used by the service tests. Mirrors the conditional
// updates the Postgres queries perform, including the compare-and-swap
// status transitions, so lifecycle tests run without a database.
use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::types::BigDecimal;
use sqlx::Error;
use uuid::Uuid;

use super::chatdb::ConversationExt;
use super::jobdb::JobExt;
use super::notificationdb::NotificationExt;
use super::walletdb::WalletExt;
use crate::models::chatmodels::{Conversation, Message};
use crate::models::jobmodel::{Currency, Job, JobStatus, PaymentReservation};
use crate::models::notificationmodel::Notification;
use crate::models::walletmodels::UserWallet;

#[derive(Debug, Default)]
pub struct MemStore {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    jobs: HashMap<Uuid, Job>,
    wallets: Vec<UserWallet>,
    conversations: Vec<Conversation>,
    messages: Vec<Message>,
    notifications: Vec<Notification>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_job(&self, job: Job) {
        self.inner.lock().unwrap().jobs.insert(job.id, job);
    }

    pub fn job(&self, job_id: Uuid) -> Option<Job> {
        self.inner.lock().unwrap().jobs.get(&job_id).cloned()
    }

    pub fn conversation_count(&self) -> usize {
        self.inner.lock().unwrap().conversations.len()
    }

    pub fn message_count(&self) -> usize {
        self.inner.lock().unwrap().messages.len()
    }

    pub fn notifications_for(&self, user_id: Uuid) -> Vec<Notification> {
        self.inner
            .lock()
            .unwrap()
            .notifications
            .iter()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl JobExt for MemStore {
    async fn create_job(
        &self,
        employer_id: Uuid,
        title: String,
        description: String,
        tags: Option<Vec<String>>,
        price: BigDecimal,
        currency: Currency,
        employer_name: Option<String>,
    ) -> Result<Job, Error> {
        let now = Utc::now();
        let job = Job {
            id: Uuid::new_v4(),
            employer_id,
            employee_id: None,
            employer_name,
            title,
            description,
            tags,
            price,
            currency,
            status: JobStatus::Open,
            escrow_id: None,
            payment_reservation: None,
            created_at: now,
            updated_at: now,
        };
        self.inner.lock().unwrap().jobs.insert(job.id, job.clone());
        Ok(job)
    }

    async fn get_job_by_id(&self, job_id: Uuid) -> Result<Option<Job>, Error> {
        Ok(self.inner.lock().unwrap().jobs.get(&job_id).cloned())
    }

    async fn get_open_jobs(&self) -> Result<Vec<Job>, Error> {
        let mut jobs: Vec<Job> = self
            .inner
            .lock()
            .unwrap()
            .jobs
            .values()
            .filter(|job| job.status == JobStatus::Open)
            .cloned()
            .collect();
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(jobs)
    }

    async fn get_jobs_by_employer(&self, employer_id: Uuid) -> Result<Vec<Job>, Error> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .jobs
            .values()
            .filter(|job| job.employer_id == employer_id)
            .cloned()
            .collect())
    }

    async fn get_jobs_by_employee(&self, employee_id: Uuid) -> Result<Vec<Job>, Error> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .jobs
            .values()
            .filter(|job| job.employee_id == Some(employee_id))
            .cloned()
            .collect())
    }

    async fn claim_job(&self, job_id: Uuid, employee_id: Uuid) -> Result<Option<Job>, Error> {
        let mut inner = self.inner.lock().unwrap();
        match inner.jobs.get_mut(&job_id) {
            Some(job) if job.status == JobStatus::Open => {
                job.employee_id = Some(employee_id);
                job.status = JobStatus::InProgress;
                job.updated_at = Utc::now();
                Ok(Some(job.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn submit_job(&self, job_id: Uuid) -> Result<Option<Job>, Error> {
        let mut inner = self.inner.lock().unwrap();
        match inner.jobs.get_mut(&job_id) {
            Some(job) if job.status == JobStatus::InProgress => {
                job.status = JobStatus::Submitted;
                job.updated_at = Utc::now();
                Ok(Some(job.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn complete_job(&self, job_id: Uuid) -> Result<Option<Job>, Error> {
        let mut inner = self.inner.lock().unwrap();
        match inner.jobs.get_mut(&job_id) {
            Some(job) if job.status == JobStatus::Submitted => {
                job.status = JobStatus::Completed;
                job.payment_reservation = None;
                job.updated_at = Utc::now();
                Ok(Some(job.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn cancel_job(&self, job_id: Uuid) -> Result<Option<Job>, Error> {
        let mut inner = self.inner.lock().unwrap();
        match inner.jobs.get_mut(&job_id) {
            Some(job)
                if job.status == JobStatus::InProgress || job.status == JobStatus::Submitted =>
            {
                job.status = JobStatus::Cancelled;
                job.payment_reservation = None;
                job.updated_at = Utc::now();
                Ok(Some(job.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn set_payment_reservation(
        &self,
        job_id: Uuid,
        reservation: &PaymentReservation,
    ) -> Result<(), Error> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(job) = inner.jobs.get_mut(&job_id) {
            job.payment_reservation = Some(sqlx::types::Json(reservation.clone()));
            job.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn set_escrow_id(&self, job_id: Uuid, escrow_id: &str) -> Result<(), Error> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(job) = inner.jobs.get_mut(&job_id) {
            job.escrow_id = Some(escrow_id.to_string());
            job.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn delete_open_job(&self, job_id: Uuid, employer_id: Uuid) -> Result<u64, Error> {
        let mut inner = self.inner.lock().unwrap();
        let removable = matches!(
            inner.jobs.get(&job_id),
            Some(job) if job.employer_id == employer_id && job.status == JobStatus::Open
        );
        if removable {
            inner.jobs.remove(&job_id);
            Ok(1)
        } else {
            Ok(0)
        }
    }
}

#[async_trait]
impl WalletExt for MemStore {
    async fn add_wallet(
        &self,
        user_id: Uuid,
        address: String,
        label: Option<String>,
    ) -> Result<UserWallet, Error> {
        let wallet = UserWallet {
            id: Uuid::new_v4(),
            user_id,
            address,
            label,
            created_at: Utc::now(),
        };
        self.inner.lock().unwrap().wallets.push(wallet.clone());
        Ok(wallet)
    }

    async fn get_user_wallets(&self, user_id: Uuid) -> Result<Vec<UserWallet>, Error> {
        let mut wallets: Vec<UserWallet> = self
            .inner
            .lock()
            .unwrap()
            .wallets
            .iter()
            .filter(|wallet| wallet.user_id == user_id)
            .cloned()
            .collect();
        wallets.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(wallets)
    }

    async fn delete_wallet(&self, wallet_id: Uuid, user_id: Uuid) -> Result<u64, Error> {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.wallets.len();
        inner
            .wallets
            .retain(|wallet| !(wallet.id == wallet_id && wallet.user_id == user_id));
        Ok((before - inner.wallets.len()) as u64)
    }
}

#[async_trait]
impl ConversationExt for MemStore {
    async fn find_conversation_between(
        &self,
        user_one_id: Uuid,
        user_two_id: Uuid,
    ) -> Result<Option<Conversation>, Error> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .conversations
            .iter()
            .find(|conversation| {
                (conversation.participant_one_id == user_one_id
                    && conversation.participant_two_id == user_two_id)
                    || (conversation.participant_one_id == user_two_id
                        && conversation.participant_two_id == user_one_id)
            })
            .cloned())
    }

    async fn create_conversation(
        &self,
        user_one_id: Uuid,
        user_two_id: Uuid,
    ) -> Result<Conversation, Error> {
        let conversation = Conversation {
            id: Uuid::new_v4(),
            participant_one_id: user_one_id,
            participant_two_id: user_two_id,
            created_at: Utc::now(),
        };
        self.inner
            .lock()
            .unwrap()
            .conversations
            .push(conversation.clone());
        Ok(conversation)
    }

    async fn get_conversation_by_id(
        &self,
        conversation_id: Uuid,
    ) -> Result<Option<Conversation>, Error> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .conversations
            .iter()
            .find(|conversation| conversation.id == conversation_id)
            .cloned())
    }

    async fn get_user_conversations(&self, user_id: Uuid) -> Result<Vec<Conversation>, Error> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .conversations
            .iter()
            .filter(|conversation| {
                conversation.participant_one_id == user_id
                    || conversation.participant_two_id == user_id
            })
            .cloned()
            .collect())
    }

    async fn create_message(
        &self,
        conversation_id: Uuid,
        sender_id: Uuid,
        content: String,
    ) -> Result<Message, Error> {
        let message = Message {
            id: Uuid::new_v4(),
            conversation_id,
            sender_id,
            content,
            created_at: Utc::now(),
        };
        self.inner.lock().unwrap().messages.push(message.clone());
        Ok(message)
    }

    async fn get_conversation_messages(
        &self,
        conversation_id: Uuid,
    ) -> Result<Vec<Message>, Error> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .messages
            .iter()
            .filter(|message| message.conversation_id == conversation_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl NotificationExt for MemStore {
    async fn create_notification(
        &self,
        user_id: Uuid,
        notification_type: String,
        job_id: Option<Uuid>,
        metadata: Option<serde_json::Value>,
        message: String,
    ) -> Result<Notification, Error> {
        let notification = Notification {
            id: Uuid::new_v4(),
            user_id,
            r#type: notification_type,
            job_id,
            metadata,
            message,
            is_read: false,
            created_at: Utc::now(),
        };
        self.inner
            .lock()
            .unwrap()
            .notifications
            .push(notification.clone());
        Ok(notification)
    }

    async fn get_user_notifications(&self, user_id: Uuid) -> Result<Vec<Notification>, Error> {
        Ok(self.notifications_for(user_id))
    }

    async fn mark_all_notifications_read(&self, user_id: Uuid) -> Result<u64, Error> {
        let mut inner = self.inner.lock().unwrap();
        let mut touched = 0;
        for notification in inner
            .notifications
            .iter_mut()
            .filter(|n| n.user_id == user_id && !n.is_read)
        {
            notification.is_read = true;
            touched += 1;
        }
        Ok(touched)
    }
}
