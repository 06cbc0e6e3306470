// services/job_service.rs
//
// The job lifecycle state machine: open -> in_progress -> submitted ->
// completed, with cancellation from the two middle states and hard delete
// while still open. The status-changing writes are conditioned on the
// previous status, so every transition is a compare-and-swap against the
// jobs table.
use std::sync::Arc;

use chrono::{Duration, Utc};
use serde::Serialize;
use sqlx::types::BigDecimal;
use uuid::Uuid;

use crate::{
    config::Config,
    db::{chatdb::ConversationExt, jobdb::JobExt, walletdb::WalletExt, MarketStore},
    dtos::jobdtos::CreateJobDto,
    models::{
        jobmodel::{Job, JobStatus, PaymentReservation},
        walletmodels::UserWallet,
    },
    service::{
        error::ServiceError,
        escrow_service::{CreateEscrowRequest, EscrowGateway},
        notification_service::NotificationService,
        stellar::{to_stroops, PaymentGateway, SettlementReceipt},
    },
};

/// Default wallet selection: the oldest registered wallet wins. A
/// deliberate simplification, kept in one place so a smarter selection can
/// replace it without touching the lifecycle code.
pub fn primary_wallet(wallets: Vec<UserWallet>) -> Option<UserWallet> {
    wallets.into_iter().min_by_key(|wallet| wallet.created_at)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectStatus {
    Completed,
    Skipped,
    Failed,
}

/// Outcome of one post-commit side effect. A failed effect never reverts
/// the transition that triggered it.
#[derive(Debug, Clone, Serialize)]
pub struct EffectOutcome {
    pub name: &'static str,
    pub status: EffectStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl EffectOutcome {
    fn completed(name: &'static str) -> Self {
        Self {
            name,
            status: EffectStatus::Completed,
            detail: None,
        }
    }

    fn skipped(name: &'static str, detail: &str) -> Self {
        Self {
            name,
            status: EffectStatus::Skipped,
            detail: Some(detail.to_string()),
        }
    }

    fn failed(name: &'static str, detail: String) -> Self {
        Self {
            name,
            status: EffectStatus::Failed,
            detail: Some(detail),
        }
    }
}

fn record(effects: &mut Vec<EffectOutcome>, name: &'static str, result: Result<(), ServiceError>) {
    match result {
        Ok(()) => effects.push(EffectOutcome::completed(name)),
        Err(err) => {
            tracing::warn!("Claim side effect `{}` failed: {}", name, err);
            effects.push(EffectOutcome::failed(name, err.to_string()));
        }
    }
}

#[derive(Debug)]
pub struct ClaimOutcome {
    pub job: Job,
    pub effects: Vec<EffectOutcome>,
}

#[derive(Debug)]
pub enum ApprovalOutcome {
    /// Both parties had wallets: the caller must get `xdr` signed by the
    /// employer and hand it back through the signing gateway.
    Paid {
        xdr: String,
        amount: BigDecimal,
        from: String,
        to: String,
        network: String,
    },
    /// A wallet was missing; the job completed with payment skipped.
    CompletedWithoutPayment,
}

#[derive(Clone)]
pub struct JobService {
    store: Arc<dyn MarketStore>,
    payments: Arc<dyn PaymentGateway>,
    escrow: Option<Arc<dyn EscrowGateway>>,
    notifications: Arc<NotificationService>,
    config: Config,
}

impl JobService {
    pub fn new(
        store: Arc<dyn MarketStore>,
        payments: Arc<dyn PaymentGateway>,
        escrow: Option<Arc<dyn EscrowGateway>>,
        notifications: Arc<NotificationService>,
        config: Config,
    ) -> Self {
        Self {
            store,
            payments,
            escrow,
            notifications,
            config,
        }
    }

    pub async fn post_job(&self, job_data: CreateJobDto) -> Result<Job, ServiceError> {
        let price = BigDecimal::try_from(job_data.price)
            .map_err(|_| ServiceError::Validation("Price must be a valid number".to_string()))?;

        let job = self
            .store
            .create_job(
                job_data.employer_id,
                job_data.title,
                job_data.description,
                job_data.tags,
                price,
                job_data.currency,
                job_data.name,
            )
            .await?;

        tracing::info!("Job {} posted by employer {}", job.id, job.employer_id);
        Ok(job)
    }

    /// Claims a job for `employee_id`. The claim itself is a CAS update;
    /// everything that follows (payment reservation, escrow, notification,
    /// conversation seeding) is best effort and reported per step.
    pub async fn claim_job(
        &self,
        job_id: Uuid,
        employee_id: Uuid,
    ) -> Result<ClaimOutcome, ServiceError> {
        self.store
            .get_job_by_id(job_id)
            .await?
            .ok_or(ServiceError::JobNotFound(job_id))?;

        let job = self
            .store
            .claim_job(job_id, employee_id)
            .await?
            .ok_or(ServiceError::JobNotAvailable(job_id))?;

        let effects = self.run_claim_effects(&job, employee_id).await;

        Ok(ClaimOutcome { job, effects })
    }

    async fn run_claim_effects(&self, job: &Job, employee_id: Uuid) -> Vec<EffectOutcome> {
        let mut effects = Vec::new();

        let employer_wallet = self.lookup_primary_wallet(job.employer_id).await;
        let employee_wallet = self.lookup_primary_wallet(employee_id).await;

        match (employer_wallet, employee_wallet) {
            (Some(employer_wallet), Some(employee_wallet)) => {
                record(
                    &mut effects,
                    "payment_reservation",
                    self.reserve_payment(job, &employer_wallet, &employee_wallet)
                        .await,
                );

                match &self.escrow {
                    Some(gateway) => record(
                        &mut effects,
                        "escrow",
                        self.create_escrow_for(job, &employer_wallet, &employee_wallet, gateway.as_ref())
                            .await,
                    ),
                    None => effects.push(EffectOutcome::skipped(
                        "escrow",
                        "escrow gateway not configured",
                    )),
                }
            }
            _ => {
                effects.push(EffectOutcome::skipped(
                    "payment_reservation",
                    "one or both parties have no wallet",
                ));
                effects.push(EffectOutcome::skipped(
                    "escrow",
                    "one or both parties have no wallet",
                ));
            }
        }

        record(
            &mut effects,
            "notification",
            self.notifications.notify_job_claimed(job, employee_id).await,
        );
        record(
            &mut effects,
            "conversation",
            self.seed_conversation(job, employee_id).await,
        );

        effects
    }

    async fn reserve_payment(
        &self,
        job: &Job,
        employer_wallet: &UserWallet,
        employee_wallet: &UserWallet,
    ) -> Result<(), ServiceError> {
        let xdr = self
            .payments
            .build_payment(
                job.id,
                &employer_wallet.address,
                &employee_wallet.address,
                &job.price,
            )
            .await?;

        self.store
            .set_payment_reservation(job.id, &PaymentReservation::Wrapped { payment_xdr: xdr })
            .await?;

        Ok(())
    }

    async fn create_escrow_for(
        &self,
        job: &Job,
        employer_wallet: &UserWallet,
        employee_wallet: &UserWallet,
        gateway: &dyn EscrowGateway,
    ) -> Result<(), ServiceError> {
        let deadline =
            (Utc::now() + Duration::days(self.config.escrow_deadline_days)).timestamp();
        let dispute_resolver = self
            .config
            .escrow_dispute_resolver
            .clone()
            .unwrap_or_else(|| employer_wallet.address.clone());

        let request = CreateEscrowRequest {
            service_provider: employee_wallet.address.clone(),
            approver: employer_wallet.address.clone(),
            receiver: employee_wallet.address.clone(),
            dispute_resolver,
            deadline,
            amount: to_stroops(&job.price)?.to_string(),
            token: self.config.token_contract.clone(),
        };

        let creation = gateway.create_escrow(&request).await?;
        self.store.set_escrow_id(job.id, &creation.escrow_id).await?;

        tracing::info!(
            "Escrow {} created for job {}; funding artifact awaits the employer's signature",
            creation.escrow_id,
            job.id
        );

        Ok(())
    }

    async fn seed_conversation(&self, job: &Job, employee_id: Uuid) -> Result<(), ServiceError> {
        if self
            .store
            .find_conversation_between(job.employer_id, employee_id)
            .await?
            .is_some()
        {
            return Ok(());
        }

        let conversation = self
            .store
            .create_conversation(job.employer_id, employee_id)
            .await?;

        self.store
            .create_message(
                conversation.id,
                employee_id,
                format!("Hi! I've just claimed your job \"{}\".", job.title),
            )
            .await?;

        Ok(())
    }

    async fn lookup_primary_wallet(&self, user_id: Uuid) -> Option<UserWallet> {
        match self.store.get_user_wallets(user_id).await {
            Ok(wallets) => primary_wallet(wallets),
            Err(err) => {
                tracing::warn!("Wallet lookup failed for {}: {}", user_id, err);
                None
            }
        }
    }

    pub async fn submit_work(&self, job_id: Uuid) -> Result<Job, ServiceError> {
        let job = self
            .store
            .get_job_by_id(job_id)
            .await?
            .ok_or(ServiceError::JobNotFound(job_id))?;

        self.store
            .submit_job(job_id)
            .await?
            .ok_or(ServiceError::InvalidJobStatus(job_id, job.status))
    }

    pub async fn approve_work(&self, job_id: Uuid) -> Result<ApprovalOutcome, ServiceError> {
        let job = self
            .store
            .get_job_by_id(job_id)
            .await?
            .ok_or(ServiceError::JobNotFound(job_id))?;

        if job.status != JobStatus::Submitted {
            return Err(ServiceError::InvalidJobStatus(job_id, job.status));
        }

        let employee_id = job
            .employee_id
            .ok_or_else(|| ServiceError::Validation("Job has no assigned employee".to_string()))?;

        let employer_wallet = primary_wallet(self.store.get_user_wallets(job.employer_id).await?);
        let employee_wallet = primary_wallet(self.store.get_user_wallets(employee_id).await?);
        let reservation = job.payment_reservation.clone().map(|held| held.0);

        let (employer_wallet, employee_wallet) = match (employer_wallet, employee_wallet) {
            (Some(from), Some(to)) => (from, to),
            _ => {
                let completed = self
                    .store
                    .complete_job(job_id)
                    .await?
                    .ok_or(ServiceError::JobNotAvailable(job_id))?;

                tracing::info!(
                    "Job {} approved without payment: one or both parties have no wallet",
                    job_id
                );

                if let Err(err) = self
                    .notifications
                    .notify_work_approved(employee_id, &completed)
                    .await
                {
                    tracing::warn!("Approval notification failed: {}", err);
                }

                return Ok(ApprovalOutcome::CompletedWithoutPayment);
            }
        };

        // Completion commits before artifact generation. A payment failure
        // past this point surfaces as PaymentGeneration; the status is not
        // rolled back.
        let completed = self
            .store
            .complete_job(job_id)
            .await?
            .ok_or(ServiceError::JobNotAvailable(job_id))?;

        if let Err(err) = self
            .notifications
            .notify_work_approved(employee_id, &completed)
            .await
        {
            tracing::warn!("Approval notification failed: {}", err);
        }

        let xdr = match reservation {
            Some(reservation) => reservation.into_xdr(),
            None => self
                .payments
                .build_payment(
                    job_id,
                    &employer_wallet.address,
                    &employee_wallet.address,
                    &completed.price,
                )
                .await
                .map_err(|err| match err {
                    err @ ServiceError::PaymentGeneration(_) => err,
                    other => ServiceError::PaymentGeneration(other.to_string()),
                })?,
        };

        Ok(ApprovalOutcome::Paid {
            xdr,
            amount: completed.price.clone(),
            from: employer_wallet.address,
            to: employee_wallet.address,
            network: self.config.network_name.clone(),
        })
    }

    pub async fn withdraw_job(&self, job_id: Uuid, employer_id: Uuid) -> Result<Job, ServiceError> {
        let job = self
            .store
            .get_job_by_id(job_id)
            .await?
            .ok_or(ServiceError::JobNotFound(job_id))?;

        if job.employer_id != employer_id {
            return Err(ServiceError::UnauthorizedJobAccess(employer_id, job_id));
        }

        if !matches!(job.status, JobStatus::InProgress | JobStatus::Submitted) {
            return Err(ServiceError::InvalidJobStatus(job_id, job.status));
        }

        let cancelled = self
            .store
            .cancel_job(job_id)
            .await?
            .ok_or(ServiceError::InvalidJobStatus(job_id, job.status))?;

        if let Some(employee_id) = cancelled.employee_id {
            if let Err(err) = self
                .notifications
                .notify_job_withdrawn(employee_id, &cancelled)
                .await
            {
                tracing::warn!("Withdrawal notification failed: {}", err);
            }
        }

        Ok(cancelled)
    }

    pub async fn delete_job(&self, job_id: Uuid, employer_id: Uuid) -> Result<(), ServiceError> {
        let job = self
            .store
            .get_job_by_id(job_id)
            .await?
            .ok_or(ServiceError::JobNotFound(job_id))?;

        // Ownership is not leaked to non-owners: absent and not-yours look
        // the same.
        if job.employer_id != employer_id {
            return Err(ServiceError::JobNotFound(job_id));
        }

        if job.status != JobStatus::Open {
            return Err(ServiceError::InvalidJobStatus(job_id, job.status));
        }

        let deleted = self.store.delete_open_job(job_id, employer_id).await?;
        if deleted == 0 {
            // A claim won the race between the read above and the delete.
            return Err(ServiceError::JobNotAvailable(job_id));
        }

        tracing::info!("Job {} deleted by employer {}", job_id, employer_id);
        Ok(())
    }

    /// Hands a signed artifact to the settlement network. No job state is
    /// consulted: this is a pure pass-through, callable independent of
    /// which job produced the artifact.
    pub async fn submit_signed_artifact(
        &self,
        signed_xdr: &str,
    ) -> Result<SettlementReceipt, ServiceError> {
        self.payments.submit_signed(signed_xdr).await
    }
}
