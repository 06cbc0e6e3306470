// services/review_service.rs
//
// Prepares review submissions for the on-chain reviews contract. The write
// itself happens outside this system: the reviewer signs the prepared
// payload with their wallet, and reads resolve against the contract.
use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::{
    config::Config,
    db::{jobdb::JobExt, walletdb::WalletExt, MarketStore},
    models::jobmodel::JobStatus,
    service::{error::ServiceError, job_service::primary_wallet},
};

#[derive(Debug, Clone, Serialize)]
pub struct ReviewXdrData {
    pub contract_id: String,
    pub function_name: String,
    pub reviewer_address: String,
    pub reviewee_address: String,
    pub job_id: Uuid,
    pub rating: i32,
    pub comment: String,
    pub network: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserReviews {
    pub user_address: String,
    pub contract_id: String,
    pub reviews: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RatingSummary {
    pub average_rating: f64,
    pub total_reviews: i64,
    pub user_address: String,
}

#[derive(Clone)]
pub struct ReviewService {
    store: Arc<dyn MarketStore>,
    config: Config,
}

impl ReviewService {
    pub fn new(store: Arc<dyn MarketStore>, config: Config) -> Self {
        Self { store, config }
    }

    fn contract_id(&self) -> Result<String, ServiceError> {
        self.config
            .reviews_contract_id
            .clone()
            .ok_or_else(|| ServiceError::Configuration("REVIEWS_CONTRACT_ID is not set".to_string()))
    }

    /// Resolves reviewer/reviewee roles from the completed job and builds
    /// the contract-call payload the reviewer must sign. One review per
    /// (job, reviewer) is enforced by the contract, not here.
    pub async fn prepare_review(
        &self,
        job_id: Uuid,
        reviewer_id: Uuid,
        rating: i32,
        comment: Option<String>,
    ) -> Result<ReviewXdrData, ServiceError> {
        if !(1..=5).contains(&rating) {
            return Err(ServiceError::Validation(
                "Rating must be between 1 and 5".to_string(),
            ));
        }

        let job = self
            .store
            .get_job_by_id(job_id)
            .await?
            .ok_or(ServiceError::JobNotFound(job_id))?;

        if job.status != JobStatus::Completed {
            return Err(ServiceError::InvalidJobStatus(job_id, job.status));
        }

        let employee_id = job
            .employee_id
            .ok_or_else(|| ServiceError::Validation("Job has no assigned employee".to_string()))?;

        let reviewee_id = if reviewer_id == job.employer_id {
            employee_id
        } else if reviewer_id == employee_id {
            job.employer_id
        } else {
            return Err(ServiceError::UnauthorizedJobAccess(reviewer_id, job_id));
        };

        let reviewer_wallet = primary_wallet(self.store.get_user_wallets(reviewer_id).await?)
            .ok_or_else(|| {
                ServiceError::Validation("Reviewer has no registered wallet".to_string())
            })?;
        let reviewee_wallet = primary_wallet(self.store.get_user_wallets(reviewee_id).await?)
            .ok_or_else(|| {
                ServiceError::Validation("Reviewee has no registered wallet".to_string())
            })?;

        tracing::info!(
            "Review payload prepared: job {}, reviewer {}, rating {}",
            job_id,
            reviewer_id,
            rating
        );

        Ok(ReviewXdrData {
            contract_id: self.contract_id()?,
            function_name: "leave_review".to_string(),
            reviewer_address: reviewer_wallet.address,
            reviewee_address: reviewee_wallet.address,
            job_id,
            rating,
            comment: comment.unwrap_or_default(),
            network: self.config.network_name.clone(),
        })
    }

    /// Review history lives on the contract; this resolves the user's
    /// address so clients can query it directly.
    pub async fn user_reviews(&self, user_id: Uuid) -> Result<UserReviews, ServiceError> {
        let wallet = primary_wallet(self.store.get_user_wallets(user_id).await?)
            .ok_or_else(|| ServiceError::Validation("User has no registered wallet".to_string()))?;

        Ok(UserReviews {
            user_address: wallet.address,
            contract_id: self.contract_id()?,
            reviews: Vec::new(),
        })
    }

    pub async fn average_rating(&self, user_id: Uuid) -> Result<RatingSummary, ServiceError> {
        let wallet = primary_wallet(self.store.get_user_wallets(user_id).await?)
            .ok_or_else(|| ServiceError::Validation("User has no registered wallet".to_string()))?;

        Ok(RatingSummary {
            average_rating: 0.0,
            total_reviews: 0,
            user_address: wallet.address,
        })
    }
}
