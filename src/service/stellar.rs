// services/stellar.rs
//
// Builds unsigned payment envelopes and forwards signed ones to Horizon.
// Artifacts are sequence-bound and short-lived: if the source account
// sequence moves between build and signing, callers must rebuild.
use std::sync::Arc;

use async_trait::async_trait;
use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};
use sqlx::types::BigDecimal;
use stellar_xdr::curr::{
    Asset, Limits, Memo, MuxedAccount, Operation, OperationBody, PaymentOp, Preconditions,
    SequenceNumber, StringM, TimeBounds, TimePoint, Transaction, TransactionEnvelope,
    TransactionExt, TransactionV1Envelope, Uint256, VecM, WriteXdr,
};
use uuid::Uuid;

use crate::{config::Config, service::error::ServiceError};

/// 1 unit = 10,000,000 stroops.
pub const STROOPS_PER_UNIT: i64 = 10_000_000;

/// Text memos are capped by the network at 28 bytes.
const MEMO_MAX_BYTES: usize = 28;

const BASE_FEE: u32 = 100;
const TX_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone, Deserialize)]
pub struct HorizonAccount {
    pub sequence: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SettlementReceipt {
    pub hash: String,
    pub raw: serde_json::Value,
}

#[async_trait]
pub trait HorizonClient: Send + Sync {
    async fn load_account(&self, address: &str) -> Result<HorizonAccount, ServiceError>;

    async fn submit_transaction(&self, signed_xdr: &str)
        -> Result<serde_json::Value, ServiceError>;
}

#[derive(Debug, Clone)]
pub struct HorizonHttpClient {
    base_url: String,
    http: reqwest::Client,
}

impl HorizonHttpClient {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl HorizonClient for HorizonHttpClient {
    async fn load_account(&self, address: &str) -> Result<HorizonAccount, ServiceError> {
        let response = self
            .http
            .get(format!("{}/accounts/{}", self.base_url, address))
            .send()
            .await
            .map_err(|e| ServiceError::PaymentGeneration(format!("Horizon request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(ServiceError::PaymentGeneration(format!(
                "Horizon returned {} for account {}",
                response.status(),
                address
            )));
        }

        response
            .json::<HorizonAccount>()
            .await
            .map_err(|e| ServiceError::PaymentGeneration(format!("Invalid Horizon response: {}", e)))
    }

    async fn submit_transaction(
        &self,
        signed_xdr: &str,
    ) -> Result<serde_json::Value, ServiceError> {
        let response = self
            .http
            .post(format!("{}/transactions", self.base_url))
            .form(&[("tx", signed_xdr)])
            .send()
            .await
            .map_err(|e| ServiceError::Settlement(format!("Horizon request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| ServiceError::Settlement(format!("Invalid Horizon response: {}", e)))?;

        if !status.is_success() {
            // Horizon explains rejections in extras.result_codes.
            let reason = body
                .pointer("/extras/result_codes")
                .map(|codes| codes.to_string())
                .or_else(|| body.get("detail").and_then(|d| d.as_str()).map(String::from))
                .unwrap_or_else(|| format!("status {}", status));
            return Err(ServiceError::Settlement(reason));
        }

        Ok(body)
    }
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Builds an unsigned payment envelope moving `amount` from `from` to
    /// `to`, with a text memo referencing the job.
    async fn build_payment(
        &self,
        job_id: Uuid,
        from: &str,
        to: &str,
        amount: &BigDecimal,
    ) -> Result<String, ServiceError>;

    /// Forwards a signed envelope to the network. Pure pass-through: no job
    /// state is consulted or re-validated here.
    async fn submit_signed(&self, signed_xdr: &str) -> Result<SettlementReceipt, ServiceError>;
}

#[derive(Clone)]
pub struct StellarPaymentService {
    horizon: Arc<dyn HorizonClient>,
    network_passphrase: String,
}

impl StellarPaymentService {
    pub fn new(config: &Config) -> Self {
        Self {
            horizon: Arc::new(HorizonHttpClient::new(config.horizon_url.clone())),
            network_passphrase: config.network_passphrase.clone(),
        }
    }

    pub fn with_horizon(horizon: Arc<dyn HorizonClient>, network_passphrase: String) -> Self {
        Self {
            horizon,
            network_passphrase,
        }
    }
}

#[async_trait]
impl PaymentGateway for StellarPaymentService {
    async fn build_payment(
        &self,
        job_id: Uuid,
        from: &str,
        to: &str,
        amount: &BigDecimal,
    ) -> Result<String, ServiceError> {
        let account = self.horizon.load_account(from).await?;
        let sequence: i64 = account.sequence.parse().map_err(|_| {
            ServiceError::PaymentGeneration(format!(
                "Horizon returned a non-numeric sequence for {}",
                from
            ))
        })?;

        let amount_stroops = to_stroops(amount)?;
        let memo_text = truncate_memo(&format!("Payment for job: {}", job_id)).to_string();
        let memo: StringM<28> = memo_text.into_bytes().try_into().map_err(|_| {
            ServiceError::PaymentGeneration("Memo exceeds the 28 byte budget".to_string())
        })?;

        let payment = Operation {
            source_account: None,
            body: OperationBody::Payment(PaymentOp {
                destination: account_id(to)?,
                asset: Asset::Native,
                amount: amount_stroops,
            }),
        };

        let operations: VecM<Operation, 100> = vec![payment]
            .try_into()
            .map_err(|_| ServiceError::PaymentGeneration("Too many operations".to_string()))?;

        let now = chrono::Utc::now().timestamp() as u64;
        let tx = Transaction {
            source_account: account_id(from)?,
            fee: BASE_FEE,
            seq_num: SequenceNumber(sequence + 1),
            cond: Preconditions::Time(TimeBounds {
                min_time: TimePoint(0),
                max_time: TimePoint(now + TX_TIMEOUT_SECS),
            }),
            memo: Memo::Text(memo),
            operations,
            ext: TransactionExt::V0,
        };

        let envelope = TransactionEnvelope::Tx(TransactionV1Envelope {
            tx,
            signatures: VecM::default(),
        });

        let xdr = envelope
            .to_xdr_base64(Limits::none())
            .map_err(|e| ServiceError::PaymentGeneration(e.to_string()))?;

        tracing::debug!(
            "Generated payment XDR for job {} on network `{}` ({} stroops)",
            job_id,
            self.network_passphrase,
            amount_stroops
        );

        Ok(xdr)
    }

    async fn submit_signed(&self, signed_xdr: &str) -> Result<SettlementReceipt, ServiceError> {
        let raw = self.horizon.submit_transaction(signed_xdr).await?;
        let hash = raw
            .get("hash")
            .and_then(|hash| hash.as_str())
            .unwrap_or_default()
            .to_string();

        tracing::info!("Transaction submitted successfully, hash {}", hash);

        Ok(SettlementReceipt { hash, raw })
    }
}

/// Converts a decimal unit amount into stroops, truncating any precision
/// below one stroop.
pub fn to_stroops(amount: &BigDecimal) -> Result<i64, ServiceError> {
    let stroops = (amount * BigDecimal::from(STROOPS_PER_UNIT))
        .to_i64()
        .ok_or_else(|| {
            ServiceError::Validation("Amount is out of range for the network".to_string())
        })?;

    if stroops <= 0 {
        return Err(ServiceError::Validation(
            "Amount must be positive".to_string(),
        ));
    }

    Ok(stroops)
}

fn account_id(address: &str) -> Result<MuxedAccount, ServiceError> {
    let key = stellar_strkey::ed25519::PublicKey::from_string(address)
        .map_err(|_| ServiceError::Validation(format!("Invalid Stellar address: {}", address)))?;
    Ok(MuxedAccount::Ed25519(Uint256(key.0)))
}

fn truncate_memo(memo: &str) -> &str {
    if memo.len() <= MEMO_MAX_BYTES {
        return memo;
    }
    let mut end = MEMO_MAX_BYTES;
    while !memo.is_char_boundary(end) {
        end -= 1;
    }
    &memo[..end]
}
