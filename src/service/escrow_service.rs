// services/escrow_service.rs
//
// Client for the external escrow-creation API. Escrow is a supplementary
// fund lock layered under the payment reservation: claim tolerates any
// failure here, and release happens out of band.
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::service::error::ServiceError;

#[derive(Debug, Clone, Serialize)]
pub struct CreateEscrowRequest {
    pub service_provider: String,
    pub approver: String,
    pub receiver: String,
    pub dispute_resolver: String,
    pub deadline: i64,
    pub amount: String,
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EscrowCreation {
    pub escrow_id: String,
    pub xdr: String,
}

#[async_trait]
pub trait EscrowGateway: Send + Sync {
    /// Asks the escrow service to deploy a single-release escrow. Returns
    /// the escrow id plus the unsigned funding artifact the employer must
    /// sign.
    async fn create_escrow(
        &self,
        request: &CreateEscrowRequest,
    ) -> Result<EscrowCreation, ServiceError>;
}

#[derive(Debug, Clone)]
pub struct TrustlessEscrowService {
    base_url: String,
    api_key: String,
    http: reqwest::Client,
}

impl TrustlessEscrowService {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl EscrowGateway for TrustlessEscrowService {
    async fn create_escrow(
        &self,
        request: &CreateEscrowRequest,
    ) -> Result<EscrowCreation, ServiceError> {
        let response = self
            .http
            .post(format!("{}/deployer/single-release", self.base_url))
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| ServiceError::Escrow(format!("Escrow API request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(ServiceError::Escrow(format!(
                "Escrow API returned {}",
                response.status()
            )));
        }

        response
            .json::<EscrowCreation>()
            .await
            .map_err(|e| ServiceError::Escrow(format!("Invalid escrow API response: {}", e)))
    }
}
