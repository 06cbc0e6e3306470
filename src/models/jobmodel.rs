use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::{BigDecimal, Json};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "job_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Open,
    InProgress,
    Submitted,
    Completed,
    Cancelled,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "currency_code", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Xlm,
    Usdc,
}

/// Unsigned payment artifact held on a job between claim and approval.
///
/// Legacy rows store the artifact as a bare XDR string, newer rows wrap it
/// in an object. Both shapes decode into this one type at the database
/// boundary, so nothing downstream ever re-parses the column.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum PaymentReservation {
    Wrapped { payment_xdr: String },
    Raw(String),
}

impl PaymentReservation {
    pub fn into_xdr(self) -> String {
        match self {
            PaymentReservation::Wrapped { payment_xdr } => payment_xdr,
            PaymentReservation::Raw(xdr) => xdr,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Job {
    pub id: Uuid,
    pub employer_id: Uuid,
    pub employee_id: Option<Uuid>,
    pub employer_name: Option<String>,
    pub title: String,
    pub description: String,
    pub tags: Option<Vec<String>>,
    pub price: BigDecimal,
    pub currency: Currency,
    pub status: JobStatus,
    pub escrow_id: Option<String>,
    pub payment_reservation: Option<Json<PaymentReservation>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
