use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::jobmodel::Currency;

//Job DTOs
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateJobDto {
    pub employer_id: Uuid,

    #[validate(length(min = 1, max = 100, message = "Title must be between 1 and 100 characters"))]
    pub title: String,

    #[validate(length(
        min = 1,
        max = 2000,
        message = "Description must be between 1 and 2000 characters"
    ))]
    pub description: String,

    #[serde(default)]
    pub tags: Option<Vec<String>>,

    #[validate(range(min = 0.0000001, message = "Price must be positive"))]
    pub price: f64,

    pub currency: Currency,

    /// Employer display name, captured at post time.
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClaimJobDto {
    pub employee_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WithdrawJobDto {
    pub employer_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteJobDto {
    pub employer_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct SubmitXdrDto {
    #[validate(length(min = 1, message = "signed_xdr is required"))]
    pub signed_xdr: String,
}

//Review DTOs
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateReviewDto {
    pub reviewer_id: Uuid,

    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i32,

    #[serde(default)]
    pub comment: Option<String>,
}

//Response wrappers
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status: String,
    pub message: String,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(message: &str, data: T) -> Self {
        Self {
            status: "success".to_string(),
            message: message.to_string(),
            data: Some(data),
        }
    }
}
