use thiserror::Error;
use uuid::Uuid;

use crate::{error::HttpError, models::jobmodel::JobStatus};

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Job {0} not found")]
    JobNotFound(Uuid),

    #[error("Job {0} is not available")]
    JobNotAvailable(Uuid),

    #[error("Job {0} is not in status {1:?}")]
    InvalidJobStatus(Uuid, JobStatus),

    #[error("User {0} is not authorized to perform this action on job {1}")]
    UnauthorizedJobAccess(Uuid, Uuid),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Failed to generate payment artifact: {0}")]
    PaymentGeneration(String),

    #[error("Failed to submit transaction: {0}")]
    Settlement(String),

    #[error("Escrow service error: {0}")]
    Escrow(String),

    #[error("Missing configuration: {0}")]
    Configuration(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<ServiceError> for HttpError {
    fn from(error: ServiceError) -> Self {
        match error {
            ServiceError::JobNotFound(_) => HttpError::not_found(error.to_string()),

            ServiceError::JobNotAvailable(_)
            | ServiceError::InvalidJobStatus(_, _)
            | ServiceError::Validation(_) => HttpError::bad_request(error.to_string()),

            ServiceError::UnauthorizedJobAccess(_, _) => HttpError::forbidden(error.to_string()),

            ServiceError::PaymentGeneration(_)
            | ServiceError::Settlement(_)
            | ServiceError::Escrow(_)
            | ServiceError::Configuration(_)
            | ServiceError::Database(_) => HttpError::server_error(error.to_string()),
        }
    }
}
