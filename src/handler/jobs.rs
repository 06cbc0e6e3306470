// handlers/jobs.rs
use std::sync::Arc;

use axum::{
    extract::Path,
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::jobdb::JobExt,
    dtos::jobdtos::{ClaimJobDto, CreateJobDto, CreateReviewDto, DeleteJobDto, SubmitXdrDto, WithdrawJobDto},
    error::HttpError,
    service::job_service::ApprovalOutcome,
    AppState,
};

pub fn jobs_handler() -> Router {
    Router::new()
        .route("/", get(list_open_jobs).post(create_job))
        .route("/employer/:user_id", get(get_employer_jobs))
        .route("/employee/:user_id", get(get_employee_jobs))
        .route("/submit-xdr", post(submit_signed_xdr))
        .route("/:job_id", get(get_job_details).delete(delete_job))
        .route("/:job_id/claim", post(claim_job))
        .route("/:job_id/submit", post(submit_work))
        .route("/:job_id/approve", post(approve_work))
        .route("/:job_id/withdraw", post(withdraw_job))
        .route("/:job_id/review", post(create_review))
}

pub async fn list_open_jobs(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let jobs = app_state
        .db_client
        .get_open_jobs()
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(jobs))
}

pub async fn get_job_details(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let job = app_state
        .db_client
        .get_job_by_id(job_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Job not found"))?;

    Ok(Json(job))
}

pub async fn get_employer_jobs(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let jobs = app_state
        .db_client
        .get_jobs_by_employer(user_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(jobs))
}

pub async fn get_employee_jobs(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let jobs = app_state
        .db_client
        .get_jobs_by_employee(user_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(jobs))
}

pub async fn create_job(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<CreateJobDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let job = app_state.job_service.post_job(body).await?;

    Ok(Json(json!({
        "job_id": job.id,
        "message": "Job created successfully"
    })))
}

pub async fn claim_job(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(job_id): Path<Uuid>,
    Json(body): Json<ClaimJobDto>,
) -> Result<impl IntoResponse, HttpError> {
    let outcome = app_state
        .job_service
        .claim_job(job_id, body.employee_id)
        .await?;

    Ok(Json(json!({
        "message": "Job claimed successfully",
        "job_id": outcome.job.id,
        "effects": outcome.effects
    })))
}

pub async fn submit_work(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    app_state.job_service.submit_work(job_id).await?;

    Ok(Json(json!({
        "message": "Work submitted successfully"
    })))
}

pub async fn approve_work(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let outcome = app_state.job_service.approve_work(job_id).await?;

    match outcome {
        ApprovalOutcome::Paid {
            xdr,
            amount,
            from,
            to,
            network,
        } => Ok(Json(json!({
            "success": true,
            "xdrs": { "payment": xdr },
            "amount": amount,
            "from": from,
            "to": to,
            "network": network,
            "message": "Work approved. Employer must sign and submit the payment XDR."
        }))),
        ApprovalOutcome::CompletedWithoutPayment => Ok(Json(json!({
            "success": true,
            "message": "Job completed. Payment skipped: one or both parties have no wallet."
        }))),
    }
}

pub async fn withdraw_job(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(job_id): Path<Uuid>,
    Json(body): Json<WithdrawJobDto>,
) -> Result<impl IntoResponse, HttpError> {
    app_state
        .job_service
        .withdraw_job(job_id, body.employer_id)
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Job withdrawn successfully"
    })))
}

pub async fn delete_job(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(job_id): Path<Uuid>,
    Json(body): Json<DeleteJobDto>,
) -> Result<impl IntoResponse, HttpError> {
    app_state
        .job_service
        .delete_job(job_id, body.employer_id)
        .await?;

    Ok(Json(json!({
        "message": "Job deleted successfully"
    })))
}

pub async fn submit_signed_xdr(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<SubmitXdrDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let receipt = app_state
        .job_service
        .submit_signed_artifact(&body.signed_xdr)
        .await?;

    Ok(Json(json!({
        "success": true,
        "hash": receipt.hash,
        "result": receipt.raw
    })))
}

pub async fn create_review(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(job_id): Path<Uuid>,
    Json(body): Json<CreateReviewDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let xdr_data = app_state
        .review_service
        .prepare_review(job_id, body.reviewer_id, body.rating, body.comment)
        .await?;

    Ok(Json(json!({
        "success": true,
        "needs_signing": true,
        "xdr_data": xdr_data,
        "message": "Review payload generated. Sign with your wallet and submit."
    })))
}
