// db/jobdb.rs
use async_trait::async_trait;
use sqlx::types::{BigDecimal, Json};
use sqlx::Error;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::jobmodel::{Currency, Job, PaymentReservation};

#[async_trait]
pub trait JobExt {
    async fn create_job(
        &self,
        employer_id: Uuid,
        title: String,
        description: String,
        tags: Option<Vec<String>>,
        price: BigDecimal,
        currency: Currency,
        employer_name: Option<String>,
    ) -> Result<Job, Error>;

    async fn get_job_by_id(&self, job_id: Uuid) -> Result<Option<Job>, Error>;

    async fn get_open_jobs(&self) -> Result<Vec<Job>, Error>;

    async fn get_jobs_by_employer(&self, employer_id: Uuid) -> Result<Vec<Job>, Error>;

    async fn get_jobs_by_employee(&self, employee_id: Uuid) -> Result<Vec<Job>, Error>;

    /// Claims a job for `employee_id`. The update is conditioned on the job
    /// still being `open`, so only one of N concurrent claimants wins;
    /// losers see `None`.
    async fn claim_job(&self, job_id: Uuid, employee_id: Uuid) -> Result<Option<Job>, Error>;

    /// `in_progress` -> `submitted`, conditioned on the current status.
    async fn submit_job(&self, job_id: Uuid) -> Result<Option<Job>, Error>;

    /// `submitted` -> `completed`, conditioned on the current status.
    /// Clears the held payment reservation.
    async fn complete_job(&self, job_id: Uuid) -> Result<Option<Job>, Error>;

    /// `in_progress`/`submitted` -> `cancelled`, conditioned on the current
    /// status. Discards the held payment reservation.
    async fn cancel_job(&self, job_id: Uuid) -> Result<Option<Job>, Error>;

    async fn set_payment_reservation(
        &self,
        job_id: Uuid,
        reservation: &PaymentReservation,
    ) -> Result<(), Error>;

    async fn set_escrow_id(&self, job_id: Uuid, escrow_id: &str) -> Result<(), Error>;

    /// Hard delete, conditioned on ownership and the job still being open.
    /// Returns the number of rows removed.
    async fn delete_open_job(&self, job_id: Uuid, employer_id: Uuid) -> Result<u64, Error>;
}

#[async_trait]
impl JobExt for DBClient {
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
        sqlx::query_as::<_, Job>(
            r#"
            INSERT INTO jobs
            (employer_id, title, description, tags, price, currency, employer_name)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING
                id, employer_id, employee_id, employer_name,
                title, description, tags,
                price, currency, status,
                escrow_id, payment_reservation,
                created_at, updated_at
            "#,
        )
        .bind(employer_id)
        .bind(title)
        .bind(description)
        .bind(tags)
        .bind(price)
        .bind(currency)
        .bind(employer_name)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_job_by_id(&self, job_id: Uuid) -> Result<Option<Job>, Error> {
        sqlx::query_as::<_, Job>(
            r#"
            SELECT
                id, employer_id, employee_id, employer_name,
                title, description, tags,
                price, currency, status,
                escrow_id, payment_reservation,
                created_at, updated_at
            FROM jobs
            WHERE id = $1
            "#,
        )
        .bind(job_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_open_jobs(&self) -> Result<Vec<Job>, Error> {
        sqlx::query_as::<_, Job>(
            r#"
            SELECT
                id, employer_id, employee_id, employer_name,
                title, description, tags,
                price, currency, status,
                escrow_id, payment_reservation,
                created_at, updated_at
            FROM jobs
            WHERE status = 'open'::job_status
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    async fn get_jobs_by_employer(&self, employer_id: Uuid) -> Result<Vec<Job>, Error> {
        sqlx::query_as::<_, Job>(
            r#"
            SELECT
                id, employer_id, employee_id, employer_name,
                title, description, tags,
                price, currency, status,
                escrow_id, payment_reservation,
                created_at, updated_at
            FROM jobs
            WHERE employer_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(employer_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_jobs_by_employee(&self, employee_id: Uuid) -> Result<Vec<Job>, Error> {
        sqlx::query_as::<_, Job>(
            r#"
            SELECT
                id, employer_id, employee_id, employer_name,
                title, description, tags,
                price, currency, status,
                escrow_id, payment_reservation,
                created_at, updated_at
            FROM jobs
            WHERE employee_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn claim_job(&self, job_id: Uuid, employee_id: Uuid) -> Result<Option<Job>, Error> {
        sqlx::query_as::<_, Job>(
            r#"
            UPDATE jobs
            SET employee_id = $2, status = 'in_progress'::job_status, updated_at = NOW()
            WHERE id = $1 AND status = 'open'::job_status
            RETURNING
                id, employer_id, employee_id, employer_name,
                title, description, tags,
                price, currency, status,
                escrow_id, payment_reservation,
                created_at, updated_at
            "#,
        )
        .bind(job_id)
        .bind(employee_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn submit_job(&self, job_id: Uuid) -> Result<Option<Job>, Error> {
        sqlx::query_as::<_, Job>(
            r#"
            UPDATE jobs
            SET status = 'submitted'::job_status, updated_at = NOW()
            WHERE id = $1 AND status = 'in_progress'::job_status
            RETURNING
                id, employer_id, employee_id, employer_name,
                title, description, tags,
                price, currency, status,
                escrow_id, payment_reservation,
                created_at, updated_at
            "#,
        )
        .bind(job_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn complete_job(&self, job_id: Uuid) -> Result<Option<Job>, Error> {
        sqlx::query_as::<_, Job>(
            r#"
            UPDATE jobs
            SET status = 'completed'::job_status, payment_reservation = NULL, updated_at = NOW()
            WHERE id = $1 AND status = 'submitted'::job_status
            RETURNING
                id, employer_id, employee_id, employer_name,
                title, description, tags,
                price, currency, status,
                escrow_id, payment_reservation,
                created_at, updated_at
            "#,
        )
        .bind(job_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn cancel_job(&self, job_id: Uuid) -> Result<Option<Job>, Error> {
        sqlx::query_as::<_, Job>(
            r#"
            UPDATE jobs
            SET status = 'cancelled'::job_status, payment_reservation = NULL, updated_at = NOW()
            WHERE id = $1
              AND status IN ('in_progress'::job_status, 'submitted'::job_status)
            RETURNING
                id, employer_id, employee_id, employer_name,
                title, description, tags,
                price, currency, status,
                escrow_id, payment_reservation,
                created_at, updated_at
            "#,
        )
        .bind(job_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn set_payment_reservation(
        &self,
        job_id: Uuid,
        reservation: &PaymentReservation,
    ) -> Result<(), Error> {
        sqlx::query(
            r#"
            UPDATE jobs
            SET payment_reservation = $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(job_id)
        .bind(Json(reservation))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn set_escrow_id(&self, job_id: Uuid, escrow_id: &str) -> Result<(), Error> {
        sqlx::query(
            r#"
            UPDATE jobs
            SET escrow_id = $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(job_id)
        .bind(escrow_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_open_job(&self, job_id: Uuid, employer_id: Uuid) -> Result<u64, Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM jobs
            WHERE id = $1 AND employer_id = $2 AND status = 'open'::job_status
            "#,
        )
        .bind(job_id)
        .bind(employer_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
