use sqlx::PgConnection;

use crate::{
    pkg::internal::adaptors::applications::spec::{ApplicationStatus, NewApplication},
    prelude::Result,
};

/// Outcome of an insert guarded by the (user_id, job_id) unique index.
#[derive(Debug, PartialEq)]
pub enum Inserted {
    Created(i32),
    Duplicate,
}

pub struct ApplicationMutator<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> ApplicationMutator<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        ApplicationMutator { pool }
    }

    pub async fn create(&mut self, application: NewApplication) -> Result<Inserted> {
        let (document_name, document_path) = match application.resume {
            Some(doc) => (Some(doc.name), Some(doc.path)),
            None => (None, None),
        };
        let (other_name, other_path) = match application.other {
            Some(doc) => (Some(doc.name), Some(doc.path)),
            None => (None, None),
        };
        let result = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO applications
                (user_id, job_id, resume_link, qualification_text, document_name, document_path,
                 full_name, applicant_email, phone, cover_letter, other_document_name,
                 other_document_path, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING id
            "#,
        )
        .bind(application.user_id)
        .bind(application.job_id)
        .bind(&document_path)
        .bind(&application.qualification_text)
        .bind(&document_name)
        .bind(&document_path)
        .bind(&application.full_name)
        .bind(&application.applicant_email)
        .bind(&application.phone)
        .bind(&application.cover_letter)
        .bind(&other_name)
        .bind(&other_path)
        .bind(ApplicationStatus::Pending.as_str())
        .fetch_one(&mut *self.pool)
        .await;
        match result {
            Ok(id) => Ok(Inserted::Created(id)),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Ok(Inserted::Duplicate),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn set_status(&mut self, application_id: i32, status: ApplicationStatus) -> Result<bool> {
        let result = sqlx::query("UPDATE applications SET status = $1 WHERE id = $2")
            .bind(status.as_str())
            .bind(application_id)
            .execute(&mut *self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
