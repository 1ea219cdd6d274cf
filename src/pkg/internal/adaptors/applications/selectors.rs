use sqlx::PgConnection;

use crate::{
    pkg::internal::adaptors::applications::spec::{
        EmployerApplication, OwnedApplication, SeekerApplication,
    },
    prelude::Result,
};

pub struct ApplicationSelector<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> ApplicationSelector<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        ApplicationSelector { pool }
    }

    pub async fn find_by_user_and_job(&mut self, user_id: i32, job_id: i32) -> Result<Option<i32>> {
        let id = sqlx::query_scalar::<_, i32>(
            "SELECT id FROM applications WHERE user_id = $1 AND job_id = $2 LIMIT 1",
        )
        .bind(user_id)
        .bind(job_id)
        .fetch_optional(&mut *self.pool)
        .await?;
        Ok(id)
    }

    /// Only matches when the application's job was posted by `employer_id`.
    pub async fn owned_by_employer(
        &mut self,
        application_id: i32,
        employer_id: i32,
    ) -> Result<Option<OwnedApplication>> {
        let row = sqlx::query_as::<_, OwnedApplication>(
            r#"
            SELECT a.id, a.status, a.applicant_email, a.full_name,
                   j.title AS job_title, j.company
            FROM applications a
            INNER JOIN jobs j ON j.id = a.job_id
            WHERE a.id = $1 AND j.posted_by = $2
            LIMIT 1
            "#,
        )
        .bind(application_id)
        .bind(employer_id)
        .fetch_optional(&mut *self.pool)
        .await?;
        Ok(row)
    }

    pub async fn for_seeker(&mut self, user_id: i32) -> Result<Vec<SeekerApplication>> {
        let rows = sqlx::query_as::<_, SeekerApplication>(
            r#"
            SELECT a.id AS application_id, a.job_id, a.status, a.created_at,
                   j.title AS job_title, j.company, j.location, j.salary
            FROM applications a
            INNER JOIN jobs j ON j.id = a.job_id
            WHERE a.user_id = $1
            ORDER BY a.id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&mut *self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn for_employer(&mut self, employer_id: i32) -> Result<Vec<EmployerApplication>> {
        let rows = sqlx::query_as::<_, EmployerApplication>(
            r#"
            SELECT a.id AS application_id, a.job_id, a.full_name, a.applicant_email, a.phone,
                   a.cover_letter, a.qualification_text, a.document_name, a.document_path,
                   a.other_document_name, a.other_document_path, a.status, a.created_at,
                   j.title AS job_title, j.company, j.posted_by
            FROM applications a
            INNER JOIN jobs j ON j.id = a.job_id
            WHERE j.posted_by = $1
            ORDER BY a.id DESC
            "#,
        )
        .bind(employer_id)
        .fetch_all(&mut *self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn job_ids_for_user(&mut self, user_id: i32) -> Result<Vec<i32>> {
        let ids = sqlx::query_scalar::<_, i32>("SELECT job_id FROM applications WHERE user_id = $1")
            .bind(user_id)
            .fetch_all(&mut *self.pool)
            .await?;
        Ok(ids)
    }
}
