use sqlx::PgConnection;

use crate::{pkg::internal::adaptors::jobs::spec::NewJob, prelude::Result};

pub struct JobMutator<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> JobMutator<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        JobMutator { pool }
    }

    pub async fn create(&mut self, job: NewJob) -> Result<i32> {
        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO jobs
                (title, company, location, salary, description, requirements, employment_type,
                 application_deadline, posted_by, contact_email, category, entry_level,
                 no_degree_required, remote_job, part_time, high_paying, fast_hiring)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            RETURNING id
            "#,
        )
        .bind(&job.title)
        .bind(&job.company)
        .bind(&job.location)
        .bind(&job.salary)
        .bind(&job.description)
        .bind(&job.requirements)
        .bind(&job.employment_type)
        .bind(job.application_deadline)
        .bind(job.posted_by)
        .bind(&job.contact_email)
        .bind(&job.category)
        .bind(job.tags.entry_level)
        .bind(job.tags.no_degree_required)
        .bind(job.tags.remote_job)
        .bind(job.tags.part_time)
        .bind(job.tags.high_paying)
        .bind(job.tags.fast_hiring)
        .fetch_one(&mut *self.pool)
        .await?;
        Ok(id)
    }
}
