use sqlx::PgPool;

use crate::{
    pkg::internal::adaptors::{
        applications::{
            mutators::{ApplicationMutator, Inserted},
            selectors::ApplicationSelector,
            spec::{
                ApplicationStatus, EmployerApplication, NewApplication, OwnedApplication,
                SeekerApplication,
            },
        },
        jobs::selectors::JobSelector,
    },
    prelude::Result,
};

/// Everything the application workflow reads from or writes to storage.
#[async_trait::async_trait]
pub trait ApplicationStore: Send + Sync {
    async fn job_exists(&self, job_id: i32) -> Result<bool>;

    async fn find_application(&self, user_id: i32, job_id: i32) -> Result<Option<i32>>;

    async fn insert_application(&self, application: NewApplication) -> Result<Inserted>;

    async fn find_owned(
        &self,
        application_id: i32,
        employer_id: i32,
    ) -> Result<Option<OwnedApplication>>;

    async fn update_status(&self, application_id: i32, status: ApplicationStatus) -> Result<bool>;

    async fn list_for_seeker(&self, user_id: i32) -> Result<Vec<SeekerApplication>>;

    async fn list_for_employer(&self, employer_id: i32) -> Result<Vec<EmployerApplication>>;

    async fn applied_job_ids(&self, user_id: i32) -> Result<Vec<i32>>;
}

#[async_trait::async_trait]
impl ApplicationStore for PgPool {
    async fn job_exists(&self, job_id: i32) -> Result<bool> {
        let mut conn = self.acquire().await?;
        JobSelector::new(&mut conn).exists(job_id).await
    }

    async fn find_application(&self, user_id: i32, job_id: i32) -> Result<Option<i32>> {
        let mut conn = self.acquire().await?;
        ApplicationSelector::new(&mut conn)
            .find_by_user_and_job(user_id, job_id)
            .await
    }

    async fn insert_application(&self, application: NewApplication) -> Result<Inserted> {
        let mut conn = self.acquire().await?;
        ApplicationMutator::new(&mut conn).create(application).await
    }

    async fn find_owned(
        &self,
        application_id: i32,
        employer_id: i32,
    ) -> Result<Option<OwnedApplication>> {
        let mut conn = self.acquire().await?;
        ApplicationSelector::new(&mut conn)
            .owned_by_employer(application_id, employer_id)
            .await
    }

    async fn update_status(&self, application_id: i32, status: ApplicationStatus) -> Result<bool> {
        let mut conn = self.acquire().await?;
        ApplicationMutator::new(&mut conn)
            .set_status(application_id, status)
            .await
    }

    async fn list_for_seeker(&self, user_id: i32) -> Result<Vec<SeekerApplication>> {
        let mut conn = self.acquire().await?;
        ApplicationSelector::new(&mut conn).for_seeker(user_id).await
    }

    async fn list_for_employer(&self, employer_id: i32) -> Result<Vec<EmployerApplication>> {
        let mut conn = self.acquire().await?;
        ApplicationSelector::new(&mut conn)
            .for_employer(employer_id)
            .await
    }

    async fn applied_job_ids(&self, user_id: i32) -> Result<Vec<i32>> {
        let mut conn = self.acquire().await?;
        ApplicationSelector::new(&mut conn)
            .job_ids_for_user(user_id)
            .await
    }
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, response::IntoResponse};
    use standard_error::StandardError;

    #[test]
    fn test_storage_errors_surface_as_generic_internal() {
        for err in [
            sqlx::Error::PoolTimedOut,
            sqlx::Error::RowNotFound,
            sqlx::Error::ColumnNotFound("salary".into()),
            sqlx::Error::Io(std::io::Error::other("connection reset")),
        ] {
            let err = StandardError::from(err);
            assert_eq!(err.message, "Database operation failed", "{}", err.err_code);
            assert_eq!(
                err.into_response().status(),
                StatusCode::INTERNAL_SERVER_ERROR
            );
        }
    }
}
