use axum::http::StatusCode;
use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::PgPool;
use standard_error::{StandardError, Status};

use crate::{
    pkg::internal::{
        adaptors::jobs::{
            mutators::JobMutator,
            selectors::JobSelector,
            spec::{JobEntry, JobTags, NewJob},
        },
        auth::AuthUser,
    },
    prelude::Result,
};

const DEFAULT_CATEGORY: &str = "Others";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagsInput {
    #[serde(default)]
    pub entry_level: bool,
    #[serde(default)]
    pub no_degree_required: bool,
    #[serde(default)]
    pub remote_jobs: bool,
    #[serde(default)]
    pub part_time: bool,
    #[serde(default)]
    pub high_paying: bool,
    #[serde(default)]
    pub fast_hiring: bool,
}

impl From<TagsInput> for JobTags {
    fn from(tags: TagsInput) -> Self {
        JobTags {
            entry_level: tags.entry_level,
            no_degree_required: tags.no_degree_required,
            remote_job: tags.remote_jobs,
            part_time: tags.part_time,
            high_paying: tags.high_paying,
            fast_hiring: tags.fast_hiring,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobInput {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub salary: Option<String>,
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub employment_type: Option<String>,
    pub application_deadline: Option<String>,
    pub contact_email: Option<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub tags: TagsInput,
}

fn filled(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Turns a posting request into a row for the calling employer.
pub fn new_job(user: &AuthUser, input: CreateJobInput) -> Result<NewJob> {
    if !user.is_employer() {
        return Err(StandardError::new("ERR-JOB-001").code(StatusCode::FORBIDDEN));
    }
    let (Some(title), Some(company), Some(location), Some(description)) = (
        filled(input.title),
        filled(input.company),
        filled(input.location),
        filled(input.description),
    ) else {
        return Err(StandardError::new("ERR-JOB-002").code(StatusCode::BAD_REQUEST));
    };
    let application_deadline = match filled(input.application_deadline) {
        Some(raw) => Some(NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|_| {
            StandardError::new("ERR-JOB-005").code(StatusCode::BAD_REQUEST)
        })?),
        None => None,
    };
    Ok(NewJob {
        title,
        company,
        location,
        salary: filled(input.salary),
        description,
        requirements: filled(input.requirements),
        employment_type: filled(input.employment_type),
        application_deadline,
        posted_by: user.id,
        contact_email: filled(input.contact_email),
        category: filled(input.category).unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
        tags: input.tags.into(),
    })
}

pub async fn create(pool: &PgPool, user: &AuthUser, input: CreateJobInput) -> Result<i32> {
    let job = new_job(user, input)?;
    let mut conn = pool.acquire().await?;
    let id = JobMutator::new(&mut conn).create(job).await?;
    tracing::info!("employer {} posted job {}", user.id, id);
    Ok(id)
}

pub async fn list(pool: &PgPool) -> Result<Vec<JobEntry>> {
    let mut conn = pool.acquire().await?;
    JobSelector::new(&mut conn).get_all().await
}

pub async fn get(pool: &PgPool, raw_id: &str) -> Result<JobEntry> {
    let id = raw_id
        .trim()
        .parse::<i32>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| StandardError::new("ERR-JOB-004").code(StatusCode::BAD_REQUEST))?;
    let mut conn = pool.acquire().await?;
    JobSelector::new(&mut conn)
        .get_by_id(id)
        .await?
        .ok_or_else(|| StandardError::new("ERR-JOB-003").code(StatusCode::NOT_FOUND))
}
