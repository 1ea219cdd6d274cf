use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobEntry {
    pub id: i32,
    pub title: String,
    pub company: String,
    pub location: String,
    pub salary: Option<String>,
    pub description: String,
    pub requirements: Option<String>,
    pub employment_type: Option<String>,
    pub application_deadline: Option<NaiveDate>,
    pub posted_by: Option<i32>,
    pub contact_email: Option<String>,
    pub category: Option<String>,
    pub entry_level: bool,
    pub no_degree_required: bool,
    pub remote_job: bool,
    pub part_time: bool,
    pub high_paying: bool,
    pub fast_hiring: bool,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobTags {
    pub entry_level: bool,
    pub no_degree_required: bool,
    pub remote_job: bool,
    pub part_time: bool,
    pub high_paying: bool,
    pub fast_hiring: bool,
}

#[derive(Debug, Clone)]
pub struct NewJob {
    pub title: String,
    pub company: String,
    pub location: String,
    pub salary: Option<String>,
    pub description: String,
    pub requirements: Option<String>,
    pub employment_type: Option<String>,
    pub application_deadline: Option<NaiveDate>,
    pub posted_by: i32,
    pub contact_email: Option<String>,
    pub category: String,
    pub tags: JobTags,
}
