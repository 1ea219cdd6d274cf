use axum::http::StatusCode;
use serde::Deserialize;
use standard_error::{StandardError, Status};

use crate::{
    pkg::internal::{
        adaptors::{
            applications::{
                mutators::Inserted,
                spec::{
                    ApplicationStatus, EmployerApplication, NewApplication, SeekerApplication,
                    StoredDocument,
                },
            },
            store::ApplicationStore,
        },
        auth::AuthUser,
        email::{direct::DirectMessageTemplate, status::StatusUpdateTemplate, Notifier, SendEmail},
        uploads::{self, AttachmentRole, UploadDir},
    },
    prelude::Result,
};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyInput {
    pub full_name: Option<String>,
    pub applicant_email: Option<String>,
    pub phone: Option<String>,
    pub cover_letter: Option<String>,
    pub qualification_text: Option<String>,
    pub resume_document_name: Option<String>,
    pub resume_document_data: Option<String>,
    // older clients send the resume under these names
    pub document_name: Option<String>,
    pub document_data: Option<String>,
    pub other_document_name: Option<String>,
    pub other_document_data: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StatusInput {
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct EmailInput {
    pub subject: Option<String>,
    pub message: Option<String>,
}

fn error(code: &str, status: StatusCode) -> StandardError {
    StandardError::new(code).code(status)
}

fn parse_id(raw: &str, code: &str) -> Result<i32> {
    raw.trim()
        .parse::<i32>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| error(code, StatusCode::BAD_REQUEST))
}

fn required(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

fn optional(value: Option<String>) -> Option<String> {
    required(&value)
}

/// Files already written for this request are removed before the error propagates.
async fn discard_all(uploads: &UploadDir, stored: &[StoredDocument]) {
    for doc in stored {
        uploads.discard(doc).await;
    }
}

/// Creates a pending application for the calling job seeker and returns its id.
pub async fn submit<S: ApplicationStore + ?Sized>(
    store: &S,
    uploads: &UploadDir,
    user: &AuthUser,
    raw_job_id: &str,
    input: ApplyInput,
) -> Result<i32> {
    if !user.is_job_seeker() {
        return Err(error("ERR-APP-001", StatusCode::FORBIDDEN));
    }
    let job_id = parse_id(raw_job_id, "ERR-JOB-004")?;
    let (Some(full_name), Some(applicant_email), Some(qualification_text)) = (
        required(&input.full_name),
        required(&input.applicant_email),
        required(&input.qualification_text),
    ) else {
        return Err(error("ERR-APP-002", StatusCode::BAD_REQUEST));
    };
    if !store.job_exists(job_id).await? {
        return Err(error("ERR-JOB-003", StatusCode::NOT_FOUND));
    }
    if store.find_application(user.id, job_id).await?.is_some() {
        return Err(error("ERR-APP-003", StatusCode::CONFLICT));
    }

    // decode everything before the first byte hits disk
    let pending = [
        uploads::prepare(
            AttachmentRole::Resume,
            input
                .resume_document_name
                .as_deref()
                .or(input.document_name.as_deref()),
            input
                .resume_document_data
                .as_deref()
                .or(input.document_data.as_deref()),
        )?,
        uploads::prepare(
            AttachmentRole::Other,
            input.other_document_name.as_deref(),
            input.other_document_data.as_deref(),
        )?,
    ];

    let mut resume = None;
    let mut other = None;
    let mut stored = Vec::new();
    for upload in pending.iter().flatten() {
        let doc = match uploads.persist(user.id, job_id, upload).await {
            Ok(doc) => doc,
            Err(e) => {
                discard_all(uploads, &stored).await;
                return Err(e);
            }
        };
        stored.push(doc.clone());
        match upload.role {
            AttachmentRole::Resume => resume = Some(doc),
            AttachmentRole::Other => other = Some(doc),
        }
    }

    let inserted = store
        .insert_application(NewApplication {
            user_id: user.id,
            job_id,
            qualification_text,
            full_name,
            applicant_email,
            phone: optional(input.phone),
            cover_letter: optional(input.cover_letter),
            resume,
            other,
        })
        .await;
    match inserted {
        Ok(Inserted::Created(id)) => {
            tracing::info!(
                "user {} applied to job {} as application {} with {} attachment(s)",
                user.id,
                job_id,
                id,
                stored.len()
            );
            Ok(id)
        }
        Ok(Inserted::Duplicate) => {
            tracing::debug!("lost duplicate race for user {} on job {}", user.id, job_id);
            discard_all(uploads, &stored).await;
            Err(error("ERR-APP-003", StatusCode::CONFLICT))
        }
        Err(e) => {
            tracing::error!("failed to insert application: {}", e);
            discard_all(uploads, &stored).await;
            Err(error("ERR-INTERNAL-000", StatusCode::INTERNAL_SERVER_ERROR))
        }
    }
}

/// Moves an application owned by the calling employer to a new status,
/// then tells the applicant. Mail trouble never fails the update.
pub async fn update_status<S: ApplicationStore + ?Sized>(
    store: &S,
    notifier: &Notifier,
    user: &AuthUser,
    raw_application_id: &str,
    input: StatusInput,
) -> Result<ApplicationStatus> {
    if !user.is_employer() {
        return Err(error("ERR-APP-005", StatusCode::FORBIDDEN));
    }
    let application_id = parse_id(raw_application_id, "ERR-APP-006")?;
    let status: ApplicationStatus = input
        .status
        .as_deref()
        .unwrap_or_default()
        .parse()
        .map_err(|_| error("ERR-APP-007", StatusCode::BAD_REQUEST))?;

    // unowned and missing look the same from outside
    let Some(application) = store.find_owned(application_id, user.id).await? else {
        return Err(error("ERR-APP-008", StatusCode::NOT_FOUND));
    };
    store.update_status(application_id, status).await?;
    tracing::info!(
        "employer {} set application {} to {}",
        user.id,
        application_id,
        status
    );

    let template = StatusUpdateTemplate {
        name: application.full_name.as_deref().unwrap_or_default(),
        job_title: &application.job_title,
        company: &application.company,
        status,
    };
    match template
        .send(notifier, application.applicant_email.as_deref())
        .await
    {
        Ok(true) => tracing::debug!("status email sent for application {}", application_id),
        Ok(false) => {}
        Err(e) => tracing::warn!(
            "status email for application {} failed: {}",
            application_id,
            e
        ),
    }
    Ok(status)
}

/// Sends an employer-written message to an approved or shortlisted applicant.
pub async fn email_applicant<S: ApplicationStore + ?Sized>(
    store: &S,
    notifier: &Notifier,
    user: &AuthUser,
    raw_application_id: &str,
    input: EmailInput,
) -> Result<()> {
    if !user.is_employer() {
        return Err(error("ERR-APP-005", StatusCode::FORBIDDEN));
    }
    let application_id = parse_id(raw_application_id, "ERR-APP-006")?;
    let Some(message) = required(&input.message) else {
        return Err(error("ERR-APP-009", StatusCode::BAD_REQUEST));
    };
    let Some(application) = store.find_owned(application_id, user.id).await? else {
        return Err(error("ERR-APP-008", StatusCode::NOT_FOUND));
    };
    if !application
        .status()
        .is_some_and(|s| s.accepts_direct_email())
    {
        return Err(error("ERR-APP-010", StatusCode::BAD_REQUEST));
    }
    if !notifier.is_configured() {
        return Err(error("ERR-MAIL-001", StatusCode::SERVICE_UNAVAILABLE));
    }

    let template = DirectMessageTemplate {
        name: application.full_name.as_deref().unwrap_or_default(),
        job_title: &application.job_title,
        company: &application.company,
        subject: input.subject.as_deref().unwrap_or_default(),
        message: &message,
    };
    let sent = template
        .send(notifier, application.applicant_email.as_deref())
        .await
        .map_err(|e| {
            tracing::error!("direct email for application {} failed: {}", application_id, e);
            error("ERR-MAIL-002", StatusCode::INTERNAL_SERVER_ERROR)
        })?;
    if !sent {
        return Err(error("ERR-APP-011", StatusCode::BAD_REQUEST));
    }
    tracing::info!("employer {} emailed application {}", user.id, application_id);
    Ok(())
}

/// The caller's own applications; anyone but a job seeker simply has none.
pub async fn list_mine<S: ApplicationStore + ?Sized>(
    store: &S,
    user: &AuthUser,
) -> Result<Vec<SeekerApplication>> {
    if !user.is_job_seeker() {
        return Ok(Vec::new());
    }
    store.list_for_seeker(user.id).await
}

pub async fn applied_job_ids<S: ApplicationStore + ?Sized>(
    store: &S,
    user: &AuthUser,
) -> Result<Vec<i32>> {
    if !user.is_job_seeker() {
        return Ok(Vec::new());
    }
    store.applied_job_ids(user.id).await
}

pub async fn list_for_employer<S: ApplicationStore + ?Sized>(
    store: &S,
    user: &AuthUser,
) -> Result<Vec<EmployerApplication>> {
    if !user.is_employer() {
        return Err(error("ERR-APP-005", StatusCode::FORBIDDEN));
    }
    store.list_for_employer(user.id).await
}
