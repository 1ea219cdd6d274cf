use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde_json::{json, Value};

use crate::{
    pkg::{
        internal::{
            applications::{self, ApplyInput, EmailInput, StatusInput},
            auth::AuthUser,
        },
        server::state::AppState,
    },
    prelude::Result,
};

pub async fn apply(
    State(state): State<AppState>,
    Extension(user): Extension<Arc<AuthUser>>,
    Path(job_id): Path<String>,
    Json(input): Json<ApplyInput>,
) -> Result<(StatusCode, Json<Value>)> {
    let id = applications::submit(&*state.db_pool, &state.uploads, &user, &job_id, input).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Application submitted successfully",
            "applicationId": id,
        })),
    ))
}

pub async fn applied_job_ids(
    State(state): State<AppState>,
    Extension(user): Extension<Arc<AuthUser>>,
) -> Result<Json<Value>> {
    let ids = applications::applied_job_ids(&*state.db_pool, &user).await?;
    Ok(Json(json!({ "appliedJobIds": ids })))
}

pub async fn mine(
    State(state): State<AppState>,
    Extension(user): Extension<Arc<AuthUser>>,
) -> Result<Json<Value>> {
    let rows = applications::list_mine(&*state.db_pool, &user).await?;
    Ok(Json(json!({ "applications": rows })))
}

pub async fn for_employer(
    State(state): State<AppState>,
    Extension(user): Extension<Arc<AuthUser>>,
) -> Result<Json<Value>> {
    let rows = applications::list_for_employer(&*state.db_pool, &user).await?;
    Ok(Json(json!({ "applications": rows })))
}

pub async fn update_status(
    State(state): State<AppState>,
    Extension(user): Extension<Arc<AuthUser>>,
    Path(application_id): Path<String>,
    Json(input): Json<StatusInput>,
) -> Result<Json<Value>> {
    let status = applications::update_status(
        &*state.db_pool,
        &state.notifier,
        &user,
        &application_id,
        input,
    )
    .await?;
    Ok(Json(json!({
        "message": "Application status updated",
        "status": status,
    })))
}

pub async fn email(
    State(state): State<AppState>,
    Extension(user): Extension<Arc<AuthUser>>,
    Path(application_id): Path<String>,
    Json(input): Json<EmailInput>,
) -> Result<Json<Value>> {
    applications::email_applicant(
        &*state.db_pool,
        &state.notifier,
        &user,
        &application_id,
        input,
    )
    .await?;
    Ok(Json(json!({ "message": "Email sent successfully" })))
}
