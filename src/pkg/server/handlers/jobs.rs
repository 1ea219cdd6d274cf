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
            adaptors::jobs::spec::JobEntry,
            auth::AuthUser,
            jobs::{self, CreateJobInput},
        },
        server::state::AppState,
    },
    prelude::Result,
};

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<JobEntry>>> {
    Ok(Json(jobs::list(&state.db_pool).await?))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<JobEntry>> {
    Ok(Json(jobs::get(&state.db_pool, &id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<Arc<AuthUser>>,
    Json(input): Json<CreateJobInput>,
) -> Result<(StatusCode, Json<Value>)> {
    let id = jobs::create(&state.db_pool, &user, input).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Job posted successfully", "jobId": id })),
    ))
}
