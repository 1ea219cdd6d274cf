use axum::{extract::State, Json};
use serde_json::{json, Value};
use sqlx::query;

use crate::{pkg::server::state::AppState, prelude::Result};

pub async fn livez() -> Result<()> {
    tracing::debug!("service is live");
    Ok(())
}

pub async fn healthz(State(state): State<AppState>) -> Result<()> {
    query("select 1").execute(&*state.db_pool).await?;
    tracing::debug!("service is healthy");
    Ok(())
}

/// Always 200; reports the database separately so the frontend can show it.
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    match query("select 1").execute(&*state.db_pool).await {
        Ok(_) => Json(json!({ "server": "ok", "db": "connected" })),
        Err(e) => {
            tracing::warn!("health probe could not reach the database: {}", e);
            Json(json!({ "server": "ok", "db": "down", "error": e.to_string() }))
        }
    }
}
