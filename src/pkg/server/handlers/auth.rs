use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Extension, Json};
use serde_json::{json, Value};
use standard_error::{StandardError, Status};

use crate::{
    pkg::{
        internal::auth::{self, AuthUser, LoginInput, RegisterInput},
        server::state::AppState,
    },
    prelude::Result,
};

pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterInput>,
) -> Result<(StatusCode, Json<Value>)> {
    let session = auth::register(&state.db_pool, input).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "User registered successfully",
            "token": session.token,
            "user": session.user,
        })),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginInput>,
) -> Result<Json<Value>> {
    let session = auth::login(&state.db_pool, input).await?;
    tracing::info!("user {} logged in", session.user.id);
    Ok(Json(json!({
        "success": true,
        "message": "Login successful",
        "token": session.token,
        "user": session.user,
    })))
}

pub async fn profile(
    State(state): State<AppState>,
    Extension(user): Extension<Arc<AuthUser>>,
) -> Result<Json<Value>> {
    let user = auth::profile(&state.db_pool, &user).await?;
    Ok(Json(json!({ "success": true, "user": user })))
}

pub async fn verify(
    State(state): State<AppState>,
    Extension(user): Extension<Arc<AuthUser>>,
) -> Result<Json<Value>> {
    let user = auth::profile(&state.db_pool, &user).await.map_err(|e| {
        tracing::debug!("token holder {} no longer valid: {}", user.id, e);
        StandardError::new("ERR-AUTH-002").code(StatusCode::UNAUTHORIZED)
    })?;
    Ok(Json(json!({ "valid": true, "user": user })))
}

pub async fn logout(Extension(user): Extension<Arc<AuthUser>>) -> Json<Value> {
    tracing::info!("user {} logged out", user.id);
    Json(json!({ "success": true, "message": "Logged out successfully" }))
}
