use std::sync::Arc;

use axum::{
    extract::Request,
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use standard_error::{StandardError, Status};

use crate::{pkg::internal::auth::verify_token, prelude::Result};

/// Accepts `Authorization: Bearer <jwt>` as well as a bare token.
fn bearer(headers: &HeaderMap) -> Option<&str> {
    let raw = headers.get(AUTHORIZATION)?.to_str().ok()?.trim();
    let token = match raw.split_once(' ') {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim(),
        _ if raw.eq_ignore_ascii_case("bearer") => "",
        _ => raw,
    };
    Some(token).filter(|t| !t.is_empty())
}

pub async fn authenticate(mut request: Request, next: Next) -> Result<Response> {
    let Some(token) = bearer(request.headers()) else {
        tracing::warn!("token missing, authentication denied");
        return Err(StandardError::new("ERR-AUTH-001").code(StatusCode::FORBIDDEN));
    };
    let user = verify_token(token)?;
    tracing::debug!("authenticated user {} as {}", user.id, user.role.as_str());
    request.extensions_mut().insert(Arc::new(user));
    Ok(next.run(request).await)
}
