use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn,
    routing::{get, patch, post},
    Router,
};
use tower_http::{cors::CorsLayer, services::ServeDir};

use super::handlers::{applications, auth, jobs, probes};
use super::middlewares::authn;
use super::state::AppState;
use crate::{conf::settings, pkg::internal::uploads::PUBLIC_PREFIX};

pub fn build_routes(state: AppState) -> Router {
    let uploads = ServeDir::new(state.uploads.root());
    Router::new()
        .route("/api/auth/profile", get(auth::profile))
        .route("/api/auth/verify", get(auth::verify))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/jobs", post(jobs::create))
        .route("/api/jobs/applied/me", get(applications::applied_job_ids))
        .route("/api/jobs/applications/me", get(applications::mine))
        .route("/api/jobs/:id/apply", post(applications::apply))
        .route(
            "/api/jobs/employer/applications",
            get(applications::for_employer),
        )
        .route(
            "/api/jobs/employer/applications/:application_id/status",
            patch(applications::update_status),
        )
        .route(
            "/api/jobs/employer/applications/:application_id/email",
            post(applications::email),
        )
        .route_layer(from_fn(authn::authenticate))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/jobs", get(jobs::list))
        .route("/api/jobs/:id", get(jobs::get))
        .route("/healthz", get(probes::healthz))
        .route("/livez", get(probes::livez))
        .route("/health", get(probes::health))
        .nest_service(PUBLIC_PREFIX, uploads)
        .layer(DefaultBodyLimit::max(settings.max_body_bytes))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::ServiceExt;
    use tracing_test::traced_test;

    use super::*;
    use crate::pkg::{
        internal::{
            auth::{issue_token, AuthUser, Role},
            email::Notifier,
            uploads::UploadDir,
        },
        server::state::db_pool,
    };

    fn app() -> (Router, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState {
            db_pool: Arc::new(db_pool().unwrap()),
            notifier: Notifier::disabled(),
            uploads: Arc::new(UploadDir::new(dir.path())),
        };
        (build_routes(state), dir)
    }

    fn token(role: Role) -> String {
        issue_token(&AuthUser {
            id: 3,
            email: "someone@x.com".into(),
            role,
        })
        .unwrap()
    }

    fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn send(req: Request<Body>) -> (StatusCode, Vec<u8>) {
        let (app, _dir) = app();
        let res = app.oneshot(req).await.unwrap();
        let status = res.status();
        let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn test_livez() {
        let (status, _) = send(request("GET", "/livez", None, None)).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[traced_test]
    #[tokio::test]
    async fn test_gate_rejects_missing_and_bad_tokens() {
        let (status, _) = send(request("GET", "/api/jobs/applications/me", None, None)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = send(request(
            "GET",
            "/api/jobs/applications/me",
            Some("not.a.jwt"),
            None,
        ))
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(request("POST", "/api/auth/logout", None, None)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_logout_is_stateless() {
        let seeker = token(Role::JobSeeker);
        let (status, body) =
            send(request("POST", "/api/auth/logout", Some(&seeker), None)).await;
        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["success"], json!(true));
    }

    #[tokio::test]
    async fn test_employer_sees_no_applied_jobs() {
        let employer = token(Role::Employer);
        let (status, body) =
            send(request("GET", "/api/jobs/applied/me", Some(&employer), None)).await;
        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body, json!({ "appliedJobIds": [] }));

        let (status, body) =
            send(request("GET", "/api/jobs/applications/me", Some(&employer), None)).await;
        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body, json!({ "applications": [] }));
    }

    #[tokio::test]
    async fn test_role_checks_precede_storage() {
        let employer = token(Role::Employer);
        let seeker = token(Role::JobSeeker);

        let (status, _) = send(request(
            "POST",
            "/api/jobs/1/apply",
            Some(&employer),
            Some(json!({ "fullName": "Ann" })),
        ))
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = send(request(
            "PATCH",
            "/api/jobs/employer/applications/1/status",
            Some(&seeker),
            Some(json!({ "status": "approved" })),
        ))
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = send(request(
            "GET",
            "/api/jobs/employer/applications",
            Some(&seeker),
            None,
        ))
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = send(request(
            "POST",
            "/api/jobs",
            Some(&seeker),
            Some(json!({ "title": "Welder" })),
        ))
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_input_validation_precedes_storage() {
        let employer = token(Role::Employer);
        let seeker = token(Role::JobSeeker);

        let (status, _) = send(request(
            "POST",
            "/api/jobs/abc/apply",
            Some(&seeker),
            Some(json!({})),
        ))
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(request(
            "PATCH",
            "/api/jobs/employer/applications/1/status",
            Some(&employer),
            Some(json!({ "status": "hired" })),
        ))
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(request(
            "POST",
            "/api/jobs/employer/applications/1/email",
            Some(&employer),
            Some(json!({ "message": "   " })),
        ))
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(request(
            "POST",
            "/api/auth/register",
            None,
            Some(json!({ "name": "Ann", "email": "ann@x.com" })),
        ))
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(request("GET", "/api/jobs/abc", None, None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_uploads_are_served_statically() {
        let (app, dir) = app();
        std::fs::write(dir.path().join("1_2_3_resume_cv.txt"), b"hello").unwrap();
        let res = app
            .oneshot(request("GET", "/uploads/1_2_3_resume_cv.txt", None, None))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"hello");
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let (status, _) = send(request("GET", "/api/nope", None, None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
