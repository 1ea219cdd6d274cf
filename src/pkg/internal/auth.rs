use axum::http::StatusCode;
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use standard_error::{Interpolate, StandardError, Status};
use validator::Validate;

use crate::{
    conf::settings,
    pkg::internal::adaptors::users::{
        mutators::UserMutator, selectors::UserSelector, spec::UserEntry,
    },
    prelude::Result,
};

/// Canonical user role. "user" is accepted as an older spelling of jobseeker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "jobseeker", alias = "user")]
    JobSeeker,
    #[serde(rename = "employer")]
    Employer,
}

impl Role {
    pub fn parse(raw: &str) -> Option<Role> {
        match raw.trim().to_lowercase().as_str() {
            "jobseeker" | "user" => Some(Role::JobSeeker),
            "employer" => Some(Role::Employer),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::JobSeeker => "jobseeker",
            Role::Employer => "employer",
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub id: i32,
    pub email: String,
    pub role: Role,
    pub exp: i64,
}

/// Identity attached to each authenticated request.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser {
    pub id: i32,
    pub email: String,
    pub role: Role,
}

impl AuthUser {
    pub fn is_job_seeker(&self) -> bool {
        self.role == Role::JobSeeker
    }

    pub fn is_employer(&self) -> bool {
        self.role == Role::Employer
    }
}

#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl PublicUser {
    fn from_entry(entry: &UserEntry) -> Option<Self> {
        Some(PublicUser {
            id: entry.id,
            name: entry.name.clone(),
            email: entry.email.clone(),
            role: entry.role()?,
        })
    }
}

pub fn encode_token(secret: &str, user: &AuthUser, ttl_hours: i64) -> Result<String> {
    let claims = Claims {
        id: user.id,
        email: user.email.clone(),
        role: user.role,
        exp: (Utc::now() + chrono::Duration::hours(ttl_hours)).timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| {
        tracing::error!("failed to sign token: {}", e);
        StandardError::new("ERR-INTERNAL-000").code(StatusCode::INTERNAL_SERVER_ERROR)
    })
}

pub fn decode_token(secret: &str, token: &str) -> Result<AuthUser> {
    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| {
        tracing::debug!("rejected token: {}", e);
        StandardError::new("ERR-AUTH-002").code(StatusCode::UNAUTHORIZED)
    })?;
    Ok(AuthUser {
        id: claims.id,
        email: claims.email,
        role: claims.role,
    })
}

pub fn issue_token(user: &AuthUser) -> Result<String> {
    encode_token(&settings.jwt_secret, user, settings.token_ttl_hours)
}

pub fn verify_token(token: &str) -> Result<AuthUser> {
    decode_token(&settings.jwt_secret, token)
}

async fn hash_password(password: String) -> Result<String> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| StandardError::new("ERR-INTERNAL-000").interpolate_err(e.to_string()))?
        .map_err(|e| StandardError::new("ERR-INTERNAL-000").interpolate_err(e.to_string()))
}

async fn verify_password(password: String, hash: String) -> Result<bool> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| StandardError::new("ERR-INTERNAL-000").interpolate_err(e.to_string()))?
        .map_err(|e| StandardError::new("ERR-INTERNAL-000").interpolate_err(e.to_string()))
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    #[validate(email)]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 6))]
    pub password: String,
    #[serde(default)]
    pub role: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginInput {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct Session {
    pub token: String,
    pub user: PublicUser,
}

fn bad_request(code: &str) -> StandardError {
    StandardError::new(code).code(StatusCode::BAD_REQUEST)
}

/// Checks run before storage is touched, in the order users see them.
pub fn validate_registration(input: &RegisterInput) -> Result<Role> {
    let role = Role::parse(&input.role);
    if input.name.trim().is_empty()
        || input.email.trim().is_empty()
        || input.password.is_empty()
        || input.role.trim().is_empty()
    {
        return Err(bad_request("ERR-AUTH-005"));
    }
    if let Err(errors) = input.validate() {
        let fields = errors.field_errors();
        if fields.contains_key("email") {
            return Err(bad_request("ERR-AUTH-006"));
        }
        return Err(bad_request("ERR-AUTH-007"));
    }
    role.ok_or_else(|| bad_request("ERR-AUTH-008"))
}

pub async fn register(pool: &PgPool, input: RegisterInput) -> Result<Session> {
    let role = validate_registration(&input)?;
    let email = input.email.trim().to_string();
    let name = input.name.trim().to_string();

    let mut conn = pool.acquire().await?;
    if UserSelector::new(&mut conn).get_by_email(&email).await?.is_some() {
        return Err(StandardError::new("ERR-AUTH-004").code(StatusCode::CONFLICT));
    }
    let hashed = hash_password(input.password).await?;
    let id = UserMutator::new(&mut conn)
        .create(&name, &email, &hashed, role)
        .await?
        .ok_or_else(|| StandardError::new("ERR-AUTH-004").code(StatusCode::CONFLICT))?;
    tracing::info!("registered {} user {}", role.as_str(), id);

    let token = issue_token(&AuthUser {
        id,
        email: email.clone(),
        role,
    })?;
    Ok(Session {
        token,
        user: PublicUser {
            id,
            name,
            email,
            role,
        },
    })
}

pub async fn login(pool: &PgPool, input: LoginInput) -> Result<Session> {
    let email = input.email.trim();
    if email.is_empty() || input.password.is_empty() {
        return Err(bad_request("ERR-AUTH-010"));
    }
    let invalid = || StandardError::new("ERR-AUTH-003").code(StatusCode::UNAUTHORIZED);

    let mut conn = pool.acquire().await?;
    let entry = UserSelector::new(&mut conn)
        .get_by_email(email)
        .await?
        .ok_or_else(invalid)?;
    if !verify_password(input.password, entry.password.clone()).await? {
        return Err(invalid());
    }
    let user = PublicUser::from_entry(&entry).ok_or_else(|| {
        tracing::error!("user {} has unrecognised role {:?}", entry.id, entry.role);
        invalid()
    })?;
    let token = issue_token(&AuthUser {
        id: user.id,
        email: user.email.clone(),
        role: user.role,
    })?;
    Ok(Session { token, user })
}

pub async fn profile(pool: &PgPool, user: &AuthUser) -> Result<PublicUser> {
    let mut conn = pool.acquire().await?;
    UserSelector::new(&mut conn)
        .get_by_id(user.id)
        .await?
        .as_ref()
        .and_then(PublicUser::from_entry)
        .ok_or_else(|| StandardError::new("ERR-AUTH-009").code(StatusCode::NOT_FOUND))
}
