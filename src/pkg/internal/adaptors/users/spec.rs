use chrono::NaiveDateTime;
use sqlx::FromRow;

use crate::pkg::internal::auth::Role;

/// Row as stored; `role` may still hold the legacy "user" spelling.
#[derive(Debug, Clone, FromRow)]
pub struct UserEntry {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
    pub created_at: Option<NaiveDateTime>,
}

impl UserEntry {
    pub fn role(&self) -> Option<Role> {
        Role::parse(&self.role)
    }
}
