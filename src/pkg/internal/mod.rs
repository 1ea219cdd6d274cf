pub mod adaptors;
pub mod applications;
pub mod auth;
pub mod email;
pub mod jobs;
pub mod schema;
pub mod uploads;
