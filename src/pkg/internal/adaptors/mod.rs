pub mod applications;
pub mod jobs;
pub mod store;
pub mod users;
