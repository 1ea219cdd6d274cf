use std::sync::Arc;

use sqlx::{postgres::PgPoolOptions, PgPool, Pool, Postgres};

use crate::{
    conf::settings,
    pkg::internal::{email::Notifier, uploads::UploadDir},
    prelude::Result,
};

pub fn db_pool() -> Result<Pool<Postgres>> {
    let pool = PgPoolOptions::new()
        .max_connections(settings.database_pool_max_connections)
        .connect_lazy(&settings.database_url)?;
    Ok(pool)
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub db_pool: Arc<PgPool>,
    pub notifier: Notifier,
    pub uploads: Arc<UploadDir>,
}

impl AppState {
    pub fn new() -> Result<AppState> {
        Ok(AppState {
            db_pool: Arc::new(db_pool()?),
            notifier: Notifier::from_settings(),
            uploads: Arc::new(UploadDir::new(&settings.upload_dir)),
        })
    }
}
