use sqlx::postgres::PgPoolOptions;
use standard_error::{Interpolate, StandardError};

use crate::{conf::settings, pkg::internal::schema, prelude::Result};

pub async fn apply() -> Result<()> {
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&settings.database_url)
        .await
        .map_err(|e| StandardError::new("ERR-DB-000").interpolate_err(e.to_string()))?;

    tracing::debug!("connected to db");
    schema::migrate(&pool).await?;

    println!("Migrations applied successfully");
    Ok(())
}
