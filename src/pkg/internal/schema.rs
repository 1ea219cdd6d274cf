use sqlx::{migrate::Migrator, PgConnection, PgPool};
use standard_error::{Interpolate, StandardError};

use crate::prelude::Result;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Columns layered onto the base `jobs` table after it was first shipped.
pub const JOB_COLUMNS: &[(&str, &str)] = &[
    ("requirements", "TEXT NULL"),
    ("employment_type", "VARCHAR(100) NULL"),
    ("application_deadline", "DATE NULL"),
    ("posted_by", "INT NULL"),
    ("contact_email", "VARCHAR(255) NULL"),
    ("category", "VARCHAR(120) DEFAULT 'Others'"),
    ("entry_level", "BOOLEAN NOT NULL DEFAULT FALSE"),
    ("no_degree_required", "BOOLEAN NOT NULL DEFAULT FALSE"),
    ("remote_job", "BOOLEAN NOT NULL DEFAULT FALSE"),
    ("part_time", "BOOLEAN NOT NULL DEFAULT FALSE"),
    ("high_paying", "BOOLEAN NOT NULL DEFAULT FALSE"),
    ("fast_hiring", "BOOLEAN NOT NULL DEFAULT FALSE"),
    ("created_at", "TIMESTAMP DEFAULT CURRENT_TIMESTAMP"),
];

/// Columns layered onto the base `applications` table.
pub const APPLICATION_COLUMNS: &[(&str, &str)] = &[
    ("qualification_text", "TEXT NULL"),
    ("document_name", "VARCHAR(255) NULL"),
    ("document_path", "VARCHAR(255) NULL"),
    ("full_name", "VARCHAR(255) NULL"),
    ("applicant_email", "VARCHAR(255) NULL"),
    ("phone", "VARCHAR(100) NULL"),
    ("cover_letter", "TEXT NULL"),
    ("other_document_name", "VARCHAR(255) NULL"),
    ("other_document_path", "VARCHAR(255) NULL"),
    ("created_at", "TIMESTAMP DEFAULT CURRENT_TIMESTAMP"),
];

fn add_column_sql(table: &str, column: &str, definition: &str) -> String {
    format!("ALTER TABLE {} ADD COLUMN {} {}", table, column, definition)
}

async fn column_exists(conn: &mut PgConnection, table: &str, column: &str) -> Result<bool> {
    let found = sqlx::query_scalar::<_, String>(
        r#"
        SELECT column_name::text FROM information_schema.columns
        WHERE table_schema = current_schema() AND table_name = $1 AND column_name = $2
        "#,
    )
    .bind(table)
    .bind(column)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(found.is_some())
}

/// Returns whether the column had to be added.
async fn add_column_if_missing(
    conn: &mut PgConnection,
    table: &str,
    column: &str,
    definition: &str,
) -> Result<bool> {
    if column_exists(conn, table, column).await? {
        return Ok(false);
    }
    sqlx::query(&add_column_sql(table, column, definition))
        .execute(&mut *conn)
        .await?;
    tracing::info!("added column {}.{}", table, column);
    Ok(true)
}

/// Applies versioned migrations, then the additive column upgrades.
/// Safe to run any number of times.
pub async fn migrate(pool: &PgPool) -> Result<()> {
    MIGRATOR
        .run(pool)
        .await
        .map_err(|e| StandardError::new("ERR-DB-000").interpolate_err(e.to_string()))?;

    let mut conn = pool.acquire().await?;
    let mut added = 0;
    for (table, columns) in [("jobs", JOB_COLUMNS), ("applications", APPLICATION_COLUMNS)] {
        for (column, definition) in columns {
            if add_column_if_missing(&mut conn, table, column, definition).await? {
                added += 1;
            }
        }
    }
    tracing::debug!("schema up to date, {} column(s) added", added);
    Ok(())
}

/// Startup phase run before the listener binds. A failure here is logged and
/// the server still comes up; queries touching a missing column fail on their own.
pub async fn prepare(pool: &PgPool) {
    if let Err(e) = migrate(pool).await {
        tracing::error!("schema migration failed, continuing without it: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_column_sql() {
        assert_eq!(
            add_column_sql("jobs", "category", "VARCHAR(120) DEFAULT 'Others'"),
            "ALTER TABLE jobs ADD COLUMN category VARCHAR(120) DEFAULT 'Others'"
        );
    }

    #[test]
    fn test_workflow_columns_are_covered() {
        let jobs: Vec<&str> = JOB_COLUMNS.iter().map(|(c, _)| *c).collect();
        for needed in ["posted_by", "requirements", "category", "fast_hiring"] {
            assert!(jobs.contains(&needed), "jobs.{} missing", needed);
        }
        let apps: Vec<&str> = APPLICATION_COLUMNS.iter().map(|(c, _)| *c).collect();
        for needed in [
            "qualification_text",
            "document_path",
            "other_document_path",
            "applicant_email",
            "created_at",
        ] {
            assert!(apps.contains(&needed), "applications.{} missing", needed);
        }
    }
}
