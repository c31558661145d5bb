use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::{info, warn};
use std::time::Duration;

use crate::entities::media::MediaKind;

const MAX_CONNECT_ATTEMPTS: u32 = 5;

pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    let mut attempt = 0;
    let mut wait_seconds = 2;

    loop {
        match PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(10))
            .test_before_acquire(true)
            .connect(database_url)
            .await
        {
            Ok(pool) => {
                info!("Database connection established.");
                return Ok(pool);
            }
            Err(e) if attempt < MAX_CONNECT_ATTEMPTS => {
                attempt += 1;
                warn!(
                    "Failed to connect to database (attempt {}/{}): {}. Retrying in {}s...",
                    attempt, MAX_CONNECT_ATTEMPTS, e, wait_seconds);

                tokio::time::sleep(Duration::from_secs(wait_seconds)).await;

                wait_seconds *= 2;
            }
            Err(e) => return Err(e),
        }
    }
}

fn create_table_sql(kind: MediaKind) -> String {
    let category = match kind {
        MediaKind::Video => "category VARCHAR(50) NOT NULL DEFAULT 'coding' \
             CHECK (category IN ('coding', 'hairdressing'))",
        MediaKind::Image => "category VARCHAR(50) NOT NULL DEFAULT 'work'",
    };

    format!(
        r#"
        CREATE TABLE IF NOT EXISTS {table} (
            id BIGSERIAL PRIMARY KEY,
            public_id VARCHAR(255) NOT NULL UNIQUE,
            url VARCHAR(1024) NOT NULL,
            title VARCHAR(255) NOT NULL DEFAULT '{title}',
            description TEXT NOT NULL DEFAULT '',
            {category},
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
        table = kind.table(),
        title = kind.default_title(),
        category = category,
    )
}

/// Columns added after the first deployment; applied in place on older tables.
fn additive_column_sql(kind: MediaKind) -> Vec<String> {
    let table = kind.table();
    vec![
        format!(
            "ALTER TABLE {table} ADD COLUMN IF NOT EXISTS title VARCHAR(255) NOT NULL DEFAULT '{}'",
            kind.default_title()
        ),
        format!("ALTER TABLE {table} ADD COLUMN IF NOT EXISTS description TEXT NOT NULL DEFAULT ''"),
        format!(
            "ALTER TABLE {table} ADD COLUMN IF NOT EXISTS category VARCHAR(50) NOT NULL DEFAULT '{}'",
            kind.default_category()
        ),
    ]
}

/// Brings a table created by an older deployment in line with the current
/// row shape: 32-bit ids, naive timestamps and a missing `created_at` default.
fn legacy_upgrade_sql(kind: MediaKind, id_type: Option<&str>, created_at_type: Option<&str>) -> Vec<String> {
    let table = kind.table();
    let mut statements = Vec::new();

    if id_type == Some("integer") {
        statements.push(format!("ALTER TABLE {table} ALTER COLUMN id TYPE BIGINT"));
        statements.push(format!("ALTER SEQUENCE IF EXISTS {table}_id_seq AS BIGINT"));
    }
    if created_at_type == Some("timestamp without time zone") {
        statements.push(format!(
            "ALTER TABLE {table} ALTER COLUMN created_at TYPE TIMESTAMPTZ USING created_at AT TIME ZONE 'UTC'"
        ));
    }
    statements.push(format!("UPDATE {table} SET created_at = NOW() WHERE created_at IS NULL"));
    statements.push(format!("ALTER TABLE {table} ALTER COLUMN created_at SET DEFAULT NOW()"));
    statements.push(format!(
        "UPDATE {table} SET category = '{}' WHERE category IS NULL",
        kind.default_category()
    ));
    statements.push(format!(
        "ALTER TABLE {table} ALTER COLUMN category SET DEFAULT '{}'",
        kind.default_category()
    ));
    statements
}

async fn column_type(pool: &PgPool, table: &str, column: &str) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>(
        r#"
        SELECT data_type FROM information_schema.columns
        WHERE table_schema = current_schema() AND table_name = $1 AND column_name = $2
        "#,
    )
    .bind(table)
    .bind(column)
    .fetch_optional(pool)
    .await
}

async fn constraint_exists(pool: &PgPool, name: &str) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM pg_constraint c
            JOIN pg_namespace n ON n.oid = c.connamespace
            WHERE c.conname = $1 AND n.nspname = current_schema()
        )
        "#,
    )
    .bind(name)
    .fetch_one(pool)
    .await
}

async fn run_best_effort(pool: &PgPool, kind: MediaKind, statements: Vec<String>) {
    for statement in statements {
        if let Err(e) = sqlx::query(&statement).execute(pool).await {
            warn!(table = kind.table(), "Skipping schema evolution step: {}", e);
        }
    }
}

/// Creates the gallery tables if absent, then evolves existing ones.
/// Only table creation is fatal; evolution failures are logged.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    for kind in MediaKind::ALL {
        let table = kind.table();
        sqlx::query(&create_table_sql(kind)).execute(pool).await?;

        run_best_effort(pool, kind, additive_column_sql(kind)).await;

        let id_type = column_type(pool, table, "id").await.unwrap_or_else(|e| {
            warn!(table, "Could not inspect id column: {}", e);
            None
        });
        let created_at_type = column_type(pool, table, "created_at").await.unwrap_or_else(|e| {
            warn!(table, "Could not inspect created_at column: {}", e);
            None
        });
        run_best_effort(
            pool,
            kind,
            legacy_upgrade_sql(kind, id_type.as_deref(), created_at_type.as_deref()),
        )
        .await;

        if kind == MediaKind::Video {
            let check = format!("{table}_category_check");
            match constraint_exists(pool, &check).await {
                Ok(false) => {
                    // NOT VALID: legacy rows are left alone, new writes are checked.
                    run_best_effort(
                        pool,
                        kind,
                        vec![format!(
                            "ALTER TABLE {table} ADD CONSTRAINT {check} \
                             CHECK (category IN ('coding', 'hairdressing')) NOT VALID"
                        )],
                    )
                    .await;
                }
                Ok(true) => {}
                Err(e) => warn!(table, "Could not inspect constraints: {}", e),
            }
        }

        sqlx::query(&format!(
            "CREATE INDEX IF NOT EXISTS idx_{table}_created_at ON {table} (created_at DESC)"
        ))
        .execute(pool)
        .await?;
    }

    info!("Database schema is up to date.");
    Ok(())
}
