use anyhow::Result;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tracing::info;

/// Job table. Company and position are the only required fields; the CHECK
/// constraints reject empty or whitespace-only values at the storage layer.
const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS jobs (
    id                INTEGER PRIMARY KEY AUTOINCREMENT,
    company           TEXT NOT NULL CHECK (length(trim(company)) > 0),
    position          TEXT NOT NULL CHECK (length(trim(position)) > 0),
    resume_used       TEXT,
    date_applied      TEXT,
    status            TEXT,
    interview_details TEXT,
    comments          TEXT,
    link              TEXT,
    job_description   TEXT
)
"#;

/// Creates and returns a SQLite connection pool.
pub async fn create_pool(database_url: &str) -> Result<SqlitePool> {
    info!("Connecting to SQLite at {database_url}...");

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    info!("SQLite connection pool established");
    Ok(pool)
}

/// Creates the `jobs` table if it does not exist yet.
pub async fn init_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(SCHEMA).execute(pool).await?;
    info!("Database schema ready");
    Ok(())
}

/// Single-connection in-memory pool with the schema applied.
/// One connection keeps every query on the same in-memory database.
#[cfg(test)]
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    init_schema(&pool).await.unwrap();
    pool
}
