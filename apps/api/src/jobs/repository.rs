use sqlx::{Executor, Sqlite, SqlitePool};
use tracing::info;

use crate::models::job::{JobRow, NewJob};

const SELECT_COLUMNS: &str = "SELECT id, company, position, resume_used, date_applied, status, \
     interview_details, comments, link, job_description FROM jobs";

/// Inserts one job on any SQLite executor (pool or open transaction) and
/// returns the id assigned by the store.
pub async fn insert_job<'e, E>(executor: E, job: &NewJob) -> Result<i64, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        r#"
        INSERT INTO jobs
            (company, position, resume_used, date_applied, status,
             interview_details, comments, link, job_description)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&job.company)
    .bind(&job.position)
    .bind(&job.resume_used)
    .bind(&job.date_applied)
    .bind(&job.status)
    .bind(&job.interview_details)
    .bind(&job.comments)
    .bind(&job.link)
    .bind(&job.job_description)
    .execute(executor)
    .await?;

    Ok(result.last_insert_rowid())
}

pub async fn create_job(pool: &SqlitePool, job: &NewJob) -> Result<i64, sqlx::Error> {
    let id = insert_job(pool, job).await?;
    info!("Added job {id}: {} - {}", job.company, job.position);
    Ok(id)
}

pub async fn get_job(pool: &SqlitePool, id: i64) -> Result<Option<JobRow>, sqlx::Error> {
    sqlx::query_as::<_, JobRow>(&format!("{SELECT_COLUMNS} WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Lists jobs in insertion order. `search` keeps rows whose company, position or
/// status contains the term (ASCII case-insensitive).
pub async fn list_jobs(pool: &SqlitePool, search: Option<&str>) -> Result<Vec<JobRow>, sqlx::Error> {
    match search.map(str::trim).filter(|s| !s.is_empty()) {
        Some(term) => {
            let pattern = format!("%{}%", escape_like(term));
            sqlx::query_as::<_, JobRow>(&format!(
                "{SELECT_COLUMNS} \
                 WHERE company LIKE ?1 ESCAPE '\\' \
                    OR position LIKE ?1 ESCAPE '\\' \
                    OR status LIKE ?1 ESCAPE '\\' \
                 ORDER BY id"
            ))
            .bind(pattern)
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query_as::<_, JobRow>(&format!("{SELECT_COLUMNS} ORDER BY id"))
                .fetch_all(pool)
                .await
        }
    }
}

/// Overwrites every field of an existing job. Returns `false` if no row has `id`.
pub async fn update_job(pool: &SqlitePool, id: i64, job: &NewJob) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE jobs SET
            company = ?, position = ?, resume_used = ?, date_applied = ?, status = ?,
            interview_details = ?, comments = ?, link = ?, job_description = ?
        WHERE id = ?
        "#,
    )
    .bind(&job.company)
    .bind(&job.position)
    .bind(&job.resume_used)
    .bind(&job.date_applied)
    .bind(&job.status)
    .bind(&job.interview_details)
    .bind(&job.comments)
    .bind(&job.link)
    .bind(&job.job_description)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Returns `false` if no row has `id`.
pub async fn delete_job(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM jobs WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
