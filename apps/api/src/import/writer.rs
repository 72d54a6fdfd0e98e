//! Bulk Writer — persists one import as a single transaction.

use sqlx::SqlitePool;
use tracing::{error, info};

use crate::import::ImportError;
use crate::jobs::repository::insert_job;
use crate::models::job::NewJob;

/// Inserts every candidate or none of them. Any storage failure rolls the
/// transaction back and surfaces as `ImportFailed` with the driver's message.
pub async fn insert_batch(pool: &SqlitePool, jobs: &[NewJob]) -> Result<usize, ImportError> {
    let mut tx = pool.begin().await.map_err(storage_failure)?;

    for (idx, job) in jobs.iter().enumerate() {
        let inserted = insert_job(&mut *tx, job).await;
        if let Err(e) = inserted {
            error!("Batch insert failed at record {} of {}: {e}", idx + 1, jobs.len());
            if let Err(rollback) = tx.rollback().await {
                error!("Rollback after failed batch insert also failed: {rollback}");
            }
            return Err(storage_failure(e));
        }
    }

    tx.commit().await.map_err(storage_failure)?;
    info!("Committed batch of {} job(s)", jobs.len());
    Ok(jobs.len())
}

fn storage_failure(e: sqlx::Error) -> ImportError {
    ImportError::ImportFailed(e.to_string())
}
