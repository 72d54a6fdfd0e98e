//! Date Normalizer — rewrites spreadsheet date serials as ISO calendar dates.
//!
//! Spreadsheets that lose cell formatting export dates as day counts anchored at
//! 1899-12-30. The sweep turns those into `YYYY-MM-DD` and leaves everything else alone.

use chrono::{Days, NaiveDate};
use sqlx::SqlitePool;
use tracing::{debug, info};

/// Largest serial a spreadsheet can represent (9999-12-31).
const MAX_SERIAL: u64 = 2_958_465;

fn serial_epoch() -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(1899, 12, 30)
}

/// Converts a day count from the spreadsheet epoch to `YYYY-MM-DD`.
pub fn serial_days_to_iso(days: u64) -> Option<String> {
    if days > MAX_SERIAL {
        return None;
    }
    serial_epoch()?
        .checked_add_days(Days::new(days))
        .map(|d| d.format("%Y-%m-%d").to_string())
}

/// Returns the ISO form of `value` if it is a digit-only date serial.
/// Anything else (ISO dates, free text, empty) yields `None`.
pub fn serial_to_iso(value: &str) -> Option<String> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let days = value.parse::<u64>().ok()?;
    serial_days_to_iso(days)
}

/// Sweeps every stored job and rewrites digit-only `date_applied` values.
/// Values out of range are skipped silently. Returns the number of rows rewritten.
pub async fn normalize_stored_dates(pool: &SqlitePool) -> Result<u64, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let rows: Vec<(i64, String)> =
        sqlx::query_as("SELECT id, date_applied FROM jobs WHERE date_applied IS NOT NULL")
            .fetch_all(&mut *tx)
            .await?;

    let mut converted = 0_u64;
    for (id, value) in rows {
        let Some(iso) = serial_to_iso(&value) else {
            continue;
        };
        sqlx::query("UPDATE jobs SET date_applied = ? WHERE id = ?")
            .bind(&iso)
            .bind(id)
            .execute(&mut *tx)
            .await?;
        debug!("Job {id}: date_applied {value} -> {iso}");
        converted += 1;
    }

    tx.commit().await?;
    info!("Date normalization rewrote {converted} job(s)");
    Ok(converted)
}
