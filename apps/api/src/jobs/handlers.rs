//! Axum route handlers for the Jobs API.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::import::columns::ColumnAlignment;
use crate::import::dates::normalize_stored_dates;
use crate::import::{check_columns, import_spreadsheet, ImportError, ImportReport};
use crate::jobs::export::jobs_to_csv;
use crate::jobs::repository::{create_job, delete_job, get_job, list_jobs, update_job};
use crate::models::job::{JobRow, NewJob};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct NormalizeDatesResponse {
    pub converted: u64,
}

/// The `file` part of a multipart upload.
#[derive(Debug)]
pub struct UploadedFile {
    pub filename: String,
    pub data: Bytes,
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

/// Manual entries get the same non-empty company/position rule as imports.
fn validate_new_job(job: &NewJob) -> Result<(), AppError> {
    if job.company.trim().is_empty() {
        return Err(AppError::Validation("company cannot be empty".to_string()));
    }
    if job.position.trim().is_empty() {
        return Err(AppError::Validation("position cannot be empty".to_string()));
    }
    Ok(())
}

/// Drops any client-side directory components from an uploaded file name.
fn base_filename(raw: &str) -> &str {
    raw.rsplit(['/', '\\']).next().unwrap_or(raw).trim()
}

async fn read_upload(mut multipart: Multipart) -> Result<UploadedFile, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = base_filename(field.file_name().unwrap_or_default()).to_string();
        if filename.is_empty() {
            return Err(AppError::Validation("No selected file".to_string()));
        }
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Could not read uploaded file: {e}")))?;
        return Ok(UploadedFile { filename, data });
    }
    Err(ImportError::NoFile.into())
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/jobs?q=
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<Vec<JobRow>>, AppError> {
    let jobs = list_jobs(&state.db, params.q.as_deref()).await?;
    Ok(Json(jobs))
}

/// POST /api/v1/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    Json(job): Json<NewJob>,
) -> Result<(StatusCode, Json<JobRow>), AppError> {
    validate_new_job(&job)?;
    let id = create_job(&state.db, &job).await?;
    let created = get_job(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/v1/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<JobRow>, AppError> {
    let job = get_job(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))?;
    Ok(Json(job))
}

/// PUT /api/v1/jobs/:id
///
/// Overwrites every field; omitted optional fields become NULL.
pub async fn handle_update_job(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(job): Json<NewJob>,
) -> Result<Json<JobRow>, AppError> {
    validate_new_job(&job)?;
    if !update_job(&state.db, id, &job).await? {
        return Err(AppError::NotFound(format!("Job {id} not found")));
    }
    let updated = get_job(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))?;
    Ok(Json(updated))
}

/// DELETE /api/v1/jobs/:id
pub async fn handle_delete_job(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    if !delete_job(&state.db, id).await? {
        return Err(AppError::NotFound(format!("Job {id} not found")));
    }
    tracing::info!("Deleted job {id}");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/jobs/export?q=
pub async fn handle_export(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Result<impl IntoResponse, AppError> {
    let jobs = list_jobs(&state.db, params.q.as_deref()).await?;
    let body = jobs_to_csv(&jobs).map_err(|e| AppError::Internal(e.into()))?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"jobs.csv\""),
        ],
        body,
    ))
}

/// POST /api/v1/jobs/import (multipart, field `file`)
pub async fn handle_import(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ImportReport>, AppError> {
    let upload = read_upload(multipart).await?;
    tracing::info!(
        "Received upload '{}' ({} bytes)",
        upload.filename,
        upload.data.len()
    );
    let report = import_spreadsheet(&state.db, &upload.filename, &upload.data).await?;
    Ok(Json(report))
}

/// POST /api/v1/jobs/import/validate (multipart, field `file`)
///
/// Reports missing and extra columns without importing anything.
pub async fn handle_validate_columns(multipart: Multipart) -> Result<Json<ColumnAlignment>, AppError> {
    let upload = read_upload(multipart).await?;
    let alignment = check_columns(&upload.filename, &upload.data)?;
    Ok(Json(alignment))
}

/// POST /api/v1/jobs/normalize-dates
pub async fn handle_normalize_dates(
    State(state): State<AppState>,
) -> Result<Json<NormalizeDatesResponse>, AppError> {
    let converted = normalize_stored_dates(&state.db).await?;
    Ok(Json(NormalizeDatesResponse { converted }))
}
