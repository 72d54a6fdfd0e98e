//! CSV export of stored jobs.

use crate::models::job::JobRow;

pub const EXPORT_HEADER: [&str; 9] = [
    "Company",
    "Position",
    "Resume Used",
    "Date Applied",
    "Status",
    "Interview Details",
    "Comments",
    "Link",
    "Job Description",
];

/// Renders jobs as CSV with [`EXPORT_HEADER`], one row per job, values unmodified.
/// NULL fields are written as empty cells.
pub fn jobs_to_csv(jobs: &[JobRow]) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(EXPORT_HEADER)?;

    for job in jobs {
        let opt = |v: &Option<String>| v.clone().unwrap_or_default();
        writer.write_record([
            job.company.clone(),
            job.position.clone(),
            opt(&job.resume_used),
            opt(&job.date_applied),
            opt(&job.status),
            opt(&job.interview_details),
            opt(&job.comments),
            opt(&job.link),
            opt(&job.job_description),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
}
