// Job application CRUD, search and CSV export.
// Spreadsheet import lives in crate::import; this module owns the `jobs` table.

pub mod export;
pub mod handlers;
pub mod repository;
