//! Bulk roster import from spreadsheet uploads.
//!
//! An upload is processed row by row; each row either creates a record
//! or lands in the error list with its spreadsheet row number and the
//! original cell data. Only pre-loop failures (bad extension, no data
//! rows, unreadable workbook) fail the request as a whole.

use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::models::{FacultyProfile, StudentProfile};

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("No file uploaded")]
    MissingFile,

    #[error("Only Excel files (.xlsx, .xls) are allowed")]
    UnsupportedExtension,

    #[error("Uploaded file contains no data rows")]
    EmptySheet,

    #[error("Unable to read workbook: {0}")]
    Unreadable(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for ImportError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for ImportError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// One failed row: spreadsheet row number (data starts at 2), the
/// reason, and the original cell data so the caller can fix and
/// resubmit just the bad rows.
#[derive(Debug, Clone, Serialize)]
pub struct ImportRowError {
    pub row: usize,
    pub reason: String,
    pub data: BTreeMap<String, String>,
}

/// Partial-success report for one upload. Never persisted; it exists
/// only for the duration of the request/response cycle.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport<T> {
    pub total_rows: usize,
    pub success_count: usize,
    pub error_count: usize,
    pub successful_records: Vec<T>,
    pub errors: Vec<ImportRowError>,
}

impl<T> ImportReport<T> {
    #[must_use]
    pub const fn all_succeeded(&self) -> bool {
        self.error_count == 0
    }
}

#[async_trait::async_trait]
pub trait ImportService: Send + Sync {
    /// # Errors
    ///
    /// Only the pre-loop checks fail the call; row-level problems are
    /// collected into the report.
    async fn import_students(
        &self,
        filename: &str,
        bytes: &[u8],
    ) -> Result<ImportReport<StudentProfile>, ImportError>;

    async fn import_faculty(
        &self,
        filename: &str,
        bytes: &[u8],
    ) -> Result<ImportReport<FacultyProfile>, ImportError>;
}
