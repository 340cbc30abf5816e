//! Default implementation of the bulk-import pipeline.
//!
//! Rows are processed sequentially within one request. Each row's
//! duplicate check runs against the store after the previous row's
//! insert has committed, so duplicates inside one batch are caught the
//! same way as duplicates against pre-existing records.

use async_trait::async_trait;
use std::collections::BTreeMap;
use tracing::info;

use crate::constants::SPREADSHEET_EXTENSIONS;
use crate::db::{NewFaculty, NewStudent, Store};
use crate::db::repositories::password;
use crate::models::{FacultyProfile, StudentProfile};
use crate::parser::workbook::{self, RowRecord, WorkbookError};
use crate::services::import_service::{ImportError, ImportReport, ImportRowError, ImportService};

const STUDENT_REQUIRED_FIELDS: &[&str] =
    &["username", "name", "email", "section", "dept", "password"];
const FACULTY_REQUIRED_FIELDS: &[&str] = &[
    "username",
    "name",
    "email",
    "section",
    "dept",
    "coordinator",
    "password",
];

pub struct DefaultImportService {
    store: Store,
}

impl DefaultImportService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    fn parse_rows(filename: &str, bytes: &[u8]) -> Result<Vec<RowRecord>, ImportError> {
        if !has_allowed_extension(filename) {
            return Err(ImportError::UnsupportedExtension);
        }

        let rows = workbook::parse_first_sheet(bytes).map_err(|e| match e {
            WorkbookError::NoWorksheet => ImportError::EmptySheet,
            WorkbookError::Unreadable(msg) => ImportError::Unreadable(msg),
        })?;

        if rows.is_empty() {
            return Err(ImportError::EmptySheet);
        }

        Ok(rows)
    }

    async fn process_student_row(&self, record: &RowRecord) -> Result<StudentProfile, String> {
        let fields = require_fields(&record.fields, STUDENT_REQUIRED_FIELDS)?;

        let username = fields["username"].clone();
        let email = fields["email"].to_lowercase();

        let duplicate = self
            .store
            .student_exists(&username, &email)
            .await
            .map_err(|e| e.to_string())?;
        if duplicate {
            return Err("Student with this username or email already exists".to_string());
        }

        let password_hash = password::hash_password(&fields["password"])
            .await
            .map_err(|e| e.to_string())?;

        self.store
            .create_student(NewStudent {
                username,
                name: fields["name"].to_uppercase(),
                email,
                section: fields["section"].to_uppercase(),
                dept: fields["dept"].to_uppercase(),
                password_hash,
            })
            .await
            .map_err(|e| e.to_string())
    }

    async fn process_faculty_row(&self, record: &RowRecord) -> Result<FacultyProfile, String> {
        let fields = require_fields(&record.fields, FACULTY_REQUIRED_FIELDS)?;

        let username = fields["username"].clone();
        let email = fields["email"].to_lowercase();

        let duplicate = self
            .store
            .faculty_exists(&username, &email)
            .await
            .map_err(|e| e.to_string())?;
        if duplicate {
            return Err("Faculty with this username or email already exists".to_string());
        }

        let password_hash = password::hash_password(&fields["password"])
            .await
            .map_err(|e| e.to_string())?;

        self.store
            .create_faculty(NewFaculty {
                username,
                name: fields["name"].to_uppercase(),
                email,
                section: fields["section"].to_uppercase(),
                dept: fields["dept"].to_uppercase(),
                coordinator: fields["coordinator"].to_lowercase(),
                password_hash,
            })
            .await
            .map_err(|e| e.to_string())
    }
}

#[async_trait]
impl ImportService for DefaultImportService {
    async fn import_students(
        &self,
        filename: &str,
        bytes: &[u8],
    ) -> Result<ImportReport<StudentProfile>, ImportError> {
        let rows = Self::parse_rows(filename, bytes)?;
        let mut report = empty_report(rows.len());

        for record in &rows {
            // Tagged per-row outcome; the accumulator consumes both arms
            // unconditionally and the loop never aborts early.
            match self.process_student_row(record).await {
                Ok(student) => report.successful_records.push(student),
                Err(reason) => report.errors.push(ImportRowError {
                    row: record.row,
                    reason,
                    data: record.fields.clone(),
                }),
            }
        }

        finalize(&mut report);
        info!(
            "Student import: {} rows, {} created, {} errors",
            report.total_rows, report.success_count, report.error_count
        );
        Ok(report)
    }

    async fn import_faculty(
        &self,
        filename: &str,
        bytes: &[u8],
    ) -> Result<ImportReport<FacultyProfile>, ImportError> {
        let rows = Self::parse_rows(filename, bytes)?;
        let mut report = empty_report(rows.len());

        for record in &rows {
            match self.process_faculty_row(record).await {
                Ok(member) => report.successful_records.push(member),
                Err(reason) => report.errors.push(ImportRowError {
                    row: record.row,
                    reason,
                    data: record.fields.clone(),
                }),
            }
        }

        finalize(&mut report);
        info!(
            "Faculty import: {} rows, {} created, {} errors",
            report.total_rows, report.success_count, report.error_count
        );
        Ok(report)
    }
}

const fn empty_report<T>(total_rows: usize) -> ImportReport<T> {
    ImportReport {
        total_rows,
        success_count: 0,
        error_count: 0,
        successful_records: Vec::new(),
        errors: Vec::new(),
    }
}

fn finalize<T>(report: &mut ImportReport<T>) {
    report.success_count = report.successful_records.len();
    report.error_count = report.errors.len();
}

/// Case-insensitive extension check against the spreadsheet allow-list.
#[must_use]
pub fn has_allowed_extension(filename: &str) -> bool {
    std::path::Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .is_some_and(|ext| SPREADSHEET_EXTENSIONS.contains(&ext.as_str()))
}

/// Returns the trimmed values of every required field, or the list of
/// missing field names as the row error.
fn require_fields<'a>(
    fields: &BTreeMap<String, String>,
    required: &[&'a str],
) -> Result<BTreeMap<&'a str, String>, String> {
    let mut present = BTreeMap::new();
    let mut missing = Vec::new();

    for &name in required {
        match fields.get(name).map(|v| v.trim()) {
            Some(value) if !value.is_empty() => {
                present.insert(name, value.to_string());
            }
            _ => missing.push(name),
        }
    }

    if missing.is_empty() {
        Ok(present)
    } else {
        Err(format!("Missing required fields: {}", missing.join(", ")))
    }
}
