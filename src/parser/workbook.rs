//! Spreadsheet row extraction for the bulk-import pipeline.
//!
//! Only the first worksheet is read. Row 1 is the header; data rows
//! keep their spreadsheet row number (starting at 2) so import errors
//! can point the caller at the offending row.

use calamine::{Data, Range, Reader, open_workbook_auto_from_rs};
use std::collections::BTreeMap;
use std::io::Cursor;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkbookError {
    #[error("Unable to read workbook: {0}")]
    Unreadable(String),

    #[error("Workbook has no worksheets")]
    NoWorksheet,
}

/// One data row: spreadsheet row number plus header-keyed cell values.
#[derive(Debug, Clone)]
pub struct RowRecord {
    pub row: usize,
    pub fields: BTreeMap<String, String>,
}

/// Parses the first worksheet of an `.xlsx`/`.xls` buffer into ordered
/// row records. Rows whose cells are all empty are dropped, matching
/// how spreadsheet tools pad trailing rows.
pub fn parse_first_sheet(bytes: &[u8]) -> Result<Vec<RowRecord>, WorkbookError> {
    let cursor = Cursor::new(bytes.to_vec());
    let mut workbook =
        open_workbook_auto_from_rs(cursor).map_err(|e| WorkbookError::Unreadable(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or(WorkbookError::NoWorksheet)?
        .map_err(|e| WorkbookError::Unreadable(e.to_string()))?;

    Ok(rows_from_range(&range))
}

fn rows_from_range(range: &Range<Data>) -> Vec<RowRecord> {
    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Vec::new();
    };

    let headers: Vec<String> = header.iter().map(cell_to_string).collect();

    let mut records = Vec::new();
    for (index, row) in rows.enumerate() {
        let mut fields = BTreeMap::new();
        let mut has_value = false;

        for (header, cell) in headers.iter().zip(row) {
            if header.is_empty() {
                continue;
            }
            let value = cell_to_string(cell);
            if !value.is_empty() {
                has_value = true;
            }
            fields.insert(header.clone(), value);
        }

        if has_value {
            records.push(RowRecord {
                row: index + 2,
                fields,
            });
        }
    }

    records
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        // Integral floats render without the trailing ".0" so numeric
        // usernames and sections survive the Excel float round-trip.
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => {
            format!("{}", *f as i64)
        }
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        other => other.to_string().trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_range() -> Range<Data> {
        let mut range = Range::new((0, 0), (3, 2));
        range.set_value((0, 0), Data::String("username".to_string()));
        range.set_value((0, 1), Data::String("name".to_string()));
        range.set_value((0, 2), Data::String("section".to_string()));

        range.set_value((1, 0), Data::String("alice01".to_string()));
        range.set_value((1, 1), Data::String(" Alice ".to_string()));
        range.set_value((1, 2), Data::String("A".to_string()));

        range.set_value((2, 0), Data::Float(42.0));
        range.set_value((2, 1), Data::String("Bob".to_string()));
        range.set_value((2, 2), Data::String("B".to_string()));

        range
    }

    #[test]
    fn header_row_keys_the_cells() {
        let rows = rows_from_range(&sample_range());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].fields["username"], "alice01");
        assert_eq!(rows[0].fields["name"], "Alice");
        assert_eq!(rows[0].fields["section"], "A");
    }

    #[test]
    fn data_rows_are_numbered_from_two() {
        let rows = rows_from_range(&sample_range());
        assert_eq!(rows[0].row, 2);
        assert_eq!(rows[1].row, 3);
    }

    #[test]
    fn numeric_cells_stringify_without_decimal_tail() {
        let rows = rows_from_range(&sample_range());
        assert_eq!(rows[1].fields["username"], "42");
    }

    #[test]
    fn blank_rows_are_skipped_but_numbering_is_preserved() {
        let mut range = Range::new((0, 0), (3, 0));
        range.set_value((0, 0), Data::String("username".to_string()));
        range.set_value((1, 0), Data::Empty);
        range.set_value((2, 0), Data::String("carol".to_string()));

        let rows = rows_from_range(&range);
        assert_eq!(rows.len(), 1);
        // The blank row 2 still occupies its slot in the sheet.
        assert_eq!(rows[0].row, 3);
        assert_eq!(rows[0].fields["username"], "carol");
    }

    #[test]
    fn header_only_sheet_yields_no_rows() {
        let mut range = Range::new((0, 0), (0, 1));
        range.set_value((0, 0), Data::String("username".to_string()));
        range.set_value((0, 1), Data::String("name".to_string()));

        assert!(rows_from_range(&range).is_empty());
    }

    #[test]
    fn missing_cells_come_back_empty_not_absent() {
        let mut range = Range::new((0, 0), (1, 1));
        range.set_value((0, 0), Data::String("username".to_string()));
        range.set_value((0, 1), Data::String("email".to_string()));
        range.set_value((1, 0), Data::String("dave".to_string()));
        range.set_value((1, 1), Data::Empty);

        let rows = rows_from_range(&range);
        assert_eq!(rows[0].fields["email"], "");
    }
}
