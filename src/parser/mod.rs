pub mod workbook;

pub use workbook::{RowRecord, WorkbookError, parse_first_sheet};
