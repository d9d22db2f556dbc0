//! Spreadsheet ingestion into checklist questions.
//!
//! Each sheet of the workbook holds one language's checklist. Sheets are
//! classified by name, their header row is matched against column aliases,
//! and data rows are normalized with the area label carried down from the
//! last row that named one.

mod columns;
mod importer;
mod normalize;
mod sheet;
mod workbook;

use crate::storage::StorageError;
use std::path::PathBuf;

pub use columns::{find_column, locate_columns, FieldAliases, RequiredColumns, FIELD_ALIASES};
pub use importer::{preview_document, preview_languages, preview_workbook, Importer};
pub use normalize::{
    clean_str, clean_text, normalize_row, normalize_sheet, AreaState, NormalizedRow, RowOutcome,
    SkipReason,
};
pub use sheet::classify_sheet;
pub use workbook::{CalamineWorkbook, MemoryWorkbook, WorkbookSource};

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("Document not found: {}", .0.display())]
    DocumentNotFound(PathBuf),

    #[error("Unreadable workbook {}: {reason}", .path.display())]
    Unreadable { path: PathBuf, reason: String },

    #[error(transparent)]
    Storage(#[from] StorageError),
}
