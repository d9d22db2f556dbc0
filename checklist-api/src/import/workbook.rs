use super::ImportError;
use calamine::{open_workbook_auto, Data, Reader, Sheets};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// A spreadsheet document read sheet by sheet
pub trait WorkbookSource {
    fn sheet_names(&self) -> Vec<String>;

    /// All rows of a sheet, header first. Trailing empty cells are dropped,
    /// so a blank row comes back with zero cells.
    fn sheet_rows(&mut self, sheet_name: &str) -> Result<Vec<Vec<Data>>, ImportError>;
}

/// `.xlsx`, `.xls` and `.ods` documents on disk
pub struct CalamineWorkbook {
    path: PathBuf,
    sheets: Sheets<BufReader<File>>,
}

impl CalamineWorkbook {
    pub fn open(path: &Path) -> Result<Self, ImportError> {
        if !path.exists() {
            return Err(ImportError::DocumentNotFound(path.to_path_buf()));
        }

        let sheets = open_workbook_auto(path).map_err(|e| ImportError::Unreadable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            path: path.to_path_buf(),
            sheets,
        })
    }
}

impl WorkbookSource for CalamineWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.sheets.sheet_names()
    }

    fn sheet_rows(&mut self, sheet_name: &str) -> Result<Vec<Vec<Data>>, ImportError> {
        let range = self
            .sheets
            .worksheet_range(sheet_name)
            .map_err(|e| ImportError::Unreadable {
                path: self.path.clone(),
                reason: format!("sheet '{}': {}", sheet_name, e),
            })?;

        Ok(range.rows().map(trim_trailing_empty).collect())
    }
}

fn trim_trailing_empty(row: &[Data]) -> Vec<Data> {
    let len = row
        .iter()
        .rposition(|cell| !matches!(cell, Data::Empty))
        .map_or(0, |last| last + 1);
    row[..len].to_vec()
}

/// Workbook assembled in memory, sheets kept in insertion order
#[derive(Debug, Clone, Default)]
pub struct MemoryWorkbook {
    sheets: Vec<(String, Vec<Vec<Data>>)>,
}

impl MemoryWorkbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sheet(mut self, name: &str, rows: Vec<Vec<Data>>) -> Self {
        self.sheets.push((name.to_string(), rows));
        self
    }
}

impl WorkbookSource for MemoryWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|(name, _)| name.clone()).collect()
    }

    fn sheet_rows(&mut self, sheet_name: &str) -> Result<Vec<Vec<Data>>, ImportError> {
        self.sheets
            .iter()
            .find(|(name, _)| name == sheet_name)
            .map(|(_, rows)| rows.iter().map(|row| trim_trailing_empty(row)).collect())
            .ok_or_else(|| ImportError::Unreadable {
                path: PathBuf::from("<memory>"),
                reason: format!("sheet '{}' does not exist", sheet_name),
            })
    }
}
