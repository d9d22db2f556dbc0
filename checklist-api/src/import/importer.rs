use super::columns::{locate_columns, RequiredColumns, FIELD_ALIASES};
use super::normalize::{clean_text, normalize_sheet, RowOutcome};
use super::sheet::classify_sheet;
use super::workbook::{CalamineWorkbook, WorkbookSource};
use super::ImportError;
use calamine::Data;
use crate::storage::{NewQuestion, QuestionStore};
use shared_types::{
    ColumnIndices, ImportSummary, Language, SheetOutcome, SheetPreview, SheetStatus,
};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, error, info, warn};

const PREVIEW_SAMPLE_ROWS: usize = 3;

/// Seeds the question table from a workbook
pub struct Importer<'a, S: QuestionStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: QuestionStore + ?Sized> Importer<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Import the document unless questions already exist.
    pub async fn import(&self, path: &Path) -> Result<ImportSummary, ImportError> {
        if !path.exists() {
            return Err(ImportError::DocumentNotFound(path.to_path_buf()));
        }

        let filename = document_name(path);
        if let Some(skipped) = self.skip_if_seeded(&filename).await? {
            return Ok(skipped);
        }

        let mut workbook = CalamineWorkbook::open(path)?;
        self.seed(&mut workbook, &filename).await
    }

    /// Same as [`Importer::import`] for a workbook that is already open
    pub async fn import_workbook<W: WorkbookSource>(
        &self,
        workbook: &mut W,
        filename: &str,
    ) -> Result<ImportSummary, ImportError> {
        if let Some(skipped) = self.skip_if_seeded(filename).await? {
            return Ok(skipped);
        }
        self.seed(workbook, filename).await
    }

    /// Drop every question and import the document again.
    ///
    /// Every mapped sheet is read before anything is cleared, so a missing or
    /// unreadable document leaves the current questions in place.
    pub async fn force_reimport(&self, path: &Path) -> Result<ImportSummary, ImportError> {
        let mut workbook = CalamineWorkbook::open(path)?;
        self.force_reimport_workbook(&mut workbook, &document_name(path))
            .await
    }

    pub async fn force_reimport_workbook<W: WorkbookSource>(
        &self,
        workbook: &mut W,
        filename: &str,
    ) -> Result<ImportSummary, ImportError> {
        info!(filename, "Force re-importing questions");
        self.seed(workbook, filename).await
    }

    async fn skip_if_seeded(&self, filename: &str) -> Result<Option<ImportSummary>, ImportError> {
        let existing = self.store.count_questions().await?;
        if existing == 0 {
            return Ok(None);
        }

        info!(
            existing,
            filename, "Questions already present, skipping import"
        );
        Ok(Some(ImportSummary {
            filename: filename.to_string(),
            total_inserted: 0,
            skipped_existing: true,
            sheets: Vec::new(),
        }))
    }

    async fn seed<W: WorkbookSource>(
        &self,
        workbook: &mut W,
        filename: &str,
    ) -> Result<ImportSummary, ImportError> {
        let sheet_names = workbook.sheet_names();
        info!(filename, sheets = ?sheet_names, "Importing questions");

        // nothing is written until every mapped sheet has been read
        let loaded = read_sheets(workbook, &sheet_names)?;

        self.store.clear_questions().await?;

        let mut sheets = Vec::with_capacity(loaded.len());
        for sheet in &loaded {
            sheets.push(self.load_sheet(sheet).await);
        }

        let total_inserted = sheets.iter().map(|s| s.inserted).sum();
        self.store.record_imported_file(filename).await?;
        info!(filename, total_inserted, "Question import finished");

        Ok(ImportSummary {
            filename: filename.to_string(),
            total_inserted,
            skipped_existing: false,
            sheets,
        })
    }

    async fn load_sheet(&self, sheet: &LoadedSheet) -> SheetOutcome {
        let sheet_name = sheet.name.as_str();
        let mut outcome = SheetOutcome {
            sheet_name: sheet.name.clone(),
            language: sheet.language,
            status: SheetStatus::UnmappedLanguage,
            columns: ColumnIndices::default(),
            inserted: 0,
            rows_skipped: 0,
            rows_failed: 0,
        };

        let Some(language) = sheet.language else {
            info!(sheet = sheet_name, "Skipping sheet without a language mapping");
            return outcome;
        };

        let (header, data_rows) = match sheet.rows.split_first() {
            Some((header, data)) => (header.as_slice(), data),
            None => (&[][..], &[][..]),
        };

        outcome.columns = locate_columns(header, &FIELD_ALIASES);
        let Some(columns) = RequiredColumns::from_indices(&outcome.columns) else {
            outcome.status = SheetStatus::MissingColumns;
            warn!(
                sheet = sheet_name,
                area = ?outcome.columns.area,
                activity = ?outcome.columns.activity,
                criteria = ?outcome.columns.criteria,
                "Required columns not found, skipping sheet"
            );
            return outcome;
        };
        outcome.status = SheetStatus::Imported;

        info!(
            sheet = sheet_name,
            language = %language,
            rows = data_rows.len(),
            "Processing sheet"
        );

        for (position, row_outcome) in normalize_sheet(data_rows, &columns) {
            let row = match row_outcome {
                RowOutcome::Accepted(row) => row,
                RowOutcome::Skipped(reason) => {
                    debug!(sheet = sheet_name, row = position, ?reason, "Row skipped");
                    outcome.rows_skipped += 1;
                    continue;
                }
            };

            let question = NewQuestion {
                area: row.area,
                activity: row.activity,
                criteria: row.criteria,
                language,
                sequence_order: position,
            };
            match self.store.insert_question(&question).await {
                Ok(_) => outcome.inserted += 1,
                Err(e) => {
                    error!(sheet = sheet_name, row = position, error = %e, "Failed to insert question");
                    outcome.rows_failed += 1;
                }
            }
        }

        outcome
    }
}

/// A sheet read into memory ahead of any write. Unmapped sheets carry no rows.
struct LoadedSheet {
    name: String,
    language: Option<Language>,
    rows: Vec<Vec<Data>>,
}

fn read_sheets<W: WorkbookSource>(
    workbook: &mut W,
    sheet_names: &[String],
) -> Result<Vec<LoadedSheet>, ImportError> {
    sheet_names
        .iter()
        .map(|name| {
            let language = classify_sheet(name);
            let rows = match language {
                Some(_) => workbook.sheet_rows(name)?,
                None => Vec::new(),
            };
            Ok(LoadedSheet {
                name: name.clone(),
                language,
                rows,
            })
        })
        .collect()
}

fn document_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Sheet discovery without persistence: per mapped sheet, its row count,
/// headers, and the first few data rows.
pub fn preview_workbook<W: WorkbookSource>(
    workbook: &mut W,
) -> Result<BTreeMap<String, SheetPreview>, ImportError> {
    let mut preview = BTreeMap::new();

    for sheet_name in workbook.sheet_names() {
        let Some(language) = classify_sheet(&sheet_name) else {
            continue;
        };

        let rows = workbook.sheet_rows(&sheet_name)?;
        let header = rows.first().map(Vec::as_slice).unwrap_or_default();
        let sample_rows = rows
            .iter()
            .skip(1)
            .take(PREVIEW_SAMPLE_ROWS)
            .map(|row| row.iter().map(clean_text).collect())
            .collect();

        preview.insert(
            sheet_name,
            SheetPreview {
                language,
                row_count: rows.len().saturating_sub(1),
                headers: header.iter().map(clean_text).collect(),
                sample_rows,
                columns: locate_columns(header, &FIELD_ALIASES),
            },
        );
    }

    Ok(preview)
}

pub fn preview_document(path: &Path) -> Result<BTreeMap<String, SheetPreview>, ImportError> {
    let mut workbook = CalamineWorkbook::open(path)?;
    preview_workbook(&mut workbook)
}

/// Languages with at least one sheet in the preview
pub fn preview_languages(preview: &BTreeMap<String, SheetPreview>) -> Vec<Language> {
    let mut languages: Vec<Language> = preview.values().map(|sheet| sheet.language).collect();
    languages.sort_by_key(|l| l.as_str());
    languages.dedup();
    languages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::MemoryWorkbook;
    use crate::storage::InMemoryQuestionStore;
    use calamine::Data;

    fn text(cells: &[&str]) -> Vec<Data> {
        cells
            .iter()
            .map(|c| {
                if c.is_empty() {
                    Data::Empty
                } else {
                    Data::String(c.to_string())
                }
            })
            .collect()
    }

    fn grouped_sheet(header: &[&str], prefix: &str) -> Vec<Vec<Data>> {
        vec![
            text(header),
            text(&[&format!("{prefix} Area A"), "Sketch", "Sketch is constrained"]),
            text(&["", "Pad", "Pad extrudes"]),
            text(&["", "Pocket", "Pocket cuts"]),
        ]
    }

    fn bilingual() -> MemoryWorkbook {
        MemoryWorkbook::new()
            .with_sheet("Eng", grouped_sheet(&["Area", "Activity", "Criteria"], "EN"))
            .with_sheet(
                "Bahasa",
                grouped_sheet(&["Kategori", "Aktivitas", "Kriteria Sukses"], "ID"),
            )
    }

    #[actix_rt::test]
    async fn test_bilingual_import() {
        let store = InMemoryQuestionStore::new();
        let importer = Importer::new(&store);

        let summary = importer
            .import_workbook(&mut bilingual(), "checklist.xlsx")
            .await
            .unwrap();

        assert_eq!(summary.total_inserted, 6);
        assert!(!summary.skipped_existing);
        assert_eq!(summary.sheets.len(), 2);
        assert!(summary
            .sheets
            .iter()
            .all(|s| s.status == SheetStatus::Imported && s.inserted == 3));

        let questions = store.questions();
        for language in [Language::En, Language::Id] {
            let orders: Vec<i64> = questions
                .iter()
                .filter(|q| q.language == language)
                .map(|q| q.sequence_order)
                .collect();
            assert_eq!(orders, vec![1, 2, 3]);
        }
        assert!(questions
            .iter()
            .filter(|q| q.language == Language::Id)
            .all(|q| q.area == "ID Area A"));
        assert_eq!(store.imported_files(), vec!["checklist.xlsx".to_string()]);
    }

    #[actix_rt::test]
    async fn test_second_import_is_a_no_op() {
        let store = InMemoryQuestionStore::new();
        let importer = Importer::new(&store);

        importer
            .import_workbook(&mut bilingual(), "checklist.xlsx")
            .await
            .unwrap();
        let again = importer
            .import_workbook(&mut bilingual(), "checklist.xlsx")
            .await
            .unwrap();

        assert!(again.skipped_existing);
        assert_eq!(again.total_inserted, 0);
        assert_eq!(store.questions().len(), 6);
        assert_eq!(store.imported_files().len(), 1);
    }

    #[actix_rt::test]
    async fn test_force_reimport_replaces_questions() {
        let store = InMemoryQuestionStore::new();
        let importer = Importer::new(&store);
        importer
            .import_workbook(&mut bilingual(), "old.xlsx")
            .await
            .unwrap();

        let mut replacement = MemoryWorkbook::new().with_sheet(
            "English",
            vec![
                text(&["Area", "Activity", "Criteria"]),
                text(&["Drawing", "Dimension", "Associative"]),
            ],
        );
        let summary = importer
            .force_reimport_workbook(&mut replacement, "new.xlsx")
            .await
            .unwrap();

        assert_eq!(summary.total_inserted, 1);
        let questions = store.questions();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].area, "Drawing");
    }

    #[actix_rt::test]
    async fn test_area_resets_between_sheets() {
        let store = InMemoryQuestionStore::new();
        let mut workbook = MemoryWorkbook::new()
            .with_sheet(
                "Eng",
                vec![
                    text(&["Area", "Activity", "Criteria"]),
                    text(&["Carried", "One", "First"]),
                ],
            )
            .with_sheet(
                "Indonesia",
                vec![
                    text(&["Area", "Activity", "Criteria"]),
                    text(&["", "Dua", "Tanpa area"]),
                    text(&["Baru", "Tiga", "Dengan area"]),
                ],
            );

        let summary = Importer::new(&store)
            .import_workbook(&mut workbook, "mixed.xlsx")
            .await
            .unwrap();

        assert_eq!(summary.total_inserted, 2);
        assert_eq!(summary.sheets[1].rows_skipped, 1);
        let id_questions: Vec<_> = store
            .questions()
            .into_iter()
            .filter(|q| q.language == Language::Id)
            .collect();
        assert_eq!(id_questions.len(), 1);
        assert_eq!(id_questions[0].area, "Baru");
        assert_eq!(id_questions[0].sequence_order, 2);
    }

    #[actix_rt::test]
    async fn test_skipped_rows_and_sheets() {
        let store = InMemoryQuestionStore::new();
        let mut workbook = MemoryWorkbook::new()
            .with_sheet("Notes", vec![text(&["Area", "Activity", "Criteria"])])
            .with_sheet(
                "Eng",
                vec![
                    text(&["Area", "Activity", "Criteria"]),
                    text(&["Part", "", "Criteria without activity"]),
                    vec![Data::Empty, Data::Empty],
                    text(&["", "Sketch", "Constrained"]),
                ],
            )
            .with_sheet("Bahasa", vec![text(&["Kategori", "Kriteria"])]);

        let summary = Importer::new(&store)
            .import_workbook(&mut workbook, "partial.xlsx")
            .await
            .unwrap();

        assert_eq!(summary.sheets[0].status, SheetStatus::UnmappedLanguage);
        assert_eq!(summary.sheets[1].inserted, 1);
        assert_eq!(summary.sheets[1].rows_skipped, 2);
        assert_eq!(summary.sheets[2].status, SheetStatus::MissingColumns);
        assert_eq!(summary.sheets[2].columns.area, Some(0));
        assert_eq!(summary.sheets[2].columns.activity, None);

        let questions = store.questions();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].activity, "Sketch");
        assert_eq!(questions[0].area, "Part");
        assert_eq!(questions[0].sequence_order, 3);
    }

    #[actix_rt::test]
    async fn test_failed_insert_does_not_abort() {
        let store = InMemoryQuestionStore::rejecting(&["Pad"]);
        let summary = Importer::new(&store)
            .import_workbook(&mut bilingual(), "checklist.xlsx")
            .await
            .unwrap();

        assert_eq!(summary.total_inserted, 4);
        assert!(summary.sheets.iter().all(|s| s.rows_failed == 1));
        assert!(store.questions().iter().all(|q| q.activity != "Pad"));
    }

    #[actix_rt::test]
    async fn test_missing_document() {
        let store = InMemoryQuestionStore::new();
        let importer = Importer::new(&store);

        let result = importer
            .import(Path::new("/nonexistent/checklist.xlsx"))
            .await;
        assert!(matches!(result, Err(ImportError::DocumentNotFound(_))));

        let result = importer
            .force_reimport(Path::new("/nonexistent/checklist.xlsx"))
            .await;
        assert!(matches!(result, Err(ImportError::DocumentNotFound(_))));
    }

    #[actix_rt::test]
    async fn test_unreadable_document_keeps_questions() {
        let store = InMemoryQuestionStore::new();
        let importer = Importer::new(&store);
        importer
            .import_workbook(&mut bilingual(), "checklist.xlsx")
            .await
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.xlsx");
        std::fs::write(&path, b"not a workbook").unwrap();

        let result = importer.force_reimport(&path).await;
        assert!(matches!(result, Err(ImportError::Unreadable { .. })));
        assert_eq!(store.questions().len(), 6);
    }

    /// Lists a sheet it cannot read, after the ones it holds
    struct MissingSheetWorkbook {
        inner: MemoryWorkbook,
        missing: &'static str,
    }

    impl WorkbookSource for MissingSheetWorkbook {
        fn sheet_names(&self) -> Vec<String> {
            let mut names = self.inner.sheet_names();
            names.push(self.missing.to_string());
            names
        }

        fn sheet_rows(&mut self, sheet_name: &str) -> Result<Vec<Vec<Data>>, ImportError> {
            self.inner.sheet_rows(sheet_name)
        }
    }

    fn english_only_with_broken_bahasa() -> MissingSheetWorkbook {
        MissingSheetWorkbook {
            inner: MemoryWorkbook::new()
                .with_sheet("Eng", grouped_sheet(&["Area", "Activity", "Criteria"], "EN")),
            missing: "Bahasa",
        }
    }

    #[actix_rt::test]
    async fn test_unreadable_sheet_writes_nothing() {
        let store = InMemoryQuestionStore::new();
        let importer = Importer::new(&store);

        let result = importer
            .import_workbook(&mut english_only_with_broken_bahasa(), "broken.xlsx")
            .await;

        assert!(matches!(result, Err(ImportError::Unreadable { .. })));
        assert!(store.questions().is_empty());
        assert!(store.imported_files().is_empty());

        // a later import with a good workbook is not blocked
        let summary = importer
            .import_workbook(&mut bilingual(), "checklist.xlsx")
            .await
            .unwrap();
        assert!(!summary.skipped_existing);
        assert_eq!(
            store
                .questions()
                .iter()
                .filter(|q| q.language == Language::Id)
                .count(),
            3
        );
    }

    #[actix_rt::test]
    async fn test_unreadable_sheet_keeps_questions_on_force_reimport() {
        let store = InMemoryQuestionStore::new();
        let importer = Importer::new(&store);
        importer
            .import_workbook(&mut bilingual(), "checklist.xlsx")
            .await
            .unwrap();

        let result = importer
            .force_reimport_workbook(&mut english_only_with_broken_bahasa(), "broken.xlsx")
            .await;

        assert!(matches!(result, Err(ImportError::Unreadable { .. })));
        assert_eq!(store.questions().len(), 6);
        assert_eq!(store.imported_files().len(), 1);
    }

    #[test]
    fn test_preview_two_sheets() {
        let mut workbook = bilingual().with_sheet("Summary", vec![text(&["Total"])]);

        let preview = preview_workbook(&mut workbook).unwrap();

        assert_eq!(preview.len(), 2);
        let eng = &preview["Eng"];
        assert_eq!(eng.language, Language::En);
        assert_eq!(eng.row_count, 3);
        assert_eq!(eng.headers, vec!["Area", "Activity", "Criteria"]);
        assert_eq!(eng.sample_rows.len(), 3);
        assert_eq!(eng.sample_rows[1], vec!["", "Pad", "Pad extrudes"]);
        assert_eq!(preview["Bahasa"].columns.criteria, Some(2));
        assert_eq!(
            preview_languages(&preview),
            vec![Language::En, Language::Id]
        );
    }

    #[test]
    fn test_preview_caps_samples_and_handles_empty_sheet() {
        let mut rows = vec![text(&["Area", "Activity", "Criteria"])];
        for i in 0..10 {
            rows.push(text(&["Area", &format!("Activity {i}"), "Criteria"]));
        }
        let mut workbook = MemoryWorkbook::new()
            .with_sheet("Eng", rows)
            .with_sheet("ID", vec![]);

        let preview = preview_workbook(&mut workbook).unwrap();

        assert_eq!(preview["Eng"].row_count, 10);
        assert_eq!(preview["Eng"].sample_rows.len(), 3);
        assert_eq!(preview["ID"].row_count, 0);
        assert!(preview["ID"].headers.is_empty());
    }
}
