mod common;

use checklist_api::import::{preview_document, ImportError, Importer};
use checklist_api::storage::{Database, QuestionStore};
use common::{bilingual_sheets, write_bilingual_workbook, write_workbook};
use shared_types::{Language, SheetStatus};

#[actix_rt::test]
async fn test_bilingual_workbook_seeds_both_languages() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = write_bilingual_workbook(dir.path())?;
    let db = Database::new(&dir.path().join("checklist.db"))?;

    let summary = Importer::new(&db).import(&path).await?;

    assert_eq!(summary.total_inserted, 6);
    assert_eq!(summary.filename, "SE_Success_Criteria_Checklist.xlsx");

    for language in [Language::En, Language::Id] {
        let questions = db.questions_by_language(language)?;
        let orders: Vec<i64> = questions.iter().map(|q| q.sequence_order).collect();
        assert_eq!(orders, vec![1, 2, 3]);

        let mut areas: Vec<&str> = questions.iter().map(|q| q.area.as_str()).collect();
        areas.dedup();
        assert_eq!(areas.len(), 1);
    }

    let en = db.questions_by_language(Language::En)?;
    assert_eq!(en[2].area, "Part Design");
    assert_eq!(en[2].activity, "Pocket");

    let files = db.imported_files()?;
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].filename, "SE_Success_Criteria_Checklist.xlsx");
    Ok(())
}

#[actix_rt::test]
async fn test_reimport_on_restart_is_idempotent() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = write_bilingual_workbook(dir.path())?;
    let db_path = dir.path().join("checklist.db");

    {
        let db = Database::new(&db_path)?;
        Importer::new(&db).import(&path).await?;
    }

    let db = Database::new(&db_path)?;
    let summary = Importer::new(&db).import(&path).await?;

    assert!(summary.skipped_existing);
    assert_eq!(summary.total_inserted, 0);
    assert_eq!(db.count_questions().await?, 6);
    assert_eq!(db.imported_files()?.len(), 1);
    Ok(())
}

#[actix_rt::test]
async fn test_force_reimport_picks_up_changes() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = write_bilingual_workbook(dir.path())?;
    let db = Database::open_in_memory()?;
    Importer::new(&db).import(&path).await?;

    let updated = dir.path().join("updated.xlsx");
    write_workbook(
        &updated,
        &[(
            "English",
            vec![
                vec!["Area of Evaluation", "Feature Evaluated", "Success Criteria"],
                vec!["Drawing", "Dimension", "Dimensions are associative"],
                vec!["", "", "Orphan criteria"],
                vec!["", "Section", "Section view renders"],
            ],
        )],
    )?;

    let summary = Importer::new(&db).force_reimport(&updated).await?;

    assert_eq!(summary.total_inserted, 2);
    assert!(db.questions_by_language(Language::Id)?.is_empty());
    let en = db.questions_by_language(Language::En)?;
    assert_eq!(en.len(), 2);
    assert_eq!(en[1].sequence_order, 3);
    assert_eq!(en[1].area, "Drawing");
    Ok(())
}

#[actix_rt::test]
async fn test_missing_columns_skip_only_that_sheet() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("partial.xlsx");
    let mut sheets = bilingual_sheets();
    sheets[1].1[0] = vec!["Kategori", "Catatan", "Kriteria"];
    sheets.push(("Notes", vec![vec!["Anything"]]));
    write_workbook(&path, &sheets)?;

    let db = Database::open_in_memory()?;
    let summary = Importer::new(&db).import(&path).await?;

    assert_eq!(summary.total_inserted, 3);
    assert_eq!(summary.sheets[0].status, SheetStatus::Imported);
    assert_eq!(summary.sheets[1].status, SheetStatus::MissingColumns);
    assert_eq!(summary.sheets[1].columns.activity, None);
    assert_eq!(summary.sheets[2].status, SheetStatus::UnmappedLanguage);
    Ok(())
}

#[actix_rt::test]
async fn test_missing_document_is_fatal() -> anyhow::Result<()> {
    let db = Database::open_in_memory()?;
    let result = Importer::new(&db)
        .import(std::path::Path::new("/nonexistent/seed.xlsx"))
        .await;

    assert!(matches!(result, Err(ImportError::DocumentNotFound(_))));
    assert_eq!(db.count_questions().await?, 0);
    assert!(db.imported_files()?.is_empty());
    Ok(())
}

#[test]
fn test_preview_two_sheet_document() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = write_bilingual_workbook(dir.path())?;

    let preview = preview_document(&path)?;

    assert_eq!(preview.len(), 2);
    for sheet in preview.values() {
        assert_eq!(sheet.row_count, 3);
        assert!(sheet.sample_rows.len() <= 3);
    }
    assert_eq!(preview["Eng"].headers, vec!["Area", "Activity", "Criteria"]);
    assert_eq!(preview["Bahasa"].language, Language::Id);
    Ok(())
}
