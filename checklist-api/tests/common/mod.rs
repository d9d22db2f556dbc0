#![allow(dead_code)]

use actix_web::{middleware::NormalizePath, test, web, App};
use checklist_api::auth::{generate_token, hash_password, Claims};
use checklist_api::config::{AdminConfig, ApiConfig, ImportConfig};
use checklist_api::handlers::{configure, AppState};
use checklist_api::import::Importer;
use checklist_api::storage::Database;
use rust_xlsxwriter::Workbook;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "correct-horse-battery";
pub const JWT_SECRET: &str = "integration-test-secret";

pub struct TestApp<S> {
    pub database: Arc<Database>,
    pub config: Arc<ApiConfig>,
    pub dir: TempDir,
    pub app: S,
}

impl<S> TestApp<S> {
    pub fn upload_dir(&self) -> PathBuf {
        self.config.import.upload_dir.clone()
    }
}

pub fn test_config(dir: &Path, seed_file: Option<PathBuf>) -> anyhow::Result<ApiConfig> {
    let mut config = ApiConfig::default();
    config.database.path = dir.join("checklist.db");
    config.import = ImportConfig {
        seed_file,
        upload_dir: dir.join("uploads"),
        ..ImportConfig::default()
    };
    config.admin = Some(AdminConfig {
        username: ADMIN_USERNAME.to_string(),
        password_hash: hash_password(ADMIN_PASSWORD)?,
        jwt_secret: JWT_SECRET.to_string(),
        token_ttl_hours: 1,
    });
    Ok(config)
}

pub fn admin_token() -> anyhow::Result<String> {
    Ok(generate_token(&Claims::new(ADMIN_USERNAME, 1), JWT_SECRET)?)
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}

/// Write an `.xlsx` workbook with one worksheet per `(name, rows)` pair.
/// Empty strings leave the cell blank.
pub fn write_workbook(path: &Path, sheets: &[(&str, Vec<Vec<&str>>)]) -> anyhow::Result<()> {
    let mut workbook = Workbook::new();
    for (name, rows) in sheets {
        let sheet = workbook.add_worksheet();
        sheet.set_name(*name)?;
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                if !value.is_empty() {
                    sheet.write_string(r as u32, c as u16, *value)?;
                }
            }
        }
    }
    workbook.save(path)?;
    Ok(())
}

/// Two sheets of three questions each, area printed once per group
pub fn bilingual_sheets() -> Vec<(&'static str, Vec<Vec<&'static str>>)> {
    vec![
        (
            "Eng",
            vec![
                vec!["Area", "Activity", "Criteria"],
                vec!["Part Design", "Sketch", "Sketch is fully constrained"],
                vec!["", "Pad", "Pad extrudes the profile"],
                vec!["", "Pocket", "Pocket removes material"],
            ],
        ),
        (
            "Bahasa",
            vec![
                vec!["Kategori", "Aktivitas", "Kriteria Sukses"],
                vec!["Desain Part", "Sketsa", "Sketsa terdefinisi penuh"],
                vec!["", "Pad", "Pad mengekstrusi profil"],
                vec!["", "Pocket", "Pocket memotong material"],
            ],
        ),
    ]
}

pub fn write_bilingual_workbook(dir: &Path) -> anyhow::Result<PathBuf> {
    let path = dir.join("SE_Success_Criteria_Checklist.xlsx");
    write_workbook(&path, &bilingual_sheets())?;
    Ok(path)
}

pub async fn setup_test_app() -> anyhow::Result<
    TestApp<
        impl actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
    >,
> {
    let dir = tempfile::tempdir()?;
    let seed_file = write_bilingual_workbook(dir.path())?;
    let config = Arc::new(test_config(dir.path(), Some(seed_file.clone()))?);

    let database = Arc::new(Database::open_in_memory()?);
    Importer::new(database.as_ref()).import(&seed_file).await?;

    let state = web::Data::new(AppState::new(Arc::clone(&database), Arc::clone(&config)));
    let max_upload_bytes = config.import.max_upload_bytes;
    let app = test::init_service(
        App::new()
            .app_data(state)
            .wrap(NormalizePath::trim())
            .configure(|cfg| configure(cfg, max_upload_bytes)),
    )
    .await;

    Ok(TestApp {
        database,
        config,
        dir,
        app,
    })
}
