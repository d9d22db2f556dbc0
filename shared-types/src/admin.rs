use crate::checklist::Language;
use crate::submission::UserResponse;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: i64,
}

/// Zero-based header positions of the fields a sheet must provide
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ColumnIndices {
    pub area: Option<usize>,
    pub activity: Option<usize>,
    pub criteria: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SheetStatus {
    Imported,
    UnmappedLanguage,
    MissingColumns,
}

/// What happened to one sheet during an import
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SheetOutcome {
    pub sheet_name: String,
    pub language: Option<Language>,
    pub status: SheetStatus,
    pub columns: ColumnIndices,
    pub inserted: usize,
    pub rows_skipped: usize,
    pub rows_failed: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ImportSummary {
    pub filename: String,
    pub total_inserted: usize,
    /// Set when questions were already present and nothing was written
    pub skipped_existing: bool,
    pub sheets: Vec<SheetOutcome>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SheetPreview {
    pub language: Language,
    pub row_count: usize,
    pub headers: Vec<String>,
    pub sample_rows: Vec<Vec<String>>,
    pub columns: ColumnIndices,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PreviewResponse {
    pub preview: BTreeMap<String, SheetPreview>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UploadResponse {
    pub filename: String,
    pub questions_imported: usize,
    pub summary: ImportSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LanguageCount {
    pub language: Language,
    pub count: i64,
}

/// Answer tallies for every question of one area in one language
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AreaStat {
    pub area: String,
    pub language: Language,
    pub question_count: i64,
    pub total_answers: i64,
    pub yes_count: i64,
    pub no_count: i64,
    pub na_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DashboardResponse {
    pub total_responses: i64,
    pub total_questions: i64,
    pub responses_by_language: Vec<LanguageCount>,
    pub recent_responses: Vec<UserResponse>,
    pub question_statistics: Vec<AreaStat>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Pagination {
    pub current_page: i64,
    pub total_pages: i64,
    pub total_items: i64,
    pub items_per_page: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AdminResponsesResponse {
    pub responses: Vec<UserResponse>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AnswerSummary {
    pub total: usize,
    pub yes: usize,
    pub no: usize,
    pub na: usize,
    pub with_remarks: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ResponseDetailsResponse {
    pub response: UserResponse,
    pub answer_summary: AnswerSummary,
    pub completion_percentage: u32,
    pub total_expected_questions: i64,
}

/// Audit row written after every import
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ImportedFile {
    pub id: i64,
    pub filename: String,
    pub uploaded_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ImportHistoryResponse {
    pub files: Vec<ImportedFile>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}
