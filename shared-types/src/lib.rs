pub mod admin;
pub mod checklist;
pub mod report;
pub mod submission;
pub mod typescript_gen;

pub use typescript_gen::generate_typescript_definitions;

pub use admin::{
    AdminResponsesResponse, AnswerSummary, AreaStat, ColumnIndices, DashboardResponse,
    ErrorResponse, ImportHistoryResponse, ImportSummary, ImportedFile, LanguageCount,
    LoginRequest, LoginResponse, Pagination, PreviewResponse, ResponseDetailsResponse,
    SheetOutcome, SheetPreview, SheetStatus, UploadResponse,
};
pub use checklist::{
    AnswerValue, AreaGroup, Language, Question, QuestionAnswer, QuestionAnswersResponse,
    QuestionResponse, QuestionStat, QuestionStatsResponse, QuestionsResponse, UnknownVariant,
};
pub use report::{ConsolidatedReport, PerformanceBand, UserReport, UserSummaryRow};
pub use submission::{
    AnswerDetail, AnswerInput, ResponseListResponse, ResponseWithAnswers, StatusMessage,
    SubmitResponseRequest, SubmitResponseResponse, UpdateAnswersRequest, UserResponse,
    MAX_REMARKS_CHARS,
};
