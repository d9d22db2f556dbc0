use ts_rs::TS;

pub fn generate_typescript_definitions(
    type_names: &[&str],
) -> Result<String, Box<dyn std::error::Error>> {
    if type_names.is_empty() {
        return Err("No type names provided".into());
    }

    let mut definitions = Vec::new();

    for name in type_names {
        let type_def = export_type(name)?;
        let cleaned = clean_type(type_def);

        if !cleaned.trim().is_empty() {
            definitions.push(cleaned);
        }
    }

    Ok(definitions.join("\n\n"))
}

/// Every type the frontend consumes, in the order they are emitted
pub const API_TYPE_NAMES: &[&str] = &[
    "Language",
    "AnswerValue",
    "Question",
    "AreaGroup",
    "QuestionsResponse",
    "QuestionResponse",
    "QuestionStat",
    "QuestionStatsResponse",
    "QuestionAnswer",
    "QuestionAnswersResponse",
    "AnswerInput",
    "SubmitResponseRequest",
    "SubmitResponseResponse",
    "UpdateAnswersRequest",
    "UserResponse",
    "AnswerDetail",
    "ResponseWithAnswers",
    "ResponseListResponse",
    "StatusMessage",
    "LoginRequest",
    "LoginResponse",
    "ColumnIndices",
    "SheetStatus",
    "SheetOutcome",
    "ImportSummary",
    "SheetPreview",
    "PreviewResponse",
    "UploadResponse",
    "LanguageCount",
    "AreaStat",
    "DashboardResponse",
    "Pagination",
    "AdminResponsesResponse",
    "AnswerSummary",
    "ResponseDetailsResponse",
    "ImportedFile",
    "ImportHistoryResponse",
    "ErrorResponse",
    "PerformanceBand",
    "UserReport",
    "UserSummaryRow",
    "ConsolidatedReport",
];

fn export_type(name: &str) -> Result<String, Box<dyn std::error::Error>> {
    use crate::*;

    let result = match name {
        "Language" => Language::export_to_string()?,
        "AnswerValue" => AnswerValue::export_to_string()?,
        "Question" => Question::export_to_string()?,
        "AreaGroup" => AreaGroup::export_to_string()?,
        "QuestionsResponse" => QuestionsResponse::export_to_string()?,
        "QuestionResponse" => QuestionResponse::export_to_string()?,
        "QuestionStat" => QuestionStat::export_to_string()?,
        "QuestionStatsResponse" => QuestionStatsResponse::export_to_string()?,
        "QuestionAnswer" => QuestionAnswer::export_to_string()?,
        "QuestionAnswersResponse" => QuestionAnswersResponse::export_to_string()?,

        "AnswerInput" => AnswerInput::export_to_string()?,
        "SubmitResponseRequest" => SubmitResponseRequest::export_to_string()?,
        "SubmitResponseResponse" => SubmitResponseResponse::export_to_string()?,
        "UpdateAnswersRequest" => UpdateAnswersRequest::export_to_string()?,
        "UserResponse" => UserResponse::export_to_string()?,
        "AnswerDetail" => AnswerDetail::export_to_string()?,
        "ResponseWithAnswers" => ResponseWithAnswers::export_to_string()?,
        "ResponseListResponse" => ResponseListResponse::export_to_string()?,
        "StatusMessage" => StatusMessage::export_to_string()?,

        "LoginRequest" => LoginRequest::export_to_string()?,
        "LoginResponse" => LoginResponse::export_to_string()?,
        "ColumnIndices" => ColumnIndices::export_to_string()?,
        "SheetStatus" => SheetStatus::export_to_string()?,
        "SheetOutcome" => SheetOutcome::export_to_string()?,
        "ImportSummary" => ImportSummary::export_to_string()?,
        "SheetPreview" => SheetPreview::export_to_string()?,
        "PreviewResponse" => PreviewResponse::export_to_string()?,
        "UploadResponse" => UploadResponse::export_to_string()?,
        "LanguageCount" => LanguageCount::export_to_string()?,
        "AreaStat" => AreaStat::export_to_string()?,
        "DashboardResponse" => DashboardResponse::export_to_string()?,
        "Pagination" => Pagination::export_to_string()?,
        "AdminResponsesResponse" => AdminResponsesResponse::export_to_string()?,
        "AnswerSummary" => AnswerSummary::export_to_string()?,
        "ResponseDetailsResponse" => ResponseDetailsResponse::export_to_string()?,
        "ImportedFile" => ImportedFile::export_to_string()?,
        "ImportHistoryResponse" => ImportHistoryResponse::export_to_string()?,
        "ErrorResponse" => ErrorResponse::export_to_string()?,

        "PerformanceBand" => PerformanceBand::export_to_string()?,
        "UserReport" => UserReport::export_to_string()?,
        "UserSummaryRow" => UserSummaryRow::export_to_string()?,
        "ConsolidatedReport" => ConsolidatedReport::export_to_string()?,

        _ => {
            return Err(format!(
                "Unknown type: '{}'. Available types can be found in shared-types/src/",
                name
            )
            .into());
        }
    };

    Ok(result)
}

fn clean_type(mut type_def: String) -> String {
    type_def.retain(|c| c != '\r');

    let lines: Vec<&str> = type_def.lines().collect();

    let filtered: Vec<&str> = lines
        .iter()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.starts_with("import type")
                && !trimmed.starts_with("// This file was generated")
        })
        .cloned()
        .collect();

    filtered.join("\n").trim().to_string()
}
