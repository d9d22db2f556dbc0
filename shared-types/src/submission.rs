use crate::checklist::{AnswerValue, Language};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Longest remark a respondent may attach to an answer
pub const MAX_REMARKS_CHARS: usize = 140;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AnswerInput {
    pub question_id: i64,
    pub answer: AnswerValue,
    #[serde(default)]
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SubmitResponseRequest {
    pub email: String,
    pub language: Language,
    pub answers: Vec<AnswerInput>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SubmitResponseResponse {
    pub response_id: i64,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UpdateAnswersRequest {
    pub answers: Vec<AnswerInput>,
}

/// A stored submission header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub language: Language,
    pub timestamp: i64,
}

/// A stored answer joined with the question it answers
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AnswerDetail {
    pub id: i64,
    pub question_id: i64,
    pub answer: AnswerValue,
    pub remarks: String,
    pub area: String,
    pub activity: String,
    pub criteria: String,
    pub sequence_order: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ResponseWithAnswers {
    pub response: UserResponse,
    pub answers: Vec<AnswerDetail>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ResponseListResponse {
    pub count: usize,
    pub responses: Vec<UserResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StatusMessage {
    pub success: bool,
    pub message: String,
}

impl StatusMessage {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}
