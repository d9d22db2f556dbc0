use crate::admin::{AnswerSummary, LanguageCount};
use crate::checklist::{Language, QuestionStat};
use crate::submission::{AnswerDetail, UserResponse};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Qualitative grade derived from the share of "Yes" answers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceBand {
    Excellent,
    Good,
    Average,
    NeedsImprovement,
}

impl PerformanceBand {
    pub fn from_score(score: u32) -> Self {
        if score >= 90 {
            PerformanceBand::Excellent
        } else if score >= 75 {
            PerformanceBand::Good
        } else if score >= 60 {
            PerformanceBand::Average
        } else {
            PerformanceBand::NeedsImprovement
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PerformanceBand::Excellent => "Excellent",
            PerformanceBand::Good => "Good",
            PerformanceBand::Average => "Average",
            PerformanceBand::NeedsImprovement => "Needs Improvement",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UserReport {
    pub response: UserResponse,
    pub summary: AnswerSummary,
    pub performance_score: u32,
    pub completion_rate: u32,
    pub expected_questions: i64,
    pub band: PerformanceBand,
    pub answers: Vec<AnswerDetail>,
}

/// One line of the per-respondent table in the consolidated report
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UserSummaryRow {
    pub response_id: i64,
    pub email: String,
    pub language: Language,
    pub timestamp: i64,
    pub summary: AnswerSummary,
    pub performance_score: u32,
    pub completion_rate: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ConsolidatedReport {
    pub generated_at: i64,
    pub total_responses: usize,
    pub responses_by_language: Vec<LanguageCount>,
    pub total_yes: i64,
    pub total_no: i64,
    pub total_na: i64,
    pub total_answers: i64,
    pub yes_percentage: u32,
    pub no_percentage: u32,
    pub na_percentage: u32,
    /// Absent when no answers were collected in the selected window
    pub band: Option<PerformanceBand>,
    pub question_stats: Vec<QuestionStat>,
    pub users: Vec<UserSummaryRow>,
}
