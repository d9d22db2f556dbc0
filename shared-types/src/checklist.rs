use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

/// Language a question set or a submission is written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Language {
    #[serde(rename = "EN")]
    En,
    #[serde(rename = "ID")]
    Id,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "EN",
            Language::Id => "ID",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Id => "Bahasa Indonesia",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "EN" => Ok(Language::En),
            "ID" => Ok(Language::Id),
            other => Err(UnknownVariant {
                kind: "language",
                value: other.to_string(),
            }),
        }
    }
}

/// A respondent's verdict on one criterion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum AnswerValue {
    Yes,
    No,
    #[serde(rename = "N/A")]
    NotApplicable,
}

impl AnswerValue {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnswerValue::Yes => "Yes",
            AnswerValue::No => "No",
            AnswerValue::NotApplicable => "N/A",
        }
    }
}

impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnswerValue {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Yes" => Ok(AnswerValue::Yes),
            "No" => Ok(AnswerValue::No),
            "N/A" => Ok(AnswerValue::NotApplicable),
            other => Err(UnknownVariant {
                kind: "answer",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} '{}'", self.kind, self.value)
    }
}

impl std::error::Error for UnknownVariant {}

/// One checklist item imported from the source spreadsheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Question {
    pub id: i64,
    pub area: String,
    pub activity: String,
    pub criteria: String,
    pub language: Language,
    /// 1-based position within the sheet the question was imported from
    pub sequence_order: i64,
}

/// Questions sharing one area label, in first-appearance order
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AreaGroup {
    pub area: String,
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QuestionsResponse {
    pub language: Language,
    pub total_questions: usize,
    pub questions: Vec<Question>,
    pub grouped_questions: Vec<AreaGroup>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QuestionResponse {
    pub question: Question,
}

/// Answer tallies for a single question
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QuestionStat {
    pub question_id: i64,
    pub area: String,
    pub activity: String,
    pub criteria: String,
    pub language: Language,
    pub total_responses: i64,
    pub yes_count: i64,
    pub no_count: i64,
    pub na_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QuestionStatsResponse {
    pub stats: Vec<QuestionStat>,
}

/// An answer to one question together with who gave it
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QuestionAnswer {
    pub id: i64,
    pub response_id: i64,
    pub answer: AnswerValue,
    pub remarks: String,
    pub email: String,
    pub timestamp: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QuestionAnswersResponse {
    pub question_id: i64,
    pub answers: Vec<QuestionAnswer>,
}
