use async_trait::async_trait;
use shared_types::Language;

mod memory;
pub mod migrations;
mod sqlite;

pub use memory::InMemoryQuestionStore;
pub use sqlite::{Database, ResponseFilter};

/// A normalized question ready to be written by an import
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuestion {
    pub area: String,
    pub activity: String,
    pub criteria: String,
    pub language: Language,
    pub sequence_order: i64,
}

/// The storage operations an import needs. Each call is independently failable.
#[async_trait]
pub trait QuestionStore: Send + Sync {
    async fn count_questions(&self) -> Result<i64, StorageError>;
    async fn clear_questions(&self) -> Result<(), StorageError>;
    async fn insert_question(&self, question: &NewQuestion) -> Result<i64, StorageError>;
    async fn record_imported_file(&self, filename: &str) -> Result<i64, StorageError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage operation failed: {0}")]
    OperationFailed(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Migration failed: {0}")]
    Migration(#[from] refinery::Error),

    #[error("Answer batch inconsistent: {inserted} of {expected} answers stored ({reason})")]
    AnswerBatchInconsistent {
        expected: usize,
        inserted: usize,
        reason: String,
    },
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        StorageError::OperationFailed(err.to_string())
    }
}
