use super::{NewQuestion, QuestionStore, StorageError};
use async_trait::async_trait;
use shared_types::Question;
use std::sync::{Mutex, MutexGuard};

#[derive(Default)]
struct MemoryState {
    questions: Vec<Question>,
    imported_files: Vec<String>,
    next_id: i64,
}

/// Question store kept entirely in memory.
///
/// Inserts whose activity is listed in `reject_activities` fail with a storage
/// error, which lets callers exercise per-row failure handling.
#[derive(Default)]
pub struct InMemoryQuestionStore {
    state: Mutex<MemoryState>,
    reject_activities: Vec<String>,
}

impl InMemoryQuestionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rejecting(activities: &[&str]) -> Self {
        Self {
            state: Mutex::default(),
            reject_activities: activities.iter().map(|a| a.to_string()).collect(),
        }
    }

    pub fn questions(&self) -> Vec<Question> {
        self.state
            .lock()
            .map(|state| state.questions.clone())
            .unwrap_or_default()
    }

    pub fn imported_files(&self) -> Vec<String> {
        self.state
            .lock()
            .map(|state| state.imported_files.clone())
            .unwrap_or_default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, StorageError> {
        self.state
            .lock()
            .map_err(|e| StorageError::OperationFailed(format!("Lock error: {}", e)))
    }
}

#[async_trait]
impl QuestionStore for InMemoryQuestionStore {
    async fn count_questions(&self) -> Result<i64, StorageError> {
        Ok(self.lock()?.questions.len() as i64)
    }

    async fn clear_questions(&self) -> Result<(), StorageError> {
        self.lock()?.questions.clear();
        Ok(())
    }

    async fn insert_question(&self, question: &NewQuestion) -> Result<i64, StorageError> {
        if self.reject_activities.contains(&question.activity) {
            return Err(StorageError::OperationFailed(format!(
                "insert rejected for activity '{}'",
                question.activity
            )));
        }

        let mut state = self.lock()?;
        state.next_id += 1;
        let id = state.next_id;
        state.questions.push(Question {
            id,
            area: question.area.clone(),
            activity: question.activity.clone(),
            criteria: question.criteria.clone(),
            language: question.language,
            sequence_order: question.sequence_order,
        });
        Ok(id)
    }

    async fn record_imported_file(&self, filename: &str) -> Result<i64, StorageError> {
        let mut state = self.lock()?;
        state.imported_files.push(filename.to_string());
        Ok(state.imported_files.len() as i64)
    }
}
