use super::migrations::run_migrations;
use super::{NewQuestion, QuestionStore, StorageError};
use crate::DbConnection;
use async_trait::async_trait;
use rusqlite::types::{Type, Value};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use shared_types::{
    AnswerDetail, AnswerInput, AnswerSummary, AreaStat, ImportedFile, Language, LanguageCount,
    Question, QuestionAnswer, QuestionStat, UserResponse,
};
use std::path::Path;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, warn};

/// Optional constraints shared by every response listing
#[derive(Debug, Clone, Default)]
pub struct ResponseFilter {
    /// Substring match on the respondent's email
    pub email: Option<String>,
    pub language: Option<Language>,
    /// Inclusive unix-second bounds on the submission time
    pub start: Option<i64>,
    pub end: Option<i64>,
}

impl ResponseFilter {
    fn where_clause(&self) -> (String, Vec<Value>) {
        let mut clause = String::from("WHERE 1=1");
        let mut values = Vec::new();

        if let Some(email) = &self.email {
            clause.push_str(" AND email LIKE ? ESCAPE '\\'");
            values.push(Value::Text(format!("%{}%", escape_like(email))));
        }
        if let Some(language) = self.language {
            clause.push_str(" AND language = ?");
            values.push(Value::Text(language.as_str().to_string()));
        }
        if let Some(start) = self.start {
            clause.push_str(" AND timestamp >= ?");
            values.push(Value::Integer(start));
        }
        if let Some(end) = self.end {
            clause.push_str(" AND timestamp <= ?");
            values.push(Value::Integer(end));
        }

        (clause, values)
    }
}

/// Make `%`, `_` and `\` match literally inside a `LIKE ... ESCAPE '\'` pattern
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

pub struct Database {
    connection: DbConnection,
}

impl Database {
    pub fn new(db_path: &Path) -> Result<Self, StorageError> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| StorageError::OperationFailed(e.to_string()))?;
            }
        }

        Self::from_connection(Connection::open(db_path)?)
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(mut conn: Connection) -> Result<Self, StorageError> {
        conn.execute("PRAGMA foreign_keys = ON", [])?;
        run_migrations(&mut conn)?;

        Ok(Database {
            connection: Arc::new(Mutex::new(conn)),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StorageError> {
        self.connection
            .lock()
            .map_err(|e| StorageError::OperationFailed(format!("Lock error: {}", e)))
    }

    // Questions

    pub fn questions_by_language(&self, language: Language) -> Result<Vec<Question>, StorageError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, area, activity, criteria, language, sequence_order
             FROM questions
             WHERE language = ?1
             ORDER BY sequence_order ASC, id ASC",
        )?;

        let questions = stmt
            .query_map(params![language.as_str()], question_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(questions)
    }

    pub fn all_questions(&self) -> Result<Vec<Question>, StorageError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, area, activity, criteria, language, sequence_order
             FROM questions
             ORDER BY language ASC, sequence_order ASC, id ASC",
        )?;

        let questions = stmt
            .query_map([], question_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(questions)
    }

    pub fn get_question(&self, question_id: i64) -> Result<Option<Question>, StorageError> {
        let conn = self.conn()?;
        let question = conn
            .query_row(
                "SELECT id, area, activity, criteria, language, sequence_order
                 FROM questions WHERE id = ?1",
                params![question_id],
                question_from_row,
            )
            .optional()?;

        Ok(question)
    }

    pub fn count_questions_for_language(&self, language: Language) -> Result<i64, StorageError> {
        let conn = self.conn()?;
        let count = conn.query_row(
            "SELECT COUNT(*) FROM questions WHERE language = ?1",
            params![language.as_str()],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    pub fn question_answers(&self, question_id: i64) -> Result<Vec<QuestionAnswer>, StorageError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT a.id, a.response_id, a.answer, a.remarks, ur.email, ur.timestamp
             FROM answers a
             JOIN user_responses ur ON a.response_id = ur.id
             WHERE a.question_id = ?1
             ORDER BY ur.timestamp DESC, ur.id DESC",
        )?;

        let answers = stmt
            .query_map(params![question_id], |row| {
                Ok(QuestionAnswer {
                    id: row.get(0)?,
                    response_id: row.get(1)?,
                    answer: enum_column(row, 2)?,
                    remarks: row.get(3)?,
                    email: row.get(4)?,
                    timestamp: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(answers)
    }

    pub fn question_stats(
        &self,
        language: Option<Language>,
    ) -> Result<Vec<QuestionStat>, StorageError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT q.id, q.area, q.activity, q.criteria, q.language,
                    COUNT(a.id),
                    COALESCE(SUM(CASE WHEN a.answer = 'Yes' THEN 1 ELSE 0 END), 0),
                    COALESCE(SUM(CASE WHEN a.answer = 'No' THEN 1 ELSE 0 END), 0),
                    COALESCE(SUM(CASE WHEN a.answer = 'N/A' THEN 1 ELSE 0 END), 0)
             FROM questions q
             LEFT JOIN answers a ON q.id = a.question_id
             WHERE ?1 IS NULL OR q.language = ?1
             GROUP BY q.id, q.area, q.activity, q.criteria, q.language
             ORDER BY q.language ASC, q.sequence_order ASC, q.id ASC",
        )?;

        let stats = stmt
            .query_map(params![language.map(|l| l.as_str())], |row| {
                Ok(QuestionStat {
                    question_id: row.get(0)?,
                    area: row.get(1)?,
                    activity: row.get(2)?,
                    criteria: row.get(3)?,
                    language: enum_column(row, 4)?,
                    total_responses: row.get(5)?,
                    yes_count: row.get(6)?,
                    no_count: row.get(7)?,
                    na_count: row.get(8)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(stats)
    }

    /// Answer tallies per (area, language), areas alphabetically
    pub fn area_stats(&self) -> Result<Vec<AreaStat>, StorageError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT q.area, q.language,
                    COUNT(DISTINCT q.id),
                    COUNT(a.id),
                    COALESCE(SUM(CASE WHEN a.answer = 'Yes' THEN 1 ELSE 0 END), 0),
                    COALESCE(SUM(CASE WHEN a.answer = 'No' THEN 1 ELSE 0 END), 0),
                    COALESCE(SUM(CASE WHEN a.answer = 'N/A' THEN 1 ELSE 0 END), 0)
             FROM questions q
             LEFT JOIN answers a ON q.id = a.question_id
             GROUP BY q.area, q.language
             ORDER BY q.area ASC, q.language ASC",
        )?;

        let stats = stmt
            .query_map([], |row| {
                Ok(AreaStat {
                    area: row.get(0)?,
                    language: enum_column(row, 1)?,
                    question_count: row.get(2)?,
                    total_answers: row.get(3)?,
                    yes_count: row.get(4)?,
                    no_count: row.get(5)?,
                    na_count: row.get(6)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(stats)
    }

    // Responses

    /// Store a response and all of its answers in one transaction.
    ///
    /// Nothing is kept when any answer fails to insert or when the stored
    /// answer count does not match the batch.
    pub fn create_response_with_answers(
        &self,
        email: &str,
        language: Language,
        answers: &[AnswerInput],
    ) -> Result<i64, StorageError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let now = chrono::Utc::now().timestamp();

        tx.execute(
            "INSERT INTO user_responses (email, language, timestamp) VALUES (?1, ?2, ?3)",
            params![email, language.as_str(), now],
        )?;
        let response_id = tx.last_insert_rowid();

        insert_answers(&tx, response_id, answers)?;

        tx.commit()?;
        debug!(response_id, answers = answers.len(), "Stored response");
        Ok(response_id)
    }

    /// Atomically swap every answer of a response for `answers`
    pub fn replace_answers(
        &self,
        response_id: i64,
        answers: &[AnswerInput],
    ) -> Result<(), StorageError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let exists = tx
            .query_row(
                "SELECT 1 FROM user_responses WHERE id = ?1",
                params![response_id],
                |_| Ok(()),
            )
            .optional()?
            .is_some();
        if !exists {
            return Err(StorageError::NotFound(format!("Response {}", response_id)));
        }

        tx.execute(
            "DELETE FROM answers WHERE response_id = ?1",
            params![response_id],
        )?;
        insert_answers(&tx, response_id, answers)?;

        tx.commit()?;
        Ok(())
    }

    /// Delete a response and its answers. Returns false when it did not exist.
    pub fn delete_response(&self, response_id: i64) -> Result<bool, StorageError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        tx.execute(
            "DELETE FROM answers WHERE response_id = ?1",
            params![response_id],
        )?;
        let changes = tx.execute(
            "DELETE FROM user_responses WHERE id = ?1",
            params![response_id],
        )?;

        tx.commit()?;
        Ok(changes > 0)
    }

    pub fn get_response(&self, response_id: i64) -> Result<Option<UserResponse>, StorageError> {
        let conn = self.conn()?;
        let response = conn
            .query_row(
                "SELECT id, email, language, timestamp FROM user_responses WHERE id = ?1",
                params![response_id],
                response_from_row,
            )
            .optional()?;

        Ok(response)
    }

    /// Answers of one response joined with their questions, in checklist order
    pub fn response_answers(&self, response_id: i64) -> Result<Vec<AnswerDetail>, StorageError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT a.id, a.question_id, a.answer, a.remarks,
                    q.area, q.activity, q.criteria, q.sequence_order
             FROM answers a
             JOIN questions q ON a.question_id = q.id
             WHERE a.response_id = ?1
             ORDER BY q.sequence_order ASC, q.id ASC",
        )?;

        let answers = stmt
            .query_map(params![response_id], |row| {
                Ok(AnswerDetail {
                    id: row.get(0)?,
                    question_id: row.get(1)?,
                    answer: enum_column(row, 2)?,
                    remarks: row.get(3)?,
                    area: row.get(4)?,
                    activity: row.get(5)?,
                    criteria: row.get(6)?,
                    sequence_order: row.get(7)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(answers)
    }

    /// Responses matching `filter`, newest first
    pub fn list_responses(
        &self,
        filter: &ResponseFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<UserResponse>, StorageError> {
        let conn = self.conn()?;
        let (clause, mut values) = filter.where_clause();
        values.push(Value::Integer(limit));
        values.push(Value::Integer(offset));

        let sql = format!(
            "SELECT id, email, language, timestamp FROM user_responses {}
             ORDER BY timestamp DESC, id DESC LIMIT ? OFFSET ?",
            clause
        );
        let mut stmt = conn.prepare(&sql)?;
        let responses = stmt
            .query_map(params_from_iter(values), response_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(responses)
    }

    pub fn count_responses(&self, filter: &ResponseFilter) -> Result<i64, StorageError> {
        let conn = self.conn()?;
        let (clause, values) = filter.where_clause();
        let sql = format!("SELECT COUNT(*) FROM user_responses {}", clause);

        let count = conn.query_row(&sql, params_from_iter(values), |row| row.get(0))?;
        Ok(count)
    }

    /// Every matching response with its answer tallies, newest first
    pub fn response_summaries(
        &self,
        filter: &ResponseFilter,
    ) -> Result<Vec<(UserResponse, AnswerSummary)>, StorageError> {
        let conn = self.conn()?;
        let (clause, values) = filter.where_clause();
        let sql = format!(
            "SELECT r.id, r.email, r.language, r.timestamp,
                    COUNT(a.id),
                    COALESCE(SUM(CASE WHEN a.answer = 'Yes' THEN 1 ELSE 0 END), 0),
                    COALESCE(SUM(CASE WHEN a.answer = 'No' THEN 1 ELSE 0 END), 0),
                    COALESCE(SUM(CASE WHEN a.answer = 'N/A' THEN 1 ELSE 0 END), 0),
                    COALESCE(SUM(CASE WHEN TRIM(a.remarks) <> '' THEN 1 ELSE 0 END), 0)
             FROM (SELECT id, email, language, timestamp FROM user_responses {}) r
             LEFT JOIN answers a ON a.response_id = r.id
             GROUP BY r.id, r.email, r.language, r.timestamp
             ORDER BY r.timestamp DESC, r.id DESC",
            clause
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(values), |row| {
                let response = response_from_row(row)?;
                let summary = AnswerSummary {
                    total: count_column(row, 4)?,
                    yes: count_column(row, 5)?,
                    no: count_column(row, 6)?,
                    na: count_column(row, 7)?,
                    with_remarks: count_column(row, 8)?,
                };
                Ok((response, summary))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    pub fn total_responses(&self) -> Result<i64, StorageError> {
        self.count_responses(&ResponseFilter::default())
    }

    pub fn responses_by_language(&self) -> Result<Vec<LanguageCount>, StorageError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT language, COUNT(*) FROM user_responses
             GROUP BY language ORDER BY language ASC",
        )?;

        let counts = stmt
            .query_map([], |row| {
                Ok(LanguageCount {
                    language: enum_column(row, 0)?,
                    count: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(counts)
    }

    // Imports

    pub fn imported_files(&self) -> Result<Vec<ImportedFile>, StorageError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, filename, uploaded_at FROM excel_files
             ORDER BY uploaded_at DESC, id DESC",
        )?;

        let files = stmt
            .query_map([], |row| {
                Ok(ImportedFile {
                    id: row.get(0)?,
                    filename: row.get(1)?,
                    uploaded_at: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(files)
    }
}

#[async_trait]
impl QuestionStore for Database {
    async fn count_questions(&self) -> Result<i64, StorageError> {
        let conn = self.conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM questions", [], |row| row.get(0))?;
        Ok(count)
    }

    async fn clear_questions(&self) -> Result<(), StorageError> {
        let conn = self.conn()?;
        let orphaned: i64 = conn.query_row("SELECT COUNT(*) FROM answers", [], |row| row.get(0))?;
        if orphaned > 0 {
            warn!(answers = orphaned, "Clearing questions also removes their answers");
        }
        conn.execute("DELETE FROM questions", [])?;
        Ok(())
    }

    async fn insert_question(&self, question: &NewQuestion) -> Result<i64, StorageError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO questions (area, activity, criteria, language, sequence_order)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                question.area,
                question.activity,
                question.criteria,
                question.language.as_str(),
                question.sequence_order,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    async fn record_imported_file(&self, filename: &str) -> Result<i64, StorageError> {
        let conn = self.conn()?;
        let now = chrono::Utc::now().timestamp();
        conn.execute(
            "INSERT INTO excel_files (filename, uploaded_at) VALUES (?1, ?2)",
            params![filename, now],
        )?;
        Ok(conn.last_insert_rowid())
    }
}

fn insert_answers(
    tx: &rusqlite::Transaction<'_>,
    response_id: i64,
    answers: &[AnswerInput],
) -> Result<(), StorageError> {
    for (inserted, answer) in answers.iter().enumerate() {
        tx.execute(
            "INSERT INTO answers (question_id, response_id, answer, remarks)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                answer.question_id,
                response_id,
                answer.answer.as_str(),
                answer.remarks.as_deref().unwrap_or(""),
            ],
        )
        .map_err(|e| {
            warn!(
                error = %e,
                response_id,
                question_id = answer.question_id,
                "Answer insert failed"
            );
            StorageError::AnswerBatchInconsistent {
                expected: answers.len(),
                inserted,
                reason: e.to_string(),
            }
        })?;
    }

    let stored: i64 = tx.query_row(
        "SELECT COUNT(*) FROM answers WHERE response_id = ?1",
        params![response_id],
        |row| row.get(0),
    )?;
    if stored as usize != answers.len() {
        return Err(StorageError::AnswerBatchInconsistent {
            expected: answers.len(),
            inserted: stored as usize,
            reason: "stored answer count does not match the batch".to_string(),
        });
    }

    Ok(())
}

fn question_from_row(row: &Row<'_>) -> rusqlite::Result<Question> {
    Ok(Question {
        id: row.get(0)?,
        area: row.get(1)?,
        activity: row.get(2)?,
        criteria: row.get(3)?,
        language: enum_column(row, 4)?,
        sequence_order: row.get(5)?,
    })
}

fn response_from_row(row: &Row<'_>) -> rusqlite::Result<UserResponse> {
    Ok(UserResponse {
        id: row.get(0)?,
        email: row.get(1)?,
        language: enum_column(row, 2)?,
        timestamp: row.get(3)?,
    })
}

fn enum_column<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: String = row.get(idx)?;
    raw.parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn count_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<usize> {
    let count: i64 = row.get(idx)?;
    Ok(count.max(0) as usize)
}
