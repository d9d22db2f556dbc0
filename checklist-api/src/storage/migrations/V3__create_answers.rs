/// Create the answers table linking responses to questions
///
/// Answers follow their question when the checklist is cleared for a re-import.
pub fn migration() -> String {
    r#"
CREATE TABLE answers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    question_id INTEGER NOT NULL,
    response_id INTEGER NOT NULL,
    answer TEXT NOT NULL CHECK (answer IN ('Yes', 'No', 'N/A')),
    remarks TEXT NOT NULL DEFAULT '',
    FOREIGN KEY (question_id) REFERENCES questions (id) ON DELETE CASCADE,
    FOREIGN KEY (response_id) REFERENCES user_responses (id) ON DELETE CASCADE
);

CREATE INDEX idx_answers_response
    ON answers(response_id);

CREATE INDEX idx_answers_question
    ON answers(question_id);
"#
    .to_string()
}
