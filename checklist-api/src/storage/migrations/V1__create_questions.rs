/// Create the questions table holding the imported checklist
pub fn migration() -> String {
    r#"
CREATE TABLE questions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    area TEXT NOT NULL,
    activity TEXT NOT NULL,
    criteria TEXT NOT NULL,
    language TEXT NOT NULL CHECK (language IN ('EN', 'ID')),
    sequence_order INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX idx_questions_language_order
    ON questions(language, sequence_order);
"#
    .to_string()
}
