/// Create the user_responses table, one row per submitted checklist
pub fn migration() -> String {
    r#"
CREATE TABLE user_responses (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    email TEXT NOT NULL,
    language TEXT NOT NULL CHECK (language IN ('EN', 'ID')),
    timestamp INTEGER NOT NULL
);

CREATE INDEX idx_user_responses_timestamp
    ON user_responses(timestamp);
"#
    .to_string()
}
