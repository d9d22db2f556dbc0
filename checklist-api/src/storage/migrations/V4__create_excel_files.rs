/// Create the excel_files audit table written after each import
pub fn migration() -> String {
    r#"
CREATE TABLE excel_files (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    filename TEXT NOT NULL,
    uploaded_at INTEGER NOT NULL
);
"#
    .to_string()
}
