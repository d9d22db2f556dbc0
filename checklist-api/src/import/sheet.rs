use shared_types::Language;

/// Map a sheet name to the language of its questions.
///
/// English markers are checked first so a name such as "English (ID copy)"
/// stays English. Returns `None` for sheets that should be skipped.
pub fn classify_sheet(sheet_name: &str) -> Option<Language> {
    let name = sheet_name.to_lowercase();

    if name.contains("eng") || name.contains("english") {
        Some(Language::En)
    } else if name.contains("bahasa") || name.contains("indonesia") || name.contains("id") {
        Some(Language::Id)
    } else {
        None
    }
}
