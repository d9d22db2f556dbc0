use crate::config::ImportConfig;
use crate::error::{AppError, AppResult};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{info, warn};

const ALLOWED_EXTENSIONS: &[&str] = &["xlsx", "xls"];

/// Reject anything that is not a spreadsheet within the size limit.
/// Returns the bare file name to store the upload under.
pub fn validate_upload(filename: &str, size: usize, config: &ImportConfig) -> AppResult<String> {
    let name = Path::new(filename)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| AppError::InvalidRequest("A filename is required".to_string()))?;

    let extension = Path::new(&name)
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(AppError::InvalidRequest(
            "Only Excel files (.xlsx, .xls) are allowed".to_string(),
        ));
    }

    if size == 0 {
        return Err(AppError::InvalidRequest("Uploaded file is empty".to_string()));
    }
    if size > config.max_upload_bytes {
        return Err(AppError::InvalidRequest(format!(
            "File exceeds the {} byte upload limit",
            config.max_upload_bytes
        )));
    }

    Ok(name)
}

/// Write an upload into `dir` under a millisecond timestamp prefix
pub fn store_upload(dir: &Path, name: &str, bytes: &[u8]) -> AppResult<PathBuf> {
    std::fs::create_dir_all(dir)?;

    let millis = chrono::Utc::now().timestamp_millis();
    let path = dir.join(format!("{}-{}", millis, name));
    std::fs::write(&path, bytes)?;

    info!(path = %path.display(), bytes = bytes.len(), "Stored upload");
    Ok(path)
}

/// Keep only the `keep` most recently modified spreadsheets in `dir`.
/// Returns how many files were removed.
pub fn prune_uploads(dir: &Path, keep: usize) -> AppResult<usize> {
    let mut files: Vec<(SystemTime, PathBuf)> = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let is_spreadsheet = path
            .extension()
            .map(|e| ALLOWED_EXTENSIONS.contains(&e.to_string_lossy().to_lowercase().as_str()))
            .unwrap_or(false);
        if !path.is_file() || !is_spreadsheet {
            continue;
        }
        let modified = entry.metadata()?.modified()?;
        files.push((modified, path));
    }

    // newest first; the timestamp prefix breaks mtime ties
    files.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| b.1.cmp(&a.1)));

    let mut removed = 0;
    for (_, path) in files.into_iter().skip(keep) {
        match std::fs::remove_file(&path) {
            Ok(()) => removed += 1,
            Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove old upload"),
        }
    }

    if removed > 0 {
        info!(removed, kept = keep, "Pruned old uploads");
    }
    Ok(removed)
}
