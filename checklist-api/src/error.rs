use crate::import::ImportError;
use crate::storage::StorageError;
use actix_web::{HttpResponse, ResponseError};
use shared_types::ErrorResponse;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Import error: {0}")]
    Import(#[from] ImportError),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Report error: {0}")]
    Report(#[from] rust_xlsxwriter::XlsxError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let error_response = ErrorResponse {
            error: self.error_type(),
            message: self.to_string(),
        };

        match self {
            AppError::NotFound(_) | AppError::Import(ImportError::DocumentNotFound(_)) => {
                HttpResponse::NotFound().json(error_response)
            }
            AppError::InvalidRequest(_) | AppError::Import(ImportError::Unreadable { .. }) => {
                HttpResponse::BadRequest().json(error_response)
            }
            AppError::Unauthorized(_) => HttpResponse::Unauthorized().json(error_response),
            AppError::Storage(_)
            | AppError::Import(_)
            | AppError::Config(_)
            | AppError::Io(_)
            | AppError::Report(_)
            | AppError::Internal(_) => HttpResponse::InternalServerError().json(error_response),
        }
    }
}

impl AppError {
    fn error_type(&self) -> String {
        match self {
            AppError::Storage(StorageError::AnswerBatchInconsistent { .. }) => {
                "submission_failed".to_string()
            }
            AppError::Storage(_) => "storage_error".to_string(),
            AppError::Import(_) => "import_error".to_string(),
            AppError::Config(_) => "config_error".to_string(),
            AppError::Io(_) => "io_error".to_string(),
            AppError::Report(_) => "report_error".to_string(),
            AppError::NotFound(_) => "not_found".to_string(),
            AppError::InvalidRequest(_) => "invalid_request".to_string(),
            AppError::Internal(_) => "internal_error".to_string(),
            AppError::Unauthorized(_) => "unauthorized".to_string(),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
