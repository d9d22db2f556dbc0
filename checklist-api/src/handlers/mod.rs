pub mod admin;
pub mod health;
pub mod questions;
pub mod responses;

use crate::config::ApiConfig;
use crate::error::AppError;
use crate::middleware::AdminAuth;
use crate::storage::Database;
use actix_web::web;
use std::sync::Arc;
use std::time::SystemTime;

pub struct AppState {
    pub database: Arc<Database>,
    pub config: Arc<ApiConfig>,
    pub start_time: SystemTime,
}

impl AppState {
    pub fn new(database: Arc<Database>, config: Arc<ApiConfig>) -> Self {
        Self {
            database,
            config,
            start_time: SystemTime::now(),
        }
    }
}

/// Register every route plus the extractor configuration shared by the
/// server and the integration tests.
pub fn configure(cfg: &mut web::ServiceConfig, max_upload_bytes: usize) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::InvalidRequest(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| AppError::InvalidRequest(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _req| AppError::InvalidRequest(err.to_string()).into()),
    )
    .service(health::health_check)
    .service(questions::list_questions)
    .service(questions::question_stats)
    .service(questions::get_question)
    .service(questions::question_answers)
    .service(responses::submit_response)
    .service(responses::list_responses)
    .service(responses::user_report_xlsx)
    .service(responses::user_report)
    .service(responses::get_response)
    .service(responses::update_response)
    .service(responses::delete_response)
    .service(
        web::scope("/api/admin")
            .wrap(AdminAuth)
            .app_data(web::PayloadConfig::new(max_upload_bytes))
            .service(admin::login)
            .service(admin::upload_workbook)
            .service(admin::preview_workbook)
            .service(admin::reimport)
            .service(admin::dashboard)
            .service(admin::list_responses)
            .service(admin::response_details)
            .service(admin::delete_response)
            .service(admin::import_history)
            .service(admin::consolidated_report_xlsx)
            .service(admin::consolidated_report),
    );
}
