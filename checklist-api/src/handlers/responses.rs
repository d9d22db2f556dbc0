use super::AppState;
use crate::error::{AppError, AppResult};
use crate::models::ResponseListQuery;
use crate::reports::{self, XLSX_CONTENT_TYPE};
use actix_web::{delete, get, http::header, post, put, web, HttpResponse};
use shared_types::{
    AnswerInput, ResponseListResponse, ResponseWithAnswers, StatusMessage, SubmitResponseRequest,
    SubmitResponseResponse, UpdateAnswersRequest, MAX_REMARKS_CHARS,
};
use tracing::{error, info, warn};

/// Reject remarks longer than the allowed length
pub fn validate_answers(answers: &[AnswerInput]) -> AppResult<()> {
    for answer in answers {
        let length = answer.remarks.as_deref().map_or(0, |r| r.chars().count());
        if length > MAX_REMARKS_CHARS {
            return Err(AppError::InvalidRequest(format!(
                "Remarks for question {} exceed {} characters",
                answer.question_id, MAX_REMARKS_CHARS
            )));
        }
    }
    Ok(())
}

#[post("/api/responses")]
pub async fn submit_response(
    request: web::Json<SubmitResponseRequest>,
    data: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    let request = request.into_inner();
    let email = request.email.trim();
    if email.is_empty() {
        return Err(AppError::InvalidRequest("Email is required".to_string()));
    }
    validate_answers(&request.answers)?;

    let response_id = data
        .database
        .create_response_with_answers(email, request.language, &request.answers)
        .map_err(|e| {
            error!(error = %e, email, "Failed to submit response");
            e
        })?;

    info!(
        response_id,
        language = %request.language,
        answers = request.answers.len(),
        "Response submitted"
    );

    Ok(HttpResponse::Ok().json(SubmitResponseResponse {
        response_id,
        message: "Response submitted successfully".to_string(),
    }))
}

#[get("/api/responses")]
pub async fn list_responses(
    query: web::Query<ResponseListQuery>,
    data: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    let filter = query.filter()?;
    let responses = data.database.list_responses(&filter, query.limit(), 0)?;

    Ok(HttpResponse::Ok().json(ResponseListResponse {
        count: responses.len(),
        responses,
    }))
}

#[get("/api/responses/{id}")]
pub async fn get_response(
    path: web::Path<i64>,
    data: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let response = data
        .database
        .get_response(id)?
        .ok_or_else(|| AppError::NotFound(format!("Response {} not found", id)))?;
    let answers = data.database.response_answers(id)?;

    Ok(HttpResponse::Ok().json(ResponseWithAnswers { response, answers }))
}

#[put("/api/responses/{id}")]
pub async fn update_response(
    path: web::Path<i64>,
    request: web::Json<UpdateAnswersRequest>,
    data: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    validate_answers(&request.answers)?;

    data.database
        .replace_answers(id, &request.answers)
        .map_err(|e| match e {
            crate::storage::StorageError::NotFound(_) => {
                AppError::NotFound(format!("Response {} not found", id))
            }
            other => other.into(),
        })?;

    info!(response_id = id, answers = request.answers.len(), "Response answers replaced");
    Ok(HttpResponse::Ok().json(StatusMessage::ok("Response updated successfully")))
}

#[delete("/api/responses/{id}")]
pub async fn delete_response(
    path: web::Path<i64>,
    data: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    if !data.database.delete_response(id)? {
        warn!(response_id = id, "Delete requested for unknown response");
        return Err(AppError::NotFound(format!("Response {} not found", id)));
    }

    info!(response_id = id, "Response deleted");
    Ok(HttpResponse::Ok().json(StatusMessage::ok("Response deleted successfully")))
}

#[get("/api/responses/{id}/report")]
pub async fn user_report(
    path: web::Path<i64>,
    data: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    let report = reports::build_user_report(&data.database, path.into_inner())?;
    Ok(HttpResponse::Ok().json(report))
}

#[get("/api/responses/{id}/report.xlsx")]
pub async fn user_report_xlsx(
    path: web::Path<i64>,
    data: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let report = reports::build_user_report(&data.database, id)?;
    let bytes = reports::user_report_xlsx(&report)?;

    Ok(HttpResponse::Ok()
        .content_type(XLSX_CONTENT_TYPE)
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"checklist-report-{}.xlsx\"", id),
        ))
        .body(bytes))
}
