use super::AppState;
use crate::auth;
use crate::error::{AppError, AppResult};
use crate::import::{self, Importer};
use crate::middleware::AdminIdentity;
use crate::models::{AdminResponsesQuery, ReportQuery, UploadQuery};
use crate::reports::{self, XLSX_CONTENT_TYPE};
use crate::storage::{QuestionStore, ResponseFilter};
use crate::uploads;
use actix_web::{delete, get, http::header, post, web, HttpMessage, HttpRequest, HttpResponse};
use shared_types::{
    AdminResponsesResponse, DashboardResponse, ImportHistoryResponse, LoginRequest,
    LoginResponse, Pagination, PreviewResponse, ResponseDetailsResponse, StatusMessage,
    UploadResponse,
};
use tracing::{error, info, warn};

const RECENT_RESPONSES: i64 = 10;

fn admin_name(req: &HttpRequest) -> String {
    req.extensions()
        .get::<AdminIdentity>()
        .map(|identity| identity.username.clone())
        .unwrap_or_default()
}

#[post("/login")]
pub async fn login(
    request: web::Json<LoginRequest>,
    data: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    let admin = data
        .config
        .admin
        .as_ref()
        .ok_or_else(|| AppError::Unauthorized("Admin access is not configured".to_string()))?;

    match auth::login(admin, &request.username, &request.password) {
        Ok((token, expires_at)) => {
            info!(username = %request.username, "Admin logged in");
            Ok(HttpResponse::Ok().json(LoginResponse { token, expires_at }))
        }
        Err(e) => {
            warn!(username = %request.username, "Admin login rejected");
            Err(e)
        }
    }
}

#[post("/upload")]
pub async fn upload_workbook(
    req: HttpRequest,
    query: web::Query<UploadQuery>,
    body: web::Bytes,
    data: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    let import_config = &data.config.import;
    let name = uploads::validate_upload(
        query.filename.as_deref().unwrap_or_default(),
        body.len(),
        import_config,
    )?;

    let path = uploads::store_upload(&import_config.upload_dir, &name, &body)?;
    let stored_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| name.clone());

    let importer = Importer::new(data.database.as_ref());
    let result = if query.replace.unwrap_or(false) {
        importer.force_reimport(&path).await
    } else {
        importer.import(&path).await
    };
    let summary = result.map_err(|e| {
        error!(admin = %admin_name(&req), file = %stored_name, error = %e, "Upload import failed");
        e
    })?;

    if let Err(e) = uploads::prune_uploads(&import_config.upload_dir, import_config.keep_uploads) {
        warn!(error = %e, "Failed to prune old uploads");
    }

    info!(
        admin = %admin_name(&req),
        file = %stored_name,
        imported = summary.total_inserted,
        skipped_existing = summary.skipped_existing,
        "Workbook uploaded"
    );

    Ok(HttpResponse::Ok().json(UploadResponse {
        filename: stored_name,
        questions_imported: summary.total_inserted,
        summary,
    }))
}

#[post("/preview")]
pub async fn preview_workbook(
    query: web::Query<UploadQuery>,
    body: web::Bytes,
    data: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    let import_config = &data.config.import;
    let name = uploads::validate_upload(
        query.filename.as_deref().unwrap_or_default(),
        body.len(),
        import_config,
    )?;

    let path = uploads::store_upload(&import_config.upload_dir.join("preview"), &name, &body)?;
    let preview = import::preview_document(&path);
    if let Err(e) = std::fs::remove_file(&path) {
        warn!(path = %path.display(), error = %e, "Failed to remove preview file");
    }
    let preview = preview?;

    info!(
        file = %name,
        sheets = preview.len(),
        languages = ?import::preview_languages(&preview),
        "Workbook previewed"
    );
    Ok(HttpResponse::Ok().json(PreviewResponse { preview }))
}

#[post("/reimport")]
pub async fn reimport(req: HttpRequest, data: web::Data<AppState>) -> AppResult<HttpResponse> {
    let seed_file = data.config.import.seed_file.as_ref().ok_or_else(|| {
        AppError::InvalidRequest("No seed file is configured for re-import".to_string())
    })?;

    info!(admin = %admin_name(&req), file = %seed_file.display(), "Re-import requested");
    let summary = Importer::new(data.database.as_ref())
        .force_reimport(seed_file)
        .await?;

    Ok(HttpResponse::Ok().json(summary))
}

#[get("/dashboard")]
pub async fn dashboard(data: web::Data<AppState>) -> AppResult<HttpResponse> {
    let db = &data.database;

    Ok(HttpResponse::Ok().json(DashboardResponse {
        total_responses: db.total_responses()?,
        total_questions: db.count_questions().await?,
        responses_by_language: db.responses_by_language()?,
        recent_responses: db.list_responses(&ResponseFilter::default(), RECENT_RESPONSES, 0)?,
        question_statistics: db.area_stats()?,
    }))
}

#[get("/responses")]
pub async fn list_responses(
    query: web::Query<AdminResponsesQuery>,
    data: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    let filter = query.filter()?;
    let (page, limit) = query.page_and_limit();

    let total = data.database.count_responses(&filter)?;
    let offset = (page - 1).saturating_mul(limit);
    let responses = data.database.list_responses(&filter, limit, offset)?;

    Ok(HttpResponse::Ok().json(AdminResponsesResponse {
        responses,
        pagination: Pagination {
            current_page: page,
            total_pages: total.saturating_add(limit - 1) / limit,
            total_items: total,
            items_per_page: limit,
        },
    }))
}

#[get("/responses/{id}/details")]
pub async fn response_details(
    path: web::Path<i64>,
    data: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let response = data
        .database
        .get_response(id)?
        .ok_or_else(|| AppError::NotFound(format!("Response {} not found", id)))?;
    let answers = data.database.response_answers(id)?;
    let total_expected_questions = data
        .database
        .count_questions_for_language(response.language)?;

    let answer_summary = reports::summarize_answers(&answers);
    Ok(HttpResponse::Ok().json(ResponseDetailsResponse {
        response,
        completion_percentage: reports::completion_rate(
            answer_summary.total,
            total_expected_questions,
        ),
        answer_summary,
        total_expected_questions,
    }))
}

#[delete("/responses/{id}")]
pub async fn delete_response(
    req: HttpRequest,
    path: web::Path<i64>,
    data: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    if !data.database.delete_response(id)? {
        return Err(AppError::NotFound(format!("Response {} not found", id)));
    }

    info!(admin = %admin_name(&req), response_id = id, "Response deleted by admin");
    Ok(HttpResponse::Ok().json(StatusMessage::ok("Response deleted successfully")))
}

#[get("/imports")]
pub async fn import_history(data: web::Data<AppState>) -> AppResult<HttpResponse> {
    let files = data.database.imported_files()?;
    Ok(HttpResponse::Ok().json(ImportHistoryResponse { files }))
}

#[get("/report")]
pub async fn consolidated_report(
    query: web::Query<ReportQuery>,
    data: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    let report = reports::build_consolidated_report(&data.database, &query.filter()?)?;
    Ok(HttpResponse::Ok().json(report))
}

#[get("/report.xlsx")]
pub async fn consolidated_report_xlsx(
    query: web::Query<ReportQuery>,
    data: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    let report = reports::build_consolidated_report(&data.database, &query.filter()?)?;
    let bytes = reports::consolidated_report_xlsx(&report)?;

    Ok(HttpResponse::Ok()
        .content_type(XLSX_CONTENT_TYPE)
        .insert_header((
            header::CONTENT_DISPOSITION,
            "attachment; filename=\"consolidated-report.xlsx\"",
        ))
        .body(bytes))
}
