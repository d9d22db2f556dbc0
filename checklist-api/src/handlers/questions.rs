use super::AppState;
use crate::error::{AppError, AppResult};
use crate::models::{parse_language, LanguageQuery};
use actix_web::{get, web, HttpResponse};
use shared_types::{
    AreaGroup, Question, QuestionAnswersResponse, QuestionResponse, QuestionStatsResponse,
    QuestionsResponse,
};
use tracing::info;

/// Group questions by area, keeping areas in order of first appearance
pub fn group_by_area(questions: &[Question]) -> Vec<AreaGroup> {
    let mut groups: Vec<AreaGroup> = Vec::new();
    for question in questions {
        match groups.iter_mut().find(|g| g.area == question.area) {
            Some(group) => group.questions.push(question.clone()),
            None => groups.push(AreaGroup {
                area: question.area.clone(),
                questions: vec![question.clone()],
            }),
        }
    }
    groups
}

#[get("/api/questions")]
pub async fn list_questions(
    query: web::Query<LanguageQuery>,
    data: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    let language = parse_language(query.lang.as_deref())?.ok_or_else(|| {
        AppError::InvalidRequest("Language parameter required. Use lang=EN or lang=ID".to_string())
    })?;

    let questions = data.database.questions_by_language(language)?;
    info!(language = %language, count = questions.len(), "Listing questions");

    Ok(HttpResponse::Ok().json(QuestionsResponse {
        language,
        total_questions: questions.len(),
        grouped_questions: group_by_area(&questions),
        questions,
    }))
}

#[get("/api/questions/stats")]
pub async fn question_stats(
    query: web::Query<LanguageQuery>,
    data: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    let language = parse_language(query.lang.as_deref())?;
    let stats = data.database.question_stats(language)?;

    Ok(HttpResponse::Ok().json(QuestionStatsResponse { stats }))
}

#[get("/api/questions/{id}")]
pub async fn get_question(
    path: web::Path<i64>,
    data: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let question = data
        .database
        .get_question(id)?
        .ok_or_else(|| AppError::NotFound(format!("Question {} not found", id)))?;

    Ok(HttpResponse::Ok().json(QuestionResponse { question }))
}

#[get("/api/questions/{id}/answers")]
pub async fn question_answers(
    path: web::Path<i64>,
    data: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    let question_id = path.into_inner();
    let answers = data.database.question_answers(question_id)?;

    Ok(HttpResponse::Ok().json(QuestionAnswersResponse {
        question_id,
        answers,
    }))
}
