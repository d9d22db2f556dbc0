use super::AppState;
use actix_web::{get, web, HttpResponse, Responder};
use serde_json::json;

#[get("/api/health")]
pub async fn health_check(data: web::Data<AppState>) -> impl Responder {
    let uptime = data.start_time.elapsed().unwrap_or_default().as_secs();

    HttpResponse::Ok().json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_seconds": uptime,
    }))
}
