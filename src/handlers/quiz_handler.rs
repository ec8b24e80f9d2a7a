use std::sync::Arc;

use actix_web::{get, post, web, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    errors::AppError,
    models::dto::{
        request::GenerateQuizRequest,
        response::{MessageResponse, QuizDetailResponse},
    },
};

pub const ROOT_MESSAGE: &str = "AI Quiz Generator API is running!";

#[get("/")]
pub async fn root() -> HttpResponse {
    HttpResponse::Ok().json(MessageResponse {
        message: ROOT_MESSAGE.to_string(),
    })
}

#[post("/generate_quiz")]
pub async fn generate_quiz(
    state: web::Data<Arc<AppState>>,
    request: web::Json<GenerateQuizRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    log::info!("Quiz requested for {}", request.url);
    let response = state.quiz_service.generate_quiz(&request.url).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[get("/history")]
pub async fn get_history(state: web::Data<Arc<AppState>>) -> Result<HttpResponse, AppError> {
    let history = state.quiz_service.list_history().await?;
    Ok(HttpResponse::Ok().json(history))
}

#[get("/quiz/{quiz_id}")]
pub async fn get_quiz_detail(
    state: web::Data<Arc<AppState>>,
    quiz_id: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let record = state.quiz_service.get_quiz(quiz_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(QuizDetailResponse::from(record)))
}

#[get("/health")]
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

#[get("/health/ready")]
pub async fn health_check_ready(state: web::Data<Arc<AppState>>) -> HttpResponse {
    match state.quiz_service.check_ready().await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "status": "ready",
            "version": env!("CARGO_PKG_VERSION"),
            "dependencies": { "mongodb": "ok" }
        })),
        Err(err) => {
            log::warn!("Readiness check failed: {}", err);
            HttpResponse::ServiceUnavailable().json(serde_json::json!({
                "status": "not_ready",
                "version": env!("CARGO_PKG_VERSION"),
                "dependencies": { "mongodb": "error" }
            }))
        }
    }
}

/// Registers every route, with malformed JSON bodies reported like other bad input.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::ValidationError(err.to_string()).into()),
    )
    .app_data(web::PathConfig::default().error_handler(|err, _req| {
        AppError::ValidationError(format!("Invalid quiz id: {}", err)).into()
    }))
    .service(root)
    .service(generate_quiz)
    .service(get_history)
    .service(get_quiz_detail)
    .service(health_check)
    .service(health_check_ready);
}
