use actix_web::{get, web, HttpResponse};

use crate::{app_state::AppState, errors::AppError};

#[get("/api/quizzes/{id}/statistics")]
async fn quiz_statistics(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let statistics = state.statistics_service.quiz_statistics(&id).await?;
    Ok(HttpResponse::Ok().json(statistics))
}

#[get("/api/quizzes/{id}/statistics/users/{user_id}")]
async fn user_quiz_statistics(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, AppError> {
    let (quiz_id, user_id) = path.into_inner();
    let statistics = state
        .statistics_service
        .user_quiz_statistics(&user_id, &quiz_id)
        .await?;
    Ok(HttpResponse::Ok().json(statistics))
}
