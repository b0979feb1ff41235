use actix_web::{get, post, web, HttpResponse};
use chrono::Utc;
use validator::Validate;

use crate::{
    app_state::AppState,
    errors::AppError,
    models::dto::{
        request::{CreateQuizRequest, PublishQuizRequest, SubmitAnswerRequest},
        response::{QuestionView, QuizView},
    },
};

#[post("/api/lectures/{lecture_id}/quizzes")]
async fn create_quiz(
    state: web::Data<AppState>,
    lecture_id: web::Path<String>,
    request: web::Json<CreateQuizRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let quiz = state
        .quiz_lifecycle_service
        .create_quiz(&lecture_id, request)
        .await?;
    Ok(HttpResponse::Created().json(QuizView::from_quiz(&quiz, Utc::now())))
}

#[get("/api/lectures/{lecture_id}/quizzes")]
async fn list_quizzes(
    state: web::Data<AppState>,
    lecture_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let quizzes = state.quiz_lifecycle_service.list_quizzes(&lecture_id).await?;
    let now = Utc::now();
    let views: Vec<QuizView> = quizzes
        .iter()
        .map(|quiz| QuizView::from_quiz(quiz, now))
        .collect();
    Ok(HttpResponse::Ok().json(views))
}

#[get("/api/quizzes/{id}")]
async fn get_quiz(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let quiz = state.quiz_lifecycle_service.get_quiz(&id).await?;
    Ok(HttpResponse::Ok().json(QuizView::from_quiz(&quiz, Utc::now())))
}

#[get("/api/quizzes/{id}/questions")]
async fn list_questions(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let questions = state.quiz_lifecycle_service.list_questions(&id).await?;
    let views: Vec<QuestionView> = questions.iter().map(QuestionView::from).collect();
    Ok(HttpResponse::Ok().json(views))
}

#[post("/api/quizzes/{id}/publish")]
async fn publish_quiz(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<PublishQuizRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let quiz = state
        .quiz_lifecycle_service
        .publish(&id, request.time_limit_secs)
        .await?;
    Ok(HttpResponse::Ok().json(QuizView::from_quiz(&quiz, Utc::now())))
}

#[post("/api/quizzes/{id}/activate")]
async fn activate_quiz(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let quiz = state.quiz_lifecycle_service.activate(&id).await?;
    Ok(HttpResponse::Ok().json(QuizView::from_quiz(&quiz, Utc::now())))
}

#[post("/api/quizzes/{id}/cancel")]
async fn cancel_quiz(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let quiz = state.quiz_lifecycle_service.cancel(&id).await?;
    Ok(HttpResponse::Ok().json(QuizView::from_quiz(&quiz, Utc::now())))
}

#[post("/api/questions/{id}/responses")]
async fn submit_answer(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<SubmitAnswerRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let response = state
        .answer_service
        .submit_answer(
            &request.user_id,
            &id,
            request.selected_option_ids,
            request.text_response,
            request.response_time_ms,
        )
        .await?;
    Ok(HttpResponse::Created().json(response))
}
