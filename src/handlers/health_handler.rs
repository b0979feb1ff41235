use actix_web::{get, web, HttpResponse};
use serde_json::json;

use crate::{app_state::AppState, errors::AppError};

#[get("/health")]
async fn health(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    state.database.health_check().await?;
    Ok(HttpResponse::Ok().json(json!({ "status": "ok" })))
}
