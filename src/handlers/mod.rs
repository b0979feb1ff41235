pub mod health_handler;
pub mod quiz_handler;
pub mod statistics_handler;

use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health_handler::health)
        .service(quiz_handler::create_quiz)
        .service(quiz_handler::list_quizzes)
        .service(quiz_handler::get_quiz)
        .service(quiz_handler::list_questions)
        .service(quiz_handler::publish_quiz)
        .service(quiz_handler::activate_quiz)
        .service(quiz_handler::cancel_quiz)
        .service(quiz_handler::submit_answer)
        .service(statistics_handler::quiz_statistics)
        .service(statistics_handler::user_quiz_statistics);
}
