use std::sync::Arc;
use std::time::Duration;

use crate::{
    config::Config,
    db::Database,
    errors::AppResult,
    notifications::{LogNotificationSink, NotificationSink},
    repositories::{MongoQuestionRepository, MongoQuizRepository, MongoResponseRepository},
    services::{
        generation::OpenAiQuestionGenerator, AnswerService, ExpirySweeper, QuestionBankService,
        QuizLifecycleService, StatisticsService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub database: Database,
    pub quiz_lifecycle_service: Arc<QuizLifecycleService>,
    pub answer_service: Arc<AnswerService>,
    pub statistics_service: Arc<StatisticsService>,
    pub expiry_sweeper: Arc<ExpirySweeper>,
    pub config: Arc<Config>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let database = Database::connect(&config).await?;

        let quiz_repository = Arc::new(MongoQuizRepository::new(&database));
        quiz_repository.ensure_indexes().await?;
        let question_repository = Arc::new(MongoQuestionRepository::new(&database));
        question_repository.ensure_indexes().await?;
        let response_repository = Arc::new(MongoResponseRepository::new(&database));
        response_repository.ensure_indexes().await?;

        let notifier: Arc<dyn NotificationSink> = Arc::new(LogNotificationSink);
        let generator = Arc::new(OpenAiQuestionGenerator::from_config(&config));

        let question_bank = Arc::new(QuestionBankService::new(
            quiz_repository.clone(),
            question_repository.clone(),
        ));
        let quiz_lifecycle_service = Arc::new(QuizLifecycleService::new(
            quiz_repository.clone(),
            question_repository.clone(),
            question_bank,
            generator,
            notifier.clone(),
        ));
        let answer_service = Arc::new(AnswerService::new(
            quiz_repository.clone(),
            question_repository.clone(),
            response_repository.clone(),
            notifier.clone(),
        ));
        let statistics_service = Arc::new(StatisticsService::new(
            quiz_repository.clone(),
            response_repository,
        ));
        let expiry_sweeper = Arc::new(ExpirySweeper::new(
            quiz_repository,
            notifier,
            Duration::from_secs(config.expiry_sweep_interval_secs),
        ));

        Ok(Self {
            database,
            quiz_lifecycle_service,
            answer_service,
            statistics_service,
            expiry_sweeper,
            config: Arc::new(config),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_cloneable() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }
}
