use std::sync::Arc;

use chrono::Utc;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{Question, Quiz},
        dto::request::CreateQuizRequest,
    },
    notifications::{lecture_topic, NotificationEvent, NotificationSink},
    repositories::{QuestionRepository, QuizRepository},
    services::{
        generation::{truncate_source_text, QuestionGenerator},
        question_bank_service::QuestionBankService,
    },
};

/// Owns the quiz status state machine: DRAFT -> PUBLISHED -> ACTIVE ->
/// EXPIRED, with CANCELLED reachable from any non-terminal state. All
/// transitions go through conditional repository updates, so concurrent
/// callers resolve to one winner and one `InvalidStateTransition`.
pub struct QuizLifecycleService {
    quiz_repository: Arc<dyn QuizRepository>,
    question_repository: Arc<dyn QuestionRepository>,
    question_bank: Arc<QuestionBankService>,
    generator: Arc<dyn QuestionGenerator>,
    notifier: Arc<dyn NotificationSink>,
}

impl QuizLifecycleService {
    pub fn new(
        quiz_repository: Arc<dyn QuizRepository>,
        question_repository: Arc<dyn QuestionRepository>,
        question_bank: Arc<QuestionBankService>,
        generator: Arc<dyn QuestionGenerator>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            quiz_repository,
            question_repository,
            question_bank,
            generator,
            notifier,
        }
    }

    pub async fn get_quiz(&self, id: &str) -> AppResult<Quiz> {
        self.quiz_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Quiz with id '{}' not found", id)))
    }

    pub async fn list_quizzes(&self, lecture_id: &str) -> AppResult<Vec<Quiz>> {
        self.quiz_repository.find_by_lecture(lecture_id).await
    }

    pub async fn list_questions(&self, quiz_id: &str) -> AppResult<Vec<Question>> {
        self.get_quiz(quiz_id).await?;
        self.question_repository.find_by_quiz(quiz_id).await
    }

    /// Creates a DRAFT quiz shell, generates questions from the source text
    /// and ingests them. All-or-nothing: any failure after the shell exists
    /// removes the shell and every question persisted so far.
    pub async fn create_quiz(
        &self,
        lecture_id: &str,
        request: CreateQuizRequest,
    ) -> AppResult<Quiz> {
        let sequence_number = self.quiz_repository.count_by_lecture(lecture_id).await? as i32 + 1;
        let mut quiz = Quiz::new_draft(
            lecture_id,
            &request.title,
            sequence_number,
            request.question_count,
        );
        let quiz_id = quiz.id.clone();
        self.quiz_repository.create_draft(quiz.clone()).await?;

        let result = self
            .generate_and_ingest(&quiz_id, &request)
            .await;

        match result {
            Ok(question_count) => {
                quiz.question_count = question_count;
                Ok(quiz)
            }
            Err(err) => {
                self.rollback_creation(&quiz_id).await;
                Err(err)
            }
        }
    }

    async fn generate_and_ingest(
        &self,
        quiz_id: &str,
        request: &CreateQuizRequest,
    ) -> AppResult<i32> {
        let source_text = truncate_source_text(&request.source_text);
        let drafts = self
            .generator
            .generate(source_text, request.question_count, request.difficulty_level)
            .await?;

        let questions = self
            .question_bank
            .ingest_drafts(quiz_id, drafts, request.difficulty_level)
            .await?;

        Ok(questions.len() as i32)
    }

    async fn rollback_creation(&self, quiz_id: &str) {
        if let Err(err) = self.question_repository.delete_by_quiz(quiz_id).await {
            log::error!("rollback: failed to delete questions of quiz {}: {}", quiz_id, err);
        }
        if let Err(err) = self.quiz_repository.delete(quiz_id).await {
            log::error!("rollback: failed to delete quiz {}: {}", quiz_id, err);
        }
    }

    /// DRAFT -> PUBLISHED, recording the publish time and the time limit the
    /// presenter chose.
    pub async fn publish(&self, quiz_id: &str, time_limit_secs: i64) -> AppResult<Quiz> {
        let quiz = self.get_quiz(quiz_id).await?;

        let published = self
            .quiz_repository
            .publish(quiz_id, time_limit_secs, Utc::now())
            .await?;
        if !published {
            return Err(AppError::InvalidStateTransition(format!(
                "quiz '{}' cannot be published from status {}",
                quiz_id, quiz.status
            )));
        }

        self.get_quiz(quiz_id).await
    }

    /// PUBLISHED -> ACTIVE. Computes the expiry deadline from the stored
    /// time limit and broadcasts the activation to the lecture topic.
    pub async fn activate(&self, quiz_id: &str) -> AppResult<Quiz> {
        let quiz = self.get_quiz(quiz_id).await?;
        let expires_at = quiz.expiry_deadline(Utc::now());

        let activated = self.quiz_repository.activate(quiz_id, expires_at).await?;
        if !activated {
            return Err(AppError::InvalidStateTransition(format!(
                "quiz '{}' cannot be activated from status {}",
                quiz_id, quiz.status
            )));
        }

        let quiz = self.get_quiz(quiz_id).await?;
        self.notifier
            .publish(
                &lecture_topic(&quiz.lecture_id),
                NotificationEvent::QuizActivated {
                    quiz_id: quiz.id.clone(),
                    title: quiz.title.clone(),
                    status: quiz.status,
                    expires_at,
                },
            )
            .await;

        Ok(quiz)
    }

    /// Administrative escape hatch: any non-terminal state -> CANCELLED.
    pub async fn cancel(&self, quiz_id: &str) -> AppResult<Quiz> {
        let quiz = self.get_quiz(quiz_id).await?;

        let cancelled = self.quiz_repository.cancel(quiz_id).await?;
        if !cancelled {
            return Err(AppError::InvalidStateTransition(format!(
                "quiz '{}' cannot be cancelled from status {}",
                quiz_id, quiz.status
            )));
        }

        self.get_quiz(quiz_id).await
    }
}

#[cfg(test)]
mod tests {
    use crate::models::domain::QuizStatus;

    #[test]
    fn cancelled_is_unreachable_from_terminal_states() {
        // The repository filter is the enforcement point; this pins the
        // status set the service relies on.
        assert!(QuizStatus::Expired.is_terminal());
        assert!(QuizStatus::Cancelled.is_terminal());
    }
}
