use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{Question, QuestionType, UserResponse},
    notifications::{quiz_statistics_topic, NotificationEvent, NotificationSink},
    repositories::{QuestionRepository, QuizRepository, ResponseRepository},
};

/// Records one user's answer to one question, at most once, scoring it
/// deterministically by question type. The unique (user, question) index in
/// the responses collection is the authoritative duplicate check; this
/// service never does check-then-insert.
pub struct AnswerService {
    quiz_repository: Arc<dyn QuizRepository>,
    question_repository: Arc<dyn QuestionRepository>,
    response_repository: Arc<dyn ResponseRepository>,
    notifier: Arc<dyn NotificationSink>,
}

impl AnswerService {
    pub fn new(
        quiz_repository: Arc<dyn QuizRepository>,
        question_repository: Arc<dyn QuestionRepository>,
        response_repository: Arc<dyn ResponseRepository>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            quiz_repository,
            question_repository,
            response_repository,
            notifier,
        }
    }

    pub async fn submit_answer(
        &self,
        user_id: &str,
        question_id: &str,
        selected_option_ids: Vec<String>,
        text_response: Option<String>,
        response_time_ms: i64,
    ) -> AppResult<UserResponse> {
        let question = self
            .question_repository
            .find_by_id(question_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Question with id '{}' not found", question_id))
            })?;

        // The quiz is resolved solely from the question's parent reference.
        let quiz = self
            .quiz_repository
            .find_by_id(&question.quiz_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Quiz with id '{}' not found", question.quiz_id))
            })?;

        // The deadline counts even while the stored status still says
        // ACTIVE; the sweeper flipping it is not the enforcement point.
        if !quiz.accepting_answers(Utc::now()) {
            return Err(AppError::QuizNotActive(quiz.id.clone()));
        }

        for option_id in &selected_option_ids {
            if !question.has_option(option_id) {
                return Err(AppError::NotFound(format!(
                    "Option with id '{}' not found on question '{}'",
                    option_id, question_id
                )));
            }
        }

        let correct = score_answer(&question, &selected_option_ids);
        let text_response = match question.question_type {
            QuestionType::ShortAnswer => text_response,
            _ => None,
        };

        let response = UserResponse::new(
            user_id,
            &quiz.id,
            question_id,
            selected_option_ids,
            text_response,
            correct,
            response_time_ms,
        );
        let response = self.response_repository.insert(response).await?;

        // Counters are bumped only for submissions that actually landed, so
        // duplicate attempts cannot inflate them. They are display counters:
        // the response is already durable, so a failed bump must not turn a
        // recorded submission into an error.
        if !response.selected_option_ids.is_empty() {
            if let Err(err) = self
                .question_repository
                .record_option_selections(question_id, &response.selected_option_ids)
                .await
            {
                log::warn!(
                    "failed to record option selections for question {}: {}",
                    question_id,
                    err
                );
            }
        }

        self.notifier
            .publish(
                &quiz_statistics_topic(&quiz.id),
                NotificationEvent::StatisticsChanged {
                    quiz_id: quiz.id.clone(),
                },
            )
            .await;

        Ok(response)
    }
}

/// Closed scoring table keyed by question type.
///
/// Choice questions: correct iff exactly one selected option and it carries
/// the correctness flag; zero or several selections score incorrect, never
/// error. Multi-answer: the selected set must equal the correct set exactly.
/// Short answers are recorded unscored (always incorrect); grading free text
/// is someone else's job.
pub fn score_answer(question: &Question, selected_option_ids: &[String]) -> bool {
    match question.question_type {
        QuestionType::MultipleChoice | QuestionType::TrueFalse => {
            if selected_option_ids.len() != 1 {
                return false;
            }
            question
                .options
                .iter()
                .any(|opt| opt.correct && opt.id == selected_option_ids[0])
        }
        QuestionType::MultipleAnswer => {
            let selected: HashSet<&str> =
                selected_option_ids.iter().map(String::as_str).collect();
            let correct: HashSet<&str> = question.correct_option_ids().into_iter().collect();
            !correct.is_empty() && selected == correct
        }
        QuestionType::ShortAnswer => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::domain::QuestionOption;
    use chrono::Utc;

    fn option(id: &str, label: &str, correct: bool) -> QuestionOption {
        QuestionOption {
            id: id.to_string(),
            text: format!("option {}", label),
            correct,
            label: label.to_string(),
            selected_count: 0,
            sequence_number: 0,
        }
    }

    fn question(question_type: QuestionType, options: Vec<QuestionOption>) -> Question {
        Question {
            id: "q-1".to_string(),
            quiz_id: "quiz-1".to_string(),
            text: "?".to_string(),
            sequence_number: 1,
            question_type,
            explanation: String::new(),
            difficulty_level: 1,
            options,
            created_at: Utc::now(),
        }
    }

    fn ids(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn multiple_choice_scores_single_correct_selection() {
        let q = question(
            QuestionType::MultipleChoice,
            vec![
                option("a", "A", false),
                option("b", "B", true),
                option("c", "C", false),
                option("d", "D", false),
            ],
        );

        assert!(score_answer(&q, &ids(&["b"])));
        assert!(!score_answer(&q, &ids(&["a"])));
        assert!(!score_answer(&q, &ids(&["b", "c"])));
        assert!(!score_answer(&q, &ids(&[])));
    }

    #[test]
    fn true_false_scores_like_multiple_choice() {
        let q = question(
            QuestionType::TrueFalse,
            vec![option("t", "A", true), option("f", "B", false)],
        );

        assert!(score_answer(&q, &ids(&["t"])));
        assert!(!score_answer(&q, &ids(&["f"])));
        assert!(!score_answer(&q, &ids(&["t", "f"])));
    }

    #[test]
    fn multiple_answer_requires_exact_set() {
        let q = question(
            QuestionType::MultipleAnswer,
            vec![
                option("a", "A", true),
                option("b", "B", false),
                option("c", "C", true),
                option("d", "D", false),
            ],
        );

        assert!(score_answer(&q, &ids(&["a", "c"])));
        assert!(score_answer(&q, &ids(&["c", "a"]))); // order is irrelevant
        assert!(!score_answer(&q, &ids(&["a"])));
        assert!(!score_answer(&q, &ids(&["a", "c", "d"])));
        assert!(!score_answer(&q, &ids(&[])));
    }

    #[test]
    fn short_answer_is_always_recorded_incorrect() {
        let q = question(QuestionType::ShortAnswer, vec![]);
        assert!(!score_answer(&q, &ids(&[])));
    }
}
