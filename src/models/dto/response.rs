use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::domain::{Question, QuestionType, Quiz, QuizStatus};

/// Read-side view of a quiz. `status` is the derived presentation status, so
/// an ACTIVE quiz past its deadline reads as EXPIRED before the sweeper runs.
#[derive(Debug, Clone, Serialize)]
pub struct QuizView {
    pub id: String,
    pub lecture_id: String,
    pub title: String,
    pub sequence_number: i32,
    pub status: QuizStatus,
    pub time_limit_secs: i64,
    pub question_count: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl QuizView {
    pub fn from_quiz(quiz: &Quiz, now: DateTime<Utc>) -> Self {
        Self {
            id: quiz.id.clone(),
            lecture_id: quiz.lecture_id.clone(),
            title: quiz.title.clone(),
            sequence_number: quiz.sequence_number,
            status: quiz.presentation_status(now),
            time_limit_secs: quiz.time_limit_secs,
            question_count: quiz.question_count,
            published_at: quiz.published_at,
            expires_at: quiz.expires_at,
            created_at: quiz.created_at,
        }
    }
}

/// Question as the audience sees it: correctness flags and explanations are
/// stripped so answers cannot be scraped from the payload.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionView {
    pub id: String,
    pub quiz_id: String,
    pub text: String,
    pub sequence_number: i32,
    pub question_type: QuestionType,
    pub options: Vec<OptionView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OptionView {
    pub id: String,
    pub text: String,
    pub label: String,
    pub sequence_number: i32,
}

impl From<&Question> for QuestionView {
    fn from(question: &Question) -> Self {
        Self {
            id: question.id.clone(),
            quiz_id: question.quiz_id.clone(),
            text: question.text.clone(),
            sequence_number: question.sequence_number,
            question_type: question.question_type,
            options: question
                .options
                .iter()
                .map(|opt| OptionView {
                    id: opt.id.clone(),
                    text: opt.text.clone(),
                    label: opt.label.clone(),
                    sequence_number: opt.sequence_number,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuizStatistics {
    pub quiz_id: String,
    pub total_responses: i64,
    pub correct_responses: i64,
    pub participant_count: i64,
    pub correct_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserQuizStatistics {
    pub user_id: String,
    pub quiz_id: String,
    pub total_responses: i64,
    pub correct_responses: i64,
    pub correct_rate: f64,
    pub rank: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::domain::QuestionOption;
    use chrono::Duration;

    #[test]
    fn question_view_strips_correctness_and_explanation() {
        let question = Question {
            id: "q-1".to_string(),
            quiz_id: "quiz-1".to_string(),
            text: "2 + 2 = ?".to_string(),
            sequence_number: 1,
            question_type: QuestionType::MultipleChoice,
            explanation: "Basic arithmetic.".to_string(),
            difficulty_level: 1,
            options: vec![QuestionOption {
                id: "opt-a".to_string(),
                text: "4".to_string(),
                correct: true,
                label: "A".to_string(),
                selected_count: 3,
                sequence_number: 1,
            }],
            created_at: Utc::now(),
        };

        let view = QuestionView::from(&question);
        let json = serde_json::to_string(&view).unwrap();

        assert!(!json.contains("correct"));
        assert!(!json.contains("explanation"));
        assert!(!json.contains("selected_count"));
        assert_eq!(view.options.len(), 1);
    }

    #[test]
    fn quiz_view_reports_derived_status() {
        let now = Utc::now();
        let mut quiz = Quiz::new_draft("lecture-1", "Quiz", 1, 3);
        quiz.status = QuizStatus::Active;
        quiz.expires_at = Some(now - Duration::seconds(1));

        let view = QuizView::from_quiz(&quiz, now);
        assert_eq!(view.status, QuizStatus::Expired);
    }
}
