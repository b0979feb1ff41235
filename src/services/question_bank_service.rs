use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{Question, QuestionOption, QuestionType},
    repositories::{QuestionRepository, QuizRepository},
    services::generation::QuestionDraft,
};

/// Turns AI question drafts into persisted question/option rows with stable
/// 1-based sequencing, and stamps the owning quiz with the final count.
pub struct QuestionBankService {
    quiz_repository: Arc<dyn QuizRepository>,
    question_repository: Arc<dyn QuestionRepository>,
}

impl QuestionBankService {
    pub fn new(
        quiz_repository: Arc<dyn QuizRepository>,
        question_repository: Arc<dyn QuestionRepository>,
    ) -> Self {
        Self {
            quiz_repository,
            question_repository,
        }
    }

    pub async fn ingest_drafts(
        &self,
        quiz_id: &str,
        drafts: Vec<QuestionDraft>,
        difficulty_level: i32,
    ) -> AppResult<Vec<Question>> {
        if drafts.is_empty() {
            return Err(AppError::EmptyGenerationResult);
        }

        self.quiz_repository
            .find_by_id(quiz_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Quiz with id '{}' not found", quiz_id)))?;

        let questions = drafts
            .into_iter()
            .enumerate()
            .map(|(index, draft)| Self::build_question(quiz_id, index as i32 + 1, draft, difficulty_level))
            .collect::<AppResult<Vec<_>>>()?;

        let question_count = questions.len() as i32;
        let questions = self.question_repository.insert_many(questions).await?;
        self.quiz_repository
            .set_question_count(quiz_id, question_count)
            .await?;

        Ok(questions)
    }

    fn build_question(
        quiz_id: &str,
        sequence_number: i32,
        draft: QuestionDraft,
        difficulty_level: i32,
    ) -> AppResult<Question> {
        let question_type = Self::classify_draft(&draft)?;

        let options = draft
            .options
            .into_iter()
            .enumerate()
            .map(|(index, option)| QuestionOption {
                id: Uuid::new_v4().to_string(),
                text: option.text,
                correct: option.correct,
                label: option.label,
                selected_count: 0,
                sequence_number: index as i32 + 1,
            })
            .collect();

        Ok(Question {
            id: Uuid::new_v4().to_string(),
            quiz_id: quiz_id.to_string(),
            text: draft.text,
            sequence_number,
            question_type,
            explanation: draft.explanation,
            difficulty_level,
            options,
            created_at: Utc::now(),
        })
    }

    /// A draft with no correct option can never be scored, so it is rejected
    /// here instead of persisting a question whose scoring is undefined.
    /// Several correct options make the question MULTIPLE_ANSWER.
    fn classify_draft(draft: &QuestionDraft) -> AppResult<QuestionType> {
        if draft.options.is_empty() {
            return Err(AppError::GenerationParseError(format!(
                "draft question '{}' has no options",
                draft.text
            )));
        }
        match draft.options.iter().filter(|opt| opt.correct).count() {
            0 => Err(AppError::GenerationParseError(format!(
                "draft question '{}' has no correct option",
                draft.text
            ))),
            1 => Ok(QuestionType::MultipleChoice),
            _ => Ok(QuestionType::MultipleAnswer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::generation::OptionDraft;

    fn draft(correct_flags: &[bool]) -> QuestionDraft {
        QuestionDraft {
            text: "Sample question?".to_string(),
            explanation: "Because.".to_string(),
            options: correct_flags
                .iter()
                .enumerate()
                .map(|(i, &correct)| OptionDraft {
                    label: char::from(b'A' + i as u8).to_string(),
                    text: format!("option {}", i + 1),
                    correct,
                })
                .collect(),
        }
    }

    #[test]
    fn classify_single_correct_as_multiple_choice() {
        let question_type =
            QuestionBankService::classify_draft(&draft(&[false, true, false, false])).unwrap();
        assert_eq!(question_type, QuestionType::MultipleChoice);
    }

    #[test]
    fn classify_several_correct_as_multiple_answer() {
        let question_type =
            QuestionBankService::classify_draft(&draft(&[true, false, true, false])).unwrap();
        assert_eq!(question_type, QuestionType::MultipleAnswer);
    }

    #[test]
    fn classify_rejects_draft_without_correct_option() {
        let err = QuestionBankService::classify_draft(&draft(&[false, false])).unwrap_err();
        assert!(matches!(err, AppError::GenerationParseError(_)));
    }

    #[test]
    fn fixture_drafts_classify_as_multiple_choice() {
        for draft in crate::test_utils::fixtures::choice_drafts(3) {
            let question_type = QuestionBankService::classify_draft(&draft).unwrap();
            assert_eq!(question_type, QuestionType::MultipleChoice);
        }
    }

    #[test]
    fn classify_rejects_draft_without_options() {
        let err = QuestionBankService::classify_draft(&draft(&[])).unwrap_err();
        assert!(matches!(err, AppError::GenerationParseError(_)));
    }

    #[test]
    fn build_question_assigns_contiguous_sequences_and_copies_fields() {
        let question = QuestionBankService::build_question(
            "quiz-1",
            3,
            draft(&[false, true, false, false]),
            4,
        )
        .unwrap();

        assert_eq!(question.quiz_id, "quiz-1");
        assert_eq!(question.sequence_number, 3);
        assert_eq!(question.difficulty_level, 4);
        assert_eq!(question.options.len(), 4);

        let sequences: Vec<i32> = question.options.iter().map(|o| o.sequence_number).collect();
        assert_eq!(sequences, vec![1, 2, 3, 4]);

        let correct_count = question.options.iter().filter(|o| o.correct).count();
        assert_eq!(correct_count, 1);
        assert_eq!(question.options[1].label, "B");
        assert!(question.options.iter().all(|o| o.selected_count == 0));
    }
}
