pub mod openai_generator;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::AppResult;

pub use openai_generator::OpenAiQuestionGenerator;

/// Longer source text is cut before it is sent to the model; lecture decks
/// routinely extract to far more text than a short quiz needs.
pub const MAX_SOURCE_TEXT_CHARS: usize = 1800;

/// A not-yet-persisted candidate question as returned by the generation
/// collaborator. Sequence numbers are assigned at ingestion, not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct QuestionDraft {
    pub text: String,
    pub explanation: String,
    pub options: Vec<OptionDraft>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct OptionDraft {
    pub label: String,
    pub text: String,
    pub correct: bool,
}

/// Wire payload expected back from the model.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GeneratedQuizPayload {
    pub questions: Vec<QuestionDraft>,
}

#[async_trait]
pub trait QuestionGenerator: Send + Sync {
    async fn generate(
        &self,
        source_text: &str,
        question_count: i32,
        difficulty_level: i32,
    ) -> AppResult<Vec<QuestionDraft>>;
}

/// Char-boundary-safe truncation to [`MAX_SOURCE_TEXT_CHARS`].
pub fn truncate_source_text(text: &str) -> &str {
    match text.char_indices().nth(MAX_SOURCE_TEXT_CHARS) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_untouched() {
        assert_eq!(truncate_source_text("hello"), "hello");
    }

    #[test]
    fn long_text_is_cut_to_limit() {
        let text = "a".repeat(MAX_SOURCE_TEXT_CHARS + 100);
        assert_eq!(truncate_source_text(&text).chars().count(), MAX_SOURCE_TEXT_CHARS);
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let text = "é".repeat(MAX_SOURCE_TEXT_CHARS + 1);
        let truncated = truncate_source_text(&text);
        assert_eq!(truncated.chars().count(), MAX_SOURCE_TEXT_CHARS);
    }

    #[test]
    fn draft_payload_round_trips() {
        let payload = GeneratedQuizPayload {
            questions: vec![QuestionDraft {
                text: "What is 2 + 2?".to_string(),
                explanation: "Arithmetic.".to_string(),
                options: vec![
                    OptionDraft {
                        label: "A".to_string(),
                        text: "3".to_string(),
                        correct: false,
                    },
                    OptionDraft {
                        label: "B".to_string(),
                        text: "4".to_string(),
                        correct: true,
                    },
                ],
            }],
        };

        let json = serde_json::to_string(&payload).unwrap();
        let parsed: GeneratedQuizPayload = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.questions, payload.questions);
    }
}
