use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Question {
    pub id: String,
    pub quiz_id: String,
    pub text: String,
    pub sequence_number: i32, // contiguous 1..N within the quiz
    pub question_type: QuestionType,
    pub explanation: String,
    pub difficulty_level: i32,
    pub options: Vec<QuestionOption>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuestionOption {
    pub id: String,
    pub text: String,
    pub correct: bool,
    pub label: String, // display letter, 'A'..'D'
    pub selected_count: i64,
    pub sequence_number: i32,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Copy)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionType {
    MultipleChoice,
    MultipleAnswer,
    TrueFalse,
    ShortAnswer,
}

impl Question {
    pub fn correct_option_ids(&self) -> Vec<&str> {
        self.options
            .iter()
            .filter(|opt| opt.correct)
            .map(|opt| opt.id.as_str())
            .collect()
    }

    pub fn has_option(&self, option_id: &str) -> bool {
        self.options.iter().any(|opt| opt.id == option_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_question(question_type: QuestionType) -> Question {
        Question {
            id: "q-1".to_string(),
            quiz_id: "quiz-1".to_string(),
            text: "Which planet is closest to the sun?".to_string(),
            sequence_number: 1,
            question_type,
            explanation: "Mercury orbits closest.".to_string(),
            difficulty_level: 2,
            options: vec![
                QuestionOption {
                    id: "opt-a".to_string(),
                    text: "Venus".to_string(),
                    correct: false,
                    label: "A".to_string(),
                    selected_count: 0,
                    sequence_number: 1,
                },
                QuestionOption {
                    id: "opt-b".to_string(),
                    text: "Mercury".to_string(),
                    correct: true,
                    label: "B".to_string(),
                    selected_count: 0,
                    sequence_number: 2,
                },
            ],
            created_at: Utc::now(),
        }
    }

    #[test]
    fn question_type_round_trip_serialization() {
        let variants = [
            QuestionType::MultipleChoice,
            QuestionType::MultipleAnswer,
            QuestionType::TrueFalse,
            QuestionType::ShortAnswer,
        ];

        for variant in variants {
            let json = serde_json::to_string(&variant).expect("variant should serialize");
            let parsed: QuestionType =
                serde_json::from_str(&json).expect("variant should deserialize");
            assert_eq!(variant, parsed);
        }
    }

    #[test]
    fn question_type_serializes_screaming_snake_case() {
        let json = serde_json::to_string(&QuestionType::MultipleChoice).unwrap();
        assert_eq!(json, "\"MULTIPLE_CHOICE\"");
    }

    #[test]
    fn question_type_rejects_unknown_variant() {
        let parsed = serde_json::from_str::<QuestionType>("\"ESSAY\"");
        assert!(parsed.is_err());
    }

    #[test]
    fn correct_option_ids_filters_flagged_options() {
        let question = make_question(QuestionType::MultipleChoice);
        assert_eq!(question.correct_option_ids(), vec!["opt-b"]);
    }

    #[test]
    fn has_option_checks_membership() {
        let question = make_question(QuestionType::MultipleChoice);
        assert!(question.has_option("opt-a"));
        assert!(!question.has_option("opt-z"));
    }
}
