use crate::services::generation::{OptionDraft, QuestionDraft};

#[cfg(test)]
pub mod fixtures {
    use super::*;

    /// A four-option draft with exactly one correct answer at `correct_index`.
    pub fn choice_draft(text: &str, correct_index: usize) -> QuestionDraft {
        QuestionDraft {
            text: text.to_string(),
            explanation: "See the lecture material.".to_string(),
            options: (0..4)
                .map(|i| OptionDraft {
                    label: char::from(b'A' + i as u8).to_string(),
                    text: format!("answer {}", i + 1),
                    correct: i == correct_index,
                })
                .collect(),
        }
    }

    pub fn choice_drafts(count: usize) -> Vec<QuestionDraft> {
        (0..count)
            .map(|i| choice_draft(&format!("Question {}?", i + 1), i % 4))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;

    #[test]
    fn test_fixtures_choice_draft() {
        let draft = choice_draft("Q?", 2);
        assert_eq!(draft.options.len(), 4);
        assert_eq!(draft.options.iter().filter(|o| o.correct).count(), 1);
        assert!(draft.options[2].correct);
        assert_eq!(draft.options[0].label, "A");
    }

    #[test]
    fn test_fixtures_choice_drafts() {
        let drafts = choice_drafts(5);
        assert_eq!(drafts.len(), 5);
        assert!(drafts
            .iter()
            .all(|d| d.options.iter().filter(|o| o.correct).count() == 1));
    }
}
