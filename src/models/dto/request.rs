use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateQuizRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(range(min = 1, max = 20))]
    pub question_count: i32,

    #[validate(range(min = 1, max = 5))]
    pub difficulty_level: i32,

    /// Plain text already produced by the content-extraction pipeline.
    #[validate(length(min = 1))]
    pub source_text: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PublishQuizRequest {
    #[validate(range(min = 5, max = 7200))]
    pub time_limit_secs: i64,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubmitAnswerRequest {
    #[validate(length(min = 1))]
    pub user_id: String,

    /// Empty for text answers; an empty list on a choice question is valid
    /// input and scores incorrect.
    #[serde(default)]
    pub selected_option_ids: Vec<String>,

    pub text_response: Option<String>,

    #[validate(range(min = 0))]
    pub response_time_ms: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_quiz_request_rejects_out_of_range_difficulty() {
        let request = CreateQuizRequest {
            title: "Quiz".to_string(),
            question_count: 5,
            difficulty_level: 6,
            source_text: "some text".to_string(),
        };

        assert!(request.validate().is_err());
    }

    #[test]
    fn submit_answer_request_defaults_to_no_selected_options() {
        let request: SubmitAnswerRequest = serde_json::from_str(
            r#"{"user_id": "user-1", "response_time_ms": 1200}"#,
        )
        .unwrap();

        assert!(request.selected_option_ids.is_empty());
        assert!(request.text_response.is_none());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn publish_request_rejects_zero_time_limit() {
        let request = PublishQuizRequest { time_limit_secs: 0 };
        assert!(request.validate().is_err());
    }
}
