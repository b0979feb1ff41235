use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One user's recorded answer to one question. Immutable once persisted;
/// the (user_id, question_id) pair is unique at the storage layer.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub user_id: String,
    pub quiz_id: String, // denormalized from the question for aggregate queries
    pub question_id: String,
    pub selected_option_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_response: Option<String>,
    pub correct: bool,
    pub response_time_ms: i64,
    pub submitted_at: DateTime<Utc>,
}

impl UserResponse {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_id: &str,
        quiz_id: &str,
        question_id: &str,
        selected_option_ids: Vec<String>,
        text_response: Option<String>,
        correct: bool,
        response_time_ms: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            quiz_id: quiz_id.to_string(),
            question_id: question_id.to_string(),
            selected_option_ids,
            text_response,
            correct,
            response_time_ms,
            submitted_at: Utc::now(),
        }
    }
}
