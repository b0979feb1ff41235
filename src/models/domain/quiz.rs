use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default per-question answering time used when a draft is created; the
/// presenter can override it at publish time.
pub const DEFAULT_SECS_PER_QUESTION: i64 = 30;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Quiz {
    pub id: String,
    pub lecture_id: String,
    pub title: String,
    pub sequence_number: i32, // ordinal within the owning lecture
    pub status: QuizStatus,
    pub time_limit_secs: i64,
    pub question_count: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Copy)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuizStatus {
    Draft,
    Published,
    Active,
    Expired,
    Cancelled,
}

impl QuizStatus {
    /// String form used both over the wire and in repository filters.
    pub fn as_str(&self) -> &'static str {
        match self {
            QuizStatus::Draft => "DRAFT",
            QuizStatus::Published => "PUBLISHED",
            QuizStatus::Active => "ACTIVE",
            QuizStatus::Expired => "EXPIRED",
            QuizStatus::Cancelled => "CANCELLED",
        }
    }

    /// EXPIRED and CANCELLED admit no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, QuizStatus::Expired | QuizStatus::Cancelled)
    }
}

impl std::fmt::Display for QuizStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Quiz {
    pub fn new_draft(
        lecture_id: &str,
        title: &str,
        sequence_number: i32,
        question_count: i32,
    ) -> Self {
        let now = Utc::now();
        Quiz {
            id: Uuid::new_v4().to_string(),
            lecture_id: lecture_id.to_string(),
            title: title.to_string(),
            sequence_number,
            status: QuizStatus::Draft,
            time_limit_secs: DEFAULT_SECS_PER_QUESTION * question_count as i64,
            question_count,
            published_at: None,
            expires_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// The one predicate deciding whether a submission may be recorded.
    ///
    /// The stored status lags the wall clock between expiry and the next
    /// sweep, so ACTIVE alone is not sufficient: the deadline is checked on
    /// every write path.
    pub fn accepting_answers(&self, now: DateTime<Utc>) -> bool {
        self.status == QuizStatus::Active
            && self.expires_at.map(|deadline| now < deadline).unwrap_or(true)
    }

    /// Status as a reader should see it: an ACTIVE quiz past its deadline is
    /// reported EXPIRED even before the sweeper has flipped the stored value.
    pub fn presentation_status(&self, now: DateTime<Utc>) -> QuizStatus {
        if self.status == QuizStatus::Active && !self.accepting_answers(now) {
            QuizStatus::Expired
        } else {
            self.status
        }
    }

    pub fn expiry_deadline(&self, activated_at: DateTime<Utc>) -> DateTime<Utc> {
        activated_at + Duration::seconds(self.time_limit_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_draft_starts_in_draft_with_default_time_limit() {
        let quiz = Quiz::new_draft("lecture-1", "Checkpoint 1", 1, 5);

        assert_eq!(quiz.status, QuizStatus::Draft);
        assert_eq!(quiz.time_limit_secs, 150);
        assert_eq!(quiz.question_count, 5);
        assert!(quiz.published_at.is_none());
        assert!(quiz.expires_at.is_none());
    }

    #[test]
    fn status_round_trip_serialization_uses_screaming_snake_case() {
        let json = serde_json::to_string(&QuizStatus::Published).unwrap();
        assert_eq!(json, "\"PUBLISHED\"");

        let parsed: QuizStatus = serde_json::from_str("\"CANCELLED\"").unwrap();
        assert_eq!(parsed, QuizStatus::Cancelled);
    }

    #[test]
    fn status_as_str_matches_serde_representation() {
        for status in [
            QuizStatus::Draft,
            QuizStatus::Published,
            QuizStatus::Active,
            QuizStatus::Expired,
            QuizStatus::Cancelled,
        ] {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
    }

    #[test]
    fn accepting_answers_requires_active_status_and_open_window() {
        let now = Utc::now();
        let mut quiz = Quiz::new_draft("lecture-1", "Q", 1, 2);
        assert!(!quiz.accepting_answers(now));

        quiz.status = QuizStatus::Active;
        quiz.expires_at = Some(now + Duration::seconds(10));
        assert!(quiz.accepting_answers(now));

        quiz.expires_at = Some(now - Duration::seconds(1));
        assert!(!quiz.accepting_answers(now));
    }

    #[test]
    fn presentation_status_derives_expired_past_deadline() {
        let now = Utc::now();
        let mut quiz = Quiz::new_draft("lecture-1", "Q", 1, 2);
        quiz.status = QuizStatus::Active;
        quiz.expires_at = Some(now - Duration::seconds(5));

        assert_eq!(quiz.presentation_status(now), QuizStatus::Expired);
        // Stored status is untouched; only the view is derived.
        assert_eq!(quiz.status, QuizStatus::Active);
    }

    #[test]
    fn terminal_states_are_terminal() {
        assert!(QuizStatus::Expired.is_terminal());
        assert!(QuizStatus::Cancelled.is_terminal());
        assert!(!QuizStatus::Active.is_terminal());
        assert!(!QuizStatus::Draft.is_terminal());
    }
}
