use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::domain::QuizStatus;

/// Events pushed to subscribers. Statistics updates carry only the quiz id;
/// consumers re-query for fresh aggregates.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum NotificationEvent {
    #[serde(rename = "QUIZ_ACTIVATED")]
    QuizActivated {
        quiz_id: String,
        title: String,
        status: QuizStatus,
        expires_at: DateTime<Utc>,
    },
    #[serde(rename = "QUIZ_EXPIRED")]
    QuizExpired {
        quiz_id: String,
        title: String,
        status: QuizStatus,
    },
    #[serde(rename = "STATISTICS_UPDATE")]
    StatisticsChanged { quiz_id: String },
}

pub fn lecture_topic(lecture_id: &str) -> String {
    format!("lecture.{}", lecture_id)
}

pub fn quiz_statistics_topic(quiz_id: &str) -> String {
    format!("quiz.{}.statistics", quiz_id)
}

/// Best-effort delivery to an external push channel. Implementations must
/// not block the caller on delivery problems; publish never fails.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn publish(&self, topic: &str, event: NotificationEvent);
}

/// Sink used when no push transport is wired up: events land in the log.
pub struct LogNotificationSink;

#[async_trait]
impl NotificationSink for LogNotificationSink {
    async fn publish(&self, topic: &str, event: NotificationEvent) {
        match serde_json::to_string(&event) {
            Ok(payload) => log::info!("notification [{}]: {}", topic, payload),
            Err(err) => log::warn!("notification [{}] failed to serialize: {}", topic, err),
        }
    }
}
