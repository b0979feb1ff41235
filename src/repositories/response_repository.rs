use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, from_document},
    options::IndexOptions,
    Collection, IndexModel,
};
use serde::Deserialize;

use crate::{
    db::Database,
    errors::{is_duplicate_key_error, AppError, AppResult},
    models::domain::UserResponse,
};

/// One participant's aggregate row within a quiz, produced by a grouping
/// query over the responses collection.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ParticipantSummary {
    #[serde(rename = "_id")]
    pub user_id: String,
    pub total: i64,
    pub correct: i64,
    pub first_submitted_at: DateTime<Utc>,
}

impl ParticipantSummary {
    pub fn correct_rate(&self) -> f64 {
        if self.total > 0 {
            self.correct as f64 / self.total as f64 * 100.0
        } else {
            0.0
        }
    }
}

#[async_trait]
pub trait ResponseRepository: Send + Sync {
    /// Inserts exactly once per (user, question); a concurrent duplicate
    /// loses at the unique index and surfaces as `DuplicateSubmission`.
    async fn insert(&self, response: UserResponse) -> AppResult<UserResponse>;
    async fn count_by_quiz(&self, quiz_id: &str) -> AppResult<i64>;
    async fn count_correct_by_quiz(&self, quiz_id: &str) -> AppResult<i64>;
    async fn count_participants(&self, quiz_id: &str) -> AppResult<i64>;
    async fn count_by_user_and_quiz(&self, user_id: &str, quiz_id: &str) -> AppResult<i64>;
    async fn count_correct_by_user_and_quiz(
        &self,
        user_id: &str,
        quiz_id: &str,
    ) -> AppResult<i64>;
    async fn participant_summaries(&self, quiz_id: &str) -> AppResult<Vec<ParticipantSummary>>;
}

pub struct MongoResponseRepository {
    collection: Collection<UserResponse>,
}

impl MongoResponseRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("responses");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for responses collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        // Authoritative enforcement of at-most-once submission.
        let user_question_index = IndexModel::builder()
            .keys(doc! { "user_id": 1, "question_id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("user_question_unique".to_string())
                    .build(),
            )
            .build();

        let quiz_index = IndexModel::builder()
            .keys(doc! { "quiz_id": 1 })
            .options(IndexOptions::builder().name("quiz_id".to_string()).build())
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(user_question_index).await?;
        self.collection.create_index(quiz_index).await?;

        log::info!("Successfully created indexes for responses collection");
        Ok(())
    }
}

#[async_trait]
impl ResponseRepository for MongoResponseRepository {
    async fn insert(&self, response: UserResponse) -> AppResult<UserResponse> {
        match self.collection.insert_one(&response).await {
            Ok(_) => Ok(response),
            Err(err) if is_duplicate_key_error(&err) => Err(AppError::DuplicateSubmission(
                format!(
                    "user '{}' already answered question '{}'",
                    response.user_id, response.question_id
                ),
            )),
            Err(err) => Err(err.into()),
        }
    }

    async fn count_by_quiz(&self, quiz_id: &str) -> AppResult<i64> {
        let count = self
            .collection
            .count_documents(doc! { "quiz_id": quiz_id })
            .await?;
        Ok(count as i64)
    }

    async fn count_correct_by_quiz(&self, quiz_id: &str) -> AppResult<i64> {
        let count = self
            .collection
            .count_documents(doc! { "quiz_id": quiz_id, "correct": true })
            .await?;
        Ok(count as i64)
    }

    async fn count_participants(&self, quiz_id: &str) -> AppResult<i64> {
        let user_ids = self
            .collection
            .distinct("user_id", doc! { "quiz_id": quiz_id })
            .await?;
        Ok(user_ids.len() as i64)
    }

    async fn count_by_user_and_quiz(&self, user_id: &str, quiz_id: &str) -> AppResult<i64> {
        let count = self
            .collection
            .count_documents(doc! { "user_id": user_id, "quiz_id": quiz_id })
            .await?;
        Ok(count as i64)
    }

    async fn count_correct_by_user_and_quiz(
        &self,
        user_id: &str,
        quiz_id: &str,
    ) -> AppResult<i64> {
        let count = self
            .collection
            .count_documents(doc! { "user_id": user_id, "quiz_id": quiz_id, "correct": true })
            .await?;
        Ok(count as i64)
    }

    async fn participant_summaries(&self, quiz_id: &str) -> AppResult<Vec<ParticipantSummary>> {
        let pipeline = vec![
            doc! { "$match": { "quiz_id": quiz_id } },
            doc! { "$group": {
                "_id": "$user_id",
                "total": { "$sum": 1 },
                "correct": { "$sum": { "$cond": ["$correct", 1, 0] } },
                "first_submitted_at": { "$min": "$submitted_at" },
            } },
        ];

        let mut cursor = self.collection.aggregate(pipeline).await?;
        let mut summaries = Vec::new();
        while let Some(document) = cursor.try_next().await? {
            summaries.push(from_document(document)?);
        }
        Ok(summaries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn participant_summary_rate_is_zero_without_responses() {
        let summary = ParticipantSummary {
            user_id: "user-1".to_string(),
            total: 0,
            correct: 0,
            first_submitted_at: Utc::now(),
        };
        assert_eq!(summary.correct_rate(), 0.0);
    }

    #[test]
    fn participant_summary_rate_is_percentage() {
        let summary = ParticipantSummary {
            user_id: "user-1".to_string(),
            total: 4,
            correct: 3,
            first_submitted_at: Utc::now(),
        };
        assert_eq!(summary.correct_rate(), 75.0);
    }
}
