use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, to_bson},
    options::IndexOptions,
    Collection, IndexModel,
};

use crate::{
    db::Database,
    errors::AppResult,
    models::domain::{Quiz, QuizStatus},
};

/// Lifecycle writes are conditional updates filtered on the expected current
/// status. A `false` return means the quiz was not in the expected state, so
/// two concurrent transition calls resolve to exactly one winner.
#[async_trait]
pub trait QuizRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Quiz>>;
    async fn find_by_lecture(&self, lecture_id: &str) -> AppResult<Vec<Quiz>>;
    async fn count_by_lecture(&self, lecture_id: &str) -> AppResult<i64>;
    async fn create_draft(&self, quiz: Quiz) -> AppResult<Quiz>;
    async fn set_question_count(&self, quiz_id: &str, question_count: i32) -> AppResult<()>;
    async fn publish(
        &self,
        quiz_id: &str,
        time_limit_secs: i64,
        published_at: DateTime<Utc>,
    ) -> AppResult<bool>;
    async fn activate(&self, quiz_id: &str, expires_at: DateTime<Utc>) -> AppResult<bool>;
    async fn cancel(&self, quiz_id: &str) -> AppResult<bool>;
    async fn expire_if_active(&self, quiz_id: &str) -> AppResult<bool>;
    async fn find_expired_active(&self, now: DateTime<Utc>) -> AppResult<Vec<Quiz>>;
    async fn delete(&self, quiz_id: &str) -> AppResult<()>;
}

pub struct MongoQuizRepository {
    collection: Collection<Quiz>,
}

impl MongoQuizRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("quizzes");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for quizzes collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let lecture_index = IndexModel::builder()
            .keys(doc! { "lecture_id": 1 })
            .options(IndexOptions::builder().name("lecture_id".to_string()).build())
            .build();

        // The sweeper polls on (status, expires_at).
        let status_expiry_index = IndexModel::builder()
            .keys(doc! { "status": 1, "expires_at": 1 })
            .options(
                IndexOptions::builder()
                    .name("status_expires_at".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(lecture_index).await?;
        self.collection.create_index(status_expiry_index).await?;

        log::info!("Successfully created indexes for quizzes collection");
        Ok(())
    }
}

#[async_trait]
impl QuizRepository for MongoQuizRepository {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Quiz>> {
        let quiz = self.collection.find_one(doc! { "id": id }).await?;
        Ok(quiz)
    }

    async fn find_by_lecture(&self, lecture_id: &str) -> AppResult<Vec<Quiz>> {
        let quizzes = self
            .collection
            .find(doc! { "lecture_id": lecture_id })
            .sort(doc! { "sequence_number": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(quizzes)
    }

    async fn count_by_lecture(&self, lecture_id: &str) -> AppResult<i64> {
        let count = self
            .collection
            .count_documents(doc! { "lecture_id": lecture_id })
            .await?;
        Ok(count as i64)
    }

    async fn create_draft(&self, quiz: Quiz) -> AppResult<Quiz> {
        self.collection.insert_one(&quiz).await?;
        Ok(quiz)
    }

    async fn set_question_count(&self, quiz_id: &str, question_count: i32) -> AppResult<()> {
        self.collection
            .update_one(
                doc! { "id": quiz_id },
                doc! { "$set": {
                    "question_count": question_count,
                    "updated_at": to_bson(&Utc::now())?,
                } },
            )
            .await?;
        Ok(())
    }

    async fn publish(
        &self,
        quiz_id: &str,
        time_limit_secs: i64,
        published_at: DateTime<Utc>,
    ) -> AppResult<bool> {
        let result = self
            .collection
            .update_one(
                doc! { "id": quiz_id, "status": QuizStatus::Draft.as_str() },
                doc! { "$set": {
                    "status": QuizStatus::Published.as_str(),
                    "time_limit_secs": time_limit_secs,
                    "published_at": to_bson(&published_at)?,
                    "updated_at": to_bson(&Utc::now())?,
                } },
            )
            .await?;
        Ok(result.modified_count == 1)
    }

    async fn activate(&self, quiz_id: &str, expires_at: DateTime<Utc>) -> AppResult<bool> {
        let result = self
            .collection
            .update_one(
                doc! { "id": quiz_id, "status": QuizStatus::Published.as_str() },
                doc! { "$set": {
                    "status": QuizStatus::Active.as_str(),
                    "expires_at": to_bson(&expires_at)?,
                    "updated_at": to_bson(&Utc::now())?,
                } },
            )
            .await?;
        Ok(result.modified_count == 1)
    }

    async fn cancel(&self, quiz_id: &str) -> AppResult<bool> {
        let non_terminal = vec![
            QuizStatus::Draft.as_str(),
            QuizStatus::Published.as_str(),
            QuizStatus::Active.as_str(),
        ];
        let result = self
            .collection
            .update_one(
                doc! { "id": quiz_id, "status": { "$in": non_terminal } },
                doc! { "$set": {
                    "status": QuizStatus::Cancelled.as_str(),
                    "updated_at": to_bson(&Utc::now())?,
                } },
            )
            .await?;
        Ok(result.modified_count == 1)
    }

    async fn expire_if_active(&self, quiz_id: &str) -> AppResult<bool> {
        let result = self
            .collection
            .update_one(
                doc! { "id": quiz_id, "status": QuizStatus::Active.as_str() },
                doc! { "$set": {
                    "status": QuizStatus::Expired.as_str(),
                    "updated_at": to_bson(&Utc::now())?,
                } },
            )
            .await?;
        Ok(result.modified_count == 1)
    }

    async fn find_expired_active(&self, now: DateTime<Utc>) -> AppResult<Vec<Quiz>> {
        let quizzes = self
            .collection
            .find(doc! {
                "status": QuizStatus::Active.as_str(),
                "expires_at": { "$lt": to_bson(&now)? },
            })
            .await?
            .try_collect()
            .await?;
        Ok(quizzes)
    }

    async fn delete(&self, quiz_id: &str) -> AppResult<()> {
        self.collection.delete_one(doc! { "id": quiz_id }).await?;
        Ok(())
    }
}
