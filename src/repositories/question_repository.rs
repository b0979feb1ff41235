use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{db::Database, errors::AppResult, models::domain::Question};

#[async_trait]
pub trait QuestionRepository: Send + Sync {
    async fn insert_many(&self, questions: Vec<Question>) -> AppResult<Vec<Question>>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Question>>;
    async fn find_by_quiz(&self, quiz_id: &str) -> AppResult<Vec<Question>>;
    /// Cascade path: removing a quiz removes its questions (and embedded
    /// options) first. Returns the number of questions removed.
    async fn delete_by_quiz(&self, quiz_id: &str) -> AppResult<u64>;
    /// Bumps each selected option's display counter. Best-effort counters;
    /// the atomic increment avoids read-modify-write lost updates.
    async fn record_option_selections(
        &self,
        question_id: &str,
        option_ids: &[String],
    ) -> AppResult<()>;
}

pub struct MongoQuestionRepository {
    collection: Collection<Question>,
}

impl MongoQuestionRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("questions");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for questions collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let quiz_sequence_index = IndexModel::builder()
            .keys(doc! { "quiz_id": 1, "sequence_number": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("quiz_sequence_unique".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(quiz_sequence_index).await?;

        log::info!("Successfully created indexes for questions collection");
        Ok(())
    }
}

#[async_trait]
impl QuestionRepository for MongoQuestionRepository {
    async fn insert_many(&self, questions: Vec<Question>) -> AppResult<Vec<Question>> {
        if questions.is_empty() {
            return Ok(questions);
        }
        self.collection.insert_many(&questions).await?;
        Ok(questions)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Question>> {
        let question = self.collection.find_one(doc! { "id": id }).await?;
        Ok(question)
    }

    async fn find_by_quiz(&self, quiz_id: &str) -> AppResult<Vec<Question>> {
        let questions = self
            .collection
            .find(doc! { "quiz_id": quiz_id })
            .sort(doc! { "sequence_number": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(questions)
    }

    async fn delete_by_quiz(&self, quiz_id: &str) -> AppResult<u64> {
        let result = self
            .collection
            .delete_many(doc! { "quiz_id": quiz_id })
            .await?;
        Ok(result.deleted_count)
    }

    async fn record_option_selections(
        &self,
        question_id: &str,
        option_ids: &[String],
    ) -> AppResult<()> {
        for option_id in option_ids {
            self.collection
                .update_one(
                    doc! { "id": question_id, "options.id": option_id },
                    doc! { "$inc": { "options.$.selected_count": 1 } },
                )
                .await?;
        }
        Ok(())
    }
}
