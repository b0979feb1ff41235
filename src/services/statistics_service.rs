use std::cmp::Ordering;
use std::sync::Arc;

use crate::{
    errors::{AppError, AppResult},
    models::dto::response::{QuizStatistics, UserQuizStatistics},
    repositories::{ParticipantSummary, QuizRepository, ResponseRepository},
};

/// Read-side aggregates over persisted responses. No caching: every call
/// recomputes from repository-level count/group queries.
pub struct StatisticsService {
    quiz_repository: Arc<dyn QuizRepository>,
    response_repository: Arc<dyn ResponseRepository>,
}

impl StatisticsService {
    pub fn new(
        quiz_repository: Arc<dyn QuizRepository>,
        response_repository: Arc<dyn ResponseRepository>,
    ) -> Self {
        Self {
            quiz_repository,
            response_repository,
        }
    }

    async fn ensure_quiz_exists(&self, quiz_id: &str) -> AppResult<()> {
        self.quiz_repository
            .find_by_id(quiz_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Quiz with id '{}' not found", quiz_id)))?;
        Ok(())
    }

    pub async fn quiz_statistics(&self, quiz_id: &str) -> AppResult<QuizStatistics> {
        self.ensure_quiz_exists(quiz_id).await?;

        let total_responses = self.response_repository.count_by_quiz(quiz_id).await?;
        let correct_responses = self
            .response_repository
            .count_correct_by_quiz(quiz_id)
            .await?;
        let participant_count = self.response_repository.count_participants(quiz_id).await?;

        Ok(QuizStatistics {
            quiz_id: quiz_id.to_string(),
            total_responses,
            correct_responses,
            participant_count,
            correct_rate: rate(correct_responses, total_responses),
        })
    }

    pub async fn user_quiz_statistics(
        &self,
        user_id: &str,
        quiz_id: &str,
    ) -> AppResult<UserQuizStatistics> {
        self.ensure_quiz_exists(quiz_id).await?;

        let total_responses = self
            .response_repository
            .count_by_user_and_quiz(user_id, quiz_id)
            .await?;
        let correct_responses = self
            .response_repository
            .count_correct_by_user_and_quiz(user_id, quiz_id)
            .await?;

        let summaries = self
            .response_repository
            .participant_summaries(quiz_id)
            .await?;
        let rank = rank_of(user_id, summaries);

        Ok(UserQuizStatistics {
            user_id: user_id.to_string(),
            quiz_id: quiz_id.to_string(),
            total_responses,
            correct_responses,
            correct_rate: rate(correct_responses, total_responses),
            rank,
        })
    }
}

fn rate(correct: i64, total: i64) -> f64 {
    if total > 0 {
        correct as f64 / total as f64 * 100.0
    } else {
        0.0
    }
}

/// Participants ordered by their own correct rate descending; ties broken by
/// earlier first submission, then user id for a stable total order. A user
/// with no responses ranks after every participant.
fn rank_of(user_id: &str, mut summaries: Vec<ParticipantSummary>) -> i64 {
    summaries.sort_by(|a, b| {
        b.correct_rate()
            .partial_cmp(&a.correct_rate())
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.first_submitted_at.cmp(&b.first_submitted_at))
            .then_with(|| a.user_id.cmp(&b.user_id))
    });

    summaries
        .iter()
        .position(|summary| summary.user_id == user_id)
        .map(|index| index as i64 + 1)
        .unwrap_or(summaries.len() as i64 + 1)
}
