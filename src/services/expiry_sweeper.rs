use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use crate::{
    errors::AppResult,
    notifications::{lecture_topic, NotificationEvent, NotificationSink},
    repositories::QuizRepository,
};

/// Periodic background task that flips timed-out ACTIVE quizzes to EXPIRED
/// and broadcasts the change. Submissions are rejected by their own deadline
/// check regardless of the sweep, so this only keeps stored status and
/// subscribers consistent.
pub struct ExpirySweeper {
    quiz_repository: Arc<dyn QuizRepository>,
    notifier: Arc<dyn NotificationSink>,
    interval: Duration,
    worker_handle: RwLock<Option<JoinHandle<()>>>,
}

impl ExpirySweeper {
    pub fn new(
        quiz_repository: Arc<dyn QuizRepository>,
        notifier: Arc<dyn NotificationSink>,
        interval: Duration,
    ) -> Self {
        Self {
            quiz_repository,
            notifier,
            interval,
            worker_handle: RwLock::new(None),
        }
    }

    /// Spawns the polling loop. A failed sweep logs and simply waits for
    /// the next tick.
    pub async fn start(self: &Arc<Self>) {
        let sweeper = Arc::clone(self);
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(sweeper.interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                match sweeper.sweep_once().await {
                    Ok(0) => {}
                    Ok(expired) => log::info!("expired {} quiz(es)", expired),
                    Err(err) => log::error!("expiry sweep failed: {}", err),
                }
            }
        });

        let mut guard = self.worker_handle.write().await;
        *guard = Some(handle);
        log::info!(
            "expiry sweeper started (interval {}s)",
            self.interval.as_secs()
        );
    }

    /// One sweep cycle. Idempotent: the conditional flip means a quiz
    /// already expired by a concurrent sweep is skipped, not re-notified.
    pub async fn sweep_once(&self) -> AppResult<usize> {
        let now = Utc::now();
        let overdue = self.quiz_repository.find_expired_active(now).await?;

        let mut expired = 0;
        for quiz in overdue {
            if self.quiz_repository.expire_if_active(&quiz.id).await? {
                expired += 1;
                self.notifier
                    .publish(
                        &lecture_topic(&quiz.lecture_id),
                        NotificationEvent::QuizExpired {
                            quiz_id: quiz.id.clone(),
                            title: quiz.title.clone(),
                            status: crate::models::domain::QuizStatus::Expired,
                        },
                    )
                    .await;
            }
        }
        Ok(expired)
    }

    pub async fn shutdown(&self) {
        let mut guard = self.worker_handle.write().await;
        if let Some(handle) = guard.take() {
            handle.abort();
            log::info!("expiry sweeper stopped");
        }
    }
}
