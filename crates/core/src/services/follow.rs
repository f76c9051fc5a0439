//! Follow graph service.
//!
//! Directed follow edges between users. Edge creation is an idempotent
//! get-or-create: repeated or concurrent requests for the same pair end
//! with exactly one edge, and self-follow requests succeed without
//! changing anything.

use papyrus_common::{AppError, AppResult, IdGenerator};
use papyrus_db::{entities::follow, repositories::FollowRepository};
use sea_orm::Set;

/// Follow graph service.
#[derive(Clone)]
pub struct FollowService {
    follow_repo: FollowRepository,
    id_gen: IdGenerator,
}

impl FollowService {
    /// Create a new follow service.
    #[must_use]
    pub fn new(follow_repo: FollowRepository) -> Self {
        Self {
            follow_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a follow edge from `follower_id` to `followee_id`.
    ///
    /// Self-follow and already-following are silent no-ops. Losing a
    /// race against an identical concurrent request is also success: the
    /// storage uniqueness constraint guarantees a single edge either way.
    pub async fn follow(&self, follower_id: &str, followee_id: &str) -> AppResult<()> {
        if follower_id == followee_id {
            tracing::debug!(user_id = %follower_id, "Ignoring self-follow request");
            return Ok(());
        }

        if self
            .follow_repo
            .is_following(follower_id, followee_id)
            .await?
        {
            return Ok(());
        }

        let model = follow::ActiveModel {
            id: Set(self.id_gen.generate()),
            follower_id: Set(follower_id.to_string()),
            followee_id: Set(followee_id.to_string()),
            ..Default::default()
        };

        match self.follow_repo.create(model).await {
            Ok(_) => Ok(()),
            // A concurrent request inserted the same pair first
            Err(AppError::Conflict(_)) => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Remove the follow edge from `follower_id` to `followee_id`.
    /// Removing an absent edge is a no-op.
    pub async fn unfollow(&self, follower_id: &str, followee_id: &str) -> AppResult<()> {
        self.follow_repo
            .delete_by_pair(follower_id, followee_id)
            .await
    }

    /// Whether `follower_id` currently follows `followee_id`.
    pub async fn is_following(&self, follower_id: &str, followee_id: &str) -> AppResult<bool> {
        self.follow_repo.is_following(follower_id, followee_id).await
    }

    /// IDs of everyone the user follows; input to the feed aggregator.
    pub async fn followed_ids(&self, follower_id: &str) -> AppResult<Vec<String>> {
        self.follow_repo.followed_ids(follower_id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn create_test_follow(id: &str, follower_id: &str, followee_id: &str) -> follow::Model {
        follow::Model {
            id: id.to_string(),
            follower_id: follower_id.to_string(),
            followee_id: followee_id.to_string(),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_self_follow_is_silent_noop() {
        // No results appended: a DB round-trip would fail the test.
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = FollowService::new(FollowRepository::new(db));

        let result = service.follow("user1", "user1").await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_follow_existing_edge_is_noop() {
        let edge = create_test_follow("f1", "user1", "user2");

        // Only the existence check is answered; an insert attempt would
        // run out of prepared results and fail.
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[edge]])
                .into_connection(),
        );
        let service = FollowService::new(FollowRepository::new(db));

        let result = service.follow("user1", "user2").await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_follow_creates_missing_edge() {
        let inserted = create_test_follow("f1", "user1", "user2");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<follow::Model>::new()])
                .append_query_results([[inserted]])
                .into_connection(),
        );
        let service = FollowService::new(FollowRepository::new(db));

        let result = service.follow("user1", "user2").await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_unfollow_missing_edge_is_noop() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<follow::Model>::new()])
                .into_connection(),
        );
        let service = FollowService::new(FollowRepository::new(db));

        let result = service.unfollow("user1", "user2").await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_is_following_reports_edge() {
        let edge = create_test_follow("f1", "user1", "user2");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[edge]])
                .append_query_results([Vec::<follow::Model>::new()])
                .into_connection(),
        );
        let service = FollowService::new(FollowRepository::new(db));

        assert!(service.is_following("user1", "user2").await.unwrap());
        assert!(!service.is_following("user1", "user3").await.unwrap());
    }
}
