//! Comment service.

use papyrus_common::{AppResult, IdGenerator};
use papyrus_db::{
    entities::comment,
    repositories::{CommentRepository, PostRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Comment service for business logic.
#[derive(Clone)]
pub struct CommentService {
    comment_repo: CommentRepository,
    post_repo: PostRepository,
    id_gen: IdGenerator,
}

/// Input for adding a comment to a post.
#[derive(Debug, Deserialize, Validate)]
pub struct CommentInput {
    #[validate(length(min = 1, max = 3000, message = "text must not be empty"))]
    pub text: String,
}

impl CommentService {
    /// Create a new comment service.
    #[must_use]
    pub fn new(comment_repo: CommentRepository, post_repo: PostRepository) -> Self {
        Self {
            comment_repo,
            post_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Add a comment authored by `author_id` to an existing post.
    pub async fn add_comment(
        &self,
        author_id: &str,
        post_id: &str,
        input: CommentInput,
    ) -> AppResult<comment::Model> {
        input.validate()?;

        let post = self.post_repo.get_by_id(post_id).await?;

        let model = comment::ActiveModel {
            id: Set(self.id_gen.generate()),
            post_id: Set(post.id),
            author_id: Set(author_id.to_string()),
            text: Set(input.text),
            ..Default::default()
        };

        let comment = self.comment_repo.create(model).await?;
        tracing::info!(comment_id = %comment.id, post_id = %post_id, "Comment added");
        Ok(comment)
    }

    /// All comments on a post, newest first.
    pub async fn list_for_post(&self, post_id: &str) -> AppResult<Vec<comment::Model>> {
        self.comment_repo.find_by_post(post_id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use papyrus_common::AppError;
    use papyrus_db::entities::post;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn service(db: Arc<sea_orm::DatabaseConnection>) -> CommentService {
        CommentService::new(
            CommentRepository::new(Arc::clone(&db)),
            PostRepository::new(db),
        )
    }

    #[tokio::test]
    async fn test_add_comment_rejects_empty_text() {
        // No prepared results: validation must fail before any query.
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = service(db);

        let result = service
            .add_comment(
                "u1",
                "p1",
                CommentInput {
                    text: String::new(),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_add_comment_on_missing_post_is_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<post::Model>::new()])
                .into_connection(),
        );
        let service = service(db);

        let result = service
            .add_comment(
                "u1",
                "missing",
                CommentInput {
                    text: "hello".to_string(),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::PostNotFound(_))));
    }

    #[tokio::test]
    async fn test_add_comment_creates_record() {
        let post = post::Model {
            id: "p1".to_string(),
            author_id: "owner".to_string(),
            group_id: None,
            text: "a post".to_string(),
            image: None,
            created_at: Utc::now().into(),
        };
        let stored = comment::Model {
            id: "c1".to_string(),
            post_id: "p1".to_string(),
            author_id: "u1".to_string(),
            text: "hello".to_string(),
            created_at: Utc::now().into(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[post]])
                .append_query_results([[stored]])
                .into_connection(),
        );
        let service = service(db);

        let comment = service
            .add_comment(
                "u1",
                "p1",
                CommentInput {
                    text: "hello".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(comment.post_id, "p1");
        assert_eq!(comment.author_id, "u1");
    }
}
