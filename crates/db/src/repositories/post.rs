//! Post repository.
//!
//! Feed queries all share one ordering contract: publication time
//! descending with ULID id as the stable tie-break, sliced into
//! fixed-size numbered pages.

use std::sync::Arc;

use crate::entities::{Post, post};
use papyrus_common::{AppError, AppResult, PAGE_SIZE, Page};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Select,
};

/// Post repository for database operations.
#[derive(Clone)]
pub struct PostRepository {
    db: Arc<DatabaseConnection>,
}

impl PostRepository {
    /// Create a new post repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a post by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<post::Model>> {
        Post::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a post by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<post::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::PostNotFound(id.to_string()))
    }

    /// Find a post scoped to its author, returning an error if the post
    /// does not exist or belongs to someone else.
    pub async fn get_of_author(&self, author_id: &str, post_id: &str) -> AppResult<post::Model> {
        Post::find_by_id(post_id)
            .filter(post::Column::AuthorId.eq(author_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::PostNotFound(post_id.to_string()))
    }

    /// Global feed: every post, paginated.
    pub async fn find_feed(&self, page: u64) -> AppResult<Page<post::Model>> {
        self.fetch_feed_page(Post::find(), page).await
    }

    /// Group feed: posts belonging to one group.
    pub async fn find_group_feed(&self, group_id: &str, page: u64) -> AppResult<Page<post::Model>> {
        self.fetch_feed_page(
            Post::find().filter(post::Column::GroupId.eq(group_id)),
            page,
        )
        .await
    }

    /// Profile feed: posts of one author.
    pub async fn find_author_feed(
        &self,
        author_id: &str,
        page: u64,
    ) -> AppResult<Page<post::Model>> {
        self.fetch_feed_page(
            Post::find().filter(post::Column::AuthorId.eq(author_id)),
            page,
        )
        .await
    }

    /// Personalized feed: posts authored by any of the given users.
    ///
    /// An empty author set yields an empty first page without touching
    /// the database.
    pub async fn find_followed_feed(
        &self,
        author_ids: &[String],
        page: u64,
    ) -> AppResult<Page<post::Model>> {
        if author_ids.is_empty() {
            return Ok(Page::empty());
        }

        self.fetch_feed_page(
            Post::find().filter(post::Column::AuthorId.is_in(author_ids.to_vec())),
            page,
        )
        .await
    }

    /// Create a new post.
    pub async fn create(&self, model: post::ActiveModel) -> AppResult<post::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a post. `created_at` is never part of the active model, so
    /// edits keep the post's feed position.
    pub async fn update(&self, model: post::ActiveModel) -> AppResult<post::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a post. Its comments cascade at the storage layer.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        if let Some(post) = self.find_by_id(id).await? {
            post.delete(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }
        Ok(())
    }

    /// Run a feed query through the shared pagination contract.
    async fn fetch_feed_page(
        &self,
        query: Select<Post>,
        requested: u64,
    ) -> AppResult<Page<post::Model>> {
        let paginator = query
            .order_by_desc(post::Column::CreatedAt)
            .order_by_desc(post::Column::Id)
            .paginate(self.db.as_ref(), PAGE_SIZE);

        let counts = paginator
            .num_items_and_pages()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if counts.number_of_items == 0 {
            return Ok(Page::empty());
        }

        let number = Page::<post::Model>::resolve_number(requested, counts.number_of_pages);
        let items = paginator
            .fetch_page(number - 1)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(Page::new(
            items,
            number,
            counts.number_of_items,
            counts.number_of_pages,
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_post(id: &str, author_id: &str, text: &str) -> post::Model {
        post::Model {
            id: id.to_string(),
            author_id: author_id.to_string(),
            group_id: None,
            text: text.to_string(),
            image: None,
            created_at: Utc::now().into(),
        }
    }

    fn count_row(n: i64) -> std::collections::BTreeMap<&'static str, sea_orm::Value> {
        maplit::btreemap! {
            "num_items" => sea_orm::Value::BigInt(Some(n))
        }
    }

    #[tokio::test]
    async fn test_find_feed_returns_page_metadata() {
        let p1 = create_test_post("p1", "u1", "first");
        let p2 = create_test_post("p2", "u1", "second");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[count_row(12)]])
                .append_query_results([[p1, p2]])
                .into_connection(),
        );

        let repo = PostRepository::new(db);
        let page = repo.find_feed(1).await.unwrap();

        assert_eq!(page.items.len(), 2);
        assert_eq!(page.number, 1);
        assert_eq!(page.total_items, 12);
        assert_eq!(page.total_pages, 2);
        assert!(page.has_next);
        assert!(!page.has_prev);
    }

    #[tokio::test]
    async fn test_find_feed_out_of_range_falls_back_to_first_page() {
        let p1 = create_test_post("p1", "u1", "only");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[count_row(1)]])
                .append_query_results([[p1]])
                .into_connection(),
        );

        let repo = PostRepository::new(db);
        let page = repo.find_feed(99).await.unwrap();

        assert_eq!(page.number, 1);
        assert_eq!(page.items.len(), 1);
        assert!(!page.has_next);
    }

    #[tokio::test]
    async fn test_find_feed_empty() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[count_row(0)]])
                .into_connection(),
        );

        let repo = PostRepository::new(db);
        let page = repo.find_feed(1).await.unwrap();

        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 1);
    }

    #[tokio::test]
    async fn test_find_followed_feed_empty_author_set_skips_query() {
        // No query results appended: any DB round-trip would fail the test.
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let repo = PostRepository::new(db);
        let page = repo.find_followed_feed(&[], 1).await.unwrap();

        assert!(page.items.is_empty());
        assert_eq!(page.number, 1);
    }

    #[tokio::test]
    async fn test_get_of_author_rejects_foreign_post() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<post::Model>::new()])
                .into_connection(),
        );

        let repo = PostRepository::new(db);
        let result = repo.get_of_author("someone-else", "p1").await;

        assert!(matches!(result, Err(AppError::PostNotFound(_))));
    }
}
