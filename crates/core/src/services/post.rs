//! Post service and feed aggregation.
//!
//! Feeds are reverse-chronological pages of posts scoped by a filter:
//! everything, one group, one author, or the requesting user's followed
//! set.

use papyrus_common::{AppError, AppResult, IdGenerator, Page};
use papyrus_db::{
    entities::{group, post, user},
    repositories::{FollowRepository, GroupRepository, PostRepository, UserRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Post service for business logic.
#[derive(Clone)]
pub struct PostService {
    post_repo: PostRepository,
    user_repo: UserRepository,
    group_repo: GroupRepository,
    follow_repo: FollowRepository,
    id_gen: IdGenerator,
}

/// Input for creating a new post.
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostInput {
    #[validate(length(min = 1, max = 10000, message = "text must not be empty"))]
    pub text: String,

    /// Group to publish into (optional).
    #[serde(default)]
    pub group_id: Option<String>,

    /// Storage key of an attached image (optional).
    #[serde(default)]
    pub image: Option<String>,
}

/// Input for editing an existing post. Same fields as creation; the
/// publication timestamp is not editable.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePostInput {
    #[validate(length(min = 1, max = 10000, message = "text must not be empty"))]
    pub text: String,

    #[serde(default)]
    pub group_id: Option<String>,

    #[serde(default)]
    pub image: Option<String>,
}

impl PostService {
    /// Create a new post service.
    #[must_use]
    pub fn new(
        post_repo: PostRepository,
        user_repo: UserRepository,
        group_repo: GroupRepository,
        follow_repo: FollowRepository,
    ) -> Self {
        Self {
            post_repo,
            user_repo,
            group_repo,
            follow_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a new post authored by `author_id`.
    pub async fn create_post(
        &self,
        author_id: &str,
        input: CreatePostInput,
    ) -> AppResult<post::Model> {
        input.validate()?;

        let group_id = self.resolve_group(input.group_id).await?;

        let model = post::ActiveModel {
            id: Set(self.id_gen.generate()),
            author_id: Set(author_id.to_string()),
            group_id: Set(group_id),
            text: Set(input.text),
            image: Set(input.image),
            ..Default::default()
        };

        let post = self.post_repo.create(model).await?;
        tracing::info!(post_id = %post.id, author_id = %author_id, "Post created");
        Ok(post)
    }

    /// Edit an existing post. Only the author may edit; the publication
    /// timestamp is left untouched so the post keeps its feed position.
    pub async fn update_post(
        &self,
        editor_id: &str,
        post_id: &str,
        input: UpdatePostInput,
    ) -> AppResult<post::Model> {
        input.validate()?;

        let post = self.post_repo.get_by_id(post_id).await?;
        if post.author_id != editor_id {
            return Err(AppError::Forbidden(
                "only the author can edit a post".to_string(),
            ));
        }

        let group_id = self.resolve_group(input.group_id).await?;

        // The edit form replaces every field; omitting the image clears it.
        let mut model: post::ActiveModel = post.into();
        model.text = Set(input.text);
        model.group_id = Set(group_id);
        model.image = Set(input.image);

        self.post_repo.update(model).await
    }

    /// Global feed: every post, newest first.
    pub async fn global_feed(&self, page: u64) -> AppResult<Page<post::Model>> {
        self.post_repo.find_feed(page).await
    }

    /// Group feed. Unknown slug is a not-found outcome.
    pub async fn group_feed(
        &self,
        slug: &str,
        page: u64,
    ) -> AppResult<(group::Model, Page<post::Model>)> {
        let group = self.group_repo.get_by_slug(slug).await?;
        let feed = self.post_repo.find_group_feed(&group.id, page).await?;
        Ok((group, feed))
    }

    /// Profile feed. Unknown username is a not-found outcome.
    pub async fn profile_feed(
        &self,
        username: &str,
        page: u64,
    ) -> AppResult<(user::Model, Page<post::Model>)> {
        let author = self.user_repo.get_by_username(username).await?;
        let feed = self.post_repo.find_author_feed(&author.id, page).await?;
        Ok((author, feed))
    }

    /// Personalized feed: posts authored by everyone `user_id` follows.
    /// A user following nobody gets an empty page.
    pub async fn personal_feed(&self, user_id: &str, page: u64) -> AppResult<Page<post::Model>> {
        let followed = self.follow_repo.followed_ids(user_id).await?;
        if followed.is_empty() {
            return Ok(Page::empty());
        }
        self.post_repo.find_followed_feed(&followed, page).await
    }

    /// Look up one post through its author's username. The post must
    /// belong to that author; anything else is a not-found outcome.
    pub async fn get_post(
        &self,
        username: &str,
        post_id: &str,
    ) -> AppResult<(user::Model, post::Model)> {
        let author = self.user_repo.get_by_username(username).await?;
        let post = self.post_repo.get_of_author(&author.id, post_id).await?;
        Ok((author, post))
    }

    /// Validate an optional group reference from a form.
    async fn resolve_group(&self, group_id: Option<String>) -> AppResult<Option<String>> {
        match group_id {
            Some(id) if !id.is_empty() => {
                let group = self
                    .group_repo
                    .find_by_id(&id)
                    .await?
                    .ok_or_else(|| AppError::Validation("unknown group".to_string()))?;
                Ok(Some(group.id))
            }
            _ => Ok(None),
        }
    }
}
