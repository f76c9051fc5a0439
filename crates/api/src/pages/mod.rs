//! Page handlers.

mod auth;
mod feed;
mod posts;
mod profiles;

use axum::Router;
use papyrus_common::Page;
use papyrus_db::entities::{comment, group, post, user};
use serde_json::{json, Value};

use crate::middleware::AppState;

/// Create the page router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(feed::router())
        .merge(posts::router())
        .merge(profiles::router())
}

// Context builders shared by the handlers. Contexts stay plain
// key/value JSON so any presentation layer can consume them.

pub(crate) fn post_context(post: &post::Model) -> Value {
    json!({
        "id": post.id,
        "author_id": post.author_id,
        "group_id": post.group_id,
        "text": post.text,
        "image": post.image,
        "created_at": post.created_at.to_rfc3339(),
    })
}

pub(crate) fn user_context(user: &user::Model) -> Value {
    json!({
        "id": user.id,
        "username": user.username,
        "name": user.name,
    })
}

pub(crate) fn group_context(group: &group::Model) -> Value {
    json!({
        "id": group.id,
        "title": group.title,
        "slug": group.slug,
        "description": group.description,
    })
}

pub(crate) fn comment_context(comment: &comment::Model) -> Value {
    json!({
        "id": comment.id,
        "post_id": comment.post_id,
        "author_id": comment.author_id,
        "text": comment.text,
        "created_at": comment.created_at.to_rfc3339(),
    })
}

pub(crate) fn page_context(page: &Page<post::Model>) -> Value {
    json!({
        "items": page.items.iter().map(post_context).collect::<Vec<_>>(),
        "number": page.number,
        "total_pages": page.total_pages,
        "total_items": page.total_items,
        "has_next": page.has_next,
        "has_prev": page.has_prev,
    })
}
