//! Feed pages: the global feed, group feeds and the personal feed.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Router,
};
use papyrus_common::{AppResult, PageQuery};
use serde_json::json;

use crate::{
    extractors::AuthUser,
    middleware::AppState,
    pages::{group_context, page_context},
    response::RenderedPage,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/group/{slug}/", get(group_posts))
        .route("/follow/", get(follow_index))
}

/// Global feed, newest first.
async fn index(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<RenderedPage> {
    let page = state.post_service.global_feed(query.number()).await?;

    Ok(RenderedPage::new(
        "posts/index",
        json!({ "page": page_context(&page) }),
    ))
}

/// Posts of one group.
async fn group_posts(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<PageQuery>,
) -> AppResult<RenderedPage> {
    let (group, page) = state
        .post_service
        .group_feed(&slug, query.number())
        .await?;

    Ok(RenderedPage::new(
        "posts/group_list",
        json!({
            "group": group_context(&group),
            "page": page_context(&page),
        }),
    ))
}

/// Personalized feed of the viewer's followed authors.
async fn follow_index(
    AuthUser(viewer): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<RenderedPage> {
    let page = state
        .post_service
        .personal_feed(&viewer.id, query.number())
        .await?;

    Ok(RenderedPage::new(
        "posts/follow",
        json!({ "page": page_context(&page) }),
    ))
}
