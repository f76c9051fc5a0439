//! Profile pages and the follow/unfollow actions.

use axum::{
    extract::{Path, Query, State},
    response::Response,
    routing::get,
    Router,
};
use papyrus_common::{AppResult, PageQuery};
use serde_json::json;

use crate::{
    extractors::{AuthUser, MaybeAuthUser},
    middleware::AppState,
    pages::{page_context, user_context},
    response::{see_other, RenderedPage},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{username}/", get(profile))
        .route("/{username}/follow/", get(follow_author))
        .route("/{username}/unfollow/", get(unfollow_author))
}

fn profile_path(username: &str) -> String {
    format!("/{username}/")
}

/// An author's profile with their posts.
async fn profile(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<AppState>,
    Path(username): Path<String>,
    Query(query): Query<PageQuery>,
) -> AppResult<RenderedPage> {
    let (author, page) = state
        .post_service
        .profile_feed(&username, query.number())
        .await?;

    let is_following = match viewer {
        Some(viewer) => {
            state
                .follow_service
                .is_following(&viewer.id, &author.id)
                .await?
        }
        None => false,
    };

    Ok(RenderedPage::new(
        "posts/profile",
        json!({
            "author": user_context(&author),
            "page": page_context(&page),
            "is_following": is_following,
        }),
    ))
}

/// Start following an author, then return to their profile.
async fn follow_author(
    AuthUser(viewer): AuthUser,
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<Response> {
    let author = state.user_service.get_by_username(&username).await?;
    state.follow_service.follow(&viewer.id, &author.id).await?;
    Ok(see_other(&profile_path(&username)))
}

/// Stop following an author, then return to their profile.
async fn unfollow_author(
    AuthUser(viewer): AuthUser,
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<Response> {
    let author = state.user_service.get_by_username(&username).await?;
    state
        .follow_service
        .unfollow(&viewer.id, &author.id)
        .await?;
    Ok(see_other(&profile_path(&username)))
}
