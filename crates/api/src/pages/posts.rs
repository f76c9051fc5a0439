//! Post pages: creation, detail, editing and commenting.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Router,
};
use papyrus_common::{AppError, AppResult};
use papyrus_core::{CommentInput, CreatePostInput, UpdatePostInput};
use serde_json::json;

use crate::{
    extractors::{AuthUser, MaybeAuthUser},
    middleware::AppState,
    pages::{comment_context, group_context, post_context, user_context},
    response::{see_other, RenderedPage},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/new/", get(new_post_form).post(create_post))
        .route("/{username}/{post_id}/", get(post_detail))
        .route("/{username}/{post_id}/edit/", get(edit_post_form).post(edit_post))
        .route("/{username}/{post_id}/comment/", post(add_comment))
}

fn post_path(username: &str, post_id: &str) -> String {
    format!("/{username}/{post_id}/")
}

/// Group choices for the post form.
async fn group_choices(state: &AppState) -> AppResult<serde_json::Value> {
    let groups = state.group_service.list_all().await?;
    Ok(groups.iter().map(group_context).collect::<Vec<_>>().into())
}

/// New-post form.
async fn new_post_form(
    AuthUser(_viewer): AuthUser,
    State(state): State<AppState>,
) -> AppResult<RenderedPage> {
    Ok(RenderedPage::new(
        "posts/create_post",
        json!({
            "is_edit": false,
            "form": { "text": "", "group_id": null },
            "groups": group_choices(&state).await?,
        }),
    ))
}

/// Create a post. The author is always the caller.
async fn create_post(
    AuthUser(viewer): AuthUser,
    State(state): State<AppState>,
    Form(input): Form<CreatePostInput>,
) -> AppResult<Response> {
    let submitted_text = input.text.clone();
    let submitted_group = input.group_id.clone();

    match state.post_service.create_post(&viewer.id, input).await {
        Ok(_) => Ok(see_other("/")),
        Err(AppError::Validation(message)) => Ok(RenderedPage::new(
            "posts/create_post",
            json!({
                "is_edit": false,
                "form": { "text": submitted_text, "group_id": submitted_group },
                "groups": group_choices(&state).await?,
                "errors": [message],
            }),
        )
        .into_response()),
        Err(e) => Err(e),
    }
}

/// One post with its comments, newest comment first.
async fn post_detail(
    MaybeAuthUser(_viewer): MaybeAuthUser,
    State(state): State<AppState>,
    Path((username, post_id)): Path<(String, String)>,
) -> AppResult<RenderedPage> {
    let (author, post) = state.post_service.get_post(&username, &post_id).await?;
    let comments = state.comment_service.list_for_post(&post.id).await?;

    Ok(RenderedPage::new(
        "posts/post_detail",
        json!({
            "author": user_context(&author),
            "post": post_context(&post),
            "comments": comments.iter().map(comment_context).collect::<Vec<_>>(),
            "form": { "text": "" },
        }),
    ))
}

/// Edit form. A non-author lands back on the read view.
async fn edit_post_form(
    AuthUser(viewer): AuthUser,
    State(state): State<AppState>,
    Path((username, post_id)): Path<(String, String)>,
) -> AppResult<Response> {
    let (author, post) = state.post_service.get_post(&username, &post_id).await?;
    if viewer.id != author.id {
        return Ok(see_other(&post_path(&username, &post_id)));
    }

    Ok(RenderedPage::new(
        "posts/create_post",
        json!({
            "is_edit": true,
            "form": { "text": post.text, "group_id": post.group_id },
            "groups": group_choices(&state).await?,
            "post_id": post.id,
        }),
    )
    .into_response())
}

/// Apply an edit. A non-author is redirected without touching the post.
async fn edit_post(
    AuthUser(viewer): AuthUser,
    State(state): State<AppState>,
    Path((username, post_id)): Path<(String, String)>,
    Form(input): Form<UpdatePostInput>,
) -> AppResult<Response> {
    let (author, post) = state.post_service.get_post(&username, &post_id).await?;
    if viewer.id != author.id {
        return Ok(see_other(&post_path(&username, &post_id)));
    }

    let submitted_text = input.text.clone();
    let submitted_group = input.group_id.clone();

    match state
        .post_service
        .update_post(&viewer.id, &post.id, input)
        .await
    {
        Ok(updated) => Ok(see_other(&post_path(&username, &updated.id))),
        Err(AppError::Validation(message)) => Ok(RenderedPage::new(
            "posts/create_post",
            json!({
                "is_edit": true,
                "form": { "text": submitted_text, "group_id": submitted_group },
                "groups": group_choices(&state).await?,
                "post_id": post.id,
                "errors": [message],
            }),
        )
        .into_response()),
        Err(e) => Err(e),
    }
}

/// Add a comment. An empty comment redisplays the post page unchanged.
async fn add_comment(
    AuthUser(viewer): AuthUser,
    State(state): State<AppState>,
    Path((username, post_id)): Path<(String, String)>,
    Form(input): Form<CommentInput>,
) -> AppResult<Response> {
    let (author, post) = state.post_service.get_post(&username, &post_id).await?;

    let submitted_text = input.text.clone();

    match state
        .comment_service
        .add_comment(&viewer.id, &post.id, input)
        .await
    {
        Ok(_) => Ok(see_other(&post_path(&username, &post_id))),
        Err(AppError::Validation(message)) => {
            let comments = state.comment_service.list_for_post(&post.id).await?;
            Ok(RenderedPage::new(
                "posts/post_detail",
                json!({
                    "author": user_context(&author),
                    "post": post_context(&post),
                    "comments": comments.iter().map(comment_context).collect::<Vec<_>>(),
                    "form": { "text": submitted_text },
                    "errors": [message],
                }),
            )
            .into_response())
        }
        Err(e) => Err(e),
    }
}
