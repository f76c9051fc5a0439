//! Page integration tests.
//!
//! These drive whole requests through the router, the auth middleware
//! and the services, backed by a mock database.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware::from_fn_with_state,
    Router,
};
use chrono::Utc;
use papyrus_api::{
    middleware::{auth_middleware, AppState},
    router as page_router,
};
use papyrus_core::{CommentService, FollowService, GroupService, PostService, UserService};
use papyrus_db::{
    entities::{follow, post, user},
    repositories::{
        CommentRepository, FollowRepository, GroupRepository, PostRepository, UserRepository,
    },
};
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
use std::sync::Arc;
use tower::ServiceExt;

fn create_state(db: DatabaseConnection) -> AppState {
    let db = Arc::new(db);

    let user_repo = UserRepository::new(Arc::clone(&db));
    let group_repo = GroupRepository::new(Arc::clone(&db));
    let post_repo = PostRepository::new(Arc::clone(&db));
    let comment_repo = CommentRepository::new(Arc::clone(&db));
    let follow_repo = FollowRepository::new(Arc::clone(&db));

    AppState {
        user_service: UserService::new(user_repo.clone()),
        post_service: PostService::new(
            post_repo.clone(),
            user_repo.clone(),
            group_repo.clone(),
            follow_repo.clone(),
        ),
        group_service: GroupService::new(group_repo),
        comment_service: CommentService::new(comment_repo, post_repo),
        follow_service: FollowService::new(follow_repo),
        login_path: "/auth/login/".to_string(),
    }
}

fn create_app(db: DatabaseConnection) -> Router {
    let state = create_state(db);
    page_router()
        .layer(from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}

fn create_test_user(id: &str, username: &str) -> user::Model {
    user::Model {
        id: id.to_string(),
        username: username.to_string(),
        username_lower: username.to_lowercase(),
        email: format!("{username}@example.com"),
        name: None,
        token: Some(format!("token-{id}")),
        created_at: Utc::now().into(),
    }
}

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
async fn test_index_renders_global_feed() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[count_row(1)]])
        .append_query_results([[create_test_post("p1", "u1", "hello")]])
        .into_connection();
    let app = create_app(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_anonymous_new_post_redirects_to_login() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let app = create_app(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/new/")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get("location").unwrap(),
        "/auth/login/?next=/new/"
    );
}

#[tokio::test]
async fn test_unknown_profile_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<user::Model>::new()])
        .into_connection();
    let app = create_app(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/ghost/")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_follow_action_creates_edge_and_redirects() {
    let viewer = create_test_user("u1", "viewer");
    let author = create_test_user("u2", "alice");
    let edge = follow::Model {
        id: "f1".to_string(),
        follower_id: "u1".to_string(),
        followee_id: "u2".to_string(),
        created_at: Utc::now().into(),
    };

    // Token lookup, username lookup, existing-edge check, then the
    // insert with RETURNING.
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[viewer]])
        .append_query_results([[author]])
        .append_query_results([Vec::<follow::Model>::new()])
        .append_query_results([[edge]])
        .into_connection();
    let app = create_app(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/alice/follow/")
                .header("Authorization", "Bearer token-u1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get("location").unwrap(), "/alice/");
}

#[tokio::test]
async fn test_edit_form_by_non_author_redirects_to_post() {
    let intruder = create_test_user("u9", "intruder");
    let owner = create_test_user("u1", "owner");
    let post = create_test_post("p1", "u1", "original");

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[intruder]])
        .append_query_results([[owner]])
        .append_query_results([[post]])
        .into_connection();
    let app = create_app(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/owner/p1/edit/")
                .header("Authorization", "Bearer token-u9")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get("location").unwrap(), "/owner/p1/");
}

#[tokio::test]
async fn test_signup_with_invalid_email_redisplays_form() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let app = create_app(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/auth/signup/")
                .method("POST")
                .header("Content-Type", "application/x-www-form-urlencoded")
                .body(Body::from("username=alice&email=not-an-email"))
                .unwrap(),
        )
        .await
        .unwrap();

    // Validation failures redisplay the form instead of redirecting
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_login_page_carries_next_parameter() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let app = create_app(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/auth/login/?next=/new/")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
