//! Page middleware.

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use papyrus_core::{CommentService, FollowService, GroupService, PostService, UserService};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub post_service: PostService,
    pub group_service: GroupService,
    pub comment_service: CommentService,
    pub follow_service: FollowService,
    /// Where unauthenticated requests are redirected.
    pub login_path: String,
}

/// Login path carried in request extensions for extractors.
#[derive(Debug, Clone)]
pub struct LoginPath(pub String);

/// Authentication middleware. Resolves a bearer token to its user row
/// and stashes it in request extensions for the extractors.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    req.extensions_mut()
        .insert(LoginPath(state.login_path.clone()));

    if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
        && let Ok(user) = state.user_service.authenticate_by_token(token).await
    {
        req.extensions_mut().insert(user);
    }

    next.run(req).await
}
