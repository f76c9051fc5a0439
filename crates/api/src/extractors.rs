//! Request extractors.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::Redirect,
};
use papyrus_db::entities::user;

use crate::middleware::LoginPath;

/// Authenticated user extractor. Rejects anonymous requests by
/// redirecting to the login entry point, carrying the original path in
/// the `next` parameter.
#[derive(Debug, Clone)]
pub struct AuthUser(pub user::Model);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Set by the auth middleware when the token resolved to a user
        if let Some(user) = parts.extensions.get::<user::Model>() {
            return Ok(Self(user.clone()));
        }

        let login_path = parts
            .extensions
            .get::<LoginPath>()
            .map_or("/auth/login/", |p| p.0.as_str());
        Err(Redirect::to(&format!(
            "{login_path}?next={}",
            parts.uri.path()
        )))
    }
}

/// Optional authenticated user extractor.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<user::Model>);

impl<S> FromRequestParts<S> for MaybeAuthUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.extensions.get::<user::Model>().cloned()))
    }
}
