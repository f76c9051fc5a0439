//! Signup and login entry points. The identity provider itself is
//! external; these pages only create accounts and anchor the redirect
//! target for unauthenticated requests.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    routing::get,
    Form, Router,
};
use papyrus_common::{AppError, AppResult};
use papyrus_core::SignupInput;
use serde::Deserialize;
use serde_json::json;

use crate::{
    middleware::AppState,
    response::{see_other, RenderedPage},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/signup/", get(signup_form).post(signup))
        .route("/auth/login/", get(login))
}

#[derive(Debug, Deserialize)]
struct LoginQuery {
    next: Option<String>,
}

/// Signup form.
async fn signup_form() -> RenderedPage {
    RenderedPage::new(
        "users/signup",
        json!({ "form": { "username": "", "email": "", "name": null } }),
    )
}

/// Create an account, then send the user to the login page. A taken
/// username redisplays the form like any other validation failure.
async fn signup(
    State(state): State<AppState>,
    Form(input): Form<SignupInput>,
) -> AppResult<Response> {
    let submitted_username = input.username.clone();
    let submitted_email = input.email.clone();
    let submitted_name = input.name.clone();

    match state.user_service.signup(input).await {
        Ok(_) => Ok(see_other(&state.login_path)),
        Err(AppError::Validation(message) | AppError::Conflict(message)) => {
            Ok(RenderedPage::new(
                "users/signup",
                json!({
                    "form": {
                        "username": submitted_username,
                        "email": submitted_email,
                        "name": submitted_name,
                    },
                    "errors": [message],
                }),
            )
            .into_response())
        }
        Err(e) => Err(e),
    }
}

/// Login page. Carries the `next` parameter through for the external
/// identity provider.
async fn login(Query(query): Query<LoginQuery>) -> RenderedPage {
    RenderedPage::new("users/login", json!({ "next": query.next }))
}
