//! Page response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;

/// A page ready for rendering: a template identifier plus the context
/// the template needs. The presentation layer consumes this payload.
#[derive(Debug, Serialize)]
pub struct RenderedPage {
    pub template: &'static str,
    pub context: Value,
}

impl RenderedPage {
    /// Create a page response.
    #[must_use]
    pub const fn new(template: &'static str, context: Value) -> Self {
        Self { template, context }
    }
}

impl IntoResponse for RenderedPage {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Redirect after a successful mutation.
#[must_use]
pub fn see_other(location: &str) -> Response {
    Redirect::to(location).into_response()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rendered_page_serializes_template_and_context() {
        let page = RenderedPage::new("posts/index", json!({"page_number": 1}));
        let value = serde_json::to_value(&page).unwrap();

        assert_eq!(value["template"], "posts/index");
        assert_eq!(value["context"]["page_number"], 1);
    }
}
