//! Generic HTML error page
//!
//! Used for unmatched routes (404) and panics caught by the top-level
//! boundary (500). Detail is rendered only in development mode.

use std::any::Any;
use std::sync::Arc;

use axum::extract::State;
use axum::http::{StatusCode, Uri};
use axum::response::{Html, IntoResponse, Response};

use super::server::AppState;

/// Render the error page for `status`
pub fn render(status: StatusCode, detail: Option<&str>) -> Response {
    let message = status.canonical_reason().unwrap_or("Error");
    let detail = detail
        .map(|d| format!("\n    <pre>{}</pre>", escape_html(d)))
        .unwrap_or_default();

    let body = format!(
        r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8">
    <title>{message}</title>
  </head>
  <body>
    <h1>{message}</h1>
    <h2>{code}</h2>{detail}
  </body>
</html>
"#,
        message = escape_html(message),
        code = status.as_u16(),
        detail = detail,
    );

    (status, Html(body)).into_response()
}

/// Fallback for paths no route or static file claims
pub async fn not_found(State(state): State<Arc<AppState>>, uri: Uri) -> Response {
    tracing::debug!(path = %uri.path(), "no route matched");
    let detail = state
        .development
        .then(|| format!("No route for {}", uri.path()));
    render(StatusCode::NOT_FOUND, detail.as_deref())
}

/// Response for a panic caught by `CatchPanicLayer`
pub fn panic_response(payload: Box<dyn Any + Send + 'static>, development: bool) -> Response {
    let detail = if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic payload".to_string()
    };

    tracing::error!(panic = %detail, "handler panicked");
    render(
        StatusCode::INTERNAL_SERVER_ERROR,
        development.then_some(detail.as_str()),
    )
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
