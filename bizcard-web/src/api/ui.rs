//! UI serving routes
//!
//! Serves the static HTML/JS directory UI and renders the login form

use axum::{
    http::{header::CONTENT_TYPE, StatusCode},
    response::{Html, IntoResponse, Response},
};

const INDEX_HTML: &str = include_str!("../ui/index.html");
const APP_JS: &str = include_str!("../ui/app.js");

/// GET /
///
/// Serves the main UI page
pub async fn serve_index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// GET /static/app.js
///
/// Serves the JavaScript application
pub async fn serve_app_js() -> Response {
    (
        StatusCode::OK,
        [(CONTENT_TYPE, "application/javascript")],
        APP_JS,
    )
        .into_response()
}

/// Password form, optionally with an error notice under the button
pub fn login_page(error: Option<&str>) -> String {
    let notice = error
        .map(|msg| format!("\n    <p style=\"color: red;\">{}</p>", escape_html(msg)))
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>Business Cards - Login</title></head>
<body>
  <form method="post" action="/login">
    <label>Password: <input type="password" name="password" autofocus></label>
    <input type="submit" value="Login">{}
  </form>
</body>
</html>
"#,
        notice
    )
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
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
