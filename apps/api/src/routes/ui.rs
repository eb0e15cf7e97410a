use axum::response::Html;

const FORM_PAGE: &str = include_str!("../../static/index.html");

/// GET /
/// Static form that posts to the JSON API.
pub async fn form_page() -> Html<&'static str> {
    Html(FORM_PAGE)
}
