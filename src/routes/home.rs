//! Landing page route.

use axum::response::Html;

use super::auth::Viewer;
use crate::page;

/// `GET /` — render the landing page for the current viewer.
pub async fn home(viewer: Viewer) -> Html<String> {
    Html(page::render_home(viewer.principal.as_ref()).into_string())
}
