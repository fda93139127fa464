//! Content endpoint.
//!
//! Returns one page as JSON; the path after the content prefix is the page's
//! addressing key (e.g. `/markdown/docs/resources/widget.md`).

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;

use crate::error::ServerError;
use crate::state::AppState;

/// Content type the preview client expects for page payloads.
const CONTENT_TYPE: &str = "text/javascript";

/// Handle GET /markdown/{path}.
pub(crate) async fn get_content(
    Path(path): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ServerError> {
    let reader = Arc::clone(&state);
    let page = tokio::task::spawn_blocking(move || reader.tree.read_page(&path)).await??;

    let mut body = serde_json::to_vec(&page)?;
    body.push(b'\n');

    Ok(([(header::CONTENT_TYPE, CONTENT_TYPE)], body))
}
