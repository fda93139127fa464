//! Preview shell endpoint.

use std::sync::Arc;

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;

use crate::error::ServerError;
use crate::shell::fetch_augmented_shell;
use crate::state::AppState;

/// Handle GET on the shell path: the remote shell with the preview script added.
pub(crate) async fn get_shell(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ServerError> {
    let html = fetch_augmented_shell(&state.http, &state.shell_url).await?;
    Ok(([(header::CONTENT_TYPE, "text/html")], html))
}
