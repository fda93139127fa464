//! Menu endpoint.
//!
//! Rebuilds the menu from disk on every request and renders it as an HTML
//! fragment for the preview sidebar.

use std::sync::Arc;

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use minijinja::{Environment, context};
use tfdocs_site::Menu;

use crate::MENU_TEMPLATE;
use crate::error::ServerError;
use crate::state::AppState;

/// Handle GET /markdown/menu.
pub(crate) async fn get_menu(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ServerError> {
    let walker = Arc::clone(&state);
    let menu = tokio::task::spawn_blocking(move || walker.tree.build_menu()).await??;

    let html = render_menu(&state.templates, &menu)?;
    Ok(([(header::CONTENT_TYPE, "text/html")], html))
}

fn render_menu(templates: &Environment<'_>, menu: &Menu) -> Result<String, ServerError> {
    let template = templates.get_template(MENU_TEMPLATE)?;
    Ok(template.render(context! { menu => menu })?)
}
