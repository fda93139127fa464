//! Router construction.
//!
//! Every inbound request lands on exactly one branch:
//!
//! | Request | Branch |
//! |---|---|
//! | `GET <shell path>` | augmented preview shell |
//! | `GET /markdown/menu` | menu fragment |
//! | `GET /markdown/{path}` | page JSON |
//! | anything else | reverse proxy |
//!
//! Non-GET requests to the first three paths fall through to the proxy as well.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::proxy;
use crate::state::AppState;
use crate::{CONTENT_PREFIX, MENU_PATH};

/// Create the application router.
///
/// # Arguments
///
/// * `state` - Shared application state
/// * `shell_path` - Local path the preview shell is served on
pub(crate) fn create_router(state: Arc<AppState>, shell_path: &str) -> Router {
    let content_route = format!("{CONTENT_PREFIX}/{{*path}}");

    Router::new()
        .route(
            shell_path,
            get(handlers::shell::get_shell).fallback(proxy::forward),
        )
        .route(
            MENU_PATH,
            get(handlers::menu::get_menu).fallback(proxy::forward),
        )
        .route(
            &content_route,
            get(handlers::content::get_content).fallback(proxy::forward),
        )
        .fallback(proxy::forward)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}
