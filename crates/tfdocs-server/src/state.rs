//! Application state.
//!
//! Shared, read-only state for all request handlers. Nothing in here changes
//! after startup, so handlers never need to lock.

use minijinja::Environment;
use tfdocs_site::DocsTree;

use crate::error::ServerError;
use crate::{MENU_TEMPLATE, ServerConfig};

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Documentation tree pages and menus are read from.
    pub(crate) tree: DocsTree,
    /// Remote origin unmatched requests are forwarded to (no trailing slash).
    pub(crate) origin: String,
    /// Absolute URL of the remote preview shell.
    pub(crate) shell_url: String,
    /// Client for the shell fetch (follows redirects).
    pub(crate) http: reqwest::Client,
    /// Client for proxied requests (relays redirects to the browser).
    pub(crate) proxy_http: reqwest::Client,
    /// Template environment holding the menu template.
    pub(crate) templates: Environment<'static>,
}

impl AppState {
    pub(crate) fn new(config: &ServerConfig) -> Result<Self, ServerError> {
        let tree = DocsTree::new(
            config.project_dir.clone(),
            config.docs_root.clone(),
            config.docs_index.clone(),
        )
        .with_provider_name(config.provider_name.clone());

        let origin = config.origin.trim_end_matches('/').to_owned();
        let shell_url = format!("{origin}{}", config.shell_path);

        let http = reqwest::Client::builder()
            .build()
            .map_err(ServerError::HttpClient)?;
        let proxy_http = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(ServerError::HttpClient)?;

        let mut templates = Environment::new();
        templates.add_template(MENU_TEMPLATE, include_str!("../templates/menu.html"))?;

        Ok(Self {
            tree,
            origin,
            shell_url,
            http,
            proxy_http,
            templates,
        })
    }
}
