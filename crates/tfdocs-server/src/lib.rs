//! Local documentation preview server for tfdocs.
//!
//! This crate provides a native Rust HTTP server using axum that lets an
//! author see how their provider documentation renders on the registry
//! before publishing. It serves:
//! - The registry's preview shell, fetched live with a preview script appended
//! - A navigation menu built from the local `docs/` tree
//! - Raw page content as JSON for the preview editor
//! - Everything else (CSS, JS, fonts) proxied from the registry origin
//!
//! # Quick Start
//!
//! ```ignore
//! use std::path::PathBuf;
//! use tfdocs_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         project_dir: PathBuf::from("."),
//!         provider_name: "terraform-provider-acme".to_owned(),
//!         ..ServerConfig::default()
//!     };
//!
//!     run_server(config).await.unwrap();
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! Browser ──HTTP──► axum router (tfdocs-server)
//!                        │
//!                        ├─► shell path ──► fetch shell ──► html5ever inject ──► HTML
//!                        │
//!                        ├─► /markdown/menu ──► DocsTree::build_menu ──► minijinja ──► HTML
//!                        │
//!                        ├─► /markdown/{path} ──► DocsTree::read_page ──► JSON
//!                        │
//!                        └─► anything else ──► reqwest ──► registry origin (streamed)
//! ```

mod app;
mod error;
mod handlers;
mod proxy;
mod shell;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use state::AppState;
use tokio::net::{TcpListener, lookup_host};

pub use error::ServerError;

/// Path of the menu endpoint.
pub const MENU_PATH: &str = "/markdown/menu";
/// Prefix of the content endpoint; the remainder of the path is the page key.
pub const CONTENT_PREFIX: &str = "/markdown";

/// Name the menu template is registered under.
const MENU_TEMPLATE: &str = "menu.html";

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Directory containing the documentation root.
    pub project_dir: PathBuf,
    /// Documentation root, relative to `project_dir`.
    pub docs_root: PathBuf,
    /// Designated index page, relative to `project_dir`.
    pub docs_index: PathBuf,
    /// Remote registry origin (scheme and authority).
    pub origin: String,
    /// Path of the preview shell on the origin.
    pub shell_path: String,
    /// Provider name annotated on served pages.
    pub provider_name: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_owned(),
            port: 8080,
            project_dir: PathBuf::from("."),
            docs_root: PathBuf::from("docs"),
            docs_index: PathBuf::from("docs/index.md"),
            origin: "https://registry.terraform.io".to_owned(),
            shell_path: "/tools/doc-preview".to_owned(),
            provider_name: String::new(),
        }
    }
}

impl ServerConfig {
    /// Local URL of the preview page once the server is listening.
    #[must_use]
    pub fn preview_url(&self) -> String {
        format!("http://{}:{}{}", self.host, self.port, self.shell_path)
    }
}

/// Build the application router for `config`.
///
/// # Errors
///
/// Returns an error if the HTTP clients or the menu template cannot be set up.
///
/// # Panics
///
/// Panics if `config.shell_path` is not a valid route or collides with the
/// `/markdown` endpoints (`tfdocs_config` validation rules both out).
pub fn create_app(config: &ServerConfig) -> Result<Router, ServerError> {
    let state = Arc::new(AppState::new(config)?);
    Ok(app::create_router(state, &config.shell_path))
}

/// Run the server until Ctrl-C.
///
/// # Arguments
///
/// * `config` - Server configuration
///
/// # Errors
///
/// Returns an error if the server fails to start.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_app(&config)?;

    let addr: SocketAddr = lookup_host((config.host.as_str(), config.port))
        .await?
        .next()
        .ok_or_else(|| format!("cannot resolve listen address {}", config.host))?;

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(
        address = %addr,
        origin = %config.origin,
        docs = %config.project_dir.join(&config.docs_root).display(),
        "Starting preview server"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from tfdocs config.
#[must_use]
pub fn server_config_from_config(config: &tfdocs_config::Config) -> ServerConfig {
    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        project_dir: config.docs_resolved.project_dir.clone(),
        docs_root: config.docs_resolved.root.clone(),
        docs_index: config.docs_resolved.index.clone(),
        origin: config.preview.origin.clone(),
        shell_path: config.preview.shell_path.clone(),
        provider_name: config.provider_name(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_url() {
        let config = ServerConfig::default();
        assert_eq!(
            config.preview_url(),
            "http://localhost:8080/tools/doc-preview"
        );
    }

    #[test]
    fn test_server_config_from_config() {
        let mut config = tfdocs_config::Config::default();
        config.preview.provider_name = Some("terraform-provider-acme".to_owned());

        let server = server_config_from_config(&config);

        assert_eq!(server.port, 8080);
        assert_eq!(server.docs_root, PathBuf::from("docs"));
        assert_eq!(server.docs_index, PathBuf::from("docs/index.md"));
        assert_eq!(server.shell_path, "/tools/doc-preview");
        assert_eq!(server.provider_name, "terraform-provider-acme");
    }
}
