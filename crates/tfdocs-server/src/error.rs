//! Error types for the HTTP server.

use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use tfdocs_site::SiteError;

/// Server error type.
///
/// Every variant becomes an HTTP 500 whose plain-text body is the error
/// message. Errors raised after a response body has started streaming cannot
/// be reported this way; the stream is simply cut short.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Page read or menu build failure.
    #[error(transparent)]
    Site(#[from] SiteError),

    /// Preview shell fetch or parse failure.
    #[error("failed to load preview shell: {0}")]
    Upstream(String),

    /// Menu template rendering failure.
    #[error("failed to render menu: {0}")]
    Template(#[from] minijinja::Error),

    /// Page serialization failure.
    #[error("failed to encode page: {0}")]
    Json(#[from] serde_json::Error),

    /// Remote origin unreachable for a proxied request.
    #[error("proxy request to {url} failed: {source}")]
    Proxy {
        /// Upstream URL.
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Inbound request body could not be read for forwarding.
    #[error("failed to read request body: {0}")]
    RequestBody(#[from] axum::Error),

    /// HTTP client construction failure.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    /// Blocking filesystem task panicked or was cancelled.
    #[error("background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        tracing::error!(error = %message, "Request failed");

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            message,
        )
            .into_response()
    }
}
