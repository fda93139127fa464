//! Reverse proxy to the remote registry origin.
//!
//! Any request the router does not handle itself is forwarded with its
//! method, path, query, headers and body; only the target authority changes.
//! The upstream response streams back chunk by chunk with its status and
//! headers intact. Dropping the response (client disconnect) drops the
//! upstream stream with it.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{HeaderMap, HeaderName, header};
use axum::response::Response;

use crate::error::ServerError;
use crate::state::AppState;

/// Largest inbound request body forwarded upstream.
const MAX_REQUEST_BODY: usize = 16 * 1024 * 1024;

/// Connection-scoped headers that must not be relayed in either direction.
const HOP_BY_HOP: [&str; 8] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// Forward a request to the remote origin and stream the response back.
pub(crate) async fn forward(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Response, ServerError> {
    let (parts, body) = request.into_parts();
    let path_and_query = parts
        .uri
        .path_and_query()
        .map_or("/", axum::http::uri::PathAndQuery::as_str);
    let url = format!("{}{path_and_query}", state.origin);

    let mut headers = parts.headers;
    strip_hop_by_hop(&mut headers);
    // reqwest derives Host from the target URL.
    headers.remove(header::HOST);

    let body = axum::body::to_bytes(body, MAX_REQUEST_BODY).await?;

    tracing::debug!(method = %parts.method, url = %url, "Proxying request");

    let mut outbound = state
        .proxy_http
        .request(parts.method, &url)
        .headers(headers);
    if !body.is_empty() {
        outbound = outbound.body(body);
    }

    let upstream = outbound
        .send()
        .await
        .map_err(|source| ServerError::Proxy {
            url: url.clone(),
            source,
        })?;

    let status = upstream.status();
    let mut response_headers = upstream.headers().clone();
    strip_hop_by_hop(&mut response_headers);

    let mut response = Response::new(Body::from_stream(upstream.bytes_stream()));
    *response.status_mut() = status;
    *response.headers_mut() = response_headers;

    Ok(response)
}

/// Remove hop-by-hop headers, including any named by `Connection`.
fn strip_hop_by_hop(headers: &mut HeaderMap) {
    let listed: Vec<HeaderName> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .filter_map(|name| HeaderName::from_bytes(name.trim().as_bytes()).ok())
        .collect();

    for name in &listed {
        headers.remove(name);
    }
    for name in HOP_BY_HOP {
        headers.remove(name);
    }
}
