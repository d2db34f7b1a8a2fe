//! Upstream relay for provider token requests
//!
//! Forwards an inbound request to the provider's token endpoint and captures
//! the complete response so it can be inspected and then relayed unchanged.

use crate::config::UpstreamConfig;
use crate::constants::HOP_BY_HOP_HEADERS;
use crate::error::NetworkError;
use crate::{AdapterError, Result};
use axum::{
    body::{Body, Bytes},
    extract::Request,
    http::{HeaderMap, HeaderValue, Method, StatusCode, header},
    response::{IntoResponse, Response},
};
use reqwest::{Client, redirect::Policy};
use url::Url;

/// Outbound HTTP client shared by every provider
#[derive(Clone)]
pub struct UpstreamClient {
    client: Client,
}

impl UpstreamClient {
    /// Create the client
    ///
    /// Redirects are not followed; a 3xx from the provider is relayed to the
    /// caller like any other status.
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let client = reqwest::ClientBuilder::new()
            .redirect(Policy::none())
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .build()
            .map_err(|e| AdapterError::network(format!("Failed to build upstream HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Forward `req` to `target` and read the whole response
    ///
    /// The method is reused. Methods without body semantics are sent without
    /// a body; for all others the inbound body is streamed through without
    /// buffering. Response headers are available as soon as the provider
    /// sends them, the body is then read fully because it has to be parsed.
    ///
    /// Dropping the returned future (e.g. because the caller disconnected)
    /// cancels the upstream call.
    pub async fn forward(&self, target: &Url, req: Request) -> Result<UpstreamResponse> {
        let (parts, body) = req.into_parts();
        let with_body = method_has_body(&parts.method);

        let headers = outbound_headers(&parts.headers, target, with_body)?;
        let mut request = self
            .client
            .request(parts.method.clone(), target.clone())
            .headers(headers);

        if with_body {
            request = request.body(reqwest::Body::wrap_stream(body.into_data_stream()));
        }

        let response = request.send().await.map_err(|e| {
            AdapterError::Network(NetworkError::Http(format!(
                "{} {} failed: {}",
                parts.method, target, e
            )))
        })?;

        let status = response.status();
        let headers = response.headers().clone();

        let body = response.bytes().await.map_err(|e| {
            AdapterError::Network(NetworkError::Http(format!(
                "reading response body from {} failed: {}",
                target, e
            )))
        })?;

        Ok(UpstreamResponse {
            status,
            headers,
            body,
        })
    }
}

/// A fully read upstream response
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl IntoResponse for UpstreamResponse {
    /// Relay status, headers and the exact body bytes
    ///
    /// `transfer-encoding` is dropped because the body goes out as one
    /// fixed-length buffer.
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response.headers_mut().remove(header::TRANSFER_ENCODING);
        response
    }
}

/// Whether the inbound body is forwarded for this method
///
/// GET, HEAD, DELETE and TRACE carry no defined body semantics.
pub fn method_has_body(method: &Method) -> bool {
    !matches!(
        *method,
        Method::GET | Method::HEAD | Method::DELETE | Method::TRACE
    )
}

/// Headers for the outbound request
///
/// Every inbound header is copied as-is except `host`, the hop-by-hop set,
/// `accept-encoding`, and `content-length` when no body is forwarded. `host`
/// is set to the target's host (with its port when the URL carries one).
///
/// The client does not decompress, so the provider must answer in identity
/// encoding for the token body to be readable.
pub fn outbound_headers(inbound: &HeaderMap, target: &Url, with_body: bool) -> Result<HeaderMap> {
    let mut headers = HeaderMap::with_capacity(inbound.len() + 1);

    for (name, value) in inbound {
        if name == header::HOST
            || name == header::ACCEPT_ENCODING
            || HOP_BY_HOP_HEADERS.contains(&name.as_str())
            || (!with_body && name == header::CONTENT_LENGTH)
        {
            continue;
        }
        headers.append(name.clone(), value.clone());
    }

    let host = target
        .host_str()
        .ok_or_else(|| NetworkError::InvalidUrl(format!("{} has no host", target)))?;
    let host = match target.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    };
    let host = HeaderValue::from_str(&host)
        .map_err(|e| NetworkError::InvalidUrl(format!("invalid host {}: {}", host, e)))?;
    headers.insert(header::HOST, host);

    Ok(headers)
}

#[cfg(test)]
#[path = "proxy_test.rs"]
mod proxy_test;
