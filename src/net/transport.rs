//! HTTP transport seam under [`ApiClient`](super::client::ApiClient).
//!
//! Client-side (csr): real HTTP calls via `gloo-net`, raced against a
//! `gloo-timers` timeout. Native builds get an inert transport that reports
//! every request as a network failure, since these calls are only meaningful
//! in the browser.

use std::time::Duration;

use async_trait::async_trait;

/// HTTP methods used by the API surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

/// A fully resolved outbound request.
#[derive(Clone, Debug, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    /// Absolute URL without the query string.
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
    pub timeout: Duration,
}

impl HttpRequest {
    /// Value of the first header named `name` (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Raw response: status plus undecoded body text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The request never produced a response.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("timeout of {}ms exceeded", .0.as_millis())]
    Timeout(Duration),
    #[error("{0}")]
    Network(String),
}

/// Sends [`HttpRequest`]s. Futures are `!Send`: everything runs on the
/// browser event loop.
#[async_trait(?Send)]
pub trait Transport {
    /// Perform `request`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when no HTTP response was received.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// `fetch`-based transport backed by `gloo-net`.
#[derive(Clone, Copy, Debug, Default)]
pub struct GlooTransport;

#[cfg(feature = "csr")]
async fn gloo_send(request: HttpRequest) -> Result<HttpResponse, TransportError> {
    use gloo_net::http::Request;

    let builder = match request.method {
        Method::Get => Request::get(&request.url),
        Method::Post => Request::post(&request.url),
        Method::Put => Request::put(&request.url),
        Method::Patch => Request::patch(&request.url),
        Method::Delete => Request::delete(&request.url),
    };
    let mut builder = builder.query(request.query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    for (name, value) in &request.headers {
        builder = builder.header(name, value);
    }
    let prepared = match &request.body {
        Some(body) => builder.json(body),
        None => builder.build(),
    }
    .map_err(|e| TransportError::Network(e.to_string()))?;

    let resp = prepared
        .send()
        .await
        .map_err(|e| TransportError::Network(e.to_string()))?;
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    Ok(HttpResponse { status, body })
}

#[async_trait(?Send)]
impl Transport for GlooTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        #[cfg(feature = "csr")]
        {
            use futures::future::{Either, select};

            let timeout = request.timeout;
            let millis = u32::try_from(timeout.as_millis()).unwrap_or(u32::MAX);
            let send = Box::pin(gloo_send(request));
            let timer = Box::pin(gloo_timers::future::TimeoutFuture::new(millis));
            match select(send, timer).await {
                Either::Left((result, _)) => result,
                Either::Right(((), _)) => Err(TransportError::Timeout(timeout)),
            }
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = request;
            Err(TransportError::Network("not available outside the browser".to_owned()))
        }
    }
}
