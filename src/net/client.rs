//! The application's single HTTP client.
//!
//! DESIGN
//! ======
//! Every REST call goes through [`ApiClient::send`], which is the only place
//! that attaches the bearer token, applies the timeout, normalizes failures
//! into [`ApiError`], and tears the session down on a 401.
//!
//! ERROR HANDLING
//! ==============
//! A 401 on a session-bound request removes the stored token and user and
//! notifies unauthorized listeners before the error is returned, so a caller
//! that catches the error already sees a logged-out session. Requests marked
//! [`ApiRequest::public`] skip the teardown.

#[cfg(test)]
#[path = "client_test.rs"]
mod client_test;

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::transport::{HttpRequest, HttpResponse, Method, Transport, TransportError};
use crate::config::AppConfig;
use crate::util::storage::{PersistentStore, TOKEN_KEY, USER_KEY};

pub const CODE_NETWORK: &str = "NETWORK_ERROR";
pub const CODE_TIMEOUT: &str = "TIMEOUT";
pub const CODE_UNAUTHORIZED: &str = "UNAUTHORIZED";
pub const CODE_DECODE: &str = "DECODE_ERROR";
pub const CODE_INVALID_REQUEST: &str = "INVALID_REQUEST";

/// Uniform error shape for every failed API call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    pub message: String,
    pub code: Option<String>,
    pub status: Option<u16>,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into(), code: None, status: None }
    }

    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// A request rejected locally before reaching the network.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(message).with_code(CODE_INVALID_REQUEST)
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status == Some(401)
    }
}

impl From<TransportError> for ApiError {
    fn from(err: TransportError) -> Self {
        let code = match err {
            TransportError::Timeout(_) => CODE_TIMEOUT,
            TransportError::Network(_) => CODE_NETWORK,
        };
        Self::new(err.to_string()).with_code(code)
    }
}

/// Build an [`ApiError`] from a non-2xx response, preferring the server's
/// own message.
pub fn normalize_error_response(status: u16, body: &str) -> ApiError {
    let parsed = serde_json::from_str::<serde_json::Value>(body).ok();
    let message = parsed
        .as_ref()
        .and_then(server_message)
        .unwrap_or_else(|| format!("Request failed with status code {status}"));
    let code = parsed
        .as_ref()
        .and_then(|v| v.get("code"))
        .and_then(|c| match c {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .or_else(|| (status == 401).then(|| CODE_UNAUTHORIZED.to_owned()));
    ApiError { message, code, status: Some(status) }
}

fn server_message(body: &serde_json::Value) -> Option<String> {
    for key in ["message", "detail", "error"] {
        if let Some(text) = body.get(key).and_then(serde_json::Value::as_str) {
            if !text.is_empty() {
                return Some(text.to_owned());
            }
        }
    }
    // DRF-style field errors: {"email": ["already taken"]}.
    let object = body.as_object()?;
    object.iter().find_map(|(field, value)| {
        let first = match value {
            serde_json::Value::Array(items) => items.first()?.as_str()?,
            serde_json::Value::String(s) => s.as_str(),
            _ => return None,
        };
        Some(format!("{field}: {first}"))
    })
}

/// Relative request description, resolved against the client's base URL.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
    /// A 401 on a public request does not end the session.
    pub public: bool,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self { method, path: path.into(), query: Vec::new(), body: None, public: false }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Attach a JSON body.
    ///
    /// # Errors
    ///
    /// Returns an error if `body` cannot be represented as JSON.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body)
            .map_err(|e| ApiError::invalid_request(format!("cannot encode request body: {e}")))?;
        self.body = Some(value);
        Ok(self)
    }

    #[must_use]
    pub fn public(mut self) -> Self {
        self.public = true;
        self
    }
}

type UnauthorizedListener = Rc<dyn Fn()>;

struct ApiClientInner {
    base_url: String,
    timeout: Duration,
    transport: Rc<dyn Transport>,
    store: PersistentStore,
    on_unauthorized: RefCell<Vec<UnauthorizedListener>>,
}

/// Shared HTTP client. Clones share configuration, transport, and listeners.
#[derive(Clone)]
pub struct ApiClient {
    inner: Rc<ApiClientInner>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url)
            .field("timeout", &self.inner.timeout)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(config: &AppConfig, store: PersistentStore, transport: Rc<dyn Transport>) -> Self {
        Self {
            inner: Rc::new(ApiClientInner {
                base_url: config.api_url.trim_end_matches('/').to_owned(),
                timeout: config.request_timeout,
                transport,
                store,
                on_unauthorized: RefCell::new(Vec::new()),
            }),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    #[must_use]
    pub fn store(&self) -> &PersistentStore {
        &self.inner.store
    }

    /// Register a callback run after a 401 has cleared the stored session.
    pub fn on_unauthorized(&self, listener: impl Fn() + 'static) {
        self.inner.on_unauthorized.borrow_mut().push(Rc::new(listener));
    }

    /// Absolute URL for `path`.
    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.inner.base_url)
        } else {
            format!("{}/{path}", self.inner.base_url)
        }
    }

    fn prepare(&self, request: ApiRequest) -> HttpRequest {
        let mut headers = vec![("Accept".to_owned(), "application/json".to_owned())];
        let token = self.inner.store.get_opt::<String>(TOKEN_KEY).filter(|t| !t.is_empty());
        if let Some(token) = token {
            headers.push(("Authorization".to_owned(), format!("Bearer {token}")));
        }
        HttpRequest {
            method: request.method,
            url: self.url_for(&request.path),
            query: request.query,
            headers,
            body: request.body,
            timeout: self.inner.timeout,
        }
    }

    fn end_session(&self) {
        log::warn!("api: 401 received, clearing stored session");
        self.inner.store.remove(TOKEN_KEY);
        self.inner.store.remove(USER_KEY);
        // Listeners may register further listeners; iterate a snapshot.
        let listeners = self.inner.on_unauthorized.borrow().clone();
        for listener in listeners {
            listener();
        }
    }

    /// Send `request` and return the raw successful response.
    ///
    /// # Errors
    ///
    /// Returns a normalized [`ApiError`] for transport failures and non-2xx
    /// responses.
    pub async fn send(&self, request: ApiRequest) -> Result<HttpResponse, ApiError> {
        let public = request.public;
        let method = request.method;
        let path = request.path.clone();
        let prepared = self.prepare(request);

        let resp = match self.inner.transport.send(prepared).await {
            Ok(resp) => resp,
            Err(e) => {
                log::warn!("api: {} {path} failed: {e}", method.as_str());
                return Err(e.into());
            }
        };
        if resp.is_success() {
            return Ok(resp);
        }

        let err = normalize_error_response(resp.status, &resp.body);
        if resp.status == 401 && !public {
            self.end_session();
        }
        log::debug!("api: {} {path} -> {}: {}", method.as_str(), resp.status, err.message);
        Err(err)
    }

    /// Send `request` and decode a JSON response body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on failure or when the body does not decode as `T`.
    pub async fn send_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        let resp = self.send(request).await?;
        serde_json::from_str(&resp.body).map_err(|e| {
            ApiError::new(format!("unexpected response body: {e}"))
                .with_code(CODE_DECODE)
                .with_status(resp.status)
        })
    }

    /// Send `request`, ignoring any response body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on failure.
    pub async fn send_empty(&self, request: ApiRequest) -> Result<(), ApiError> {
        self.send(request).await.map(|_| ())
    }
}
