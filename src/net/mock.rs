//! Scripted in-process transport for unit tests.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use async_trait::async_trait;
use futures::channel::oneshot;

use super::client::ApiClient;
use super::transport::{HttpRequest, HttpResponse, Method, Transport, TransportError};
use crate::config::AppConfig;
use crate::util::storage::{MemoryStorage, PersistentStore};

pub(crate) const BASE_URL: &str = "http://api.test";

type Reply = Result<HttpResponse, TransportError>;

/// Replies are matched on method plus path (URL minus [`BASE_URL`]).
/// Queued replies are consumed first; a sticky reply answers every call after.
#[derive(Clone, Default)]
pub(crate) struct MockTransport {
    queued: Rc<RefCell<HashMap<(Method, String), VecDeque<Reply>>>>,
    sticky: Rc<RefCell<HashMap<(Method, String), Reply>>>,
    deferred: Rc<RefCell<HashMap<(Method, String), VecDeque<oneshot::Receiver<Reply>>>>>,
    requests: Rc<RefCell<Vec<HttpRequest>>>,
}

impl MockTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Answer every `method path` call with `status` and JSON `body`.
    pub(crate) fn respond(&self, method: Method, path: &str, status: u16, body: serde_json::Value) {
        let reply = Ok(HttpResponse { status, body: body.to_string() });
        self.sticky.borrow_mut().insert((method, path.to_owned()), reply);
    }

    /// Answer the next `method path` call only.
    pub(crate) fn respond_once(&self, method: Method, path: &str, status: u16, body: serde_json::Value) {
        let reply = Ok(HttpResponse { status, body: body.to_string() });
        self.queued.borrow_mut().entry((method, path.to_owned())).or_default().push_back(reply);
    }

    /// Fail every `method path` call at the transport level.
    pub(crate) fn fail(&self, method: Method, path: &str, err: TransportError) {
        self.sticky.borrow_mut().insert((method, path.to_owned()), Err(err));
    }

    /// Hold the next `method path` call open until the returned sender
    /// supplies its reply. A dropped sender answers with a network error.
    pub(crate) fn defer(&self, method: Method, path: &str) -> oneshot::Sender<Reply> {
        let (tx, rx) = oneshot::channel();
        self.deferred.borrow_mut().entry((method, path.to_owned())).or_default().push_back(rx);
        tx
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }

    pub(crate) fn count(&self, method: Method, path: &str) -> usize {
        let url = format!("{BASE_URL}{path}");
        self.requests.borrow().iter().filter(|r| r.method == method && r.url == url).count()
    }
}

#[async_trait(?Send)]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let path = request.url.strip_prefix(BASE_URL).unwrap_or(&request.url).to_owned();
        let key = (request.method, path.clone());
        self.requests.borrow_mut().push(request);

        let deferred = self.deferred.borrow_mut().get_mut(&key).and_then(VecDeque::pop_front);
        if let Some(pending) = deferred {
            return pending.await.unwrap_or_else(|_| Err(TransportError::Network("reply dropped".to_owned())));
        }
        let queued = self.queued.borrow_mut().get_mut(&key).and_then(VecDeque::pop_front);
        if let Some(reply) = queued {
            return reply;
        }
        if let Some(reply) = self.sticky.borrow().get(&key) {
            return reply.clone();
        }
        Ok(HttpResponse { status: 404, body: format!("{{\"detail\":\"no mock for {} {path}\"}}", key.0.as_str()) })
    }
}

/// A client over `transport` with fresh in-memory storage.
pub(crate) fn client_with(transport: &MockTransport) -> (ApiClient, MemoryStorage) {
    let backend = MemoryStorage::new();
    let store = PersistentStore::new(Rc::new(backend.clone()));
    let config = AppConfig { api_url: BASE_URL.to_owned(), ..AppConfig::default() };
    (ApiClient::new(&config, store, Rc::new(transport.clone())), backend)
}
