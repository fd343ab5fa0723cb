//! Scripted in-memory [`Transport`].
//!
//! Replies are registered per `(method, url)`. Registering several replies
//! for the same route queues them; the last one then repeats. Unscripted
//! routes answer `404` with an empty body. Every request is recorded so
//! tests can assert what was, and was not, sent.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use serde_json::Value;

use super::{HttpRequest, Method, RawResponse, Transport};
use crate::error::Error;

#[derive(Debug, Clone)]
enum Reply {
    Respond(RawResponse),
    Refuse,
}

#[derive(Debug)]
struct Route {
    method: Method,
    url: String,
    replies: VecDeque<Reply>,
}

#[derive(Debug, Default)]
struct Inner {
    routes: Vec<Route>,
    requests: Vec<HttpRequest>,
}

/// Thread-safe, scripted implementation of [`Transport`].
#[derive(Debug, Default)]
pub struct MockTransport {
    inner: Mutex<Inner>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a raw reply for `method url`.
    pub fn respond(&self, method: Method, url: &str, status: u16, body: impl Into<String>) -> &Self {
        self.push(method, url, Reply::Respond(RawResponse::new(status, body)))
    }

    /// Queue a JSON reply for `method url`.
    pub fn respond_json(&self, method: Method, url: &str, status: u16, body: &Value) -> &Self {
        self.respond(method, url, status, body.to_string())
    }

    /// Make `method url` fail as if the connection was refused.
    pub fn refuse(&self, method: Method, url: &str) -> &Self {
        self.push(method, url, Reply::Refuse)
    }

    /// Every request seen so far, in order.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.lock().requests.clone()
    }

    /// How many times `method url` was requested.
    pub fn count(&self, method: &Method, url: &str) -> usize {
        self.lock()
            .requests
            .iter()
            .filter(|r| r.method == *method && r.url == url)
            .count()
    }

    fn push(&self, method: Method, url: &str, reply: Reply) -> &Self {
        let mut guard = self.lock();
        let inner = &mut *guard;
        match inner
            .routes
            .iter_mut()
            .find(|r| r.method == method && r.url == url)
        {
            Some(route) => route.replies.push_back(reply),
            None => inner.routes.push(Route {
                method,
                url: url.to_string(),
                replies: VecDeque::from([reply]),
            }),
        }
        drop(guard);
        self
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Transport for MockTransport {
    fn send(&self, request: &HttpRequest) -> Result<RawResponse, Error> {
        let mut inner = self.lock();
        inner.requests.push(request.clone());

        let reply = inner
            .routes
            .iter_mut()
            .find(|r| r.method == request.method && r.url == request.url)
            .and_then(|route| {
                if route.replies.len() > 1 {
                    route.replies.pop_front()
                } else {
                    route.replies.front().cloned()
                }
            });

        match reply {
            Some(Reply::Respond(raw)) => Ok(raw),
            Some(Reply::Refuse) => Err(Error::Connection {
                url: request.url.clone(),
                source: "connection refused".into(),
            }),
            None => Ok(RawResponse::new(404, "")),
        }
    }
}
