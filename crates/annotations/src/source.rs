//! Where annotation pages come from.
//!
//! - `HttpAnnotationSource`: the live annotations API over reqwest (native
//!   targets only; the browser front end brings its own `fetch` source)
//! - `MemoryAnnotationSource`: a canned page, for tests and offline runs
//!
//! Futures are not `Send`: everything runs on the UI/event-loop thread.

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

use crate::model::AnnotationPage;
use crate::query::ViewportQuery;
#[cfg(not(target_arch = "wasm32"))]
use crate::query::DEFAULT_ENDPOINT;

/// Network or decoding failure of a single fetch. Never retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    Network(String),
    Status(u16),
    Decode(String),
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Network(msg) => write!(f, "annotation request failed: {msg}"),
            FetchError::Status(code) => write!(f, "annotation request returned HTTP {code}"),
            FetchError::Decode(msg) => write!(f, "annotation response could not be decoded: {msg}"),
        }
    }
}

impl std::error::Error for FetchError {}

pub type LocalBoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

pub trait AnnotationSource {
    /// Issue exactly one request for `query`.
    fn fetch_page<'a>(
        &'a self,
        query: &'a ViewportQuery,
    ) -> LocalBoxFuture<'a, Result<AnnotationPage, FetchError>>;
}

pub fn decode_page(bytes: &[u8]) -> Result<AnnotationPage, FetchError> {
    serde_json::from_slice(bytes).map_err(|e| FetchError::Decode(e.to_string()))
}

#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct HttpAnnotationSource {
    endpoint: String,
    client: reqwest::Client,
}

#[cfg(not(target_arch = "wasm32"))]
impl HttpAnnotationSource {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: reqwest::Client::new(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Default for HttpAnnotationSource {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT)
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl AnnotationSource for HttpAnnotationSource {
    fn fetch_page<'a>(
        &'a self,
        query: &'a ViewportQuery,
    ) -> LocalBoxFuture<'a, Result<AnnotationPage, FetchError>> {
        let url = query.url(&self.endpoint);
        Box::pin(async move {
            tracing::debug!(%url, "requesting annotations");
            let resp = self
                .client
                .get(&url)
                .send()
                .await
                .map_err(|e| FetchError::Network(e.to_string()))?;

            if !resp.status().is_success() {
                return Err(FetchError::Status(resp.status().as_u16()));
            }

            let bytes = resp
                .bytes()
                .await
                .map_err(|e| FetchError::Network(e.to_string()))?;
            decode_page(&bytes)
        })
    }
}

#[derive(Debug)]
struct MemoryInner {
    response: RefCell<Result<AnnotationPage, FetchError>>,
    calls: Cell<usize>,
    queries: RefCell<Vec<ViewportQuery>>,
}

/// In-memory source that answers every query with the same page.
///
/// Clones share state, so a test can keep one handle and inspect calls made
/// through another.
#[derive(Debug, Clone)]
pub struct MemoryAnnotationSource {
    inner: Rc<MemoryInner>,
}

impl MemoryAnnotationSource {
    pub fn new(page: AnnotationPage) -> Self {
        Self::with_response(Ok(page))
    }

    pub fn failing(err: FetchError) -> Self {
        Self::with_response(Err(err))
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self, FetchError> {
        decode_page(bytes).map(Self::new)
    }

    fn with_response(response: Result<AnnotationPage, FetchError>) -> Self {
        Self {
            inner: Rc::new(MemoryInner {
                response: RefCell::new(response),
                calls: Cell::new(0),
                queries: RefCell::new(Vec::new()),
            }),
        }
    }

    pub fn set_response(&self, response: Result<AnnotationPage, FetchError>) {
        *self.inner.response.borrow_mut() = response;
    }

    pub fn calls(&self) -> usize {
        self.inner.calls.get()
    }

    pub fn queries(&self) -> Vec<ViewportQuery> {
        self.inner.queries.borrow().clone()
    }
}

impl Default for MemoryAnnotationSource {
    fn default() -> Self {
        Self::new(AnnotationPage::default())
    }
}

impl AnnotationSource for MemoryAnnotationSource {
    fn fetch_page<'a>(
        &'a self,
        query: &'a ViewportQuery,
    ) -> LocalBoxFuture<'a, Result<AnnotationPage, FetchError>> {
        self.inner.calls.set(self.inner.calls.get() + 1);
        self.inner.queries.borrow_mut().push(query.clone());
        let response = self.inner.response.borrow().clone();
        Box::pin(async move { response })
    }
}
