use annotations::{
    AnnotationPage, AnnotationSource, DEFAULT_ENDPOINT, FetchError, LocalBoxFuture, ViewportQuery,
    decode_page,
};
use gloo_net::http::Request;

/// Annotations API over the browser's `fetch`.
#[derive(Debug, Clone)]
pub struct BrowserAnnotationSource {
    endpoint: String,
}

impl BrowserAnnotationSource {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }
}

impl Default for BrowserAnnotationSource {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT)
    }
}

impl AnnotationSource for BrowserAnnotationSource {
    fn fetch_page<'a>(
        &'a self,
        query: &'a ViewportQuery,
    ) -> LocalBoxFuture<'a, Result<AnnotationPage, FetchError>> {
        Box::pin(async move {
            let resp = Request::get(&query.url(&self.endpoint))
                .send()
                .await
                .map_err(|e| FetchError::Network(e.to_string()))?;
            if !resp.ok() {
                return Err(FetchError::Status(resp.status()));
            }
            let bytes = resp
                .binary()
                .await
                .map_err(|e| FetchError::Network(e.to_string()))?;
            decode_page(&bytes)
        })
    }
}
