//! Scriptable in-process network.
//!
//! Routes are keyed by absolute URL string. Unrouted URLs answer `404`.
//! Every call is counted and recorded so tests can assert exactly how
//! many round-trips a strategy made.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{Network, NetworkError};
use crate::http::{Request, Response};

/// In-process [`Network`] with failure injection.
#[derive(Debug, Default)]
pub struct MockNetwork {
    routes: Mutex<HashMap<String, Result<Response, NetworkError>>>,
    offline: AtomicBool,
    calls: AtomicUsize,
    requests: Mutex<Vec<Request>>,
}

impl MockNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// A network where every fetch fails to connect.
    pub fn offline() -> Self {
        let network = Self::default();
        network.offline.store(true, Ordering::SeqCst);
        network
    }

    /// Route `url` to a fixed response.
    pub fn with_response(mut self, url: &str, response: Response) -> Self {
        self.routes.get_mut().insert(url.to_string(), Ok(response));
        self
    }

    /// Route `url` to a `200` with the given body.
    pub fn with_body(self, url: &str, body: &'static str) -> Self {
        self.with_response(url, Response::new(200, vec![], body))
    }

    /// Route `url` to a network failure.
    pub fn with_failure(mut self, url: &str, error: NetworkError) -> Self {
        self.routes.get_mut().insert(url.to_string(), Err(error));
        self
    }

    /// Replace the route for `url` after construction.
    pub async fn set_response(&self, url: &str, response: Response) {
        self.routes.lock().await.insert(url.to_string(), Ok(response));
    }

    /// Toggle the global offline switch.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of fetches issued so far, including failed ones.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Requests seen so far, in call order.
    pub async fn requests(&self) -> Vec<Request> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl Network for MockNetwork {
    async fn fetch(&self, request: &Request) -> Result<Response, NetworkError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().await.push(request.clone());

        if self.offline.load(Ordering::SeqCst) {
            return Err(NetworkError::Connect(format!("offline: {}", request.url)));
        }

        match self.routes.lock().await.get(request.url.as_str()) {
            Some(route) => route.clone(),
            None => Ok(Response::new(404, vec![], "Not Found")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn get(url: &str) -> Request {
        Request::get(Url::parse(url).unwrap())
    }

    #[tokio::test]
    async fn test_routed_and_unrouted() {
        let network = MockNetwork::new().with_body("https://example.com/", "<html>");

        let hit = network.fetch(&get("https://example.com/")).await.unwrap();
        assert_eq!(hit.status, 200);
        assert_eq!(hit.body_text(), "<html>");

        let miss = network.fetch(&get("https://example.com/nope")).await.unwrap();
        assert_eq!(miss.status, 404);
        assert_eq!(network.calls(), 2);
    }

    #[tokio::test]
    async fn test_offline_counts_calls() {
        let network = MockNetwork::offline().with_body("https://example.com/", "<html>");
        let result = network.fetch(&get("https://example.com/")).await;
        assert!(matches!(result, Err(NetworkError::Connect(_))));
        assert_eq!(network.calls(), 1);

        network.set_offline(false);
        assert!(network.fetch(&get("https://example.com/")).await.is_ok());
        assert_eq!(network.requests().await.len(), 2);
    }

    #[tokio::test]
    async fn test_failure_route() {
        let network = MockNetwork::new().with_failure("https://example.com/slow", NetworkError::Timeout);
        let result = network.fetch(&get("https://example.com/slow")).await;
        assert_eq!(result, Err(NetworkError::Timeout));
    }
}
