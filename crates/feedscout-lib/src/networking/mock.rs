use std::collections::HashMap;
use std::sync::Mutex;

use super::{HttpClient, HttpResponse, NetworkingError};
use crate::primitives::AuthHeader;

/// Canned-response HTTP client (testing)
///
/// Unknown URLs answer 404. Every request is recorded so tests can assert
/// call counts and the auth header that was sent.
#[derive(Default)]
pub struct MockHttpClient {
    responses: HashMap<String, Result<HttpResponse, String>>,
    requests: Mutex<Vec<(String, Option<AuthHeader>)>>,
}

impl MockHttpClient {
    /// Create new mock client
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `url` with `status` and `body`
    pub fn with_response(mut self, url: &str, status: u16, body: impl Into<Vec<u8>>) -> Self {
        self.responses.insert(
            url.to_string(),
            Ok(HttpResponse {
                status,
                body: body.into(),
            }),
        );
        self
    }

    /// Fail requests to `url` at the transport level
    pub fn with_transport_error(mut self, url: &str, message: &str) -> Self {
        self.responses
            .insert(url.to_string(), Err(message.to_string()));
        self
    }

    /// URLs requested so far, in order
    pub fn requested_urls(&self) -> Vec<String> {
        self.requests
            .lock()
            .map(|log| log.iter().map(|(url, _)| url.clone()).collect())
            .unwrap_or_default()
    }

    /// Number of requests made to `url`
    pub fn request_count(&self, url: &str) -> usize {
        self.requested_urls().iter().filter(|u| *u == url).count()
    }

    /// Auth header sent with the most recent request to `url`
    pub fn last_auth_for(&self, url: &str) -> Option<AuthHeader> {
        self.requests.lock().ok().and_then(|log| {
            log.iter()
                .rev()
                .find(|(u, _)| u == url)
                .and_then(|(_, auth)| auth.clone())
        })
    }
}

impl HttpClient for MockHttpClient {
    async fn get(
        &self,
        url: &str,
        auth: Option<&AuthHeader>,
    ) -> Result<HttpResponse, NetworkingError> {
        if let Ok(mut log) = self.requests.lock() {
            log.push((url.to_string(), auth.cloned()));
        }

        match self.responses.get(url) {
            Some(Ok(response)) => Ok(response.clone()),
            Some(Err(message)) => Err(NetworkingError::Transport {
                message: message.clone(),
            }),
            None => Ok(HttpResponse {
                status: 404,
                body: Vec::new(),
            }),
        }
    }
}
