//! Shared fixtures for pipeline integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use mockito::{Mock, Server, ServerGuard};
use serde_json::json;
use wsdot_client::transport::{RuntimeSignals, TransportFailure, TransportKind, TransportStrategy};
use wsdot_client::{ApiFamily, Endpoint, LogMode, WsdotClient};

pub const ACCESS_CODE: &str = "TEST-KEY";

/// Mock WSDOT origin.
pub struct MockServerFixture {
    pub server: ServerGuard,
    pub base_url: String,
}

impl MockServerFixture {
    pub async fn new() -> Self {
        let server = Server::new_async().await;
        let base_url = server.url();
        Self { server, base_url }
    }

    /// Client routed to the mock server over the direct transport.
    pub fn client(&self) -> WsdotClient {
        WsdotClient::builder()
            .access_code(ACCESS_CODE)
            .base_url_override(&self.base_url)
            .runtime_signals(RuntimeSignals::server())
            .log_mode(LogMode::Silent)
            .build()
            .expect("client configuration")
    }

    /// Mocks a GET for `path` carrying the ferries credential.
    pub async fn mock_get(&mut self, path: &str, status: usize, body: &str) -> Mock {
        self.server
            .mock("GET", path)
            .match_query(mockito::Matcher::Any)
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await
    }
}

/// Ferries-family endpoint under `/ferries/api/test/rest` with an `itemId` path parameter
/// and schemas on both sides.
pub fn item_endpoint() -> Endpoint {
    Endpoint::new(
        "test.item",
        ApiFamily::Ferries,
        "https://www.wsdot.wa.gov/ferries/api/test/rest",
        "/items/{itemId}",
    )
    .with_input_schema(json!({
        "type": "object",
        "required": ["itemId"],
        "properties": { "itemId": { "type": "integer", "minimum": 1 } }
    }))
    .with_output_schema(json!({
        "type": "object",
        "required": ["ItemID", "Name"],
        "properties": {
            "ItemID": { "type": "integer" },
            "Name": { "type": "string" }
        }
    }))
}

/// Direct-kind strategy that counts calls and returns a canned body.
pub struct CountingTransport {
    pub calls: AtomicUsize,
    pub urls: std::sync::Mutex<Vec<String>>,
    body: String,
}

impl CountingTransport {
    pub fn new(body: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            urls: std::sync::Mutex::new(Vec::new()),
            body: body.into(),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_url(&self) -> Option<String> {
        self.urls.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl TransportStrategy for CountingTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::Direct
    }

    async fn fetch(&self, url: &str) -> Result<String, TransportFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.urls.lock().unwrap().push(url.to_string());
        Ok(self.body.clone())
    }
}
