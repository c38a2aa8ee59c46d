//! Strategy selection and the cross-origin transport, exercised through the client.

mod common;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use common::{item_endpoint, CountingTransport, ACCESS_CODE};
use wsdot_client::transport::{
    classify_environment, CallbackRegistry, RuntimeSignals, ScriptHost, ScriptId,
};
use wsdot_client::{ErrorCode, LogMode, Params, RuntimeEnvironment, TransportKind, WsdotClient};

/// Script host that answers every injection on a background task.
struct FakeHost {
    reply: Option<Result<String, String>>,
    next: AtomicU64,
    injected: Mutex<Vec<String>>,
    live: Mutex<Vec<ScriptId>>,
}

impl FakeHost {
    fn new(reply: Option<Result<String, String>>) -> Arc<Self> {
        Arc::new(Self {
            reply,
            next: AtomicU64::new(1),
            injected: Mutex::new(Vec::new()),
            live: Mutex::new(Vec::new()),
        })
    }

    fn live_scripts(&self) -> usize {
        self.live.lock().unwrap().len()
    }
}

impl ScriptHost for FakeHost {
    fn inject(
        &self,
        src: &str,
        callback: &str,
        registry: Arc<CallbackRegistry>,
    ) -> Result<ScriptId, String> {
        let id = ScriptId(self.next.fetch_add(1, Ordering::SeqCst));
        self.injected.lock().unwrap().push(src.to_string());
        self.live.lock().unwrap().push(id);

        if let Some(reply) = self.reply.clone() {
            let callback = callback.to_string();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(5)).await;
                match reply {
                    Ok(payload) => registry.deliver(&callback, payload),
                    Err(reason) => registry.fail(&callback, reason),
                };
            });
        }
        Ok(id)
    }

    fn remove(&self, id: ScriptId) {
        self.live.lock().unwrap().retain(|s| *s != id);
    }
}

fn cross_origin_client(host: Arc<FakeHost>, registry: Arc<CallbackRegistry>) -> WsdotClient {
    WsdotClient::builder()
        .access_code(ACCESS_CODE)
        .runtime_signals(RuntimeSignals::server().with_forced(TransportKind::CrossOrigin))
        .direct_transport(CountingTransport::new("{}"))
        .script_host(host)
        .callback_registry(registry)
        .cross_origin_timeout(Duration::from_millis(100))
        .log_mode(LogMode::Silent)
        .build()
        .unwrap()
}

#[test]
fn test_force_override_wins_over_test_runtime() {
    let signals = RuntimeSignals {
        forced: Some(TransportKind::CrossOrigin),
        test_runtime: true,
        has_window: false,
        has_document: false,
    };
    assert_eq!(
        classify_environment(&signals),
        RuntimeEnvironment::Forced(TransportKind::CrossOrigin)
    );

    let test_in_browser = RuntimeSignals {
        test_runtime: true,
        ..RuntimeSignals::browser()
    };
    assert_eq!(classify_environment(&test_in_browser), RuntimeEnvironment::Test);
    assert_eq!(RuntimeEnvironment::Test.transport_kind(), TransportKind::Direct);
}

#[tokio::test]
async fn test_forced_cross_origin_delivers_payload_and_cleans_up() {
    let host = FakeHost::new(Some(Ok(r#"{"ItemID":5,"Name":"Tokitae"}"#.to_string())));
    let registry = Arc::new(CallbackRegistry::new());
    let client = cross_origin_client(host.clone(), registry.clone());

    let value = client
        .execute(&item_endpoint(), Params::new().with("itemId", 5))
        .await
        .unwrap();

    assert_eq!(value["Name"], "Tokitae");
    let src = host.injected.lock().unwrap()[0].clone();
    assert!(src.contains("/items/5?apiaccesscode=TEST-KEY&callback=wsdot_cb_"));
    assert!(registry.is_empty());
    assert_eq!(host.live_scripts(), 0);
}

#[tokio::test]
async fn test_cross_origin_failures_are_normalized() {
    let registry = Arc::new(CallbackRegistry::new());

    let host = FakeHost::new(None);
    let err = cross_origin_client(host.clone(), registry.clone())
        .execute(&item_endpoint(), Params::new().with("itemId", 5))
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::Timeout);
    assert!(registry.is_empty());
    assert_eq!(host.live_scripts(), 0);

    let host = FakeHost::new(Some(Err("script load error".to_string())));
    let err = cross_origin_client(host.clone(), registry.clone())
        .execute(&item_endpoint(), Params::new().with("itemId", 5))
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::CrossOrigin);
    assert!(registry.is_empty());

    let host = FakeHost::new(Some(Ok("   ".to_string())));
    let err = cross_origin_client(host, registry.clone())
        .execute(&item_endpoint(), Params::new().with("itemId", 5))
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::Network);
    assert!(registry.is_empty());
}

#[tokio::test]
async fn test_concurrent_cross_origin_calls_get_distinct_callbacks() {
    let host = FakeHost::new(Some(Ok(r#"{"ItemID":1,"Name":"a"}"#.to_string())));
    let registry = Arc::new(CallbackRegistry::new());
    let client = cross_origin_client(host.clone(), registry.clone());
    let endpoint = item_endpoint();

    let calls = (1..=8).map(|id| client.execute(&endpoint, Params::new().with("itemId", id)));
    let results = futures::future::join_all(calls).await;
    assert!(results.iter().all(Result::is_ok));

    let mut callbacks: Vec<String> = host
        .injected
        .lock()
        .unwrap()
        .iter()
        .filter_map(|src| src.split("callback=").nth(1).map(str::to_string))
        .collect();
    callbacks.sort();
    callbacks.dedup();
    assert_eq!(callbacks.len(), 8);
    assert!(registry.is_empty());
}

#[tokio::test]
async fn test_cross_origin_without_host_is_a_cross_origin_error() {
    let client = WsdotClient::builder()
        .access_code(ACCESS_CODE)
        .runtime_signals(RuntimeSignals::browser())
        .direct_transport(CountingTransport::new("{}"))
        .log_mode(LogMode::Silent)
        .build()
        .unwrap();

    assert_eq!(client.transport_environment(), RuntimeEnvironment::Browser);
    let err = client
        .execute(&item_endpoint(), Params::new().with("itemId", 5))
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::CrossOrigin);
}
