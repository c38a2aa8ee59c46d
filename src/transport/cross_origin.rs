//! Script-injection transport for browser hosts.
//!
//! The request URL gets a `callback=<name>` query parameter. The host injects a script
//! element for that URL; the response script calls the named global, which the host
//! forwards to [`CallbackRegistry::deliver`]. Each call owns a uniquely named slot in the
//! registry, and both the slot and the injected script are removed when the call ends,
//! whether it succeeded, failed or timed out.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::oneshot;
use uuid::Uuid;

use super::{TransportFailure, TransportKind, TransportStrategy};

/// Query parameter naming the callback.
pub const CALLBACK_PARAM: &str = "callback";

/// Opaque reference to an injected script element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScriptId(pub u64);

/// Host environment able to inject and remove script references (a DOM, or a test double).
pub trait ScriptHost: Send + Sync {
    /// Injects a script loading `src`. When the script runs, the host must forward its
    /// payload to `registry.deliver(callback, ..)`, or report a load error through
    /// `registry.fail(callback, ..)`.
    fn inject(
        &self,
        src: &str,
        callback: &str,
        registry: Arc<CallbackRegistry>,
    ) -> Result<ScriptId, String>;

    /// Removes a previously injected script and any global it installed.
    fn remove(&self, id: ScriptId);
}

/// What a callback slot eventually receives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackOutcome {
    Payload(String),
    Failed(String),
}

/// Registry of pending callbacks, the only shared mutable state of the transport layer.
pub struct CallbackRegistry {
    counter: AtomicU64,
    slots: Mutex<HashMap<String, oneshot::Sender<CallbackOutcome>>>,
}

/// A registered callback slot. Must be handed back to [`CallbackRegistry::release`].
#[derive(Debug)]
pub struct CallbackHandle {
    name: String,
    receiver: oneshot::Receiver<CallbackOutcome>,
}

impl CallbackHandle {
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl CallbackRegistry {
    pub fn new() -> Self {
        Self {
            counter: AtomicU64::new(0),
            slots: Mutex::new(HashMap::new()),
        }
    }

    fn slots(&self) -> MutexGuard<'_, HashMap<String, oneshot::Sender<CallbackOutcome>>> {
        self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Allocates a uniquely named slot.
    pub fn register(&self) -> CallbackHandle {
        let seq = self.counter.fetch_add(1, Ordering::Relaxed);
        let suffix = Uuid::new_v4().simple().to_string();
        let name = format!("wsdot_cb_{}_{}", seq, &suffix[..8]);
        let (tx, rx) = oneshot::channel();
        self.slots().insert(name.clone(), tx);
        CallbackHandle { name, receiver: rx }
    }

    /// Drops the slot. Returns `false` if it was already consumed or released.
    pub fn release(&self, handle: &CallbackHandle) -> bool {
        self.slots().remove(&handle.name).is_some()
    }

    /// Completes the named slot with a payload. Returns `false` for unknown names.
    pub fn deliver(&self, name: &str, payload: impl Into<String>) -> bool {
        self.complete(name, CallbackOutcome::Payload(payload.into()))
    }

    /// Completes the named slot with a load failure.
    pub fn fail(&self, name: &str, reason: impl Into<String>) -> bool {
        self.complete(name, CallbackOutcome::Failed(reason.into()))
    }

    fn complete(&self, name: &str, outcome: CallbackOutcome) -> bool {
        let sender = self.slots().remove(name);
        match sender {
            Some(tx) => tx.send(outcome).is_ok(),
            None => false,
        }
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.slots().contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.slots().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("pending", &self.len())
            .finish()
    }
}

/// Releases the callback slot and removes the injected script on every exit path.
struct Cleanup<'a> {
    registry: &'a CallbackRegistry,
    host: &'a dyn ScriptHost,
    handle: CallbackHandle,
    script: Option<ScriptId>,
}

impl Drop for Cleanup<'_> {
    fn drop(&mut self) {
        self.registry.release(&self.handle);
        if let Some(id) = self.script.take() {
            self.host.remove(id);
        }
    }
}

/// Script-injection strategy.
pub struct CrossOriginTransport {
    host: Arc<dyn ScriptHost>,
    registry: Arc<CallbackRegistry>,
    timeout: Duration,
}

impl CrossOriginTransport {
    pub fn new(host: Arc<dyn ScriptHost>, registry: Arc<CallbackRegistry>, timeout: Duration) -> Self {
        Self {
            host,
            registry,
            timeout,
        }
    }

    pub fn registry(&self) -> &Arc<CallbackRegistry> {
        &self.registry
    }
}

fn with_callback(url: &str, callback: &str) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{}{}{}={}", url, separator, CALLBACK_PARAM, callback)
}

#[async_trait]
impl TransportStrategy for CrossOriginTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::CrossOrigin
    }

    async fn fetch(&self, url: &str) -> Result<String, TransportFailure> {
        let handle = self.registry.register();
        let src = with_callback(url, handle.name());
        let callback = handle.name().to_string();

        let mut guard = Cleanup {
            registry: &self.registry,
            host: self.host.as_ref(),
            handle,
            script: None,
        };

        let script = self
            .host
            .inject(&src, &callback, self.registry.clone())
            .map_err(TransportFailure::ScriptLoad)?;
        guard.script = Some(script);

        let outcome = tokio::time::timeout(self.timeout, &mut guard.handle.receiver).await;
        match outcome {
            Err(_) => Err(TransportFailure::Timeout {
                after: self.timeout,
            }),
            Ok(Err(_)) => Err(TransportFailure::ScriptLoad(format!(
                "callback {} was released before completion",
                callback
            ))),
            Ok(Ok(CallbackOutcome::Failed(reason))) => Err(TransportFailure::ScriptLoad(reason)),
            Ok(Ok(CallbackOutcome::Payload(body))) if body.trim().is_empty() => {
                Err(TransportFailure::EmptyBody)
            }
            Ok(Ok(CallbackOutcome::Payload(body))) => Ok(body),
        }
    }
}
