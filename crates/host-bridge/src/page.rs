//! In-process realization of the page-side operation table.
//!
//! A real deployment evaluates [`PageOp`]s inside a live tab. For tests,
//! demos and anything without an attached browser, [`PageWorld`] models one
//! tab's MAIN world — its exposed globals and its fetch behavior — and
//! [`InProcessHost`] serves a table of such worlds behind the [`HostApi`]
//! trait. The evaluation rules here are the reference semantics of the
//! operation table: page-side failures degrade to absent results and never
//! throw back across the boundary.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use copilot_core_types::{DownloadDescriptor, ExecWorld, ExecutionTarget, TabId};
use dashmap::DashMap;
use serde_json::{json, Value};
use tracing::debug;

use crate::error::BridgeError;
use crate::host::HostApi;
use crate::op::{PageArg, PageOp};

/// A function the host page exposes on its global scope.
pub type PageFn = Arc<dyn Fn(Vec<Value>) -> Result<Value, String> + Send + Sync>;

/// The page's fetch: maps (url, init) to an HTTP status plus raw body text,
/// or an error standing in for a thrown network failure.
pub type FetchResponder = Arc<dyn Fn(&str, &Value) -> Result<(u16, String), String> + Send + Sync>;

/// A content-script message listener: payload in, optional reply out.
pub type MessageFn = Arc<dyn Fn(Value) -> Option<Value> + Send + Sync>;

/// One tab's MAIN world: the globals it defines and how its fetch behaves.
#[derive(Clone, Default)]
pub struct PageWorld {
    globals: HashMap<String, PageFn>,
    fetch: Option<FetchResponder>,
}

impl PageWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_global<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(Vec<Value>) -> Result<Value, String> + Send + Sync + 'static,
    {
        self.globals.insert(name.into(), Arc::new(f));
        self
    }

    pub fn with_fetch<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &Value) -> Result<(u16, String), String> + Send + Sync + 'static,
    {
        self.fetch = Some(Arc::new(f));
        self
    }

    /// Evaluate an operation the way the page side would. Fetch failures of
    /// every kind (thrown, non-2xx, unparsable body) and throwing page APIs
    /// yield `Ok(None)`; only a missing page API is a distinct error.
    pub fn evaluate(&self, op: PageOp) -> Result<Option<Value>, BridgeError> {
        match op {
            PageOp::FetchJson { url, init } => {
                let Some(fetch) = &self.fetch else {
                    debug!(target: "page-world", %url, "page has no fetch responder");
                    return Ok(None);
                };
                let (status, body) = match fetch(&url, &init) {
                    Ok(response) => response,
                    Err(err) => {
                        debug!(target: "page-world", %url, %err, "in-page fetch threw");
                        return Ok(None);
                    }
                };
                if !(200..300).contains(&status) {
                    debug!(target: "page-world", %url, status, "fetch returned non-success status");
                    return Ok(None);
                }
                match serde_json::from_str(&body) {
                    Ok(value) => Ok(Some(value)),
                    Err(err) => {
                        debug!(target: "page-world", %url, %err, "fetch body is not JSON");
                        Ok(None)
                    }
                }
            }
            PageOp::InvokeGlobal { name, args } => {
                let Some(global) = self.globals.get(&name) else {
                    return Err(BridgeError::PageApiUnavailable(name));
                };
                let args = args
                    .into_iter()
                    .map(PageArg::materialize)
                    .collect::<Result<Vec<_>, _>>()?;
                match global(args) {
                    Ok(value) => Ok(Some(value)),
                    Err(err) => {
                        debug!(target: "page-world", %name, %err, "page api threw");
                        Ok(None)
                    }
                }
            }
        }
    }
}

/// Host implementation backed by an in-process table of page worlds. Doubles
/// as the test host: it records how often each primitive was exercised.
#[derive(Default)]
pub struct InProcessHost {
    tabs: DashMap<TabId, PageWorld>,
    listeners: DashMap<(TabId, String), MessageFn>,
    inject_calls: AtomicUsize,
    message_sends: AtomicUsize,
    popup_opens: AtomicUsize,
    next_download: AtomicI64,
    downloads: Mutex<Vec<DownloadDescriptor>>,
}

impl InProcessHost {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Register a live tab with its MAIN-world model.
    pub fn open_tab(&self, tab: TabId, world: PageWorld) {
        self.tabs.insert(tab, world);
    }

    pub fn close_tab(&self, tab: TabId) {
        self.tabs.remove(&tab);
        self.listeners.retain(|(t, _), _| *t != tab);
    }

    /// Attach a content-script message listener for `channel` in `tab`.
    pub fn on_message<F>(&self, tab: TabId, channel: impl Into<String>, f: F)
    where
        F: Fn(Value) -> Option<Value> + Send + Sync + 'static,
    {
        self.listeners.insert((tab, channel.into()), Arc::new(f));
    }

    /// Number of injection attempts, successful or not.
    pub fn inject_calls(&self) -> usize {
        self.inject_calls.load(Ordering::Relaxed)
    }

    /// Number of message-send attempts, delivered or not.
    pub fn message_sends(&self) -> usize {
        self.message_sends.load(Ordering::Relaxed)
    }

    pub fn popup_opens(&self) -> usize {
        self.popup_opens.load(Ordering::Relaxed)
    }

    pub fn downloads(&self) -> Vec<DownloadDescriptor> {
        self.downloads
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl HostApi for InProcessHost {
    async fn inject(
        &self,
        target: ExecutionTarget,
        op: PageOp,
    ) -> Result<Vec<Option<Value>>, BridgeError> {
        self.inject_calls.fetch_add(1, Ordering::Relaxed);
        if target.world != ExecWorld::Main {
            return Err(BridgeError::InjectionRejected(
                "in-process host only models the MAIN world".into(),
            ));
        }
        let Some(world) = self.tabs.get(&target.tab).map(|entry| entry.value().clone()) else {
            return Err(BridgeError::TabUnavailable(target.tab));
        };
        // Single-frame model: one result slot per injection.
        let result = world.evaluate(op)?;
        Ok(vec![result])
    }

    async fn send_message(
        &self,
        channel: &str,
        payload: Value,
        tab: Option<TabId>,
    ) -> Result<Option<Value>, BridgeError> {
        self.message_sends.fetch_add(1, Ordering::Relaxed);
        let Some(tab) = tab else {
            return Err(BridgeError::ChannelClosed(channel.to_string()));
        };
        let listener = self
            .listeners
            .get(&(tab, channel.to_string()))
            .map(|entry| entry.value().clone())
            .ok_or_else(|| BridgeError::ChannelClosed(channel.to_string()))?;
        Ok(listener(payload))
    }

    async fn open_popup(&self) -> Result<Value, BridgeError> {
        self.popup_opens.fetch_add(1, Ordering::Relaxed);
        Ok(Value::Null)
    }

    async fn start_download(&self, descriptor: DownloadDescriptor) -> Result<Value, BridgeError> {
        let id = self.next_download.fetch_add(1, Ordering::Relaxed) + 1;
        self.downloads
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(descriptor);
        Ok(json!(id))
    }
}
