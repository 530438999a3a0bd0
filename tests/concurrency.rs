//! In-flight requests are independent suspended computations: one stalled
//! handler must not block another, and responses must stay correlated.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use copilot_core_types::{
    Command, DownloadDescriptor, ExecutionTarget, OriginContext, Request, TabId,
};
use copilot_host_bridge::{BridgeError, HostApi, InProcessHost, PageOp, PageWorld};
use copilot_relay::{handlers, spawn_message_loop, CommandRegistry, Dispatcher, RelayConfig};
use serde_json::{json, Value};
use tokio::sync::Notify;

/// Host whose tab-1 injection suspends until tab 2 has been injected. If
/// the dispatcher serialized requests, the first fetch would block the
/// second forever and the test would time out.
struct GatedHost {
    second_seen: Notify,
}

impl GatedHost {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            second_seen: Notify::new(),
        })
    }
}

#[async_trait]
impl HostApi for GatedHost {
    async fn inject(
        &self,
        target: ExecutionTarget,
        _op: PageOp,
    ) -> Result<Vec<Option<Value>>, BridgeError> {
        match target.tab {
            TabId(1) => {
                self.second_seen.notified().await;
                Ok(vec![Some(json!({"tab": 1}))])
            }
            TabId(2) => {
                self.second_seen.notify_one();
                Ok(vec![Some(json!({"tab": 2}))])
            }
            other => Err(BridgeError::TabUnavailable(other)),
        }
    }

    async fn send_message(
        &self,
        channel: &str,
        _payload: Value,
        _tab: Option<TabId>,
    ) -> Result<Option<Value>, BridgeError> {
        Err(BridgeError::ChannelClosed(channel.to_string()))
    }

    async fn open_popup(&self) -> Result<Value, BridgeError> {
        Err(BridgeError::Host("no popup in this host".into()))
    }

    async fn start_download(&self, _descriptor: DownloadDescriptor) -> Result<Value, BridgeError> {
        Err(BridgeError::Host("no downloads in this host".into()))
    }
}

fn fetch_request(tab: i64) -> Request {
    Request::new(
        Command::Fetch,
        json!({"url": "https://api.host/ok"}),
        OriginContext::from_tab(TabId(tab)),
    )
}

#[tokio::test]
async fn simultaneous_fetches_resolve_independently() {
    let cfg = RelayConfig::default();
    let mut registry = CommandRegistry::new();
    handlers::register_defaults(&mut registry, GatedHost::new(), &cfg);
    let dispatcher = Dispatcher::new(Arc::new(registry), 16);
    let (handle, _task) = spawn_message_loop(dispatcher, 16);

    let first = handle.request(fetch_request(1));
    let second = handle.request(fetch_request(2));

    let (first, second) = tokio::time::timeout(
        Duration::from_secs(5),
        futures::future::join(first, second),
    )
    .await
    .expect("concurrent fetches must not block each other");

    assert_eq!(first.data, Some(json!({"tab": 1})));
    assert_eq!(second.data, Some(json!({"tab": 2})));
}

#[tokio::test]
async fn responses_stay_correlated_under_interleaving() {
    let cfg = RelayConfig::default();
    let host = InProcessHost::new();
    for tab in 1..=8 {
        host.open_tab(
            TabId(tab),
            PageWorld::new().with_global("mnsv2", move |args| Ok(json!({"tab": tab, "args": args}))),
        );
    }
    let mut registry = CommandRegistry::new();
    handlers::register_defaults(&mut registry, host, &cfg);
    let dispatcher = Dispatcher::new(Arc::new(registry), 16);
    let (handle, _task) = spawn_message_loop(dispatcher, 16);

    let requests = (1..=8).map(|tab| {
        let handle = handle.clone();
        async move {
            let response = handle
                .request(Request::new(
                    Command::Mns,
                    json!([tab]),
                    OriginContext::from_tab(TabId(tab)),
                ))
                .await;
            (tab, response)
        }
    });

    for (tab, response) in futures::future::join_all(requests).await {
        assert_eq!(response.data, Some(json!({"tab": tab, "args": [tab]})));
    }
}
