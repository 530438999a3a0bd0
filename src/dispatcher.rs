//! The process-wide message hub.
//!
//! One dispatcher per extension process. Requests arrive over an mpsc inbox
//! carrying their own oneshot responder, so correlation is structural: each
//! in-flight request is an independent suspended task and responses cannot
//! cross between callers. There is no queueing beyond the inbox, no retry
//! and no timeout — a handler stuck on a host primitive stays pending until
//! the host resolves or the process is torn down.

use std::sync::Arc;
use std::time::Instant;

use copilot_core_types::{Command, Request, RequestId, Response};
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::metrics;
use crate::registry::CommandRegistry;

/// Observer-facing dispatch outcomes. Publishing is best-effort and never
/// influences the response to the caller.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum DispatchEvent {
    Completed {
        id: RequestId,
        command: Command,
    },
    Degraded {
        id: RequestId,
        command: Command,
        reason: String,
    },
}

pub struct Dispatcher {
    registry: Arc<CommandRegistry>,
    events: broadcast::Sender<DispatchEvent>,
}

impl Dispatcher {
    pub fn new(registry: Arc<CommandRegistry>, event_capacity: usize) -> Arc<Self> {
        let (events, _) = broadcast::channel(event_capacity.max(1));
        Arc::new(Self { registry, events })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DispatchEvent> {
        self.events.subscribe()
    }

    /// Resolve the handler by name, await it, and normalize the outcome.
    /// Every failure — unregistered command, precondition, bridge, in-page,
    /// semantic — degrades to an absent response; the diagnostic stays here.
    pub async fn dispatch(&self, request: Request) -> Response {
        let id = request.id;
        let command = request.command;
        let wire = command.wire_name();
        metrics::record_dispatch(wire);
        let started = Instant::now();

        let Some(handler) = self.registry.get(&command) else {
            warn!(target: "relay-dispatch", %id, %command, "no handler registered");
            metrics::record_dispatch_failure(wire);
            let _ = self.events.send(DispatchEvent::Degraded {
                id,
                command,
                reason: "unregistered command".into(),
            });
            return Response::absent();
        };

        match handler.handle(&request).await {
            Ok(data) => {
                metrics::record_dispatch_success(wire, started.elapsed());
                debug!(
                    target: "relay-dispatch",
                    %id,
                    %command,
                    absent = data.is_none(),
                    "dispatch completed"
                );
                let _ = self.events.send(DispatchEvent::Completed { id, command });
                Response { data }
            }
            Err(err) => {
                warn!(target: "relay-dispatch", %id, %command, %err, "dispatch degraded");
                metrics::record_dispatch_failure(wire);
                let _ = self.events.send(DispatchEvent::Degraded {
                    id,
                    command,
                    reason: err.to_string(),
                });
                Response::absent()
            }
        }
    }
}

/// One request in flight between a caller context and the dispatcher.
pub struct IncomingMessage {
    pub request: Request,
    pub responder: oneshot::Sender<Response>,
}

/// Caller-side handle over the dispatcher inbox. Clonable across contexts;
/// each request gets its own response channel.
#[derive(Clone)]
pub struct RelayHandle {
    inbox: mpsc::Sender<IncomingMessage>,
}

impl RelayHandle {
    /// Send a request and await its correlated response. The await has no
    /// deadline; it resolves when the handler does. A torn-down dispatcher
    /// surfaces as an absent response, consistent with every other failure.
    pub async fn request(&self, request: Request) -> Response {
        let id = request.id;
        let (resp_tx, resp_rx) = oneshot::channel();
        let message = IncomingMessage {
            request,
            responder: resp_tx,
        };
        if self.inbox.send(message).await.is_err() {
            warn!(target: "relay-dispatch", %id, "dispatcher inbox closed");
            return Response::absent();
        }
        match resp_rx.await {
            Ok(response) => response,
            Err(_) => {
                warn!(target: "relay-dispatch", %id, "response channel dropped");
                Response::absent()
            }
        }
    }
}

/// Message-listening entry point. Spawns one task per incoming request so
/// concurrent requests suspend and resolve independently; the loop itself
/// never awaits a handler.
pub fn spawn_message_loop(
    dispatcher: Arc<Dispatcher>,
    inbox_capacity: usize,
) -> (RelayHandle, JoinHandle<()>) {
    let (tx, mut rx) = mpsc::channel::<IncomingMessage>(inbox_capacity.max(1));
    let task = tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            let dispatcher = Arc::clone(&dispatcher);
            tokio::spawn(async move {
                let response = dispatcher.dispatch(message.request).await;
                // The caller may have gone away; nothing to do then.
                let _ = message.responder.send(response);
            });
        }
        debug!(target: "relay-dispatch", "message loop drained");
    });
    (RelayHandle { inbox: tx }, task)
}

#[cfg(test)]
mod tests {
    use super::*;
    use copilot_core_types::OriginContext;
    use serde_json::{json, Value};

    #[tokio::test]
    async fn unregistered_command_degrades_to_absent() {
        let dispatcher = Dispatcher::new(Arc::new(CommandRegistry::new()), 8);
        let mut events = dispatcher.subscribe();

        let request = Request::new(Command::Fetch, Value::Null, OriginContext::detached());
        let id = request.id;
        let response = dispatcher.dispatch(request).await;

        assert!(response.is_absent());
        match events.recv().await.unwrap() {
            DispatchEvent::Degraded {
                id: seen,
                command,
                reason,
            } => {
                assert_eq!(seen, id);
                assert_eq!(command, Command::Fetch);
                assert_eq!(reason, "unregistered command");
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    struct Echo;

    #[async_trait::async_trait]
    impl crate::registry::CommandHandler for Echo {
        async fn handle(
            &self,
            request: &Request,
        ) -> Result<Option<Value>, crate::errors::DispatchError> {
            Ok(Some(request.payload.clone()))
        }
    }

    #[tokio::test]
    async fn handle_round_trips_through_the_loop() {
        let mut registry = CommandRegistry::new();
        registry.register(Command::Mns, Arc::new(Echo));
        let dispatcher = Dispatcher::new(Arc::new(registry), 8);
        let (handle, _task) = spawn_message_loop(dispatcher, 8);

        let response = handle
            .request(Request::new(
                Command::Mns,
                json!(["a", "b"]),
                OriginContext::detached(),
            ))
            .await;
        assert_eq!(response.data, Some(json!(["a", "b"])));
    }
}
