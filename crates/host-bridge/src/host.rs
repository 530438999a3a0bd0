//! The host primitive surface consumed by the relay.

use async_trait::async_trait;
use copilot_core_types::{DownloadDescriptor, ExecutionTarget, TabId};
use serde_json::Value;

use crate::error::BridgeError;
use crate::op::PageOp;

/// Primitives the surrounding browser host provides. Each call suspends
/// until the host resolves; the relay adds no timeout of its own.
#[async_trait]
pub trait HostApi: Send + Sync {
    /// Inject a page operation for one-time execution in the target world.
    /// Returns one result slot per injected frame; unreachable frames and
    /// in-page throws surface as `None` slots rather than errors.
    async fn inject(
        &self,
        target: ExecutionTarget,
        op: PageOp,
    ) -> Result<Vec<Option<Value>>, BridgeError>;

    /// Send a payload on a named message channel, optionally targeted at a
    /// specific tab's content-script context, and return the receiver's
    /// reply.
    async fn send_message(
        &self,
        channel: &str,
        payload: Value,
        tab: Option<TabId>,
    ) -> Result<Option<Value>, BridgeError>;

    /// Programmatically open the extension popup.
    async fn open_popup(&self) -> Result<Value, BridgeError>;

    /// Hand a descriptor to the host download manager; resolves with the
    /// host's download identifier.
    async fn start_download(&self, descriptor: DownloadDescriptor) -> Result<Value, BridgeError>;
}

/// Host stub used where no browser is attached; every primitive reports the
/// missing capability.
#[derive(Default)]
pub struct NoopHost;

#[async_trait]
impl HostApi for NoopHost {
    async fn inject(
        &self,
        target: ExecutionTarget,
        op: PageOp,
    ) -> Result<Vec<Option<Value>>, BridgeError> {
        Err(BridgeError::Host(format!(
            "no host attached for {} in tab {}",
            op.name(),
            target.tab
        )))
    }

    async fn send_message(
        &self,
        channel: &str,
        _payload: Value,
        _tab: Option<TabId>,
    ) -> Result<Option<Value>, BridgeError> {
        Err(BridgeError::Host(format!(
            "no host attached for channel `{channel}`"
        )))
    }

    async fn open_popup(&self) -> Result<Value, BridgeError> {
        Err(BridgeError::Host("no host attached for popup".into()))
    }

    async fn start_download(&self, _descriptor: DownloadDescriptor) -> Result<Value, BridgeError> {
        Err(BridgeError::Host("no host attached for downloads".into()))
    }
}
