//! One-shot MAIN-world execution on top of the injection primitive.

use std::sync::Arc;

use copilot_core_types::{ExecutionTarget, TabId};
use serde_json::Value;
use tracing::debug;

use crate::error::BridgeError;
use crate::host::HostApi;
use crate::op::PageOp;

/// Executes a page operation inside a specific tab's MAIN world and returns
/// its result. Exactly one injection attempt per call; the returned future
/// resolves only after the page side completed or failed.
#[derive(Clone)]
pub struct ContextBridge {
    host: Arc<dyn HostApi>,
}

impl ContextBridge {
    pub fn new(host: Arc<dyn HostApi>) -> Self {
        Self { host }
    }

    pub fn host(&self) -> &Arc<dyn HostApi> {
        &self.host
    }

    /// Run `op` in `tab`'s MAIN world. The injection primitive reports one
    /// result per injected frame; only the first slot is meaningful here. An
    /// absent slot is indistinguishable from a legitimate page-side null —
    /// that opacity is part of the contract.
    pub async fn run_in_main_world(
        &self,
        tab: TabId,
        op: PageOp,
    ) -> Result<Option<Value>, BridgeError> {
        let target = ExecutionTarget::main_world(tab);
        debug!(target: "host-bridge", %tab, op = op.name(), "injecting page operation");
        let batch = self.host.inject(target, op).await?;
        Ok(batch.into_iter().next().flatten())
    }
}
