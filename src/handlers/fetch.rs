//! `fetch`: cross-world network proxy.
//!
//! The request is performed by the page's own fetch so it carries the page's
//! cookies, session and fingerprint instead of the extension's network
//! identity. The page side treats non-success statuses as failures, parses
//! the body as JSON and catches its own exceptions, so the injection call
//! never throws; the caller sees parsed data or the absent marker, nothing
//! else.

use async_trait::async_trait;
use copilot_core_types::Request;
use copilot_host_bridge::{ContextBridge, PageOp};
use serde_json::Value;
use tracing::warn;

use crate::commands::FetchPayload;
use crate::errors::DispatchError;
use crate::registry::CommandHandler;

pub struct FetchHandler {
    bridge: ContextBridge,
}

impl FetchHandler {
    pub fn new(bridge: ContextBridge) -> Self {
        Self { bridge }
    }
}

#[async_trait]
impl CommandHandler for FetchHandler {
    async fn handle(&self, request: &Request) -> Result<Option<Value>, DispatchError> {
        // Terminal precondition: without a tab there is nowhere to inject.
        let tab = request
            .origin
            .tab
            .ok_or(DispatchError::MissingTab(request.command))?;

        let payload: FetchPayload = serde_json::from_value(request.payload.clone())
            .map_err(|err| DispatchError::invalid_payload(request.command, err))?;

        let op = PageOp::FetchJson {
            url: payload.url.clone(),
            init: Value::Object(payload.init),
        };
        let result = self.bridge.run_in_main_world(tab, op).await?;
        if result.is_none() {
            // Diagnostic stays local; the caller just gets the absent marker.
            warn!(target: "relay-fetch", %tab, url = %payload.url, "page fetch yielded no result");
        }
        Ok(result)
    }
}
