//! `openTaskDialog`: targeted re-broadcast to the originating tab.
//!
//! Nothing is handled locally; the payload is re-sent on a different channel
//! name so the tab's content-script context picks it up, and whatever that
//! recipient returns flows back to the original caller.

use std::sync::Arc;

use async_trait::async_trait;
use copilot_core_types::Request;
use copilot_host_bridge::HostApi;
use serde_json::Value;

use crate::errors::DispatchError;
use crate::registry::CommandHandler;

pub struct OpenTaskDialogHandler {
    host: Arc<dyn HostApi>,
    channel: String,
}

impl OpenTaskDialogHandler {
    pub fn new(host: Arc<dyn HostApi>, channel: String) -> Self {
        Self { host, channel }
    }
}

#[async_trait]
impl CommandHandler for OpenTaskDialogHandler {
    async fn handle(&self, request: &Request) -> Result<Option<Value>, DispatchError> {
        let tab = request
            .origin
            .tab
            .ok_or(DispatchError::MissingTab(request.command))?;
        let reply = self
            .host
            .send_message(&self.channel, request.payload.clone(), Some(tab))
            .await?;
        Ok(reply)
    }
}
