//! `openPopup`: ask the host to open the extension popup.

use std::sync::Arc;

use async_trait::async_trait;
use copilot_core_types::Request;
use copilot_host_bridge::HostApi;
use serde_json::Value;

use crate::errors::DispatchError;
use crate::registry::CommandHandler;

pub struct OpenPopupHandler {
    host: Arc<dyn HostApi>,
}

impl OpenPopupHandler {
    pub fn new(host: Arc<dyn HostApi>) -> Self {
        Self { host }
    }
}

#[async_trait]
impl CommandHandler for OpenPopupHandler {
    async fn handle(&self, _request: &Request) -> Result<Option<Value>, DispatchError> {
        // No payload, no tab dependency; the host result passes through.
        let result = self.host.open_popup().await?;
        Ok(Some(result))
    }
}
