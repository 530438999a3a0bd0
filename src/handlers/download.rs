//! `download`: delegate a descriptor to the host download manager.

use std::sync::Arc;

use async_trait::async_trait;
use copilot_core_types::{DownloadDescriptor, Request};
use copilot_host_bridge::HostApi;
use serde_json::Value;

use crate::errors::DispatchError;
use crate::registry::CommandHandler;

pub struct DownloadHandler {
    host: Arc<dyn HostApi>,
}

impl DownloadHandler {
    pub fn new(host: Arc<dyn HostApi>) -> Self {
        Self { host }
    }
}

#[async_trait]
impl CommandHandler for DownloadHandler {
    async fn handle(&self, request: &Request) -> Result<Option<Value>, DispatchError> {
        let descriptor: DownloadDescriptor = serde_json::from_value(request.payload.clone())
            .map_err(|err| DispatchError::invalid_payload(request.command, err))?;
        let id = self.host.start_download(descriptor).await?;
        Ok(Some(id))
    }
}
