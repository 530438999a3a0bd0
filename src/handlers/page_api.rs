//! Page-API passthroughs: invoke a global the host page itself defines.
//!
//! Two variants share the shape "forward positional arguments to a named
//! MAIN-world global and return its result verbatim". The signing variant
//! additionally carries its body argument through a JSON-text encoding,
//! because the boundary only moves text for that parameter while the page
//! API expects structure; an absent body becomes the empty string the page
//! API reads as "no body".

use async_trait::async_trait;
use copilot_core_types::Request;
use copilot_host_bridge::{ContextBridge, PageArg, PageOp};
use serde_json::Value;

use crate::commands::{MnsPayload, WebSignPayload};
use crate::errors::DispatchError;
use crate::registry::CommandHandler;

pub struct WebSignHandler {
    bridge: ContextBridge,
    global: String,
}

impl WebSignHandler {
    pub fn new(bridge: ContextBridge, global: String) -> Self {
        Self { bridge, global }
    }
}

#[async_trait]
impl CommandHandler for WebSignHandler {
    async fn handle(&self, request: &Request) -> Result<Option<Value>, DispatchError> {
        let tab = request
            .origin
            .tab
            .ok_or(DispatchError::MissingTab(request.command))?;
        let payload: WebSignPayload = serde_json::from_value(request.payload.clone())
            .map_err(|err| DispatchError::invalid_payload(request.command, err))?;

        let body = match &payload.body {
            Some(body) => PageArg::json_text(body)
                .map_err(|err| DispatchError::invalid_payload(request.command, err))?,
            None => PageArg::Text(String::new()),
        };
        let op = PageOp::InvokeGlobal {
            name: self.global.clone(),
            args: vec![PageArg::Value(Value::String(payload.path)), body],
        };
        Ok(self.bridge.run_in_main_world(tab, op).await?)
    }
}

pub struct MnsHandler {
    bridge: ContextBridge,
    global: String,
}

impl MnsHandler {
    pub fn new(bridge: ContextBridge, global: String) -> Self {
        Self { bridge, global }
    }
}

#[async_trait]
impl CommandHandler for MnsHandler {
    async fn handle(&self, request: &Request) -> Result<Option<Value>, DispatchError> {
        let tab = request
            .origin
            .tab
            .ok_or(DispatchError::MissingTab(request.command))?;
        let MnsPayload(args) = serde_json::from_value(request.payload.clone())
            .map_err(|err| DispatchError::invalid_payload(request.command, err))?;

        let op = PageOp::InvokeGlobal {
            name: self.global.clone(),
            args: args.into_iter().map(PageArg::Value).collect(),
        };
        Ok(self.bridge.run_in_main_world(tab, op).await?)
    }
}
