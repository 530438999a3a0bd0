//! Shared identifiers and message envelopes for the copilot relay.
//!
//! Every context that talks to the dispatcher (popup, content scripts, the
//! background coordinator itself) speaks in terms of these types. They are
//! all structured-clone-safe: nothing here can smuggle a live reference
//! across a privilege boundary.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

/// Identifier of a browser tab as assigned by the host.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct TabId(pub i64);

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Correlation id for a single dispatched request, used in diagnostics.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct RequestId(pub Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Execution world inside a tab. `Isolated` is the extension's content-script
/// context; `Main` shares the page's own global scope.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecWorld {
    Isolated,
    Main,
}

/// Where an injected operation actually runs.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ExecutionTarget {
    pub tab: TabId,
    pub world: ExecWorld,
}

impl ExecutionTarget {
    pub fn main_world(tab: TabId) -> Self {
        Self {
            tab,
            world: ExecWorld::Main,
        }
    }
}

/// The fixed command set understood by the dispatcher. The serde names are
/// the wire names; `webmsxyw` and `mnsv2` match the host-page globals the
/// corresponding handlers invoke.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Command {
    OpenPopup,
    OpenTaskDialog,
    Fetch,
    #[serde(rename = "webmsxyw")]
    WebSign,
    #[serde(rename = "mnsv2")]
    Mns,
    Download,
}

impl Command {
    /// Wire name of the command, as carried in request envelopes.
    pub fn wire_name(&self) -> &'static str {
        match self {
            Command::OpenPopup => "openPopup",
            Command::OpenTaskDialog => "openTaskDialog",
            Command::Fetch => "fetch",
            Command::WebSign => "webmsxyw",
            Command::Mns => "mnsv2",
            Command::Download => "download",
        }
    }

    pub const ALL: [Command; 6] = [
        Command::OpenPopup,
        Command::OpenTaskDialog,
        Command::Fetch,
        Command::WebSign,
        Command::Mns,
        Command::Download,
    ];
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// Error returned when a wire command name does not belong to the fixed set.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error("unknown command `{0}`")]
pub struct ParseCommandError(pub String);

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Command::ALL
            .into_iter()
            .find(|c| c.wire_name() == s)
            .ok_or_else(|| ParseCommandError(s.to_string()))
    }
}

/// Identity of the requesting context. Content-script callers carry the tab
/// they live in; popup callers usually have none.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct OriginContext {
    pub tab: Option<TabId>,
}

impl OriginContext {
    pub fn from_tab(tab: TabId) -> Self {
        Self { tab: Some(tab) }
    }

    pub fn detached() -> Self {
        Self { tab: None }
    }
}

/// A single typed request. Immutable once dispatched; consumed exactly once
/// by the matching handler.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Request {
    pub id: RequestId,
    pub command: Command,
    #[serde(default)]
    pub payload: Value,
    #[serde(default)]
    pub origin: OriginContext,
}

impl Request {
    pub fn new(command: Command, payload: Value, origin: OriginContext) -> Self {
        Self {
            id: RequestId::new(),
            command,
            payload,
            origin,
        }
    }
}

/// Response to a dispatched request: either a command-specific value or the
/// absent marker. Failures never cross the boundary as structured errors;
/// they are normalized to `absent` before leaving the dispatcher.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Response {
    pub data: Option<Value>,
}

impl Response {
    pub fn absent() -> Self {
        Self { data: None }
    }

    pub fn value(data: Value) -> Self {
        Self { data: Some(data) }
    }

    pub fn is_absent(&self) -> bool {
        self.data.is_none()
    }
}

/// Descriptor handed to the host download primitive: a URL plus whatever
/// options the host API recognizes, passed through opaquely.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DownloadDescriptor {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(flatten)]
    pub options: serde_json::Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn command_wire_names_round_trip() {
        for command in Command::ALL {
            let parsed: Command = command.wire_name().parse().unwrap();
            assert_eq!(parsed, command);
            let encoded = serde_json::to_value(command).unwrap();
            assert_eq!(encoded, json!(command.wire_name()));
        }
    }

    #[test]
    fn page_api_commands_keep_host_names() {
        assert_eq!(Command::WebSign.wire_name(), "webmsxyw");
        assert_eq!(Command::Mns.wire_name(), "mnsv2");
    }

    #[test]
    fn unknown_command_is_rejected() {
        let err = "openSettings".parse::<Command>().unwrap_err();
        assert_eq!(err, ParseCommandError("openSettings".into()));
    }

    #[test]
    fn request_envelope_tolerates_missing_fields() {
        let raw = json!({
            "id": RequestId::new(),
            "command": "fetch",
        });
        let request: Request = serde_json::from_value(raw).unwrap();
        assert_eq!(request.command, Command::Fetch);
        assert!(request.payload.is_null());
        assert_eq!(request.origin.tab, None);
    }

    #[test]
    fn download_descriptor_keeps_unknown_options() {
        let raw = json!({
            "url": "https://example.com/video.mp4",
            "saveAs": true,
            "conflictAction": "uniquify",
        });
        let descriptor: DownloadDescriptor = serde_json::from_value(raw).unwrap();
        assert_eq!(descriptor.url, "https://example.com/video.mp4");
        assert_eq!(descriptor.filename, None);
        assert_eq!(descriptor.options.get("saveAs"), Some(&json!(true)));
    }
}
