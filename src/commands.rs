//! Typed payload shapes for the command set.

use serde::Deserialize;
use serde_json::{Map, Value};

/// Payload of the `fetch` command: a URL plus whatever request options the
/// page-side fetch recognizes (method, headers, body, …), kept opaque.
#[derive(Clone, Debug, Deserialize)]
pub struct FetchPayload {
    pub url: String,
    #[serde(flatten)]
    pub init: Map<String, Value>,
}

/// Payload of the `webmsxyw` passthrough. `body` is optional; when present
/// it crosses the world boundary as JSON text.
#[derive(Clone, Debug, Deserialize)]
pub struct WebSignPayload {
    pub path: String,
    #[serde(default)]
    pub body: Option<Value>,
}

/// Payload of the `mnsv2` passthrough: a positional argument list forwarded
/// verbatim.
#[derive(Clone, Debug, Deserialize)]
#[serde(transparent)]
pub struct MnsPayload(pub Vec<Value>);
