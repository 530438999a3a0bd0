//! The page-side operation table.
//!
//! Nothing executable crosses the isolation boundary. A privileged handler
//! describes what it wants as a [`PageOp`] — a fixed, enumerated operation
//! plus structured-clone-safe arguments — and the page side dispatches it
//! against its own operation table. This replaces the usual pattern of
//! serializing an ad-hoc closure into the page.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::BridgeError;

/// An argument crossing into the MAIN world, tagged with how the page side
/// materializes it before the target operation sees it.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum PageArg {
    /// Passed through as-is.
    Value(Value),
    /// Passed as a string, verbatim.
    Text(String),
    /// Crosses as JSON text and is parsed back into a structured value on
    /// the page side before the call. Used where the boundary only carries
    /// text but the page API expects structure.
    JsonText(String),
}

impl PageArg {
    /// Encode a structured value for a text-only boundary crossing.
    pub fn json_text(value: &Value) -> Result<Self, serde_json::Error> {
        Ok(Self::JsonText(serde_json::to_string(value)?))
    }

    /// Materialize the argument the way the page side would. In-process
    /// hosts call this right before invoking the target operation.
    pub fn materialize(self) -> Result<Value, BridgeError> {
        match self {
            PageArg::Value(value) => Ok(value),
            PageArg::Text(text) => Ok(Value::String(text)),
            PageArg::JsonText(text) => serde_json::from_str(&text)
                .map_err(|err| BridgeError::PageFailure(format!("argument decode: {err}"))),
        }
    }
}

/// One entry of the page-side operation table.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum PageOp {
    /// Run the page's own fetch with the page's network identity. Non-2xx
    /// statuses, non-JSON bodies and in-page exceptions all collapse to an
    /// absent result on the page side; the call itself never throws back.
    FetchJson { url: String, init: Value },

    /// Invoke a global function the host page itself defines, forwarding the
    /// arguments positionally and returning its result verbatim.
    InvokeGlobal { name: String, args: Vec<PageArg> },
}

impl PageOp {
    /// Stable operation name for logs and metrics.
    pub fn name(&self) -> &'static str {
        match self {
            PageOp::FetchJson { .. } => "fetchJson",
            PageOp::InvokeGlobal { .. } => "invokeGlobal",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn value_and_text_materialize_verbatim() {
        assert_eq!(
            PageArg::Value(json!({"a": 1})).materialize().unwrap(),
            json!({"a": 1})
        );
        assert_eq!(
            PageArg::Text(String::new()).materialize().unwrap(),
            json!("")
        );
    }

    #[test]
    fn json_text_round_trips_structure() {
        let body = json!({"x": 1, "nested": {"y": [1, 2]}});
        let arg = PageArg::json_text(&body).unwrap();
        assert_eq!(arg.materialize().unwrap(), body);
    }

    #[test]
    fn malformed_json_text_is_a_page_failure() {
        let err = PageArg::JsonText("{not json".into()).materialize().unwrap_err();
        assert!(matches!(err, BridgeError::PageFailure(_)));
    }

    #[test]
    fn ops_serialize_with_tagged_encoding() {
        let op = PageOp::InvokeGlobal {
            name: "mnsv2".into(),
            args: vec![PageArg::Value(json!(1))],
        };
        let encoded = serde_json::to_value(&op).unwrap();
        assert_eq!(encoded["op"], json!("invokeGlobal"));
        assert_eq!(encoded["name"], json!("mnsv2"));
    }
}
