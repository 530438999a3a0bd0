//! Relay configuration.

use std::env;

use serde::{Deserialize, Serialize};

/// Tunables for the relay. Defaults match the deployed extension; each field
/// can be overridden through a `COPILOT_*` environment variable.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Message channel used to forward task-dialog requests to the
    /// originating tab's content-script context.
    pub task_dialog_channel: String,
    /// Name of the host-page signing global invoked by the `webmsxyw`
    /// passthrough.
    pub sign_global: String,
    /// Name of the host-page global invoked by the `mnsv2` passthrough.
    pub mns_global: String,
    /// Capacity of the dispatch-event broadcast channel.
    pub event_capacity: usize,
    /// Capacity of the incoming-message channel feeding the dispatcher.
    pub inbox_capacity: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            task_dialog_channel: env_or("COPILOT_TASK_DIALOG_CHANNEL", "openTaskDialog"),
            sign_global: env_or("COPILOT_SIGN_GLOBAL", "_webmsxyw"),
            mns_global: env_or("COPILOT_MNS_GLOBAL", "mnsv2"),
            event_capacity: env_or_parse("COPILOT_EVENT_CAPACITY", 128),
            inbox_capacity: env_or_parse("COPILOT_INBOX_CAPACITY", 128),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_or_parse(key: &str, default: usize) -> usize {
    env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}
