//! Copilot relay: a cross-context command dispatcher.
//!
//! Typed requests from privileged extension surfaces (popup, content
//! scripts) are relayed into the background coordinator, matched against the
//! command registry and handled — often by executing a page operation inside
//! the originating tab's MAIN world through `copilot-host-bridge`. Failures
//! never cross back as errors: every request resolves to a value or to the
//! absent marker, with diagnostics kept local.

pub mod commands;
pub mod config;
pub mod dispatcher;
pub mod errors;
pub mod handlers;
pub mod logging;
pub mod metrics;
pub mod registry;

pub use config::RelayConfig;
pub use dispatcher::{spawn_message_loop, DispatchEvent, Dispatcher, IncomingMessage, RelayHandle};
pub use errors::DispatchError;
pub use registry::{CommandHandler, CommandRegistry};

// Envelope and bridge types callers need alongside the dispatcher.
pub use copilot_core_types::{
    Command, DownloadDescriptor, OriginContext, Request, RequestId, Response, TabId,
};
pub use copilot_host_bridge::{ContextBridge, HostApi};
