//! Dispatch-side error taxonomy.
//!
//! None of these ever reach the original caller as structured errors: the
//! dispatcher logs them and degrades the response to the absent marker.
//! Downstream consumers are written against "null means failure".

use copilot_core_types::Command;
use copilot_host_bridge::BridgeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DispatchError {
    /// Configuration error: the registry has no handler for the command.
    #[error("no handler registered for `{0}`")]
    UnknownCommand(Command),

    /// Precondition failure: the command needs an originating tab and the
    /// request carried none.
    #[error("`{0}` requires an originating tab")]
    MissingTab(Command),

    /// The payload does not deserialize into the command's parameter shape.
    #[error("invalid payload for `{command}`: {reason}")]
    InvalidPayload { command: Command, reason: String },

    /// Bridge or host primitive failure.
    #[error(transparent)]
    Bridge(#[from] BridgeError),
}

impl DispatchError {
    pub fn invalid_payload(command: Command, err: impl std::fmt::Display) -> Self {
        Self::InvalidPayload {
            command,
            reason: err.to_string(),
        }
    }
}
