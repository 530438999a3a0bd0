//! Bridge failure taxonomy.

use copilot_core_types::TabId;
use thiserror::Error;

/// Errors surfaced by host primitives and the context bridge. The dispatcher
/// normalizes every variant to an absent response before it reaches the
/// original caller; the variants exist for diagnostics and tests.
#[derive(Clone, Debug, Error)]
pub enum BridgeError {
    /// The target tab is gone or was never known to the host.
    #[error("tab {0} is not available")]
    TabUnavailable(TabId),

    /// The host refused the injection (restricted page, missing permission).
    #[error("injection rejected: {0}")]
    InjectionRejected(String),

    /// The named host-page global does not exist in the MAIN world.
    #[error("page api `{0}` is unavailable")]
    PageApiUnavailable(String),

    /// The page side failed before the operation could produce a result
    /// (malformed boundary-crossing argument, decode failure).
    #[error("page-side failure: {0}")]
    PageFailure(String),

    /// No receiver is listening on the targeted message channel.
    #[error("message channel `{0}` has no receiver")]
    ChannelClosed(String),

    /// The host primitive itself misbehaved.
    #[error("host error: {0}")]
    Host(String),
}
