//! Host primitives and MAIN-world execution bridge for the copilot relay.
//!
//! The relay never touches the browser directly; everything it needs from the
//! host — script injection, cross-context messaging, popup activation,
//! download initiation — goes through the [`HostApi`] trait. The
//! [`ContextBridge`] layers the one-shot MAIN-world execution contract on top
//! of the injection primitive, and [`page`] carries the page-side operation
//! table together with an in-process host used by tests and demos.

pub mod bridge;
pub mod error;
pub mod host;
pub mod op;
pub mod page;

pub use bridge::ContextBridge;
pub use error::BridgeError;
pub use host::{HostApi, NoopHost};
pub use op::{PageArg, PageOp};
pub use page::{InProcessHost, PageWorld};
