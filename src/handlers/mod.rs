//! One handler per supported command.

mod download;
mod fetch;
mod page_api;
mod popup;
mod task_dialog;

use std::sync::Arc;

use copilot_core_types::Command;
use copilot_host_bridge::{ContextBridge, HostApi};

use crate::config::RelayConfig;
use crate::registry::CommandRegistry;

pub use download::DownloadHandler;
pub use fetch::FetchHandler;
pub use page_api::{MnsHandler, WebSignHandler};
pub use popup::OpenPopupHandler;
pub use task_dialog::OpenTaskDialogHandler;

/// Populate a registry with the full command set against one host. Called
/// once at process start; the registry is read-only afterwards.
pub fn register_defaults(
    registry: &mut CommandRegistry,
    host: Arc<dyn HostApi>,
    cfg: &RelayConfig,
) {
    let bridge = ContextBridge::new(Arc::clone(&host));

    registry.register(
        Command::OpenPopup,
        Arc::new(OpenPopupHandler::new(Arc::clone(&host))),
    );
    registry.register(
        Command::OpenTaskDialog,
        Arc::new(OpenTaskDialogHandler::new(
            Arc::clone(&host),
            cfg.task_dialog_channel.clone(),
        )),
    );
    registry.register(Command::Fetch, Arc::new(FetchHandler::new(bridge.clone())));
    registry.register(
        Command::WebSign,
        Arc::new(WebSignHandler::new(bridge.clone(), cfg.sign_global.clone())),
    );
    registry.register(
        Command::Mns,
        Arc::new(MnsHandler::new(bridge, cfg.mns_global.clone())),
    );
    registry.register(Command::Download, Arc::new(DownloadHandler::new(host)));
}
