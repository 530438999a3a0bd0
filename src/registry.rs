//! Command registry: the write-once mapping from command names to handlers.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use copilot_core_types::{Command, Request};
use serde_json::Value;
use tracing::debug;

use crate::errors::DispatchError;

/// A handler for one command. Returns the command-specific value, the absent
/// marker, or an error the dispatcher will normalize to absent.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn handle(&self, request: &Request) -> Result<Option<Value>, DispatchError>;
}

/// Explicitly constructed handler table. Populated once at startup, handed
/// to the dispatcher, read-only for the process lifetime. At most one
/// handler per command; re-registering replaces the earlier entry.
#[derive(Default)]
pub struct CommandRegistry {
    handlers: HashMap<Command, Arc<dyn CommandHandler>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, command: Command, handler: Arc<dyn CommandHandler>) {
        if self.handlers.insert(command, handler).is_some() {
            debug!(target: "relay-registry", %command, "handler replaced");
        }
    }

    pub fn get(&self, command: &Command) -> Option<Arc<dyn CommandHandler>> {
        self.handlers.get(command).cloned()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use copilot_core_types::{Command, OriginContext, Request};
    use serde_json::json;

    struct Fixed(Value);

    #[async_trait]
    impl CommandHandler for Fixed {
        async fn handle(&self, _request: &Request) -> Result<Option<Value>, DispatchError> {
            Ok(Some(self.0.clone()))
        }
    }

    #[tokio::test]
    async fn later_registration_replaces_earlier() {
        let mut registry = CommandRegistry::new();
        registry.register(Command::OpenPopup, Arc::new(Fixed(json!("first"))));
        registry.register(Command::OpenPopup, Arc::new(Fixed(json!("second"))));
        assert_eq!(registry.len(), 1);

        let request = Request::new(Command::OpenPopup, Value::Null, OriginContext::detached());
        let handler = registry.get(&Command::OpenPopup).unwrap();
        assert_eq!(handler.handle(&request).await.unwrap(), Some(json!("second")));
    }

    #[test]
    fn missing_command_yields_none() {
        let registry = CommandRegistry::new();
        assert!(registry.get(&Command::Fetch).is_none());
        assert!(registry.is_empty());
    }
}
