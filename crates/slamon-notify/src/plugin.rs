use crate::error::{NotifyError, Result};
use crate::ViolationNotifier;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Factory for one notifier type, registered under a unique name.
pub trait NotifierPlugin: Send + Sync {
    fn name(&self) -> &str;
    fn create(&self, config: &Value) -> Result<Arc<dyn ViolationNotifier>>;
}

/// String-keyed registry of notifier backends.
pub struct NotifierRegistry {
    plugins: HashMap<String, Box<dyn NotifierPlugin>>,
}

impl NotifierRegistry {
    pub fn new() -> Self {
        Self {
            plugins: HashMap::new(),
        }
    }

    pub fn register(&mut self, plugin: Box<dyn NotifierPlugin>) {
        let name = plugin.name().to_string();
        self.plugins.insert(name, plugin);
    }

    pub fn create(&self, type_name: &str, config: &Value) -> Result<Arc<dyn ViolationNotifier>> {
        let plugin = self
            .plugins
            .get(type_name)
            .ok_or_else(|| NotifyError::UnknownNotifierType(type_name.to_string()))?;
        plugin.create(config)
    }

    pub fn has_plugin(&self, type_name: &str) -> bool {
        self.plugins.contains_key(type_name)
    }

    pub fn plugin_names(&self) -> Vec<&str> {
        self.plugins.keys().map(|s| s.as_str()).collect()
    }
}

impl Default for NotifierRegistry {
    fn default() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(crate::log::LogPlugin));
        registry.register(Box::new(crate::webhook::WebhookPlugin));
        registry
    }
}
