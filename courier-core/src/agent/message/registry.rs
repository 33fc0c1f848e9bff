use std::sync::Arc;

use rst_common::with_logging::log::debug;

use super::types::{Dispatcher, MessageError};

/// `DispatchRegistry` keeps the transport dispatchers in their registration order
#[derive(Clone, Default)]
pub struct DispatchRegistry {
    dispatchers: Vec<Arc<dyn Dispatcher>>,
}

impl DispatchRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, dispatcher: Arc<dyn Dispatcher>) {
        debug!(
            "[registry:register] dispatcher schemes: {:?}",
            dispatcher.schemes()
        );
        self.dispatchers.push(dispatcher);
    }

    pub fn with_dispatcher(mut self, dispatcher: Arc<dyn Dispatcher>) -> Self {
        self.register(dispatcher);
        self
    }

    /// `resolve` returns the first registered dispatcher supporting the given scheme
    ///
    /// Schemes are compared exactly
    pub fn resolve(&self, scheme: &str) -> Result<Arc<dyn Dispatcher>, MessageError> {
        self.dispatchers
            .iter()
            .find(|dispatcher| dispatcher.schemes().iter().any(|s| s == scheme))
            .cloned()
            .ok_or(MessageError::TransmissionError(format!(
                "no dispatcher registered for scheme: {}",
                scheme
            )))
    }

    pub fn schemes(&self) -> Vec<String> {
        self.dispatchers
            .iter()
            .flat_map(|dispatcher| dispatcher.schemes())
            .collect()
    }
}
