use std::collections::HashMap;
use std::fmt::{self, Debug};
use std::sync::Arc;

use rst_common::standard::serde_json::Value;
use rst_common::with_logging::log::debug;
use rst_common::with_tokio::tokio::sync::OnceCell;

use crate::agent::message::{MessageType, UnpackedMessageContext};

use super::queue::InboundQueue;
use super::types::{
    ContextError, LegacyBackend, NetworkPool, PoolFactory, SessionBackend, StorageBackend,
};

/// `AgentContext` is the state of a single agent activation
///
/// The storage backend is checked each time it is used rather than only when the context is
/// built, because a context is long-lived and its backend session may be closed while the
/// context is still referenced by a pipeline
pub struct AgentContext {
    backend: Option<StorageBackend>,
    pool_factory: Option<Arc<dyn PoolFactory>>,
    pool: Arc<OnceCell<Arc<dyn NetworkPool>>>,
    state: HashMap<String, Value>,
    supported_messages: Vec<MessageType>,
    use_message_type_uris: bool,
    queue: InboundQueue<UnpackedMessageContext>,
}

impl AgentContext {
    pub fn builder() -> AgentContextBuilder {
        AgentContextBuilder::new()
    }

    /// `backend` returns the active storage backend
    ///
    /// It will return [`ContextError::ConfigurationError`] once the backend session is closed
    pub fn backend(&self) -> Result<StorageBackend, ContextError> {
        self.backend.clone().ok_or(ContextError::ConfigurationError(
            "storage backend is not available".to_string(),
        ))
    }

    /// `close_backend` ends the storage session of this context
    pub fn close_backend(&mut self) -> Option<StorageBackend> {
        let backend = self.backend.take();
        if let Some(closed) = &backend {
            debug!("[context:close_backend] closed {} backend", closed.kind());
        }

        backend
    }

    /// `pool` resolves the network pool handle
    ///
    /// The first call opens the pool through the configured [`PoolFactory`], concurrent callers
    /// wait for the same resolution and all of them receive the same handle
    pub async fn pool(&self) -> Result<Arc<dyn NetworkPool>, ContextError> {
        let factory = self
            .pool_factory
            .clone()
            .ok_or(ContextError::PoolError("pool factory is missing".to_string()))?;

        let pool = self
            .pool
            .get_or_try_init(|| async move {
                debug!("[context:pool] opening network pool");
                factory.open_pool().await
            })
            .await?;

        Ok(pool.clone())
    }

    pub fn set_state(&mut self, key: &str, value: Value) -> Option<Value> {
        self.state.insert(key.to_string(), value)
    }

    pub fn get_state(&self, key: &str) -> Option<&Value> {
        self.state.get(key)
    }

    pub fn remove_state(&mut self, key: &str) -> Option<Value> {
        self.state.remove(key)
    }

    pub fn supported_messages(&self) -> &[MessageType] {
        &self.supported_messages
    }

    pub fn supports(&self, message_type: &MessageType) -> bool {
        self.supported_messages.iter().any(|supported| supported == message_type)
    }

    pub fn use_message_type_uris(&self) -> bool {
        self.use_message_type_uris
    }

    pub fn queue(&self) -> &InboundQueue<UnpackedMessageContext> {
        &self.queue
    }
}

impl Debug for AgentContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentContext")
            .field("backend", &self.backend)
            .field("pool_resolved", &self.pool.initialized())
            .field("state", &self.state)
            .field("supported_messages", &self.supported_messages)
            .field("use_message_type_uris", &self.use_message_type_uris)
            .finish()
    }
}

/// `AgentContextBuilder` binds the context configuration
pub struct AgentContextBuilder {
    legacy: Option<Arc<dyn LegacyBackend>>,
    session: Option<Arc<dyn SessionBackend>>,
    pool_factory: Option<Arc<dyn PoolFactory>>,
    supported_messages: Vec<MessageType>,
    use_message_type_uris: bool,
}

impl AgentContextBuilder {
    pub fn new() -> Self {
        Self {
            legacy: None,
            session: None,
            pool_factory: None,
            supported_messages: Vec::new(),
            use_message_type_uris: true,
        }
    }

    pub fn with_legacy(mut self, wallet: Arc<dyn LegacyBackend>) -> Self {
        self.legacy = Some(wallet);
        self
    }

    pub fn with_session(mut self, store: Arc<dyn SessionBackend>) -> Self {
        self.session = Some(store);
        self
    }

    pub fn with_pool_factory(mut self, factory: Arc<dyn PoolFactory>) -> Self {
        self.pool_factory = Some(factory);
        self
    }

    pub fn with_supported_messages(mut self, message_types: Vec<MessageType>) -> Self {
        self.supported_messages.extend(message_types);
        self
    }

    pub fn with_message_type_uris(mut self, enabled: bool) -> Self {
        self.use_message_type_uris = enabled;
        self
    }

    pub fn build(self) -> Result<AgentContext, ContextError> {
        let backend = match (self.legacy, self.session) {
            (Some(wallet), None) => Ok(StorageBackend::Legacy(wallet)),
            (None, Some(store)) => Ok(StorageBackend::Session(store)),
            (Some(_), Some(_)) => Err(ContextError::ConfigurationError(
                "legacy and session backends are mutually exclusive".to_string(),
            )),
            (None, None) => Err(ContextError::ConfigurationError(
                "storage backend was missing".to_string(),
            )),
        }?;

        debug!("[context:build] using {} backend", backend.kind());

        Ok(AgentContext {
            backend: Some(backend),
            pool_factory: self.pool_factory,
            pool: Arc::new(OnceCell::new()),
            state: HashMap::new(),
            supported_messages: self.supported_messages,
            use_message_type_uris: self.use_message_type_uris,
            queue: InboundQueue::new(),
        })
    }
}

impl Default for AgentContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
