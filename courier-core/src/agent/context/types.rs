use std::fmt::{self, Debug};
use std::sync::Arc;

use rst_common::standard::async_trait::async_trait;
use rst_common::with_errors::thiserror::{self, Error};

use crate::agent::crypto::types::BackendCrypto;

/// `ContextError` provides all specific error types relate with the agent context
#[derive(Debug, PartialEq, Error, Clone)]
pub enum ContextError {
    #[error("configuration error: {0}")]
    ConfigurationError(String),

    #[error("pool error: {0}")]
    PoolError(String),

    #[error("queue error: {0}")]
    QueueError(String),
}

/// `LegacyBackend` is a single-session wallet handle
///
/// The wallet is opened once when the agent is activated and stays open until the agent
/// session ends
pub trait LegacyBackend: BackendCrypto {
    fn wallet_id(&self) -> String;
}

/// `SessionBackend` is a session based secure store handle
pub trait SessionBackend: BackendCrypto {
    fn store_id(&self) -> String;
}

/// `StorageBackend` is the secure storage used by an [`super::AgentContext`]
///
/// Only one of the backends can be active for a context
#[derive(Clone)]
pub enum StorageBackend {
    Legacy(Arc<dyn LegacyBackend>),
    Session(Arc<dyn SessionBackend>),
}

impl StorageBackend {
    pub fn kind(&self) -> &'static str {
        match self {
            StorageBackend::Legacy(_) => "legacy",
            StorageBackend::Session(_) => "session",
        }
    }

    pub fn id(&self) -> String {
        match self {
            StorageBackend::Legacy(wallet) => wallet.wallet_id(),
            StorageBackend::Session(store) => store.store_id(),
        }
    }
}

impl Debug for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageBackend")
            .field("kind", &self.kind())
            .field("id", &self.id())
            .finish()
    }
}

/// `NetworkPool` is a handle to the ledger network pool
pub trait NetworkPool: Send + Sync {
    fn name(&self) -> String;
}

/// `PoolFactory` opens the network pool handle
///
/// Once a call succeeds the opened pool is cached for the rest of the context lifetime and the
/// factory is not called again. A failed call is not cached, the next resolution calls the
/// factory again.
#[async_trait]
pub trait PoolFactory: Send + Sync {
    async fn open_pool(&self) -> Result<Arc<dyn NetworkPool>, ContextError>;
}

/// `Provision` is the outcome of provisioning a store
///
/// A store that was provisioned before is not an error, it is reported as [`Provision::AlreadyExists`]
#[derive(Debug, Clone, PartialEq)]
pub enum Provision {
    Created,
    AlreadyExists,
}
