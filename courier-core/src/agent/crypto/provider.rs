use rst_common::standard::async_trait::async_trait;
use rst_common::with_logging::log::debug;

use crate::agent::context::types::StorageBackend;
use crate::agent::context::AgentContext;

use super::types::{CryptoError, CryptoProvider, KeyVerifier, UnpackResult};

/// `ContextCrypto` is the [`CryptoProvider`] which delegates to the backend active in the
/// given context
///
/// Each entry point checks the context backend first, a closed backend fails with
/// [`crate::agent::context::types::ContextError::ConfigurationError`] before anything is
/// delegated
#[derive(Clone)]
pub struct ContextCrypto<TVerifier>
where
    TVerifier: KeyVerifier + Clone,
{
    verifier: TVerifier,
}

impl<TVerifier> ContextCrypto<TVerifier>
where
    TVerifier: KeyVerifier + Clone,
{
    pub fn new(verifier: TVerifier) -> Self {
        Self { verifier }
    }
}

#[async_trait]
impl<TVerifier> CryptoProvider for ContextCrypto<TVerifier>
where
    TVerifier: KeyVerifier + Clone,
{
    async fn pack(
        &self,
        ctx: &AgentContext,
        message: Vec<u8>,
        recipient_key: String,
        routing_keys: Vec<String>,
        sender_key: Option<String>,
    ) -> Result<Vec<u8>, CryptoError> {
        let backend = ctx.backend()?;
        debug!("[crypto:pack] using {} backend", backend.kind());

        match backend {
            StorageBackend::Legacy(wallet) => {
                wallet
                    .pack(message, recipient_key, routing_keys, sender_key)
                    .await
            }
            StorageBackend::Session(store) => {
                store
                    .pack(message, recipient_key, routing_keys, sender_key)
                    .await
            }
        }
    }

    async fn unpack(
        &self,
        ctx: &AgentContext,
        envelope: Vec<u8>,
    ) -> Result<UnpackResult, CryptoError> {
        let backend = ctx.backend()?;
        debug!("[crypto:unpack] using {} backend", backend.kind());

        match backend {
            StorageBackend::Legacy(wallet) => wallet.unpack(envelope).await,
            StorageBackend::Session(store) => store.unpack(envelope).await,
        }
    }

    async fn sign(
        &self,
        ctx: &AgentContext,
        key: String,
        data: Vec<u8>,
    ) -> Result<Vec<u8>, CryptoError> {
        let backend = ctx.backend()?;
        debug!("[crypto:sign] using {} backend", backend.kind());

        match backend {
            StorageBackend::Legacy(wallet) => wallet.sign(key, data).await,
            StorageBackend::Session(store) => store.sign(key, data).await,
        }
    }

    async fn verify(
        &self,
        key: String,
        data: Vec<u8>,
        signature: Vec<u8>,
    ) -> Result<bool, CryptoError> {
        self.verifier.verify(key, data, signature).await
    }

    fn key_bytes(&self, key: String) -> Result<Vec<u8>, CryptoError> {
        self.verifier.key_bytes(key)
    }
}
