use rst_common::standard::async_trait::async_trait;
use rst_common::with_errors::thiserror::{self, Error};

use crate::agent::context::types::ContextError;
use crate::agent::context::AgentContext;

/// `CryptoError` provides all specific error types relate with the crypto capability
#[derive(Debug, PartialEq, Error, Clone)]
pub enum CryptoError {
    #[error("pack error: {0}")]
    PackError(String),

    #[error("unpack error: {0}")]
    UnpackError(String),

    #[error("sign error: {0}")]
    SignError(String),

    #[error("verify error: {0}")]
    VerifyError(String),

    #[error("key error: {0}")]
    KeyError(String),

    #[error(transparent)]
    ContextError(#[from] ContextError),
}

/// `UnpackResult` is the plaintext recovered from an envelope
#[derive(Debug, Clone, PartialEq)]
pub struct UnpackResult {
    pub message: Vec<u8>,
    pub sender_key: Option<String>,
    pub recipient_key: Option<String>,
}

/// `BackendCrypto` is the cryptographic capability owned by a storage backend
///
/// An envelope packed without a sender key is anonymous, its unpack result will not carry
/// any sender key
#[async_trait]
pub trait BackendCrypto: Send + Sync {
    async fn pack(
        &self,
        message: Vec<u8>,
        recipient_key: String,
        routing_keys: Vec<String>,
        sender_key: Option<String>,
    ) -> Result<Vec<u8>, CryptoError>;

    async fn unpack(&self, envelope: Vec<u8>) -> Result<UnpackResult, CryptoError>;

    async fn sign(&self, key: String, data: Vec<u8>) -> Result<Vec<u8>, CryptoError>;
}

/// `KeyVerifier` checks detached signatures
///
/// Verification needs no secret material, so it does not depend on the storage backend
#[async_trait]
pub trait KeyVerifier: Send + Sync {
    async fn verify(
        &self,
        key: String,
        data: Vec<u8>,
        signature: Vec<u8>,
    ) -> Result<bool, CryptoError>;

    fn key_bytes(&self, key: String) -> Result<Vec<u8>, CryptoError>;
}

/// `CryptoProvider` is the single crypto entry point used by the services
#[async_trait]
pub trait CryptoProvider: Send + Sync {
    async fn pack(
        &self,
        ctx: &AgentContext,
        message: Vec<u8>,
        recipient_key: String,
        routing_keys: Vec<String>,
        sender_key: Option<String>,
    ) -> Result<Vec<u8>, CryptoError>;

    async fn unpack(
        &self,
        ctx: &AgentContext,
        envelope: Vec<u8>,
    ) -> Result<UnpackResult, CryptoError>;

    async fn sign(
        &self,
        ctx: &AgentContext,
        key: String,
        data: Vec<u8>,
    ) -> Result<Vec<u8>, CryptoError>;

    async fn verify(
        &self,
        key: String,
        data: Vec<u8>,
        signature: Vec<u8>,
    ) -> Result<bool, CryptoError>;

    fn key_bytes(&self, key: String) -> Result<Vec<u8>, CryptoError>;
}
