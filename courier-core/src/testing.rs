//! Test doubles shared between the domain test modules
use std::sync::{Arc, Mutex};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use http::Uri;

use rst_common::standard::async_trait::async_trait;
use rst_common::standard::serde::{self, Deserialize, Serialize};
use rst_common::standard::serde_json;

use crate::agent::context::types::{LegacyBackend, SessionBackend};
use crate::agent::context::AgentContext;
use crate::agent::crypto::types::{BackendCrypto, CryptoError, KeyVerifier, UnpackResult};
use crate::agent::message::types::{Dispatcher, MessageError};
use crate::agent::message::PackedEnvelope;

#[derive(Serialize, Deserialize)]
#[serde(crate = "self::serde")]
struct FakeEnvelope {
    recipient: String,
    routing: Vec<String>,
    sender: Option<String>,
    message: String,
}

/// `FakeBackend` packs envelopes as readable JSON and signs by prefixing the data with the key
pub struct FakeBackend {
    id: String,
}

impl FakeBackend {
    pub fn new(id: &str) -> Self {
        Self { id: id.to_string() }
    }
}

#[async_trait]
impl BackendCrypto for FakeBackend {
    async fn pack(
        &self,
        message: Vec<u8>,
        recipient_key: String,
        routing_keys: Vec<String>,
        sender_key: Option<String>,
    ) -> Result<Vec<u8>, CryptoError> {
        let envelope = FakeEnvelope {
            recipient: recipient_key,
            routing: routing_keys,
            sender: sender_key,
            message: STANDARD.encode(message),
        };

        serde_json::to_vec(&envelope).map_err(|err| CryptoError::PackError(err.to_string()))
    }

    async fn unpack(&self, envelope: Vec<u8>) -> Result<UnpackResult, CryptoError> {
        let envelope: FakeEnvelope = serde_json::from_slice(&envelope)
            .map_err(|err| CryptoError::UnpackError(err.to_string()))?;

        let message = STANDARD
            .decode(envelope.message)
            .map_err(|err| CryptoError::UnpackError(err.to_string()))?;

        Ok(UnpackResult {
            message,
            sender_key: envelope.sender,
            recipient_key: Some(envelope.recipient),
        })
    }

    async fn sign(&self, key: String, data: Vec<u8>) -> Result<Vec<u8>, CryptoError> {
        Ok([key.as_bytes(), data.as_slice()].concat())
    }
}

impl LegacyBackend for FakeBackend {
    fn wallet_id(&self) -> String {
        self.id.to_owned()
    }
}

impl SessionBackend for FakeBackend {
    fn store_id(&self) -> String {
        self.id.to_owned()
    }
}

/// `FakeVerifier` accepts the signatures produced by [`FakeBackend::sign`]
#[derive(Clone)]
pub struct FakeVerifier;

#[async_trait]
impl KeyVerifier for FakeVerifier {
    async fn verify(
        &self,
        key: String,
        data: Vec<u8>,
        signature: Vec<u8>,
    ) -> Result<bool, CryptoError> {
        let expected = [key.as_bytes(), data.as_slice()].concat();
        Ok(expected == signature)
    }

    fn key_bytes(&self, key: String) -> Result<Vec<u8>, CryptoError> {
        if key.is_empty() {
            return Err(CryptoError::KeyError("empty key".to_string()));
        }

        Ok(key.as_bytes().to_vec())
    }
}

#[derive(Clone, Copy)]
pub enum Reply {
    Echo,
    Nothing,
    Empty,
    Fail,
}

/// `RecordingDispatcher` keeps every envelope it receives and answers with the configured reply
#[derive(Clone)]
pub struct RecordingDispatcher {
    schemes: Vec<String>,
    reply: Reply,
    received: Arc<Mutex<Vec<(Uri, PackedEnvelope)>>>,
}

impl RecordingDispatcher {
    pub fn new(schemes: Vec<&str>, reply: Reply) -> Self {
        Self {
            schemes: schemes.into_iter().map(|s| s.to_string()).collect(),
            reply,
            received: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn received(&self) -> Vec<(Uri, PackedEnvelope)> {
        self.received.lock().unwrap().clone()
    }
}

#[async_trait]
impl Dispatcher for RecordingDispatcher {
    fn schemes(&self) -> Vec<String> {
        self.schemes.clone()
    }

    async fn dispatch(
        &self,
        uri: Uri,
        envelope: PackedEnvelope,
    ) -> Result<Option<PackedEnvelope>, MessageError> {
        self.received
            .lock()
            .unwrap()
            .push((uri, envelope.clone()));

        match self.reply {
            Reply::Echo => Ok(Some(envelope)),
            Reply::Nothing => Ok(None),
            Reply::Empty => Ok(Some(PackedEnvelope::new(vec![], envelope.message_type))),
            Reply::Fail => Err(MessageError::TransmissionError(
                "connection refused".to_string(),
            )),
        }
    }
}

pub fn legacy_context() -> AgentContext {
    AgentContext::builder()
        .with_legacy(Arc::new(FakeBackend::new("wallet")))
        .build()
        .unwrap()
}

pub fn session_context() -> AgentContext {
    AgentContext::builder()
        .with_session(Arc::new(FakeBackend::new("store")))
        .build()
        .unwrap()
}
