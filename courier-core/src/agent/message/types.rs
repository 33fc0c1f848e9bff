use rst_common::standard::async_trait::async_trait;
use rst_common::with_errors::thiserror::{self, Error};

use http::Uri;

use crate::agent::context::types::ContextError;
use crate::agent::context::AgentContext;
use crate::agent::crypto::types::{CryptoError, CryptoProvider};

use super::envelope::{PackedEnvelope, ReturnRouteMode, UnpackedMessageContext};
use super::message::ProtocolMessage;

/// `MessageError` provides all specific error types relate with the message domain
#[derive(Debug, PartialEq, Error, Clone)]
pub enum MessageError {
    #[error("invalid message: {reason}")]
    InvalidMessage {
        reason: String,
        #[source]
        source: Option<CryptoError>,
    },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("transmission error: {0}")]
    TransmissionError(String),

    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    #[error("configuration error: {0}")]
    ConfigurationError(String),

    #[error("crypto error: {0}")]
    CryptoError(CryptoError),
}

impl MessageError {
    pub fn invalid_message(reason: &str) -> Self {
        MessageError::InvalidMessage {
            reason: reason.to_string(),
            source: None,
        }
    }
}

impl From<CryptoError> for MessageError {
    fn from(err: CryptoError) -> Self {
        match err {
            CryptoError::ContextError(ContextError::ConfigurationError(msg)) => {
                MessageError::ConfigurationError(msg)
            }
            _ => MessageError::CryptoError(err),
        }
    }
}

/// `Dispatcher` is a transport able to deliver packed envelopes
///
/// A dispatcher may answer with an envelope when the transport supports a return route, no
/// timeout or retry is applied outside of it
#[async_trait]
pub trait Dispatcher: Send + Sync {
    fn schemes(&self) -> Vec<String>;

    async fn dispatch(
        &self,
        uri: Uri,
        envelope: PackedEnvelope,
    ) -> Result<Option<PackedEnvelope>, MessageError>;
}

/// `MessageAPI` is the secure message service used to exchange messages with other agents
#[async_trait]
pub trait MessageAPI: Clone {
    async fn send(
        &self,
        ctx: &AgentContext,
        message: ProtocolMessage,
        recipient_key: String,
        endpoint: String,
        routing_keys: Vec<String>,
        sender_key: Option<String>,
    ) -> Result<(), MessageError>;

    #[allow(clippy::too_many_arguments)]
    async fn send_receive(
        &self,
        ctx: &AgentContext,
        message: ProtocolMessage,
        recipient_key: String,
        endpoint: String,
        routing_keys: Vec<String>,
        sender_key: Option<String>,
        return_route: ReturnRouteMode,
    ) -> Result<UnpackedMessageContext, MessageError>;

    async fn receive(
        &self,
        ctx: &AgentContext,
        envelope: PackedEnvelope,
    ) -> Result<UnpackedMessageContext, MessageError>;
}

pub trait UsecaseBuilder: MessageAPI {
    type CryptoImplementer: CryptoProvider;

    fn crypto(&self) -> Self::CryptoImplementer;
}
