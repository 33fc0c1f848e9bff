use std::fmt;

use rst_common::standard::serde::{self, Deserialize, Serialize};

use crate::agent::crypto::types::UnpackResult;

use super::message::{MessageType, ProtocolMessage};
use super::types::MessageError;

/// `PackedEnvelope` is an encrypted message ready to be dispatched
///
/// The payload is opaque, the message type is carried next to it so transports are able to
/// route it without unpacking
#[derive(Debug, Clone, PartialEq)]
pub struct PackedEnvelope {
    pub payload: Vec<u8>,
    pub message_type: String,
}

impl PackedEnvelope {
    pub fn new(payload: Vec<u8>, message_type: String) -> Self {
        Self {
            payload,
            message_type,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}

/// `UnpackedMessageContext` is the plaintext view of a received envelope
#[derive(Debug, Clone, PartialEq)]
pub struct UnpackedMessageContext {
    pub message: Vec<u8>,
    pub sender_key: Option<String>,
    pub recipient_key: Option<String>,
    pub message_type: MessageType,
}

impl UnpackedMessageContext {
    pub fn to_message(&self) -> Result<ProtocolMessage, MessageError> {
        ProtocolMessage::try_from(self.message.clone())
    }
}

impl TryFrom<UnpackResult> for UnpackedMessageContext {
    type Error = MessageError;

    fn try_from(value: UnpackResult) -> Result<Self, Self::Error> {
        let message = ProtocolMessage::try_from(value.message.clone())?;
        message.validate()?;

        let message_type = MessageType::parse(&message.get_type())?;
        Ok(Self {
            message: value.message,
            sender_key: value.sender_key,
            recipient_key: value.recipient_key,
            message_type,
        })
    }
}

/// `ReturnRouteMode` asks the receiving agent to answer through the same transport
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(crate = "self::serde")]
#[serde(rename_all = "lowercase")]
pub enum ReturnRouteMode {
    None,
    All,
    Thread,
}

impl fmt::Display for ReturnRouteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReturnRouteMode::None => write!(f, "none"),
            ReturnRouteMode::All => write!(f, "all"),
            ReturnRouteMode::Thread => write!(f, "thread"),
        }
    }
}
