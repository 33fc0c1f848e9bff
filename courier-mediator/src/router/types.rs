use rst_common::with_errors::thiserror::{self, Error};

use prople_courier_core::agent::context::types::ContextError;
use prople_courier_core::agent::crypto::types::CryptoError;
use prople_courier_core::agent::message::types::MessageError;
use prople_courier_core::mediator::backup::types::BackupError;

#[derive(Debug, PartialEq, Error, Clone)]
pub enum MediatorError {
    #[error(transparent)]
    MessageError(#[from] MessageError),

    #[error(transparent)]
    BackupError(#[from] BackupError),

    #[error(transparent)]
    CryptoError(#[from] CryptoError),

    #[error(transparent)]
    ContextError(#[from] ContextError),

    #[error("anonymous sender: unable to answer message {0}")]
    AnonymousSender(String),

    #[error("envelope not addressed to the mediator: {0}")]
    MisaddressedEnvelope(String),

    #[error("unsupported message: {0}")]
    UnsupportedMessage(String),
}
