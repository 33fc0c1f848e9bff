//! `message` is a sub-domain of `agent` which maintains the protocol messages exchanged
//! between agents
//!
//! An outbound [`ProtocolMessage`] is validated, packed through the context crypto capability
//! and handed to a [`types::Dispatcher`] selected by the endpoint scheme. The dispatchers are
//! registered once at startup in a [`DispatchRegistry`], the first registered dispatcher
//! supporting a scheme wins.
pub mod types;

mod envelope;
pub use envelope::{PackedEnvelope, ReturnRouteMode, UnpackedMessageContext};

mod message;
pub use message::{MessageType, ProtocolMessage};

mod registry;
pub use registry::DispatchRegistry;

mod usecase;
pub use usecase::Usecase;
