//! `agent` is the domain used to maintain a secure communication between agents
//!
//! The `agent` domain has three sub-domains in it:
//!
//! - `context`
//! - `crypto`
//! - `message`
//!
//! The `context` is the per-activation state of an agent. It holds the secure storage backend,
//! which is either a `legacy` single-session wallet or a `session` based store but never both,
//! the lazily resolved network pool handle, and an inbound queue used to process messages later.
//!
//! The `crypto` is the capability used to pack, unpack and sign envelopes through the context
//! storage backend, and to verify detached signatures.
//!
//! The `message` is the `DIDComm` protocol message layer, it validates, packs and dispatches
//! outbound messages through a transport selected by the endpoint scheme.
pub mod context;
pub mod crypto;
pub mod message;
