//! `prople-courier-core` provides the core business logic of the `prople/courier` agent
//! messaging and mediator stack.
//!
//! There are three sub-domains:
//!
//! - `agent`
//! - `mediator`
//! - `revocation`
//!
//! ---
//!
//! The `agent` domain maintains the secure communication of an agent through `DIDComm Messaging`.
//! It owns the agent context (the secure storage backend used for every cryptographic
//! operation), the message objects, and the service used to pack and dispatch messages to
//! other agents through pluggable transports.
//!
//! ---
//!
//! The `mediator` domain is an always-online relay acting on behalf of agents that may be
//! offline. The relay stores signed backups for those agents, and every request coming
//! from the outside must carry a signature that proves the caller controls the backup key.
//!
//! ---
//!
//! The `revocation` domain selects the single registrar responsible for an issuer
//! identifier. Registrars are configured once, and an identifier must be claimed by exactly
//! one of them.
pub mod agent;
pub mod mediator;
pub mod revocation;

#[cfg(test)]
pub(crate) mod testing;
