//! `crypto` is a sub-domain of `agent` which provides the cryptographic capability
//!
//! The primitives themselves are owned by the storage backends. This sub-domain only exposes
//! them through a single [`types::CryptoProvider`] capability which takes an
//! [`super::context::AgentContext`] and delegates to the backend active in it.
pub mod types;

mod provider;
pub use provider::ContextCrypto;
