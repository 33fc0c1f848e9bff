//! `context` is a sub-domain of `agent` which focus to maintain the agent's per-activation state
//!
//! An [`AgentContext`] is created once per agent activation and destroyed when the owning agent
//! session ends. It is used by a single message processing flow at a time, but its network pool
//! handle can be shared safely between flows.
//!
//! The storage backend is modeled as [`types::StorageBackend`], a tagged union between the
//! `legacy` wallet backend and the `session` based backend. Building a context with both or none
//! of them fails with [`types::ContextError::ConfigurationError`].
pub mod types;

mod context;
pub use context::{AgentContext, AgentContextBuilder};

mod queue;
pub use queue::InboundQueue;
