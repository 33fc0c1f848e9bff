//! `router` takes the inbound envelopes of the mediator through their whole flow
//!
//! An envelope is unpacked with the mediator context, checked against the supported message
//! types, handled by the backup relay, and the response is packed back to the sender. Inbound
//! envelopes can also be queued in the context and processed later in their arrival order.
pub mod types;

mod router;
pub use router::Router;
