//! `backup` is a sub-domain of `mediator` which implements the backup relay protocol
//!
//! An agent stores a backup by sending its attachments together with a signature over the first
//! attachment. The relay verifies the signature before anything is written, then assigns a
//! timestamp which is used both as the ordering key and the storage location name. Timestamps
//! are strictly increasing per backup identifier.
//!
//! Retrieving returns every stored attachment of the identifier, most recent backup first.
pub mod messages;
pub mod types;

mod usecase;
pub use usecase::{list_timestamps, Usecase};

mod handler;
pub use handler::BackupHandler;
