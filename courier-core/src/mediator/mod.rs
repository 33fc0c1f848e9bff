//! `mediator` is the domain of an always-online relay agent
//!
//! The relay keeps signed backups on behalf of agents which may be offline. All of its
//! protocols are authenticated by a detached signature produced with the key named by the
//! backup identifier.
pub mod backup;
