//! `revocation` is the domain used to pick the registrar responsible for an issuer
//!
//! Credential registries may be served by several registrars, each one claiming a namespace of
//! issuer identifiers. Writing a registry through the wrong registrar silently corrupts it, so
//! the [`Resolver`] refuses to guess: an issuer must be supported by exactly one registrar.
pub mod types;

mod registrar;
pub use registrar::PatternRegistrar;

mod resolver;
pub use resolver::Resolver;
