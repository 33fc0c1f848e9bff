pub mod backups;
pub mod logging;
pub mod provision;

mod config;
pub use config::resolve_config;
