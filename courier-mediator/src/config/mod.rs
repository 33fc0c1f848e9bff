mod agent;
pub use agent::Agent;

mod backup;
pub use backup::Backup;

mod config;
pub use config::Config;

mod parser;
pub use parser::Parser;
