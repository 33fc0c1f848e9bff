use rst_common::with_errors::thiserror::{self, Error};

#[derive(Debug, Error)]
pub enum CourierdError {
    #[error("config error: {0}")]
    ConfigError(String),

    #[error("homedir error: {0}")]
    HomeDirError(String),

    #[error("mediator error: {0}")]
    MediatorError(String),

    #[error("output error: {0}")]
    OutputError(String),
}
