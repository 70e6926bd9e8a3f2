use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceToolsError {
    #[error("Could not initialize client: {0}")]
    Initialization(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}
