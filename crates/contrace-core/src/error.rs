use thiserror::Error;

/// Error taxonomy shared by every `ContactTracer` backend.
#[derive(Error, Debug)]
pub enum TraceError {
    #[error("Graph store unreachable: {0}")]
    Connection(String),

    #[error("Query rejected by graph store: {0}")]
    Query(String),

    #[error("No rows returned by {operation}")]
    EmptyResult { operation: &'static str },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<config::ConfigError> for TraceError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}
