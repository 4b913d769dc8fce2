//! Error types for the contrace-snapshot crate.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("Graph error: {0}")]
    Graph(#[from] contrace_graph::GraphError),

    #[error("Snapshot file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Snapshot JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SnapshotError>;
