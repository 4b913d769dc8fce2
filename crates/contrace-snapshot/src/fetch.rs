//! Snapshot sources: a live Neo4j graph or a JSON dataset file.

use std::path::Path;

use contrace_core::Dataset;
use contrace_graph::GraphClient;

use crate::error::Result;
use crate::graph::ContactGraph;

/// Export the whole contact-tracing graph from Neo4j into memory.
pub async fn fetch_graph(client: &GraphClient) -> Result<ContactGraph> {
    let dataset = client.export_dataset().await?;
    Ok(ContactGraph::from_dataset(dataset))
}

/// Read a `Dataset` from a JSON file.
pub async fn read_dataset(path: &Path) -> Result<Dataset> {
    let raw = tokio::fs::read_to_string(path).await?;
    let dataset = serde_json::from_str(&raw)?;
    tracing::debug!(path = %path.display(), "Read dataset");
    Ok(dataset)
}

/// Write a `Dataset` to a JSON file, pretty-printed.
pub async fn write_dataset(path: &Path, dataset: &Dataset) -> Result<()> {
    let raw = serde_json::to_string_pretty(dataset)?;
    tokio::fs::write(path, raw).await?;
    tracing::debug!(path = %path.display(), "Wrote dataset");
    Ok(())
}
