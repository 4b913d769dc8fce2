//! contrace-snapshot: In-memory contact tracing over a graph snapshot.
//!
//! Loads persons, places and visits (from Neo4j or a JSON dataset) into an
//! in-memory graph and answers the same questions as the Cypher backend.
//! Companion traversal is an explicit bounded BFS; the high-risk write is a
//! two-phase compute-then-apply over the snapshot.

pub mod analysis;
pub mod error;
pub mod fetch;
pub mod graph;
pub mod traversal;

#[cfg(test)]
mod testutil;

pub use error::SnapshotError;
pub use graph::ContactGraph;

use std::path::Path;

use async_trait::async_trait;
use tokio::sync::RwLock;

use contrace_core::{
    CarelessPerson, ContactTracer, Dataset, InformList, RiskLevel, SickSite, SpreadCount,
    TraceError,
};
use contrace_graph::GraphClient;

/// A `ContactTracer` backed by an in-memory snapshot.
pub struct SnapshotTracer {
    graph: RwLock<ContactGraph>,
}

impl SnapshotTracer {
    pub fn new(graph: ContactGraph) -> Self {
        tracing::info!(
            persons = graph.person_count(),
            visits = graph.visit_count(),
            "Snapshot ready"
        );
        Self {
            graph: RwLock::new(graph),
        }
    }

    pub fn from_dataset(dataset: Dataset) -> Self {
        Self::new(ContactGraph::from_dataset(dataset))
    }

    /// Snapshot the current content of a live graph.
    pub async fn fetch(client: &GraphClient) -> error::Result<Self> {
        Ok(Self::new(fetch::fetch_graph(client).await?))
    }

    /// Load a snapshot from a JSON dataset file.
    pub async fn open(path: &Path) -> error::Result<Self> {
        Ok(Self::from_dataset(fetch::read_dataset(path).await?))
    }

    /// Persist the snapshot, including any risk flags set since loading.
    pub async fn save(&self, path: &Path) -> error::Result<()> {
        let dataset = self.dataset().await;
        fetch::write_dataset(path, &dataset).await
    }

    /// Current snapshot content.
    pub async fn dataset(&self) -> Dataset {
        self.graph.read().await.to_dataset()
    }
}

#[async_trait]
impl ContactTracer for SnapshotTracer {
    async fn list_labels(&self) -> Result<Vec<String>, TraceError> {
        Ok(self.graph.read().await.labels())
    }

    async fn possible_spreaders(&self) -> Result<Vec<String>, TraceError> {
        Ok(analysis::possible_spreaders(&*self.graph.read().await))
    }

    async fn possible_spread_counts(&self) -> Result<Vec<SpreadCount>, TraceError> {
        Ok(analysis::possible_spread_counts(&*self.graph.read().await))
    }

    async fn careless_people(&self) -> Result<Vec<CarelessPerson>, TraceError> {
        Ok(analysis::careless_people(&*self.graph.read().await))
    }

    async fn socially_careful(&self) -> Result<Vec<String>, TraceError> {
        Ok(analysis::socially_careful(&*self.graph.read().await))
    }

    async fn people_to_inform(&self) -> Result<Vec<InformList>, TraceError> {
        Ok(analysis::people_to_inform(&*self.graph.read().await))
    }

    async fn set_high_risk(&self) -> Result<Vec<String>, TraceError> {
        // Phase 1: compute the qualifying set under a shared lock.
        let candidates = analysis::high_risk_candidates(&*self.graph.read().await);

        // Phase 2: apply the flag. Re-asserting an existing flag is a no-op.
        let mut graph = self.graph.write().await;
        let mut names = Vec::with_capacity(candidates.len());
        for index in candidates {
            let person = &mut graph.persons[index];
            person.risk = Some(RiskLevel::High);
            names.push(person.name.clone());
        }

        tracing::info!(flagged = names.len(), "Set high risk");
        Ok(names)
    }

    async fn healthy_companions_of(&self, name: &str) -> Result<Vec<String>, TraceError> {
        Ok(analysis::healthy_companions_of(&*self.graph.read().await, name))
    }

    async fn top_sick_site(&self) -> Result<SickSite, TraceError> {
        analysis::top_sick_site(&*self.graph.read().await).ok_or(TraceError::EmptyResult {
            operation: "top_sick_site",
        })
    }

    async fn sick_from(&self, names: &[String]) -> Result<Vec<String>, TraceError> {
        Ok(analysis::sick_from(&*self.graph.read().await, names))
    }
}
