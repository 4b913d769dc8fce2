//! contrace-graph: Neo4j client for the contact-tracing graph.
//!
//! Every contact-tracing question is a single parameterized Cypher query
//! executed by Neo4j; this crate owns the query text and the mapping of
//! result rows into `contrace-core` records. It is also the only place that
//! writes to the graph (`set_high_risk` and fixture loading).

pub mod client;
pub mod mutations;
pub mod queries;
mod tracer;

pub use client::{GraphClient, GraphConfig, GraphError};
