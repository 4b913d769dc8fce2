//! contrace-core: Shared types, configuration, and error handling for contrace.
//!
//! This crate provides the foundations used by every contrace backend:
//! - Domain types (Person, Place, Visit) and the `Dataset` interchange format
//! - Typed result records for each contact-tracing question
//! - Tracing policy constants shared by the Cypher and in-memory backends
//! - The `ContactTracer` trait implemented by each backend
//! - Layered configuration loading
//! - The `TraceError` taxonomy

pub mod config;
pub mod error;
pub mod policy;
pub mod tracer;
pub mod types;

pub use error::TraceError;
pub use tracer::ContactTracer;
pub use types::{
    CarelessPerson, Dataset, HealthStatus, InformList, Person, Place, RiskLevel, SickSite,
    SpreadCount, Visit,
};
