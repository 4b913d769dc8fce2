//! The contact-tracing query contract implemented by every backend.

use async_trait::async_trait;

use crate::error::TraceError;
use crate::types::{CarelessPerson, InformList, SickSite, SpreadCount};

/// Named contact-tracing questions over the visit graph.
///
/// Every operation except [`ContactTracer::top_sick_site`] returns an empty
/// vector when nothing matches. Unknown person names never raise an error.
/// Result vectors come back in a deterministic order documented per method.
#[async_trait]
pub trait ContactTracer: Send + Sync {
    /// Node labels present in the store, sorted.
    async fn list_labels(&self) -> Result<Vec<String>, TraceError>;

    /// Sick people who, at or after their confirmation, shared a place with a
    /// healthy visit that also started at or after that confirmation.
    /// Distinct names, sorted.
    async fn possible_spreaders(&self) -> Result<Vec<String>, TraceError>;

    /// For each sick person, the number of distinct healthy visits starting at
    /// or after their confirmation at places they visited. Sorted by name.
    async fn possible_spread_counts(&self) -> Result<Vec<SpreadCount>, TraceError>;

    /// Sick people who visited more than the careless threshold of distinct
    /// places after confirmation, by place count descending then name.
    async fn careless_people(&self) -> Result<Vec<CarelessPerson>, TraceError>;

    /// Sick people with no bar visit at or after confirmation. Sorted.
    async fn socially_careful(&self) -> Result<Vec<String>, TraceError>;

    /// Healthy people whose visit overlapped a sick visit at the same place for
    /// at least the minimum overlap, grouped per sick person.
    async fn people_to_inform(&self) -> Result<Vec<InformList>, TraceError>;

    /// Flag every person `people_to_inform` would return as high risk.
    ///
    /// Idempotent: re-running returns the same names and re-asserts the flag.
    async fn set_high_risk(&self) -> Result<Vec<String>, TraceError>;

    /// Healthy people reachable from `name` within the companion hop window,
    /// excluding `name` itself. Sorted.
    async fn healthy_companions_of(&self, name: &str) -> Result<Vec<String>, TraceError>;

    /// The place type most visited by sick people at or before confirmation.
    ///
    /// Ties break on place type, ascending. Fails with
    /// [`TraceError::EmptyResult`] when there are no such visits.
    async fn top_sick_site(&self) -> Result<SickSite, TraceError>;

    /// The subset of `names` currently marked Sick. Sorted.
    async fn sick_from(&self, names: &[String]) -> Result<Vec<String>, TraceError>;
}
