//! Write operations for the contact-tracing graph.
//!
//! Loading uses MERGE (upsert) semantics so a dataset can be loaded twice
//! without duplicating nodes or visits. Persons are identified by `name`,
//! places by `id`, visits by `id`.

use neo4rs::{query, Query};

use contrace_core::policy::MIN_OVERLAP_SECS;
use contrace_core::types::format_timestamp;
use contrace_core::{Dataset, Person, Place, RiskLevel, Visit};

use crate::client::{GraphClient, GraphError};
use crate::queries::{strings, OVERLAPPING_VISITS};

impl GraphClient {
    // ── Risk Flagging ────────────────────────────────────────────

    /// Flag every healthy person with a qualifying overlap as high risk.
    ///
    /// Runs as one auto-commit query, so the match and the write are atomic.
    /// `SET` only re-asserts the value, which keeps re-runs idempotent.
    pub async fn set_high_risk(&self) -> Result<Vec<String>, GraphError> {
        let cypher = format!(
            "{OVERLAPPING_VISITS}
             WITH DISTINCT healthy
             SET healthy.risk = $risk
             RETURN healthy.name AS highRiskName
             ORDER BY highRiskName"
        );

        let q = query(&cypher)
            .param("minOverlap", MIN_OVERLAP_SECS)
            .param("risk", RiskLevel::High.as_str());

        let rows = self.query_rows(q).await?;
        tracing::info!(flagged = rows.len(), "Set high risk");
        strings(&rows, "highRiskName")
    }

    // ── Upserts ──────────────────────────────────────────────────

    /// Upsert a Person node.
    pub async fn upsert_person(&self, person: &Person) -> Result<(), GraphError> {
        self.run(person_query(person)).await
    }

    /// Upsert a Place node.
    pub async fn upsert_place(&self, place: &Place) -> Result<(), GraphError> {
        self.run(place_query(place)).await
    }

    /// Upsert a visit, both as a `VISITS` relationship and as a `Visit` node.
    ///
    /// Person and place must already exist; otherwise nothing is written.
    pub async fn upsert_visit(&self, visit: &Visit) -> Result<(), GraphError> {
        self.run(visit_query(visit)).await
    }

    // ── Batch Operations ─────────────────────────────────────────

    /// Load a whole dataset in a single transaction.
    pub async fn load_dataset(&self, dataset: &Dataset) -> Result<(), GraphError> {
        let mut txn = self.start_txn().await?;

        for person in &dataset.persons {
            txn.run(person_query(person)).await?;
        }
        for place in &dataset.places {
            txn.run(place_query(place)).await?;
        }
        for visit in &dataset.visits {
            txn.run(visit_query(visit)).await?;
        }

        txn.commit().await?;
        tracing::info!(
            persons = dataset.persons.len(),
            places = dataset.places.len(),
            visits = dataset.visits.len(),
            "Loaded dataset"
        );
        Ok(())
    }

    /// Delete every Person, Place and Visit node with their relationships.
    pub async fn clear(&self) -> Result<(), GraphError> {
        let q = query(
            "MATCH (n)
             WHERE n:Person OR n:Place OR n:Visit
             DETACH DELETE n",
        );
        self.run(q).await?;
        tracing::info!("Cleared contact-tracing graph");
        Ok(())
    }
}

// ── Query Builders ───────────────────────────────────────────────

fn person_query(person: &Person) -> Query {
    query(
        "MERGE (n:Person {name: $name})
         SET n.healthstatus = $healthstatus,
             n.confirmedtime = CASE WHEN $confirmedtime = '' THEN null
                                    ELSE localdatetime($confirmedtime) END,
             n.risk = CASE WHEN $risk = '' THEN null ELSE $risk END",
    )
    .param("name", person.name.clone())
    .param("healthstatus", person.healthstatus.as_str())
    .param(
        "confirmedtime",
        person
            .confirmedtime
            .as_ref()
            .map(format_timestamp)
            .unwrap_or_default(),
    )
    .param("risk", person.risk.map(|r| r.as_str()).unwrap_or_default())
}

fn place_query(place: &Place) -> Query {
    query(
        "MERGE (n:Place {id: $id})
         SET n.type = $type,
             n.name = CASE WHEN $name = '' THEN null ELSE $name END",
    )
    .param("id", place.id.clone())
    .param("type", place.place_type.clone())
    .param("name", place.name.clone().unwrap_or_default())
}

fn visit_query(visit: &Visit) -> Query {
    query(
        "MATCH (person:Person {name: $person})
         MATCH (place:Place {id: $place})
         MERGE (person)-[r:VISITS {id: $id}]->(place)
         SET r.starttime = localdatetime($starttime),
             r.endtime = localdatetime($endtime)
         MERGE (v:Visit {id: $id})
         SET v.starttime = r.starttime, v.endtime = r.endtime
         MERGE (person)-[:PERFORMS_VISIT]->(v)
         MERGE (v)-[:LOCATED_AT]->(place)",
    )
    .param("id", visit.id.clone())
    .param("person", visit.person.clone())
    .param("place", visit.place.clone())
    .param("starttime", format_timestamp(&visit.starttime))
    .param("endtime", format_timestamp(&visit.endtime))
}
