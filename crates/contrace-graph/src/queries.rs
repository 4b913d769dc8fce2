//! Read operations: the contact-tracing Cypher query set.
//!
//! Each question is one parameterized query. Only compile-time policy
//! constants are interpolated into query text; caller input always travels
//! as a parameter.

use neo4rs::query;

use contrace_core::policy::{
    BAR_PLACE_TYPE, CARELESS_PLACE_THRESHOLD, COMPANION_HOPS, MIN_OVERLAP_SECS,
};
use contrace_core::types::parse_timestamp;
use contrace_core::{
    CarelessPerson, Dataset, HealthStatus, InformList, Person, Place, RiskLevel, SickSite,
    SpreadCount, Visit,
};

use crate::client::{GraphClient, GraphError};

/// Pairs every sick visit with every healthy visit to the same place and
/// keeps the pairs sharing at least `$minOverlap` seconds.
///
/// Binds `sick` and `healthy`; shared by `people_to_inform` and `set_high_risk`.
pub(crate) const OVERLAPPING_VISITS: &str =
    "MATCH (sick:Person {healthstatus: 'Sick'})-[v1:VISITS]->(:Place)
           <-[v2:VISITS]-(healthy:Person {healthstatus: 'Healthy'})
     WITH sick, healthy,
          CASE WHEN v1.starttime > v2.starttime
               THEN v1.starttime ELSE v2.starttime END AS overlapStart,
          CASE WHEN v1.endtime < v2.endtime THEN v1.endtime ELSE v2.endtime END AS overlapEnd
     WHERE duration.inSeconds(overlapStart, overlapEnd).seconds >= $minOverlap";

impl GraphClient {
    // ── Diagnostics ──────────────────────────────────────────────

    /// Node labels present in the store.
    pub async fn list_labels(&self) -> Result<Vec<String>, GraphError> {
        let q = query("CALL db.labels() YIELD label RETURN label ORDER BY label");
        let rows = self.query_rows(q).await?;
        strings(&rows, "label")
    }

    // ── Spread Analysis ──────────────────────────────────────────

    /// Sick people whose post-confirmation visit shares a place with a healthy
    /// visit that also started after that confirmation.
    pub async fn possible_spreaders(&self) -> Result<Vec<String>, GraphError> {
        let q = query(
            "MATCH (sick:Person {healthstatus: 'Sick'})-[vS:VISITS]->(:Place)
                   <-[vH:VISITS]-(:Person {healthstatus: 'Healthy'})
             WHERE sick.confirmedtime <= vS.starttime
               AND sick.confirmedtime <= vH.starttime
             RETURN DISTINCT sick.name AS sickName
             ORDER BY sickName",
        );

        let rows = self.query_rows(q).await?;
        tracing::debug!(operation = "possible_spreaders", rows = rows.len());
        strings(&rows, "sickName")
    }

    /// Healthy visits after each sick person's confirmation, at places that
    /// person visited. Counts visits, not people.
    pub async fn possible_spread_counts(&self) -> Result<Vec<SpreadCount>, GraphError> {
        let q = query(
            "MATCH (sick:Person {healthstatus: 'Sick'})-[:VISITS]->(:Place)
                   <-[vH:VISITS]-(:Person {healthstatus: 'Healthy'})
             WHERE sick.confirmedtime <= vH.starttime
             RETURN sick.name AS sickName, count(DISTINCT vH) AS nbHealthy
             ORDER BY sickName",
        );

        let rows = self.query_rows(q).await?;
        tracing::debug!(operation = "possible_spread_counts", rows = rows.len());
        rows.iter()
            .map(|row| {
                Ok(SpreadCount {
                    sick_name: field(row, "sickName")?,
                    nb_healthy: field(row, "nbHealthy")?,
                })
            })
            .collect()
    }

    /// Sick people who visited more than `CARELESS_PLACE_THRESHOLD` distinct
    /// places after confirmation.
    pub async fn careless_people(&self) -> Result<Vec<CarelessPerson>, GraphError> {
        let cypher = format!(
            "MATCH (sick:Person {{healthstatus: 'Sick'}})-[v:VISITS]->(p:Place)
             WHERE sick.confirmedtime <= v.starttime
             WITH sick.name AS sickName, count(DISTINCT p) AS nbPlaces
             WHERE nbPlaces > {CARELESS_PLACE_THRESHOLD}
             RETURN sickName, nbPlaces
             ORDER BY nbPlaces DESC, sickName"
        );

        let rows = self.query_rows(query(&cypher)).await?;
        tracing::debug!(operation = "careless_people", rows = rows.len());
        rows.iter()
            .map(|row| {
                Ok(CarelessPerson {
                    sick_name: field(row, "sickName")?,
                    nb_places: field(row, "nbPlaces")?,
                })
            })
            .collect()
    }

    /// Sick people with no bar visit at or after confirmation.
    pub async fn socially_careful(&self) -> Result<Vec<String>, GraphError> {
        let q = query(
            "MATCH (sick:Person {healthstatus: 'Sick'})
             WHERE NOT EXISTS {
               MATCH (sick)-[v:VISITS]->(:Place {type: $barType})
               WHERE sick.confirmedtime <= v.starttime
             }
             RETURN sick.name AS sickName
             ORDER BY sickName",
        )
        .param("barType", BAR_PLACE_TYPE);

        let rows = self.query_rows(q).await?;
        tracing::debug!(operation = "socially_careful", rows = rows.len());
        strings(&rows, "sickName")
    }

    /// Healthy people to inform, per sick person, based on visit overlap.
    pub async fn people_to_inform(&self) -> Result<Vec<InformList>, GraphError> {
        let cypher = format!(
            "{OVERLAPPING_VISITS}
             WITH DISTINCT sick.name AS sickName, healthy.name AS toInform
             ORDER BY toInform
             WITH sickName, collect(toInform) AS peopleToInform
             RETURN sickName, peopleToInform
             ORDER BY peopleToInform, sickName"
        );

        let q = query(&cypher).param("minOverlap", MIN_OVERLAP_SECS);

        let rows = self.query_rows(q).await?;
        tracing::debug!(operation = "people_to_inform", rows = rows.len());
        rows.iter()
            .map(|row| {
                Ok(InformList {
                    sick_name: field(row, "sickName")?,
                    people_to_inform: field(row, "peopleToInform")?,
                })
            })
            .collect()
    }

    // ── Traversal ────────────────────────────────────────────────

    /// Healthy people within the companion hop window of `name`.
    pub async fn healthy_companions_of(&self, name: &str) -> Result<Vec<String>, GraphError> {
        let cypher = format!(
            "MATCH (p:Person {{name: $name}})
                   -[:VISITS*{min}..{max}]-(c:Person {{healthstatus: 'Healthy'}})
             WHERE c <> p
             RETURN DISTINCT c.name AS healthyName
             ORDER BY healthyName",
            min = COMPANION_HOPS.start(),
            max = COMPANION_HOPS.end(),
        );

        let q = query(&cypher).param("name", name.to_string());

        let rows = self.query_rows(q).await?;
        tracing::debug!(operation = "healthy_companions_of", name, rows = rows.len());
        strings(&rows, "healthyName")
    }

    // ── Aggregates & Filters ─────────────────────────────────────

    /// The place type sick people visited most at or before confirmation.
    pub async fn top_sick_site(&self) -> Result<SickSite, GraphError> {
        let q = query(
            "MATCH (sick:Person {healthstatus: 'Sick'})-[v:VISITS]->(p:Place)
             WHERE v.starttime <= sick.confirmedtime
             RETURN p.type AS placeType, count(v) AS nbOfSickVisits
             ORDER BY nbOfSickVisits DESC, placeType
             LIMIT 1",
        );

        match self.query_one(q).await? {
            Some(row) => Ok(SickSite {
                place_type: field(&row, "placeType")?,
                nb_of_sick_visits: field(&row, "nbOfSickVisits")?,
            }),
            None => Err(GraphError::EmptyResult {
                operation: "top_sick_site",
            }),
        }
    }

    /// The subset of `names` currently marked Sick.
    pub async fn sick_from(&self, names: &[String]) -> Result<Vec<String>, GraphError> {
        let q = query(
            "MATCH (p:Person {healthstatus: 'Sick'})
             WHERE p.name IN $listOfNames
             RETURN DISTINCT p.name AS sickName
             ORDER BY sickName",
        )
        .param("listOfNames", names.to_vec());

        let rows = self.query_rows(q).await?;
        strings(&rows, "sickName")
    }

    // ── Export ───────────────────────────────────────────────────

    /// Read every person, place and visit back into a `Dataset`.
    pub async fn export_dataset(&self) -> Result<Dataset, GraphError> {
        let person_rows = self
            .query_rows(query(
                "MATCH (p:Person)
                 RETURN p.name AS name, p.healthstatus AS healthstatus,
                        coalesce(toString(p.confirmedtime), '') AS confirmedtime,
                        coalesce(p.risk, '') AS risk
                 ORDER BY name",
            ))
            .await?;

        let mut persons = Vec::with_capacity(person_rows.len());
        for row in &person_rows {
            let status: String = field(row, "healthstatus")?;
            let risk: String = field(row, "risk")?;
            let confirmed: String = field(row, "confirmedtime")?;
            persons.push(Person {
                name: field(row, "name")?,
                healthstatus: status.parse::<HealthStatus>().map_err(GraphError::Serialization)?,
                confirmedtime: optional_timestamp(&confirmed)?,
                risk: match risk.as_str() {
                    "" => None,
                    other => Some(other.parse::<RiskLevel>().map_err(GraphError::Serialization)?),
                },
            });
        }

        let place_rows = self
            .query_rows(query(
                "MATCH (p:Place)
                 RETURN toString(p.id) AS id, coalesce(p.name, '') AS name, p.type AS type
                 ORDER BY id",
            ))
            .await?;

        let mut places = Vec::with_capacity(place_rows.len());
        for row in &place_rows {
            let name: String = field(row, "name")?;
            places.push(Place {
                id: field(row, "id")?,
                name: (!name.is_empty()).then_some(name),
                place_type: field(row, "type")?,
            });
        }

        let visit_rows = self
            .query_rows(query(
                "MATCH (person:Person)-[v:VISITS]->(place:Place)
                 RETURN coalesce(toString(v.id), '') AS id,
                        person.name AS person, toString(place.id) AS place,
                        toString(v.starttime) AS starttime, toString(v.endtime) AS endtime
                 ORDER BY person, starttime",
            ))
            .await?;

        let mut visits = Vec::with_capacity(visit_rows.len());
        for (i, row) in visit_rows.iter().enumerate() {
            let id: String = field(row, "id")?;
            let start: String = field(row, "starttime")?;
            let end: String = field(row, "endtime")?;
            visits.push(Visit {
                id: if id.is_empty() { format!("v{i}") } else { id },
                person: field(row, "person")?,
                place: field(row, "place")?,
                starttime: required_timestamp(&start)?,
                endtime: required_timestamp(&end)?,
            });
        }

        tracing::info!(
            persons = persons.len(),
            places = places.len(),
            visits = visits.len(),
            "Exported dataset"
        );

        Ok(Dataset {
            persons,
            places,
            visits,
        })
    }
}

// ── Row Mapping ──────────────────────────────────────────────────

/// Read a named column, mapping decode failures to `GraphError::Serialization`.
pub(crate) fn field<T>(row: &neo4rs::Row, key: &str) -> Result<T, GraphError>
where
    T: for<'de> serde::Deserialize<'de>,
{
    row.get::<T>(key)
        .map_err(|e| GraphError::Serialization(format!("Failed to read column {key}: {e}")))
}

/// Collect one string column from every row.
pub(crate) fn strings(rows: &[neo4rs::Row], key: &str) -> Result<Vec<String>, GraphError> {
    rows.iter().map(|row| field(row, key)).collect()
}

fn required_timestamp(raw: &str) -> Result<chrono::NaiveDateTime, GraphError> {
    parse_timestamp(raw)
        .ok_or_else(|| GraphError::Serialization(format!("Invalid local date-time: {raw:?}")))
}

fn optional_timestamp(raw: &str) -> Result<Option<chrono::NaiveDateTime>, GraphError> {
    if raw.is_empty() {
        return Ok(None);
    }
    required_timestamp(raw).map(Some)
}
