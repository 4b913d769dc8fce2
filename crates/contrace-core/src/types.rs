//! Core domain types for the contact-tracing graph.
//!
//! Entity types mirror the node and relationship properties stored in the
//! graph, so field names follow the graph schema (`healthstatus`,
//! `confirmedtime`, `type`) rather than Rust conventions where they differ.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ── Enumerations ─────────────────────────────────────────────────

/// Health status of a person. Sick and Healthy are mutually exclusive.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum HealthStatus {
    Sick,
    Healthy,
}

impl HealthStatus {
    /// The property value stored in the graph.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sick => "Sick",
            Self::Healthy => "Healthy",
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HealthStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Sick" => Ok(Self::Sick),
            "Healthy" => Ok(Self::Healthy),
            other => Err(format!("unknown health status: {other}")),
        }
    }
}

/// Exposure risk flag carried by a person.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Normal,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::High => "high",
        }
    }
}

impl FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(Self::Normal),
            "high" => Ok(Self::High),
            other => Err(format!("unknown risk level: {other}")),
        }
    }
}

// ── Entities ─────────────────────────────────────────────────────

/// A person node. `name` is the unique identifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Person {
    pub name: String,
    pub healthstatus: HealthStatus,
    /// Present when the person is Sick.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmedtime: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk: Option<RiskLevel>,
}

impl Person {
    pub fn is_sick(&self) -> bool {
        self.healthstatus == HealthStatus::Sick
    }

    pub fn is_healthy(&self) -> bool {
        self.healthstatus == HealthStatus::Healthy
    }
}

/// A place node. `id` is the unique identifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Place {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub place_type: String,
}

/// A time-bounded visit of a person (by name) to a place (by id).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Visit {
    pub id: String,
    pub person: String,
    pub place: String,
    pub starttime: NaiveDateTime,
    pub endtime: NaiveDateTime,
}

/// The full content of a contact-tracing graph, used for fixtures and
/// offline snapshots.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Dataset {
    #[serde(default)]
    pub persons: Vec<Person>,
    #[serde(default)]
    pub places: Vec<Place>,
    #[serde(default)]
    pub visits: Vec<Visit>,
}

impl Dataset {
    pub fn is_empty(&self) -> bool {
        self.persons.is_empty() && self.places.is_empty() && self.visits.is_empty()
    }
}

// ── Result Records ───────────────────────────────────────────────

/// A sick person with the number of healthy visits that followed their
/// confirmation at places they visited.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SpreadCount {
    pub sick_name: String,
    pub nb_healthy: i64,
}

/// A sick person who kept visiting many distinct places after confirmation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CarelessPerson {
    pub sick_name: String,
    pub nb_places: i64,
}

/// A sick person and the healthy people who must be informed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InformList {
    pub sick_name: String,
    pub people_to_inform: Vec<String>,
}

/// The place type most visited by sick people before their confirmation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SickSite {
    pub place_type: String,
    pub nb_of_sick_visits: i64,
}

// ── Timestamps ───────────────────────────────────────────────────

/// Format a timestamp the way it is sent to the graph (`localdatetime($x)`).
///
/// Fractional seconds are kept so ordering survives a load.
pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format("%Y-%m-%dT%H:%M:%S%.f").to_string()
}

/// Parse a local date-time as printed by the graph's `toString()`.
///
/// Neo4j drops zero seconds (`2020-03-01T10:00`) and prints fractional
/// seconds when present, so both shapes are accepted.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M"))
        .ok()
}
