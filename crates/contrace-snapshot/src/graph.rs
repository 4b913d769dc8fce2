//! In-memory graph representation for snapshot evaluation.
//!
//! Converts a `Dataset` into dense vectors with person-to-visit and
//! place-to-visit adjacency lists, so every query is a scan over indices.

use std::collections::HashMap;

use chrono::NaiveDateTime;

use contrace_core::{Dataset, Person, Place, Visit};

/// A visit resolved to dense person and place indices.
#[derive(Debug, Clone)]
pub struct GraphVisit {
    /// Original visit id.
    pub id: String,
    pub person: usize,
    pub place: usize,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl GraphVisit {
    pub fn interval(&self) -> (NaiveDateTime, NaiveDateTime) {
        (self.start, self.end)
    }
}

/// The in-memory contact graph.
#[derive(Debug, Clone, Default)]
pub struct ContactGraph {
    /// All persons, indexed by dense index.
    pub persons: Vec<Person>,
    /// All places, indexed by dense index.
    pub places: Vec<Place>,
    /// All valid visits.
    pub visits: Vec<GraphVisit>,
    /// `person_visits[i]` = indices into `visits` made by person `i`.
    pub person_visits: Vec<Vec<usize>>,
    /// `place_visits[j]` = indices into `visits` made at place `j`.
    pub place_visits: Vec<Vec<usize>>,
    /// Person name → dense index.
    pub person_index: HashMap<String, usize>,
    /// Place id → dense index.
    pub place_index: HashMap<String, usize>,
}

impl ContactGraph {
    /// Build from a dataset.
    ///
    /// Duplicate names or ids keep the first occurrence. Visits referencing an
    /// unknown person or place, or ending before they start, are skipped.
    pub fn from_dataset(dataset: Dataset) -> Self {
        let mut graph = Self::default();

        for person in dataset.persons {
            if graph.person_index.contains_key(&person.name) {
                tracing::warn!(name = %person.name, "Duplicate person, keeping first");
                continue;
            }
            graph.person_index.insert(person.name.clone(), graph.persons.len());
            graph.persons.push(person);
        }

        for place in dataset.places {
            if graph.place_index.contains_key(&place.id) {
                tracing::warn!(id = %place.id, "Duplicate place, keeping first");
                continue;
            }
            graph.place_index.insert(place.id.clone(), graph.places.len());
            graph.places.push(place);
        }

        graph.person_visits = vec![Vec::new(); graph.persons.len()];
        graph.place_visits = vec![Vec::new(); graph.places.len()];

        for visit in dataset.visits {
            let (Some(&person), Some(&place)) = (
                graph.person_index.get(&visit.person),
                graph.place_index.get(&visit.place),
            ) else {
                tracing::warn!(
                    id = %visit.id,
                    "Visit references unknown person or place, skipping"
                );
                continue;
            };
            if visit.starttime > visit.endtime {
                tracing::warn!(id = %visit.id, "Visit ends before it starts, skipping");
                continue;
            }

            let index = graph.visits.len();
            graph.person_visits[person].push(index);
            graph.place_visits[place].push(index);
            graph.visits.push(GraphVisit {
                id: visit.id,
                person,
                place,
                start: visit.starttime,
                end: visit.endtime,
            });
        }

        graph
    }

    /// Convert back into a `Dataset`, preserving order.
    pub fn to_dataset(&self) -> Dataset {
        Dataset {
            persons: self.persons.clone(),
            places: self.places.clone(),
            visits: self
                .visits
                .iter()
                .map(|v| Visit {
                    id: v.id.clone(),
                    person: self.persons[v.person].name.clone(),
                    place: self.places[v.place].id.clone(),
                    starttime: v.start,
                    endtime: v.end,
                })
                .collect(),
        }
    }

    /// Look up a person by name.
    pub fn person(&self, name: &str) -> Option<&Person> {
        self.person_index.get(name).map(|&i| &self.persons[i])
    }

    /// Sick persons with a confirmation time, as `(index, confirmedtime)`.
    ///
    /// A sick person without `confirmedtime` never satisfies a time
    /// comparison, so every time-bounded question skips them.
    pub fn confirmed_sick(&self) -> impl Iterator<Item = (usize, NaiveDateTime)> + '_ {
        self.persons
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_sick())
            .filter_map(|(i, p)| p.confirmedtime.map(|t| (i, t)))
    }

    /// Visits made by person `i`.
    pub fn visits_of(&self, person: usize) -> impl Iterator<Item = &GraphVisit> + '_ {
        self.person_visits[person].iter().map(|&v| &self.visits[v])
    }

    /// Visits made at place `j`.
    pub fn visits_at(&self, place: usize) -> impl Iterator<Item = &GraphVisit> + '_ {
        self.place_visits[place].iter().map(|&v| &self.visits[v])
    }

    /// Labels with at least one entity, sorted.
    pub fn labels(&self) -> Vec<String> {
        let mut labels = Vec::new();
        if !self.persons.is_empty() {
            labels.push("Person".to_string());
        }
        if !self.places.is_empty() {
            labels.push("Place".to_string());
        }
        if !self.visits.is_empty() {
            labels.push("Visit".to_string());
        }
        labels
    }

    /// Number of persons in the graph.
    pub fn person_count(&self) -> usize {
        self.persons.len()
    }

    /// Number of visits in the graph.
    pub fn visit_count(&self) -> usize {
        self.visits.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::*;

    #[test]
    fn test_from_dataset_basic() {
        let graph = ContactGraph::from_dataset(Dataset {
            persons: vec![sick("Sam", at(1, 8, 0)), healthy("Hana")],
            places: vec![place("bar", "Bar")],
            visits: vec![
                visit("v1", "Sam", "bar", at(1, 9, 0), at(1, 10, 0)),
                visit("v2", "Hana", "bar", at(1, 9, 0), at(1, 10, 0)),
            ],
        });

        assert_eq!(graph.person_count(), 2);
        assert_eq!(graph.visit_count(), 2);
        assert_eq!(graph.person_visits[0], vec![0]);
        assert_eq!(graph.place_visits[0], vec![0, 1]);
        assert_eq!(graph.labels(), vec!["Person", "Place", "Visit"]);
    }

    #[test]
    fn test_invalid_visits_skipped() {
        let graph = ContactGraph::from_dataset(Dataset {
            persons: vec![healthy("Hana")],
            places: vec![place("bar", "Bar")],
            visits: vec![
                visit("v1", "Ghost", "bar", at(1, 9, 0), at(1, 10, 0)),
                visit("v2", "Hana", "nowhere", at(1, 9, 0), at(1, 10, 0)),
                visit("v3", "Hana", "bar", at(1, 11, 0), at(1, 10, 0)),
            ],
        });

        assert_eq!(graph.visit_count(), 0);
        assert_eq!(graph.labels(), vec!["Person", "Place"]);
    }

    #[test]
    fn test_duplicate_person_keeps_first() {
        let graph = ContactGraph::from_dataset(Dataset {
            persons: vec![healthy("Hana"), sick("Hana", at(1, 8, 0))],
            ..Default::default()
        });

        assert_eq!(graph.person_count(), 1);
        assert!(graph.person("Hana").unwrap().is_healthy());
    }

    #[test]
    fn test_confirmed_sick_skips_unconfirmed() {
        let mut unconfirmed = sick("Uma", at(1, 8, 0));
        unconfirmed.confirmedtime = None;
        let graph = ContactGraph::from_dataset(Dataset {
            persons: vec![sick("Sam", at(1, 8, 0)), unconfirmed, healthy("Hana")],
            ..Default::default()
        });

        let confirmed: Vec<usize> = graph.confirmed_sick().map(|(i, _)| i).collect();
        assert_eq!(confirmed, vec![0]);
    }

    #[test]
    fn test_to_dataset_round_trip() {
        let dataset = Dataset {
            persons: vec![sick("Sam", at(1, 8, 0))],
            places: vec![place("bar", "Bar")],
            visits: vec![visit("v1", "Sam", "bar", at(1, 9, 0), at(1, 10, 0))],
        };
        let graph = ContactGraph::from_dataset(dataset.clone());
        assert_eq!(graph.to_dataset(), dataset);
    }
}
