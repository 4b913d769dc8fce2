//! Contact-tracing questions evaluated over a `ContactGraph`.
//!
//! Each function mirrors one Cypher query of `contrace-graph` and returns
//! rows in the same order. All time comparisons are inclusive.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use contrace_core::policy::{
    overlaps_enough, BAR_PLACE_TYPE, CARELESS_PLACE_THRESHOLD, COMPANION_HOPS,
};
use contrace_core::{CarelessPerson, InformList, SickSite, SpreadCount};

use crate::graph::ContactGraph;
use crate::traversal::reachable_persons;

/// Sick people whose post-confirmation visit shares a place with a healthy
/// visit that also started after that confirmation.
pub fn possible_spreaders(graph: &ContactGraph) -> Vec<String> {
    let mut names = BTreeSet::new();

    for (sick, confirmed) in graph.confirmed_sick() {
        let spreads = graph
            .visits_of(sick)
            .filter(|v| v.start >= confirmed)
            .any(|v| {
                graph
                    .visits_at(v.place)
                    .any(|h| h.start >= confirmed && graph.persons[h.person].is_healthy())
            });
        if spreads {
            names.insert(graph.persons[sick].name.clone());
        }
    }

    names.into_iter().collect()
}

/// Distinct healthy visits starting at or after each sick person's
/// confirmation, at any place that person visited.
pub fn possible_spread_counts(graph: &ContactGraph) -> Vec<SpreadCount> {
    let mut counts = Vec::new();

    for (sick, confirmed) in graph.confirmed_sick() {
        let places: BTreeSet<usize> = graph.visits_of(sick).map(|v| v.place).collect();
        let nb_healthy = places
            .iter()
            .flat_map(|&place| graph.visits_at(place))
            .filter(|h| h.start >= confirmed && graph.persons[h.person].is_healthy())
            .count();

        if nb_healthy > 0 {
            counts.push(SpreadCount {
                sick_name: graph.persons[sick].name.clone(),
                nb_healthy: nb_healthy as i64,
            });
        }
    }

    counts.sort_by(|a, b| a.sick_name.cmp(&b.sick_name));
    counts
}

/// Sick people who visited more than `CARELESS_PLACE_THRESHOLD` distinct
/// places after confirmation, by place count descending then name.
pub fn careless_people(graph: &ContactGraph) -> Vec<CarelessPerson> {
    let mut careless = Vec::new();

    for (sick, confirmed) in graph.confirmed_sick() {
        let places: BTreeSet<usize> = graph
            .visits_of(sick)
            .filter(|v| v.start >= confirmed)
            .map(|v| v.place)
            .collect();
        let nb_places = places.len() as i64;

        if nb_places > CARELESS_PLACE_THRESHOLD {
            careless.push(CarelessPerson {
                sick_name: graph.persons[sick].name.clone(),
                nb_places,
            });
        }
    }

    careless.sort_by(|a, b| {
        Reverse(a.nb_places)
            .cmp(&Reverse(b.nb_places))
            .then_with(|| a.sick_name.cmp(&b.sick_name))
    });
    careless
}

/// Sick people with no bar visit at or after confirmation.
///
/// A sick person without a confirmation time has no qualifying visit and is
/// therefore careful.
pub fn socially_careful(graph: &ContactGraph) -> Vec<String> {
    let mut names: Vec<String> = graph
        .persons
        .iter()
        .enumerate()
        .filter(|(_, p)| p.is_sick())
        .filter(|(i, p)| {
            !graph.visits_of(*i).any(|v| {
                p.confirmedtime.is_some_and(|t| v.start >= t)
                    && graph.places[v.place].place_type == BAR_PLACE_TYPE
            })
        })
        .map(|(_, p)| p.name.clone())
        .collect();

    names.sort();
    names
}

/// `(sick, healthy)` person index pairs whose visits to a common place
/// overlap for at least the minimum overlap.
fn overlapping_pairs(graph: &ContactGraph) -> BTreeSet<(usize, usize)> {
    let mut pairs = BTreeSet::new();

    for (sick, person) in graph.persons.iter().enumerate() {
        if !person.is_sick() {
            continue;
        }
        for v1 in graph.visits_of(sick) {
            for v2 in graph.visits_at(v1.place) {
                if graph.persons[v2.person].is_healthy()
                    && overlaps_enough(v1.interval(), v2.interval())
                {
                    pairs.insert((sick, v2.person));
                }
            }
        }
    }

    pairs
}

/// Healthy people to inform, per sick person. Lists are sorted; rows are
/// ordered by list, then sick name.
pub fn people_to_inform(graph: &ContactGraph) -> Vec<InformList> {
    let mut grouped: BTreeMap<usize, BTreeSet<String>> = BTreeMap::new();
    for (sick, healthy) in overlapping_pairs(graph) {
        grouped
            .entry(sick)
            .or_default()
            .insert(graph.persons[healthy].name.clone());
    }

    let mut rows: Vec<InformList> = grouped
        .into_iter()
        .map(|(sick, informed)| InformList {
            sick_name: graph.persons[sick].name.clone(),
            people_to_inform: informed.into_iter().collect(),
        })
        .collect();

    rows.sort_by(|a, b| {
        a.people_to_inform
            .cmp(&b.people_to_inform)
            .then_with(|| a.sick_name.cmp(&b.sick_name))
    });
    rows
}

/// Indices of the healthy people `set_high_risk` flags, ordered by name.
pub fn high_risk_candidates(graph: &ContactGraph) -> Vec<usize> {
    let healthy: BTreeSet<usize> = overlapping_pairs(graph).into_iter().map(|(_, h)| h).collect();
    let mut indices: Vec<usize> = healthy.into_iter().collect();
    indices.sort_by(|&a, &b| graph.persons[a].name.cmp(&graph.persons[b].name));
    indices
}

/// Healthy people within the companion hop window of `name`, sorted.
pub fn healthy_companions_of(graph: &ContactGraph, name: &str) -> Vec<String> {
    let Some(&start) = graph.person_index.get(name) else {
        return Vec::new();
    };

    let mut names: Vec<String> = reachable_persons(graph, start, *COMPANION_HOPS.end())
        .into_iter()
        .filter(|r| COMPANION_HOPS.contains(&r.hops))
        .filter(|r| graph.persons[r.index].is_healthy())
        .map(|r| r.name)
        .collect();

    names.sort();
    names
}

/// The place type sick people visited most at or before confirmation.
/// Ties break on place type, ascending.
pub fn top_sick_site(graph: &ContactGraph) -> Option<SickSite> {
    let mut counts: HashMap<&str, i64> = HashMap::new();

    for (sick, confirmed) in graph.confirmed_sick() {
        for v in graph.visits_of(sick).filter(|v| v.start <= confirmed) {
            *counts
                .entry(graph.places[v.place].place_type.as_str())
                .or_insert(0) += 1;
        }
    }

    counts
        .into_iter()
        .min_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)))
        .map(|(place_type, nb_of_sick_visits)| SickSite {
            place_type: place_type.to_string(),
            nb_of_sick_visits,
        })
}

/// The subset of `names` currently marked Sick, sorted and distinct.
pub fn sick_from(graph: &ContactGraph, names: &[String]) -> Vec<String> {
    let sick: BTreeSet<&String> = names
        .iter()
        .filter(|n| graph.person(n).is_some_and(|p| p.is_sick()))
        .collect();
    sick.into_iter().cloned().collect()
}
