//! Fixture builders shared by the unit tests.

use chrono::{NaiveDate, NaiveDateTime};

use contrace_core::{Dataset, HealthStatus, Person, Place, Visit};

use crate::graph::ContactGraph;

pub fn at(day: u32, h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2020, 3, day)
        .unwrap()
        .and_hms_opt(h, m, 0)
        .unwrap()
}

pub fn sick(name: &str, confirmed: NaiveDateTime) -> Person {
    Person {
        name: name.to_string(),
        healthstatus: HealthStatus::Sick,
        confirmedtime: Some(confirmed),
        risk: None,
    }
}

pub fn healthy(name: &str) -> Person {
    Person {
        name: name.to_string(),
        healthstatus: HealthStatus::Healthy,
        confirmedtime: None,
        risk: None,
    }
}

pub fn place(id: &str, place_type: &str) -> Place {
    Place {
        id: id.to_string(),
        name: None,
        place_type: place_type.to_string(),
    }
}

pub fn visit(
    id: &str,
    person: &str,
    place: &str,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> Visit {
    Visit {
        id: id.to_string(),
        person: person.to_string(),
        place: place.to_string(),
        starttime: start,
        endtime: end,
    }
}

/// `Alice - p0 - H1 - p1 - H2 - ... - H{len}`: H`k` is `2k` hops from Alice.
pub fn chain_graph(len: usize) -> ContactGraph {
    let mut dataset = Dataset {
        persons: vec![sick("Alice", at(1, 8, 0))],
        ..Default::default()
    };
    let mut chain = vec!["Alice".to_string()];
    for i in 0..len {
        let name = format!("H{}", i + 1);
        dataset.persons.push(healthy(&name));
        dataset.places.push(place(&format!("p{i}"), "Office"));
        chain.push(name);
    }
    for i in 0..len {
        let place_id = format!("p{i}");
        let (start, end) = (at(2, 9, 0), at(2, 10, 0));
        dataset.visits.push(visit(&format!("a{i}"), &chain[i], &place_id, start, end));
        dataset.visits.push(visit(&format!("b{i}"), &chain[i + 1], &place_id, start, end));
    }
    ContactGraph::from_dataset(dataset)
}
