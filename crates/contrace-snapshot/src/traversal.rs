//! Bounded traversal of the person/place visit graph.
//!
//! BFS from a person over the bipartite graph: a hop goes from a person to a
//! place they visited, or from a place to a person who visited it. Persons
//! therefore sit at even hop distances.

use std::collections::{HashSet, VecDeque};

use crate::graph::ContactGraph;

/// A person reached from the traversal start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReachablePerson {
    pub index: usize,
    pub name: String,
    /// Shortest hop distance from the start person.
    pub hops: usize,
}

#[derive(Debug, Clone, Copy)]
enum Hop {
    Person(usize),
    Place(usize),
}

/// Every person reachable from `start` within `max_hops`, excluding `start`.
///
/// Sorted by hops ascending, then by name.
pub fn reachable_persons(
    graph: &ContactGraph,
    start: usize,
    max_hops: usize,
) -> Vec<ReachablePerson> {
    let mut seen_persons = HashSet::new();
    let mut seen_places = HashSet::new();
    seen_persons.insert(start);

    let mut reachable = Vec::new();

    // BFS queue: (node, hops)
    let mut queue: VecDeque<(Hop, usize)> = VecDeque::new();
    queue.push_back((Hop::Person(start), 0));

    while let Some((node, hops)) = queue.pop_front() {
        if let Hop::Person(person) = node {
            if hops > 0 {
                reachable.push(ReachablePerson {
                    index: person,
                    name: graph.persons[person].name.clone(),
                    hops,
                });
            }
        }

        if hops >= max_hops {
            continue;
        }

        match node {
            Hop::Person(person) => {
                for visit in graph.visits_of(person) {
                    if seen_places.insert(visit.place) {
                        queue.push_back((Hop::Place(visit.place), hops + 1));
                    }
                }
            }
            Hop::Place(place) => {
                for visit in graph.visits_at(place) {
                    if seen_persons.insert(visit.person) {
                        queue.push_back((Hop::Person(visit.person), hops + 1));
                    }
                }
            }
        }
    }

    reachable.sort_by(|a, b| a.hops.cmp(&b.hops).then_with(|| a.name.cmp(&b.name)));
    reachable
}
