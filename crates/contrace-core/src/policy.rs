//! Fixed tracing policy shared by every backend.
//!
//! The Cypher backend interpolates these values into its query text and the
//! snapshot backend compares against them directly, so the two never drift.

use std::ops::RangeInclusive;

use chrono::{NaiveDateTime, TimeDelta};

/// A sick person is careless above this many distinct places after confirmation.
pub const CARELESS_PLACE_THRESHOLD: i64 = 10;

/// Minimum shared presence, in seconds, before a healthy person must be informed.
pub const MIN_OVERLAP_SECS: i64 = 2 * 60 * 60;

/// Hop window (in VISITS relationships) for healthy companion traversal.
pub const COMPANION_HOPS: RangeInclusive<usize> = 2..=6;

/// Place type avoided by socially careful sick people.
pub const BAR_PLACE_TYPE: &str = "Bar";

/// Time shared by two intervals: `min(end) - max(start)`.
///
/// Negative when the intervals are disjoint.
pub fn overlap(
    a: (NaiveDateTime, NaiveDateTime),
    b: (NaiveDateTime, NaiveDateTime),
) -> TimeDelta {
    let start = a.0.max(b.0);
    let end = a.1.min(b.1);
    end - start
}

/// Whether two intervals overlap for at least `MIN_OVERLAP_SECS`.
pub fn overlaps_enough(
    a: (NaiveDateTime, NaiveDateTime),
    b: (NaiveDateTime, NaiveDateTime),
) -> bool {
    overlap(a, b).num_seconds() >= MIN_OVERLAP_SECS
}
