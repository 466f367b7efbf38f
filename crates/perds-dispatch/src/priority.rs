//! Incident ordering and candidate tie-breaking.

use std::cmp::{Ordering, Reverse};

use perds_core::{Incident, IncidentId, ResponseUnit, Severity};
use perds_spatial::Route;

use crate::Snapshot;

/// Eligible incidents in dispatch order: severity descending, then
/// `reported_at` ascending, then id ascending.
pub fn prioritize(snapshot: &Snapshot<'_>) -> Vec<IncidentId> {
    let mut eligible: Vec<&Incident> = snapshot.eligible_incidents().collect();
    eligible.sort_by_key(|i| (Reverse(i.severity()), i.reported_at(), i.id().clone()));
    eligible.into_iter().map(|i| i.id().clone()).collect()
}

/// A unit together with its route to the incident under consideration.
#[derive(Debug, Clone)]
pub struct Candidate<'a> {
    pub unit:  &'a ResponseUnit,
    pub route: Route,
}

/// Canonical candidate order; `Less` means `a` is preferred.
///
/// 1. lower total cost
/// 2. for `High`/`Critical` incidents, higher specialization
/// 3. lower total distance
/// 4. lower unit id
pub fn compare_candidates(a: &Candidate<'_>, b: &Candidate<'_>, severity: Severity) -> Ordering {
    a.route
        .total_cost()
        .total_cmp(&b.route.total_cost())
        .then_with(|| specialization_order(a.unit, b.unit, severity))
        .then_with(|| a.route.total_distance_km().total_cmp(&b.route.total_distance_km()))
        .then_with(|| a.unit.id().cmp(b.unit.id()))
}

/// Order among units that are otherwise tied (e.g. parked at the same node):
/// higher specialization first for severe incidents, then lower id.
pub fn compare_co_located(a: &ResponseUnit, b: &ResponseUnit, severity: Severity) -> Ordering {
    specialization_order(a, b, severity).then_with(|| a.id().cmp(b.id()))
}

fn specialization_order(a: &ResponseUnit, b: &ResponseUnit, severity: Severity) -> Ordering {
    if severity.is_high_or_above() {
        b.specialization().cmp(&a.specialization())
    } else {
        Ordering::Equal
    }
}
