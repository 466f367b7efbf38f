//! `AssignmentRouteIndex`: which live routes run over which edges.
//!
//! When an edge changes, the controller must find every assignment whose
//! route uses that edge without scanning all assignments.  The index keeps
//! both directions:
//!
//! ```text
//! by_edge:     (from, to)  → { incident, … }
//! by_incident: incident    → { (from, to), … }
//! ```
//!
//! The controller calls [`put`][AssignmentRouteIndex::put] and
//! [`remove`][AssignmentRouteIndex::remove] in the same step as it changes
//! the assignment table, so the two never drift.

use std::collections::{BTreeMap, BTreeSet};

use perds_core::IncidentId;
use perds_spatial::{EdgeKey, Route};

/// Bidirectional edge ↔ incident index over live assignment routes.
#[derive(Clone, Debug, Default)]
pub struct AssignmentRouteIndex {
    by_edge:     BTreeMap<EdgeKey, BTreeSet<IncidentId>>,
    by_incident: BTreeMap<IncidentId, BTreeSet<EdgeKey>>,
}

impl AssignmentRouteIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `route` as the current route of `incident`, replacing any
    /// previous entry.
    pub fn put(&mut self, incident: &IncidentId, route: &Route) {
        self.remove(incident);
        let edges: BTreeSet<EdgeKey> = route.edge_keys().collect();
        for key in &edges {
            self.by_edge.entry(key.clone()).or_default().insert(incident.clone());
        }
        if !edges.is_empty() {
            self.by_incident.insert(incident.clone(), edges);
        }
    }

    /// Forget `incident`.  Absent incidents are ignored.
    pub fn remove(&mut self, incident: &IncidentId) {
        let Some(edges) = self.by_incident.remove(incident) else {
            return;
        };
        for key in edges {
            if let Some(set) = self.by_edge.get_mut(&key) {
                set.remove(incident);
                if set.is_empty() {
                    self.by_edge.remove(&key);
                }
            }
        }
    }

    /// Incidents whose route uses any of `edges`, in id order.
    pub fn incidents_for<'a>(
        &self,
        edges: impl IntoIterator<Item = &'a EdgeKey>,
    ) -> BTreeSet<IncidentId> {
        edges
            .into_iter()
            .filter_map(|key| self.by_edge.get(key))
            .flatten()
            .cloned()
            .collect()
    }

    /// Edges used by `incident`'s route.
    pub fn edges_of(&self, incident: &IncidentId) -> Option<&BTreeSet<EdgeKey>> {
        self.by_incident.get(incident)
    }

    /// Number of incidents with at least one indexed edge.
    pub fn len(&self) -> usize {
        self.by_incident.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_incident.is_empty()
    }

    /// Both maps describe the same relation.
    #[cfg(test)]
    pub(crate) fn is_consistent(&self) -> bool {
        let forward = self
            .by_incident
            .iter()
            .all(|(i, edges)| edges.iter().all(|e| self.by_edge.get(e).is_some_and(|s| s.contains(i))));
        let backward = self
            .by_edge
            .iter()
            .all(|(e, incs)| !incs.is_empty() && incs.iter().all(|i| self.by_incident.get(i).is_some_and(|s| s.contains(e))));
        forward && backward
    }
}
