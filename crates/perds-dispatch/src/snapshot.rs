//! Point-in-time view of dispatch state.
//!
//! The controller builds one [`Snapshot`] per dispatch cycle.  The engine
//! threads it through its fold by value: each accepted decision consumes the
//! snapshot and returns an updated one, so later incidents in the same cycle
//! see earlier assignments.

use std::collections::BTreeMap;

use perds_core::{
    DispatchCentre, DispatchCentreId, Incident, IncidentId, IncidentStatus, ResponseUnit,
    SimTime, UnitId,
};
use perds_spatial::{Graph, Route};

use crate::{DispatchDecision, DispatchError, DispatchResult};

/// A live pairing of one incident with one unit.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Assignment {
    pub incident:    IncidentId,
    pub unit:        UnitId,
    pub route:       Route,
    pub assigned_at: SimTime,
}

/// Read-mostly dispatch state for one cycle.
///
/// The graph is borrowed; entity tables are owned so the engine can update
/// them without touching the controller.
#[derive(Debug, Clone)]
pub struct Snapshot<'a> {
    pub graph:       &'a Graph,
    pub now:         SimTime,
    pub units:       BTreeMap<UnitId, ResponseUnit>,
    pub incidents:   BTreeMap<IncidentId, Incident>,
    pub centres:     BTreeMap<DispatchCentreId, DispatchCentre>,
    pub assignments: BTreeMap<IncidentId, Assignment>,
}

impl<'a> Snapshot<'a> {
    /// Snapshot with no entities.
    pub fn new(graph: &'a Graph, now: SimTime) -> Self {
        Self {
            graph,
            now,
            units:       BTreeMap::new(),
            incidents:   BTreeMap::new(),
            centres:     BTreeMap::new(),
            assignments: BTreeMap::new(),
        }
    }

    pub fn with_units(mut self, units: impl IntoIterator<Item = ResponseUnit>) -> Self {
        self.units.extend(units.into_iter().map(|u| (u.id().clone(), u)));
        self
    }

    pub fn with_incidents(mut self, incidents: impl IntoIterator<Item = Incident>) -> Self {
        self.incidents.extend(incidents.into_iter().map(|i| (i.id().clone(), i)));
        self
    }

    pub fn with_centres(mut self, centres: impl IntoIterator<Item = DispatchCentre>) -> Self {
        self.centres.extend(centres.into_iter().map(|c| (c.id.clone(), c)));
        self
    }

    pub fn with_assignments(mut self, assignments: impl IntoIterator<Item = Assignment>) -> Self {
        self.assignments
            .extend(assignments.into_iter().map(|a| (a.incident.clone(), a)));
        self
    }

    // ── Queries ───────────────────────────────────────────────────────────

    pub fn is_assigned(&self, incident: &IncidentId) -> bool {
        self.assignments.contains_key(incident)
    }

    /// `REPORTED` or `QUEUED` and not yet assigned.
    pub fn is_eligible(&self, incident: &Incident) -> bool {
        incident.status().awaits_dispatch() && !self.is_assigned(incident.id())
    }

    /// Incidents waiting for a unit, in id order.
    pub fn eligible_incidents(&self) -> impl Iterator<Item = &Incident> + '_ {
        self.incidents.values().filter(|i| self.is_eligible(i))
    }

    /// Dispatchable units that satisfy `incident`'s type, capacity and
    /// specialization requirements, in id order.
    pub fn eligible_units<'s>(
        &'s self,
        incident: &'s Incident,
    ) -> impl Iterator<Item = &'s ResponseUnit> + 's {
        self.units.values().filter(move |u| unit_satisfies(u, incident))
    }

    // ── Working-copy update ───────────────────────────────────────────────

    /// Fold `decision` into the snapshot: the unit becomes `EnRoute`, the
    /// incident `Dispatched`, and an assignment is recorded.
    ///
    /// # Errors
    /// Whatever [`check`][Self::check] reports; the snapshot is consumed
    /// either way.
    pub fn apply(self, decision: &DispatchDecision) -> DispatchResult<Self> {
        self.check(decision)?;
        Ok(self.commit(decision))
    }

    /// Validate `decision` against the current state without applying it.
    ///
    /// # Errors
    /// Unknown ids, an incident that already has an assignment or is not
    /// awaiting dispatch, a unit that is not dispatchable, or a route that
    /// does not run from the unit to the incident.
    pub fn check(&self, decision: &DispatchDecision) -> DispatchResult<()> {
        let incident = self
            .incidents
            .get(&decision.incident)
            .ok_or_else(|| DispatchError::UnknownIncident(decision.incident.clone()))?;
        let unit = self
            .units
            .get(&decision.unit)
            .ok_or_else(|| DispatchError::UnknownUnit(decision.unit.clone()))?;

        if self.is_assigned(incident.id()) {
            return Err(DispatchError::IncidentAlreadyAssigned(incident.id().clone()));
        }
        if !incident.status().awaits_dispatch() {
            return Err(DispatchError::IncidentNotAwaitingDispatch(incident.id().clone()));
        }
        if !unit.is_dispatchable() {
            return Err(DispatchError::UnitNotDispatchable(unit.id().clone()));
        }
        check_route(&decision.route, unit, incident)
    }

    /// Apply a decision that already passed [`check`][Self::check].
    pub(crate) fn commit(mut self, decision: &DispatchDecision) -> Self {
        if let Some(incident) = self.incidents.remove(&decision.incident) {
            let incident = incident.with_status(IncidentStatus::Dispatched);
            self.incidents.insert(decision.incident.clone(), incident);
        }
        if let Some(unit) = self.units.remove(&decision.unit) {
            let unit = unit.assigned_to(decision.incident.clone());
            self.units.insert(decision.unit.clone(), unit);
        }
        self.assignments.insert(
            decision.incident.clone(),
            Assignment {
                incident:    decision.incident.clone(),
                unit:        decision.unit.clone(),
                route:       decision.route.clone(),
                assigned_at: self.now,
            },
        );
        self
    }
}

/// Type, capacity, specialization and availability check for one pairing.
pub fn unit_satisfies(unit: &ResponseUnit, incident: &Incident) -> bool {
    unit.is_dispatchable()
        && incident.required_unit_types().contains(&unit.unit_type())
        && unit.capacity() >= incident.required_capacity()
        && unit.specialization() >= incident.required_specialization()
}

/// The route must leave from the unit's node and end at the incident's node.
pub fn check_route(route: &Route, unit: &ResponseUnit, incident: &Incident) -> DispatchResult<()> {
    if route.start() == unit.location() && route.goal() == incident.location() {
        return Ok(());
    }
    Err(DispatchError::RouteMismatch {
        unit:           unit.id().clone(),
        start:          route.start().clone(),
        goal:           route.goal().clone(),
        expected_start: unit.location().clone(),
        expected_goal:  incident.location().clone(),
    })
}
