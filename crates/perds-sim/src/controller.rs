//! The `Controller`: owner of all dispatch state and the only place it
//! changes.
//!
//! # `execute(command, now)`
//!
//! ```text
//! ① Arrivals   repositioning moves due at or before `now` complete
//!              (REPOSITIONING → AVAILABLE at the target), in unit-id order.
//! ② Apply      one exhaustive match over SystemCommand.
//! ③ Cascade    every removed/updated/replaced edge: look up affected
//!              incidents in the route index (id order) and reroute from the
//!              unit's current node, or cancel when no route remains.
//! ④ Dispatch   build a Snapshot, run the DispatchEngine, apply its
//!              AssignUnit commands in order.
//! ```
//!
//! Units move by teleport: a repositioning unit stays at its origin until
//! its arrival time, and an assigned unit is placed at the incident when it
//! is set `ON_SCENE`.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use perds_core::{
    DispatchCentre, DispatchCentreId, Incident, IncidentId, IncidentStatus, NodeId, ResponseUnit,
    SimTime, UnitId, UnitStatus,
};
use perds_dispatch::{
    check_route, Assignment, DispatchCommand, DispatchEngine, DispatchError, DispatchPolicy,
    Snapshot,
};
use perds_spatial::{Edge, EdgeKey, Graph, GraphView, Route, SpatialError};

use crate::forecast::{DemandForecaster, PrepositioningStrategy, RepositionMove};
use crate::{
    AssignmentRouteIndex, CommandExecutor, DispatchObserver, NoopObserver, SimError, SimResult,
    SystemCommand,
};

/// A repositioning move in progress.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingMove {
    pub target:     NodeId,
    pub route:      Route,
    pub arrives_at: SimTime,
}

/// Owns the graph, units, incidents, centres, assignments and the route
/// index, and applies [`SystemCommand`]s to them.
///
/// Create via [`ControllerBuilder`][crate::ControllerBuilder].
pub struct Controller<P: DispatchPolicy, O: DispatchObserver = NoopObserver> {
    pub(crate) graph:          Graph,
    pub(crate) units:          BTreeMap<UnitId, ResponseUnit>,
    pub(crate) incidents:      BTreeMap<IncidentId, Incident>,
    pub(crate) centres:        BTreeMap<DispatchCentreId, DispatchCentre>,
    pub(crate) assignments:    BTreeMap<IncidentId, Assignment>,
    pub(crate) index:          AssignmentRouteIndex,
    pub(crate) pending_moves:  BTreeMap<UnitId, PendingMove>,
    pub(crate) engine:         DispatchEngine<P>,
    pub(crate) forecaster:     Box<dyn DemandForecaster>,
    pub(crate) prepositioning: Box<dyn PrepositioningStrategy>,
    pub(crate) observer:       O,
}

impl<P: DispatchPolicy, O: DispatchObserver> Controller<P, O> {
    // ── Read access ───────────────────────────────────────────────────────

    pub fn graph(&self) -> &Graph { &self.graph }
    pub fn policy(&self) -> &P { &self.engine.policy }
    pub fn index(&self) -> &AssignmentRouteIndex { &self.index }
    pub fn observer(&self) -> &O { &self.observer }
    pub fn observer_mut(&mut self) -> &mut O { &mut self.observer }

    pub fn unit(&self, id: &UnitId) -> Option<&ResponseUnit> {
        self.units.get(id)
    }

    pub fn units(&self) -> impl Iterator<Item = &ResponseUnit> + '_ {
        self.units.values()
    }

    pub fn incident(&self, id: &IncidentId) -> Option<&Incident> {
        self.incidents.get(id)
    }

    pub fn incidents(&self) -> impl Iterator<Item = &Incident> + '_ {
        self.incidents.values()
    }

    pub fn centre(&self, id: &DispatchCentreId) -> Option<&DispatchCentre> {
        self.centres.get(id)
    }

    /// Live assignment of `incident`, if any.
    pub fn assignment(&self, incident: &IncidentId) -> Option<&Assignment> {
        self.assignments.get(incident)
    }

    pub fn assignments(&self) -> impl Iterator<Item = &Assignment> + '_ {
        self.assignments.values()
    }

    pub fn pending_move(&self, unit: &UnitId) -> Option<&PendingMove> {
        self.pending_moves.get(unit)
    }

    /// Owned view of current state for the dispatch engine and collaborators.
    pub fn snapshot(&self, now: SimTime) -> Snapshot<'_> {
        Snapshot {
            graph:       &self.graph,
            now,
            units:       self.units.clone(),
            incidents:   self.incidents.clone(),
            centres:     self.centres.clone(),
            assignments: self.assignments.clone(),
        }
    }

    // ── Execute ───────────────────────────────────────────────────────────

    /// Apply `command` at `now` and return every dispatch command applied as
    /// a consequence (cascade reroutes/cancels first, then new assignments).
    ///
    /// # Errors
    /// Unknown ids, duplicate registrations, graph errors and rejected status
    /// transitions.  State changes from step ① are kept; a failing command
    /// itself changes nothing.
    pub fn execute(&mut self, command: SystemCommand, now: SimTime) -> SimResult<Vec<DispatchCommand>> {
        let kind = command.kind();
        let mut applied = Vec::new();

        self.complete_repositioning(now);
        let affected = self.apply_command(command, now, &mut applied)?;
        self.cascade(&affected, now, &mut applied)?;
        self.dispatch(now, &mut applied)?;

        tracing::debug!(%now, command = kind, dispatch_commands = applied.len(), "command executed");
        Ok(applied)
    }

    // ── ① Arrivals ────────────────────────────────────────────────────────

    fn complete_repositioning(&mut self, now: SimTime) {
        let due: Vec<UnitId> = self
            .pending_moves
            .iter()
            .filter(|(_, mv)| mv.arrives_at <= now)
            .map(|(id, _)| id.clone())
            .collect();

        for id in due {
            let Some(mv) = self.pending_moves.remove(&id) else { continue };
            let Some(unit) = self.units.remove(&id) else { continue };
            let unit = if unit.status() == UnitStatus::Repositioning {
                tracing::debug!(unit = %id, target = %mv.target, "repositioning complete");
                unit.moved_to(mv.target).with_status(UnitStatus::Available)
            } else {
                unit
            };
            self.units.insert(id, unit);
        }
    }

    // ── ② Apply ───────────────────────────────────────────────────────────

    /// Direct effect of `command`.  Returns the edges whose change may
    /// invalidate live routes.
    fn apply_command(
        &mut self,
        command: SystemCommand,
        now:     SimTime,
        applied: &mut Vec<DispatchCommand>,
    ) -> SimResult<BTreeSet<EdgeKey>> {
        let mut affected = BTreeSet::new();

        match command {
            SystemCommand::ReportIncident(incident) => {
                self.report_incident(incident)?;
            }
            SystemCommand::ResolveIncident(id) => {
                self.resolve_incident(&id, now)?;
            }
            SystemCommand::AddNode(node) => {
                let version = self.graph.add_node(node);
                tracing::trace!(version, "node added");
            }
            SystemCommand::RemoveNode(id) => {
                let touching = self.graph.edges_touching(&id);
                self.graph.remove_node(&id)?;
                affected.extend(touching.iter().map(Edge::key));
                // Trivial routes index no edges, so assignments at the node
                // itself are not reached by the edge cascade.
                for incident in self.assignments_at(&id) {
                    self.reroute_or_cancel(&incident, &format!("node {id} removed"), now, applied)?;
                }
            }
            SystemCommand::PutEdge(edge) => {
                let replaced = self.graph.edge(&edge.from, &edge.to).is_some();
                let key = edge.key();
                self.graph.put_edge(edge)?;
                if replaced {
                    affected.insert(key);
                }
            }
            SystemCommand::RemoveEdge { from, to } => {
                self.graph.remove_edge(&from, &to)?;
                affected.insert(EdgeKey::new(from, to));
            }
            SystemCommand::UpdateEdge { from, to, weights, status } => {
                self.graph.update_edge(&from, &to, weights, status)?;
                affected.insert(EdgeKey::new(from, to));
            }
            SystemCommand::RegisterUnit(unit) => {
                self.register_unit(unit)?;
            }
            SystemCommand::SetUnitStatus { unit, status } => {
                self.set_unit_status(&unit, status, now, applied)?;
            }
            SystemCommand::MoveUnit { unit, node } => {
                self.move_unit(&unit, node, now, applied)?;
            }
            SystemCommand::PrepositionUnits { horizon } => {
                self.preposition(horizon, now)?;
            }
            SystemCommand::RegisterDispatchCentre(centre) => {
                self.register_centre(centre)?;
            }
        }

        Ok(affected)
    }

    fn report_incident(&mut self, incident: Incident) -> SimResult<()> {
        if self.incidents.contains_key(incident.id()) {
            return Err(SimError::DuplicateIncident(incident.id().clone()));
        }
        self.require_node(incident.location())?;
        if incident.status() != IncidentStatus::Reported {
            return Err(SimError::InvalidCommand(format!(
                "incident {} must be reported with status REPORTED, got {:?}",
                incident.id(),
                incident.status()
            )));
        }
        tracing::info!(
            incident = %incident.id(), severity = %incident.severity(),
            location = %incident.location(), "incident reported"
        );
        self.forecaster.observe(&incident);
        self.incidents.insert(incident.id().clone(), incident);
        Ok(())
    }

    fn resolve_incident(&mut self, id: &IncidentId, now: SimTime) -> SimResult<()> {
        let incident = self
            .incidents
            .get(id)
            .ok_or_else(|| SimError::IncidentNotFound(id.clone()))?;
        if incident.status() == IncidentStatus::Resolved {
            tracing::debug!(incident = %id, "already resolved");
            return Ok(());
        }
        let resolved = incident.clone().resolved(now);
        if self.assignments.contains_key(id) {
            self.release_assignment(id)?;
        }
        self.incidents.insert(id.clone(), resolved);
        tracing::info!(incident = %id, %now, "incident resolved");
        Ok(())
    }

    pub(crate) fn register_unit(&mut self, unit: ResponseUnit) -> SimResult<()> {
        if self.units.contains_key(unit.id()) {
            return Err(SimError::DuplicateUnit(unit.id().clone()));
        }
        self.require_node(unit.location())?;
        if unit.assigned_incident().is_some()
            || unit.status().compatible_with_assignment()
            || unit.status() == UnitStatus::Repositioning
        {
            return Err(SimError::InvalidCommand(format!(
                "unit {} must register unassigned and not {:?}",
                unit.id(),
                unit.status()
            )));
        }
        tracing::debug!(unit = %unit.id(), kind = %unit.unit_type(), location = %unit.location(), "unit registered");
        self.units.insert(unit.id().clone(), unit);
        Ok(())
    }

    pub(crate) fn register_centre(&mut self, centre: DispatchCentre) -> SimResult<()> {
        if self.centres.contains_key(&centre.id) {
            return Err(SimError::DuplicateCentre(centre.id.clone()));
        }
        self.require_node(&centre.node)?;
        self.centres.insert(centre.id.clone(), centre);
        Ok(())
    }

    fn set_unit_status(
        &mut self,
        id:      &UnitId,
        status:  UnitStatus,
        now:     SimTime,
        applied: &mut Vec<DispatchCommand>,
    ) -> SimResult<()> {
        if status == UnitStatus::Repositioning {
            return Err(SimError::InvalidCommand(format!(
                "unit {id}: REPOSITIONING is only entered through prepositioning"
            )));
        }
        let current = self.units.get(id).ok_or_else(|| SimError::UnitNotFound(id.clone()))?;
        let assigned = current.assigned_incident().cloned();
        if assigned.is_none() && status.compatible_with_assignment() {
            return Err(SimError::InvalidCommand(format!("unit {id}: {status:?} requires an assignment")));
        }
        if current.status() == UnitStatus::Repositioning && self.pending_moves.remove(id).is_some() {
            tracing::debug!(unit = %id, ?status, "repositioning abandoned");
        }

        match assigned {
            Some(incident) if !status.compatible_with_assignment() => {
                let reason = format!("unit {id} became {status:?}");
                self.apply_dispatch(DispatchCommand::CancelAssignment { incident, reason }, now, applied)?;
                self.replace_unit(id, |u| u.with_status(status))?;
            }
            Some(incident) if status == UnitStatus::OnScene => {
                self.arrive_on_scene(id, &incident)?;
            }
            _ => {
                self.replace_unit(id, |u| u.with_status(status))?;
            }
        }
        Ok(())
    }

    /// Place `unit` at its incident, mark the incident in progress, and drop
    /// its route from the index since nothing remains to travel.
    fn arrive_on_scene(&mut self, unit: &UnitId, incident: &IncidentId) -> SimResult<()> {
        let location = self
            .incidents
            .get(incident)
            .map(|i| i.location().clone())
            .ok_or_else(|| SimError::IncidentNotFound(incident.clone()))?;
        let assignment = self
            .assignments
            .get_mut(incident)
            .ok_or_else(|| SimError::NoAssignment(incident.clone()))?;

        assignment.route = Route::trivial(location.clone(), self.graph.version());
        self.index.remove(incident);
        self.replace_unit(unit, |u| u.moved_to(location).with_status(UnitStatus::OnScene))?;
        self.replace_incident(incident, |i| i.with_status(IncidentStatus::InProgress))?;
        tracing::info!(%unit, %incident, "unit on scene");
        Ok(())
    }

    fn move_unit(
        &mut self,
        id:      &UnitId,
        node:    NodeId,
        now:     SimTime,
        applied: &mut Vec<DispatchCommand>,
    ) -> SimResult<()> {
        self.require_node(&node)?;
        let unit = self.units.get(id).ok_or_else(|| SimError::UnitNotFound(id.clone()))?;
        let assigned = unit.assigned_incident().cloned();
        let was_repositioning = unit.status() == UnitStatus::Repositioning;

        if was_repositioning {
            self.pending_moves.remove(id);
            self.replace_unit(id, |u| u.moved_to(node).with_status(UnitStatus::Available))?;
        } else {
            self.replace_unit(id, |u| u.moved_to(node))?;
        }

        if let Some(incident) = assigned {
            self.reroute_or_cancel(&incident, &format!("unit {id} moved"), now, applied)?;
        }
        Ok(())
    }

    fn preposition(&mut self, horizon: Duration, now: SimTime) -> SimResult<()> {
        if horizon.is_zero() {
            return Err(SimError::InvalidCommand("prepositioning horizon must be positive".into()));
        }
        let forecast = self.forecaster.forecast(now, horizon);
        let moves = self.prepositioning.plan(&self.snapshot(now), &forecast);

        let mut started = 0usize;
        for mv in moves {
            match self.validate_move(&mv) {
                Ok(route) => {
                    let arrives_at = now + route.total_travel_time();
                    self.replace_unit(&mv.unit, |u| u.with_status(UnitStatus::Repositioning))?;
                    tracing::debug!(unit = %mv.unit, target = %mv.target, %arrives_at, reason = %mv.reason, "repositioning");
                    self.pending_moves.insert(mv.unit, PendingMove { target: mv.target, route, arrives_at });
                    started += 1;
                }
                Err(err) => {
                    tracing::debug!(unit = %mv.unit, target = %mv.target, %err, "move rejected");
                }
            }
        }
        tracing::info!(%now, horizon_s = horizon.as_secs(), started, "prepositioning planned");
        Ok(())
    }

    pub(crate) fn validate_move(&self, mv: &RepositionMove) -> SimResult<Route> {
        let unit = self.units.get(&mv.unit).ok_or_else(|| SimError::UnitNotFound(mv.unit.clone()))?;
        let rejected = |why: &str| SimError::InvalidCommand(format!("move of {} to {}: {why}", mv.unit, mv.target));
        if !unit.is_available() {
            return Err(rejected(&format!("unit is {:?}", unit.status())));
        }
        if self.pending_moves.contains_key(&mv.unit) {
            return Err(rejected("unit already has a move"));
        }
        self.require_node(&mv.target)?;
        if &mv.target == unit.location() {
            return Err(rejected("unit is already at the target"));
        }

        let usable = mv.route.as_ref().filter(|r| {
            !r.is_stale(self.graph.version()) && r.start() == unit.location() && r.goal() == &mv.target
        });
        if let Some(route) = usable {
            return Ok(route.clone());
        }
        self.engine
            .policy
            .route(&self.graph, unit.location(), &mv.target)?
            .ok_or_else(|| rejected("target unreachable"))
    }

    // ── ③ Cascade ─────────────────────────────────────────────────────────

    fn cascade(
        &mut self,
        affected: &BTreeSet<EdgeKey>,
        now:      SimTime,
        applied:  &mut Vec<DispatchCommand>,
    ) -> SimResult<()> {
        if affected.is_empty() {
            return Ok(());
        }

        for incident in self.index.incidents_for(affected) {
            self.reroute_or_cancel(&incident, "route edge changed", now, applied)?;
        }

        // A repositioning route over a changed edge is abandoned; the unit
        // stays where it is.
        let stale: Vec<UnitId> = self
            .pending_moves
            .iter()
            .filter(|(_, mv)| mv.route.edge_keys().any(|k| affected.contains(&k)))
            .map(|(id, _)| id.clone())
            .collect();
        for id in stale {
            self.pending_moves.remove(&id);
            self.replace_unit(&id, |u| u.with_status(UnitStatus::Available))?;
            tracing::debug!(unit = %id, "repositioning abandoned: route edge changed");
        }
        Ok(())
    }

    /// Recompute the route of `incident`'s assignment from its unit's current
    /// node; cancel the assignment if none exists.
    fn reroute_or_cancel(
        &mut self,
        incident: &IncidentId,
        cause:    &str,
        now:      SimTime,
        applied:  &mut Vec<DispatchCommand>,
    ) -> SimResult<()> {
        let Some(assignment) = self.assignments.get(incident) else {
            return Ok(());
        };
        let unit = self
            .units
            .get(&assignment.unit)
            .ok_or_else(|| SimError::UnitNotFound(assignment.unit.clone()))?;
        let goal = self
            .incidents
            .get(incident)
            .map(|i| i.location().clone())
            .ok_or_else(|| SimError::IncidentNotFound(incident.clone()))?;

        let command = match self.engine.policy.route(&self.graph, unit.location(), &goal) {
            Ok(Some(route)) => DispatchCommand::RerouteUnit {
                unit:   unit.id().clone(),
                route,
                reason: cause.to_owned(),
            },
            Ok(None) => DispatchCommand::CancelAssignment {
                incident: incident.clone(),
                reason:   format!("{cause}: no route to {goal}"),
            },
            Err(err) => DispatchCommand::CancelAssignment {
                incident: incident.clone(),
                reason:   format!("{cause}: {err}"),
            },
        };
        self.apply_dispatch(command, now, applied)
    }

    // ── ④ Dispatch ────────────────────────────────────────────────────────

    fn dispatch(&mut self, now: SimTime, applied: &mut Vec<DispatchCommand>) -> SimResult<()> {
        let outcome = self.engine.run(self.snapshot(now));
        self.observer.on_dispatch_computed(
            now,
            outcome.elapsed,
            outcome.considered,
            outcome.decisions.len(),
        );
        for decision in &outcome.decisions {
            self.observer.on_decision(now, decision);
        }
        for command in outcome.commands {
            self.apply_dispatch(command, now, applied)?;
        }
        Ok(())
    }

    // ── Dispatch commands ─────────────────────────────────────────────────

    fn apply_dispatch(
        &mut self,
        command: DispatchCommand,
        now:     SimTime,
        applied: &mut Vec<DispatchCommand>,
    ) -> SimResult<()> {
        match &command {
            DispatchCommand::AssignUnit { incident, unit, route, rationale } => {
                self.assign(incident, unit, route, now)?;
                tracing::info!(%incident, %unit, cost = route.total_cost(), %rationale, "unit assigned");
            }
            DispatchCommand::RerouteUnit { unit, route, reason } => {
                self.reroute(unit, route)?;
                tracing::info!(%unit, hops = route.nodes().len(), cost = route.total_cost(), %reason, "unit rerouted");
            }
            DispatchCommand::CancelAssignment { incident, reason } => {
                self.release_assignment(incident)?;
                self.replace_incident(incident, |i| {
                    if i.status().is_terminal() { i } else { i.with_status(IncidentStatus::Queued) }
                })?;
                tracing::warn!(%incident, %reason, "assignment cancelled");
            }
        }
        self.observer.on_command_applied(now, &command);
        applied.push(command);
        Ok(())
    }

    fn assign(&mut self, incident_id: &IncidentId, unit_id: &UnitId, route: &Route, now: SimTime) -> SimResult<()> {
        let incident = self
            .incidents
            .get(incident_id)
            .ok_or_else(|| SimError::IncidentNotFound(incident_id.clone()))?;
        let unit = self
            .units
            .get(unit_id)
            .ok_or_else(|| SimError::UnitNotFound(unit_id.clone()))?;

        if self.assignments.contains_key(incident_id) {
            return Err(DispatchError::IncidentAlreadyAssigned(incident_id.clone()).into());
        }
        if !incident.status().awaits_dispatch() {
            return Err(DispatchError::IncidentNotAwaitingDispatch(incident_id.clone()).into());
        }
        if !unit.is_dispatchable() {
            return Err(DispatchError::UnitNotDispatchable(unit_id.clone()).into());
        }
        check_route(route, unit, incident)?;

        if self.pending_moves.remove(unit_id).is_some() {
            tracing::debug!(unit = %unit_id, "assignment supersedes repositioning");
        }
        self.replace_unit(unit_id, |u| u.assigned_to(incident_id.clone()))?;
        self.replace_incident(incident_id, |i| i.with_status(IncidentStatus::Dispatched))?;
        self.assignments.insert(
            incident_id.clone(),
            Assignment {
                incident:    incident_id.clone(),
                unit:        unit_id.clone(),
                route:       route.clone(),
                assigned_at: now,
            },
        );
        self.index.put(incident_id, route);
        Ok(())
    }

    fn reroute(&mut self, unit_id: &UnitId, route: &Route) -> SimResult<()> {
        let unit = self
            .units
            .get(unit_id)
            .ok_or_else(|| SimError::UnitNotFound(unit_id.clone()))?;
        let incident = unit.assigned_incident().cloned().ok_or_else(|| {
            SimError::InvalidCommand(format!("unit {unit_id} has no assignment to reroute"))
        })?;
        if route.start() != unit.location() {
            return Err(SimError::RouteStartMismatch {
                unit:        unit_id.clone(),
                actual:      unit.location().clone(),
                route_start: route.start().clone(),
            });
        }
        let assignment = self
            .assignments
            .get_mut(&incident)
            .ok_or_else(|| SimError::NoAssignment(incident.clone()))?;
        assignment.route = route.clone();
        self.index.put(&incident, route);
        Ok(())
    }

    /// Drop the live assignment of `incident` and free its unit.  The
    /// incident's own status is left to the caller.
    fn release_assignment(&mut self, incident: &IncidentId) -> SimResult<Assignment> {
        let assignment = self
            .assignments
            .remove(incident)
            .ok_or_else(|| SimError::NoAssignment(incident.clone()))?;
        self.index.remove(incident);
        if self.units.contains_key(&assignment.unit) {
            self.replace_unit(&assignment.unit, ResponseUnit::cleared)?;
        }
        Ok(assignment)
    }

    // ── Helpers ───────────────────────────────────────────────────────────

    /// Incidents with a live assignment whose incident sits at `node`.
    fn assignments_at(&self, node: &NodeId) -> Vec<IncidentId> {
        self.assignments
            .keys()
            .filter(|id| self.incidents.get(*id).is_some_and(|i| i.location() == node))
            .cloned()
            .collect()
    }

    /// The route index holds exactly the edges of every live assignment's
    /// route, and nothing else.
    #[cfg(test)]
    pub(crate) fn index_matches_assignments(&self) -> bool {
        let expected: BTreeMap<&IncidentId, BTreeSet<EdgeKey>> = self
            .assignments
            .values()
            .map(|a| (&a.incident, a.route.edge_keys().collect::<BTreeSet<_>>()))
            .filter(|(_, edges)| !edges.is_empty())
            .collect();
        self.index.len() == expected.len()
            && expected.iter().all(|(id, edges)| self.index.edges_of(id) == Some(edges))
            && self.index.is_consistent()
    }

    fn require_node(&self, id: &NodeId) -> SimResult<()> {
        if self.graph.contains_node(id) {
            Ok(())
        } else {
            Err(SpatialError::NodeNotFound(id.clone()).into())
        }
    }

    fn replace_unit(&mut self, id: &UnitId, f: impl FnOnce(ResponseUnit) -> ResponseUnit) -> SimResult<()> {
        let unit = self.units.remove(id).ok_or_else(|| SimError::UnitNotFound(id.clone()))?;
        self.units.insert(id.clone(), f(unit));
        Ok(())
    }

    fn replace_incident(&mut self, id: &IncidentId, f: impl FnOnce(Incident) -> Incident) -> SimResult<()> {
        let incident = self
            .incidents
            .remove(id)
            .ok_or_else(|| SimError::IncidentNotFound(id.clone()))?;
        self.incidents.insert(id.clone(), f(incident));
        Ok(())
    }
}

impl<P: DispatchPolicy, O: DispatchObserver> CommandExecutor for Controller<P, O> {
    type Error = SimError;

    fn execute(&mut self, command: SystemCommand, now: SimTime) -> SimResult<()> {
        Controller::execute(self, command, now).map(|_| ())
    }
}
