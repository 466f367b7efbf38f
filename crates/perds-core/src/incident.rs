//! Reported incidents.

use std::collections::BTreeSet;
use std::fmt;

use crate::{CoreError, CoreResult, IncidentId, NodeId, SimTime, UnitType};

/// Incident severity.  Ordering is significant: `Low < Medium < High < Critical`.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// `true` for `High` and `Critical`.
    #[inline]
    pub fn is_high_or_above(self) -> bool {
        self >= Severity::High
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Low      => "LOW",
            Severity::Medium   => "MEDIUM",
            Severity::High     => "HIGH",
            Severity::Critical => "CRITICAL",
        };
        f.write_str(s)
    }
}

/// Lifecycle state of an incident.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IncidentStatus {
    Reported,
    Queued,
    Dispatched,
    InProgress,
    Resolved,
    Canceled,
}

impl IncidentStatus {
    /// `Resolved` and `Canceled` are terminal: such incidents are never
    /// reassigned.
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, IncidentStatus::Resolved | IncidentStatus::Canceled)
    }

    /// Only `Reported` and `Queued` incidents are considered for dispatch.
    #[inline]
    pub fn awaits_dispatch(self) -> bool {
        matches!(self, IncidentStatus::Reported | IncidentStatus::Queued)
    }
}

/// An event requiring one or more response units at a fixed node.
///
/// Values are immutable; the `with_*` methods return an updated copy which
/// the owner installs in place of the old value.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Incident {
    id:                      IncidentId,
    location:                NodeId,
    severity:                Severity,
    required_unit_types:     BTreeSet<UnitType>,
    required_capacity:       u32,
    required_specialization: u8,
    status:                  IncidentStatus,
    reported_at:             SimTime,
    resolved_at:             Option<SimTime>,
}

impl Incident {
    /// Create a `Reported` incident with no capacity or specialization
    /// requirement.
    ///
    /// # Errors
    /// [`CoreError::NoRequiredUnitTypes`] if `required_unit_types` is empty.
    pub fn new(
        id:                  IncidentId,
        location:            NodeId,
        severity:            Severity,
        required_unit_types: impl IntoIterator<Item = UnitType>,
        reported_at:         SimTime,
    ) -> CoreResult<Self> {
        let required_unit_types: BTreeSet<UnitType> = required_unit_types.into_iter().collect();
        if required_unit_types.is_empty() {
            return Err(CoreError::NoRequiredUnitTypes(id.to_string()));
        }
        Ok(Self {
            id,
            location,
            severity,
            required_unit_types,
            required_capacity: 0,
            required_specialization: 0,
            status: IncidentStatus::Reported,
            reported_at,
            resolved_at: None,
        })
    }

    pub fn with_required_capacity(mut self, capacity: u32) -> Self {
        self.required_capacity = capacity;
        self
    }

    pub fn with_required_specialization(mut self, level: u8) -> Self {
        self.required_specialization = level;
        self
    }

    pub fn with_status(mut self, status: IncidentStatus) -> Self {
        self.status = status;
        self
    }

    /// Mark resolved at `at`.
    pub fn resolved(mut self, at: SimTime) -> Self {
        self.status = IncidentStatus::Resolved;
        self.resolved_at = Some(at);
        self
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn id(&self) -> &IncidentId { &self.id }
    pub fn location(&self) -> &NodeId { &self.location }
    pub fn severity(&self) -> Severity { self.severity }
    pub fn required_unit_types(&self) -> &BTreeSet<UnitType> { &self.required_unit_types }
    pub fn required_capacity(&self) -> u32 { self.required_capacity }
    pub fn required_specialization(&self) -> u8 { self.required_specialization }
    pub fn status(&self) -> IncidentStatus { self.status }
    pub fn reported_at(&self) -> SimTime { self.reported_at }
    pub fn resolved_at(&self) -> Option<SimTime> { self.resolved_at }
}
