//! Response units and dispatch centres.

use std::fmt;

use crate::{DispatchCentreId, IncidentId, NodeId, UnitId};

/// The kind of response a unit provides.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnitType {
    Ambulance,
    FireEngine,
    Police,
    Rescue,
    Hazmat,
}

impl fmt::Display for UnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            UnitType::Ambulance  => "AMBULANCE",
            UnitType::FireEngine => "FIRE_ENGINE",
            UnitType::Police     => "POLICE",
            UnitType::Rescue     => "RESCUE",
            UnitType::Hazmat     => "HAZMAT",
        };
        f.write_str(s)
    }
}

/// Operational state of a unit.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnitStatus {
    Available,
    EnRoute,
    OnScene,
    Repositioning,
    Unavailable,
    OutOfService,
}

impl UnitStatus {
    /// Statuses a unit may hold while it owns a live assignment.
    #[inline]
    pub fn compatible_with_assignment(self) -> bool {
        matches!(self, UnitStatus::EnRoute | UnitStatus::OnScene)
    }
}

/// A mobile resource with a type, capacity, specialization and location.
///
/// Immutable value: the `with_*`/`assigned_to`/`cleared` methods return an
/// updated copy.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResponseUnit {
    id:                UnitId,
    unit_type:         UnitType,
    status:            UnitStatus,
    location:          NodeId,
    assigned_incident: Option<IncidentId>,
    home_centre:       Option<DispatchCentreId>,
    capacity:          u32,
    specialization:    u8,
}

impl ResponseUnit {
    /// Create an `Available`, unassigned unit with capacity 1 and
    /// specialization 0.
    pub fn new(id: UnitId, unit_type: UnitType, location: NodeId) -> Self {
        Self {
            id,
            unit_type,
            status: UnitStatus::Available,
            location,
            assigned_incident: None,
            home_centre: None,
            capacity: 1,
            specialization: 0,
        }
    }

    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_specialization(mut self, level: u8) -> Self {
        self.specialization = level;
        self
    }

    pub fn with_home_centre(mut self, centre: DispatchCentreId) -> Self {
        self.home_centre = Some(centre);
        self
    }

    pub fn with_status(mut self, status: UnitStatus) -> Self {
        self.status = status;
        self
    }

    pub fn moved_to(mut self, node: NodeId) -> Self {
        self.location = node;
        self
    }

    /// Assign to `incident`; the unit becomes `EnRoute`.
    pub fn assigned_to(mut self, incident: IncidentId) -> Self {
        self.status = UnitStatus::EnRoute;
        self.assigned_incident = Some(incident);
        self
    }

    /// Drop any assignment and return to `Available`.
    pub fn cleared(mut self) -> Self {
        self.status = UnitStatus::Available;
        self.assigned_incident = None;
        self
    }

    /// `Available` with no assigned incident.
    #[inline]
    pub fn is_available(&self) -> bool {
        self.status == UnitStatus::Available && self.assigned_incident.is_none()
    }

    /// Whether a dispatch may claim this unit.  Units that are merely
    /// repositioning still count.
    #[inline]
    pub fn is_dispatchable(&self) -> bool {
        self.assigned_incident.is_none()
            && matches!(self.status, UnitStatus::Available | UnitStatus::Repositioning)
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn id(&self) -> &UnitId { &self.id }
    pub fn unit_type(&self) -> UnitType { self.unit_type }
    pub fn status(&self) -> UnitStatus { self.status }
    pub fn location(&self) -> &NodeId { &self.location }
    pub fn assigned_incident(&self) -> Option<&IncidentId> { self.assigned_incident.as_ref() }
    pub fn home_centre(&self) -> Option<&DispatchCentreId> { self.home_centre.as_ref() }
    pub fn capacity(&self) -> u32 { self.capacity }
    pub fn specialization(&self) -> u8 { self.specialization }
}

/// A named home base located at a graph node.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DispatchCentre {
    pub id:    DispatchCentreId,
    pub node:  NodeId,
    pub label: String,
}

impl DispatchCentre {
    pub fn new(id: DispatchCentreId, node: NodeId, label: impl Into<String>) -> Self {
        Self { id, node, label: label.into() }
    }
}
