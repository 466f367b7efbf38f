//! Unit tests for perds-core primitives.

#[cfg(test)]
mod ids {
    use crate::{CoreError, DispatchCentreId, IncidentId, NodeId, UnitId};

    #[test]
    fn blank_ids_rejected() {
        assert!(matches!(NodeId::new(""), Err(CoreError::BlankId { .. })));
        assert!(matches!(UnitId::new("   "), Err(CoreError::BlankId { .. })));
        assert!(matches!(DispatchCentreId::new("\t"), Err(CoreError::BlankId { .. })));
    }

    #[test]
    fn restricted_charset_for_units_and_incidents() {
        assert!(UnitId::new("AMB-01_a.b:c").is_ok());
        let err = IncidentId::new("inc 7").unwrap_err();
        assert!(matches!(err, CoreError::InvalidIdChar { ch: ' ', .. }));
        // Node ids are free-form.
        assert!(NodeId::new("Main St & 3rd").is_ok());
    }

    #[test]
    fn ordering_and_display() {
        let a = UnitId::new("U1").unwrap();
        let b = UnitId::new("U2").unwrap();
        assert!(a < b);
        assert_eq!(a.to_string(), "U1");
        assert_eq!(String::from(b), "U2");
    }
}

#[cfg(test)]
mod time {
    use std::time::Duration;

    use crate::SimTime;

    #[test]
    fn add_duration() {
        let t = SimTime::from_secs(10);
        assert_eq!(t + Duration::from_millis(1_500), SimTime(11_500));
        assert_eq!(SimTime(u64::MAX) + Duration::from_secs(1), SimTime(u64::MAX));
    }

    #[test]
    fn since_saturates() {
        assert_eq!(SimTime(5_000).since(SimTime(2_000)), Duration::from_secs(3));
        assert_eq!(SimTime(1_000).since(SimTime(2_000)), Duration::ZERO);
    }

    #[test]
    fn display() {
        assert_eq!(SimTime(61_005).to_string(), "T+61.005s");
    }
}

#[cfg(test)]
mod geo {
    use crate::GeoPoint;

    #[test]
    fn zero_distance() {
        let p = GeoPoint::new(30.694, -88.043);
        assert!(p.distance_km(p) < 1e-9);
    }

    #[test]
    fn one_degree_latitude() {
        // ~1 degree of latitude ≈ 111.2 km
        let d = GeoPoint::new(30.0, -88.0).distance_km(GeoPoint::new(31.0, -88.0));
        assert!((d - 111.195).abs() < 0.5, "got {d}");
    }
}

#[cfg(test)]
mod entities {
    use crate::{
        CoreError, Incident, IncidentId, IncidentStatus, NodeId, ResponseUnit, Severity,
        SimTime, UnitId, UnitStatus, UnitType,
    };

    fn node(s: &str) -> NodeId {
        NodeId::new(s).unwrap()
    }

    #[test]
    fn incident_requires_unit_types() {
        let err = Incident::new(
            IncidentId::new("I1").unwrap(),
            node("C"),
            Severity::High,
            Vec::<UnitType>::new(),
            SimTime::ZERO,
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::NoRequiredUnitTypes(_)));
    }

    #[test]
    fn incident_starts_reported_and_resolves() {
        let inc = Incident::new(
            IncidentId::new("I1").unwrap(),
            node("C"),
            Severity::Medium,
            [UnitType::Ambulance, UnitType::Ambulance],
            SimTime::from_secs(3),
        )
        .unwrap();
        assert_eq!(inc.status(), IncidentStatus::Reported);
        assert_eq!(inc.required_unit_types().len(), 1);

        let done = inc.clone().resolved(SimTime::from_secs(9));
        assert_eq!(done.status(), IncidentStatus::Resolved);
        assert_eq!(done.resolved_at(), Some(SimTime::from_secs(9)));
        // The original value is untouched.
        assert_eq!(inc.resolved_at(), None);
    }

    #[test]
    fn severity_order() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::High < Severity::Critical);
        assert!(Severity::High.is_high_or_above());
        assert!(!Severity::Medium.is_high_or_above());
    }

    #[test]
    fn unit_availability() {
        let unit = ResponseUnit::new(UnitId::new("U1").unwrap(), UnitType::Police, node("A"));
        assert!(unit.is_available());
        assert!(unit.is_dispatchable());

        let repositioning = unit.clone().with_status(UnitStatus::Repositioning);
        assert!(!repositioning.is_available());
        assert!(repositioning.is_dispatchable());

        let assigned = unit.clone().assigned_to(IncidentId::new("I1").unwrap());
        assert_eq!(assigned.status(), UnitStatus::EnRoute);
        assert!(!assigned.is_dispatchable());

        let freed = assigned.cleared();
        assert!(freed.is_available());
        assert_eq!(freed.assigned_incident(), None);
    }
}
