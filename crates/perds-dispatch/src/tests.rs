//! Unit tests for perds-dispatch.

#[cfg(test)]
mod helpers {
    use std::time::Duration;

    use perds_core::{
        Incident, IncidentId, NodeId, ResponseUnit, Severity, SimTime, UnitId, UnitType,
    };
    use perds_spatial::{Edge, EdgeWeights, Graph, Node, NodeType};

    pub fn node(s: &str) -> NodeId {
        NodeId::new(s).unwrap()
    }

    pub fn uid(s: &str) -> UnitId {
        UnitId::new(s).unwrap()
    }

    pub fn iid(s: &str) -> IncidentId {
        IncidentId::new(s).unwrap()
    }

    pub fn graph(nodes: &[&str], roads: &[(&str, &str, u64)]) -> Graph {
        let mut g = Graph::new();
        for n in nodes {
            g.add_node(Node::new(node(n), NodeType::City, *n));
        }
        for &(from, to, secs) in roads {
            let w = EdgeWeights::new(secs as f64 / 100.0, Duration::from_secs(secs), 1.0).unwrap();
            g.put_edge(Edge::new(node(from), node(to), w)).unwrap();
        }
        g
    }

    /// A→B 300 s, B→C 300 s, A→C 1200 s.
    pub fn abc() -> Graph {
        graph(&["A", "B", "C"], &[("A", "B", 300), ("B", "C", 300), ("A", "C", 1_200)])
    }

    pub fn ambulance(id: &str, at: &str) -> ResponseUnit {
        ResponseUnit::new(uid(id), UnitType::Ambulance, node(at))
    }

    pub fn incident(id: &str, at: &str, severity: Severity, reported_secs: u64) -> Incident {
        Incident::new(
            iid(id),
            node(at),
            severity,
            [UnitType::Ambulance],
            SimTime::from_secs(reported_secs),
        )
        .unwrap()
    }
}

// ── Prioritization ────────────────────────────────────────────────────────────

#[cfg(test)]
mod priority {
    use perds_core::{IncidentStatus, Severity, SimTime};

    use super::helpers::*;
    use crate::{prioritize, Snapshot};

    #[test]
    fn severity_then_report_time_then_id() {
        let g = abc();
        let snap = Snapshot::new(&g, SimTime::from_secs(100)).with_incidents([
            incident("i-low", "C", Severity::Low, 0),
            incident("i-b", "C", Severity::High, 10),
            incident("i-a", "C", Severity::High, 10),
            incident("i-early", "C", Severity::High, 5),
            incident("i-crit", "C", Severity::Critical, 50),
        ]);
        let order: Vec<_> = prioritize(&snap).iter().map(|i| i.to_string()).collect();
        assert_eq!(order, ["i-crit", "i-early", "i-a", "i-b", "i-low"]);
    }

    #[test]
    fn only_reported_or_queued_are_eligible() {
        let g = abc();
        let snap = Snapshot::new(&g, SimTime::ZERO).with_incidents([
            incident("q", "C", Severity::Low, 0).with_status(IncidentStatus::Queued),
            incident("d", "C", Severity::Low, 0).with_status(IncidentStatus::Dispatched),
            incident("p", "C", Severity::Low, 0).with_status(IncidentStatus::InProgress),
            incident("r", "C", Severity::Low, 0).resolved(SimTime::ZERO),
            incident("x", "C", Severity::Low, 0).with_status(IncidentStatus::Canceled),
            incident("n", "C", Severity::Low, 0),
        ]);
        let order: Vec<_> = prioritize(&snap).iter().map(|i| i.to_string()).collect();
        assert_eq!(order, ["n", "q"]);
    }
}

// ── Eligibility and tie-breaks ────────────────────────────────────────────────

#[cfg(test)]
mod selection {
    use perds_core::{Incident, ResponseUnit, Severity, SimTime, UnitStatus, UnitType};
    use perds_spatial::{CostModel, DijkstraRouter};

    use super::helpers::*;
    use crate::{DispatchPolicy, MultiSourcePolicy, NearestAvailablePolicy, Snapshot};

    fn nearest() -> NearestAvailablePolicy {
        NearestAvailablePolicy::new(DijkstraRouter, CostModel::TravelTime)
    }

    fn multi() -> MultiSourcePolicy {
        MultiSourcePolicy::new(DijkstraRouter, CostModel::TravelTime)
    }

    fn both() -> [Box<dyn DispatchPolicy>; 2] {
        [Box::new(nearest()), Box::new(multi())]
    }

    #[test]
    fn end_to_end_abc_example() {
        let g = abc();
        let i1 = incident("I1", "C", Severity::High, 0);
        let snap = Snapshot::new(&g, SimTime::from_secs(1))
            .with_units([ambulance("U1", "A"), ambulance("U2", "B")])
            .with_incidents([i1.clone()]);
        for policy in both() {
            let d = policy.decide(&snap, &i1).unwrap();
            assert_eq!(d.unit, uid("U2"), "{}", policy.name());
            assert_eq!(d.route.nodes(), [node("B"), node("C")]);
            assert_eq!(d.route.total_cost(), 300.0);
            assert_eq!(d.decided_at, SimTime::from_secs(1));
        }
    }

    #[test]
    fn requirements_filter_units() {
        let g = abc();
        let i = Incident::new(iid("I"), node("C"), Severity::Medium, [UnitType::FireEngine], SimTime::ZERO)
            .unwrap()
            .with_required_capacity(4)
            .with_required_specialization(2);
        let units = [
            // Wrong type, closest.
            ambulance("a", "C"),
            // Too small.
            ResponseUnit::new(uid("f-small"), UnitType::FireEngine, node("B"))
                .with_capacity(2)
                .with_specialization(3),
            // Not specialized enough.
            ResponseUnit::new(uid("f-basic"), UnitType::FireEngine, node("B"))
                .with_capacity(6),
            // Busy.
            ResponseUnit::new(uid("f-busy"), UnitType::FireEngine, node("B"))
                .with_capacity(6)
                .with_specialization(2)
                .with_status(UnitStatus::Unavailable),
            // The only match, far away.
            ResponseUnit::new(uid("f-ok"), UnitType::FireEngine, node("A"))
                .with_capacity(4)
                .with_specialization(2),
        ];
        let snap = Snapshot::new(&g, SimTime::ZERO).with_units(units).with_incidents([i.clone()]);
        for policy in both() {
            let d = policy.decide(&snap, &i).unwrap();
            assert_eq!(d.unit, uid("f-ok"), "{}", policy.name());
            assert_eq!(d.route.total_cost(), 600.0);
        }
    }

    #[test]
    fn repositioning_units_are_dispatchable() {
        let g = abc();
        let i = incident("I", "C", Severity::Low, 0);
        let snap = Snapshot::new(&g, SimTime::ZERO)
            .with_units([ambulance("U", "B").with_status(UnitStatus::Repositioning)])
            .with_incidents([i.clone()]);
        for policy in both() {
            assert_eq!(policy.decide(&snap, &i).unwrap().unit, uid("U"));
        }
    }

    #[test]
    fn multi_type_incident_takes_single_best_unit() {
        let g = abc();
        let i = Incident::new(
            iid("I"),
            node("C"),
            Severity::Medium,
            [UnitType::Ambulance, UnitType::Police],
            SimTime::ZERO,
        )
        .unwrap();
        let snap = Snapshot::new(&g, SimTime::ZERO)
            .with_units([
                ambulance("amb", "A"),
                ResponseUnit::new(uid("pol"), UnitType::Police, node("B")),
            ])
            .with_incidents([i.clone()]);
        for policy in both() {
            assert_eq!(policy.decide(&snap, &i).unwrap().unit, uid("pol"));
        }
    }

    #[test]
    fn co_located_severe_prefers_specialist_then_id() {
        let g = abc();
        let units = [
            ambulance("u-a", "B").with_specialization(1),
            ambulance("u-b", "B").with_specialization(3),
            ambulance("u-c", "B").with_specialization(3),
        ];
        let severe = incident("S", "C", Severity::Critical, 0);
        let mild = incident("M", "C", Severity::Medium, 0);
        let snap = Snapshot::new(&g, SimTime::ZERO)
            .with_units(units)
            .with_incidents([severe.clone(), mild.clone()]);
        for policy in both() {
            assert_eq!(policy.decide(&snap, &severe).unwrap().unit, uid("u-b"), "{}", policy.name());
            assert_eq!(policy.decide(&snap, &mild).unwrap().unit, uid("u-a"), "{}", policy.name());
        }
    }

    #[test]
    fn equal_cost_breaks_on_distance_then_id() {
        // Both routes take 300 s; X→C is shorter in km.
        let mut g = graph(&["X", "Y", "C"], &[("Y", "C", 300)]);
        let w = perds_spatial::EdgeWeights::new(1.0, std::time::Duration::from_secs(300), 1.0).unwrap();
        g.put_edge(perds_spatial::Edge::new(node("X"), node("C"), w)).unwrap();
        let i = incident("I", "C", Severity::Low, 0);
        let snap = Snapshot::new(&g, SimTime::ZERO)
            .with_units([ambulance("a", "Y"), ambulance("b", "X")])
            .with_incidents([i.clone()]);
        for policy in both() {
            assert_eq!(policy.decide(&snap, &i).unwrap().unit, uid("b"), "{}", policy.name());
        }
    }

    #[test]
    fn equal_cost_on_different_nodes_uses_canonical_order() {
        // A→C and B→C are identical roads.
        let g = graph(&["A", "B", "C"], &[("A", "C", 300), ("B", "C", 300)]);

        let severe = incident("S", "C", Severity::High, 0);
        let snap = Snapshot::new(&g, SimTime::ZERO)
            .with_units([ambulance("U1", "A"), ambulance("U2", "B").with_specialization(5)])
            .with_incidents([severe.clone()]);
        for policy in both() {
            let d = policy.decide(&snap, &severe).unwrap();
            assert_eq!(d.unit, uid("U2"), "{}", policy.name());
            assert_eq!(d.route.nodes(), [node("B"), node("C")]);
        }

        // Specialization does not count below HIGH; the lower id wins.
        let mild = incident("M", "C", Severity::Low, 0);
        let snap = Snapshot::new(&g, SimTime::ZERO)
            .with_units([ambulance("U2", "A").with_specialization(5), ambulance("U1", "B")])
            .with_incidents([mild.clone()]);
        for policy in both() {
            let d = policy.decide(&snap, &mild).unwrap();
            assert_eq!(d.unit, uid("U1"), "{}", policy.name());
            assert_eq!(d.route.start(), &node("B"));
        }
    }

    #[test]
    fn unreachable_or_missing_yields_no_decision() {
        let g = abc();
        // Nothing leaves C, and unit "ghost" sits on a node that is not in
        // the graph.
        let i = incident("I", "A", Severity::Low, 0);
        let snap = Snapshot::new(&g, SimTime::ZERO)
            .with_units([ambulance("u", "C"), ambulance("ghost", "Nowhere")])
            .with_incidents([i.clone()]);
        for policy in both() {
            assert!(policy.decide(&snap, &i).is_none());
        }
        // An incident whose node vanished is also just "no decision".
        let lost = incident("L", "Nowhere", Severity::Low, 0);
        for policy in both() {
            assert!(policy.decide(&snap, &lost).is_none());
        }
    }

    #[test]
    fn unit_at_incident_node_gets_trivial_route() {
        let g = abc();
        let i = incident("I", "C", Severity::Low, 0);
        let snap = Snapshot::new(&g, SimTime::ZERO)
            .with_units([ambulance("far", "A"), ambulance("here", "C")])
            .with_incidents([i.clone()]);
        for policy in both() {
            let d = policy.decide(&snap, &i).unwrap();
            assert_eq!(d.unit, uid("here"));
            assert!(d.route.is_trivial());
        }
    }
}

// ── Engine ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod engine {
    use std::collections::BTreeSet;

    use perds_core::{IncidentStatus, Severity, SimTime, UnitStatus};
    use perds_spatial::{CostModel, DijkstraRouter, Graph, Node, NodeType, Route};

    use super::helpers::*;
    use crate::{
        DispatchCommand, DispatchDecision, DispatchEngine, DispatchError, MultiSourcePolicy,
        NearestAvailablePolicy, Snapshot,
    };

    #[test]
    fn higher_priority_incident_wins_the_contested_unit() {
        let g = abc();
        let snap = Snapshot::new(&g, SimTime::from_secs(60))
            .with_units([ambulance("only", "B")])
            .with_incidents([
                incident("low", "C", Severity::Low, 0),
                incident("crit", "C", Severity::Critical, 30),
            ]);
        let out = DispatchEngine::new(NearestAvailablePolicy::new(DijkstraRouter, CostModel::TravelTime))
            .run(snap);
        assert_eq!(out.considered, 2);
        assert_eq!(out.commands.len(), 1);
        match &out.commands[0] {
            DispatchCommand::AssignUnit { incident, unit, .. } => {
                assert_eq!(incident, &iid("crit"));
                assert_eq!(unit, &uid("only"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn later_incidents_see_earlier_assignments() {
        let g = abc();
        let snap = Snapshot::new(&g, SimTime::ZERO)
            .with_units([ambulance("near", "B"), ambulance("far", "A")])
            .with_incidents([
                incident("first", "C", Severity::High, 0),
                incident("second", "C", Severity::High, 1),
            ]);
        let out = DispatchEngine::new(MultiSourcePolicy::new(DijkstraRouter, CostModel::TravelTime))
            .run(snap);
        let pairs: Vec<_> = out
            .decisions
            .iter()
            .map(|d| (d.incident.to_string(), d.unit.to_string()))
            .collect();
        assert_eq!(
            pairs,
            [("first".to_owned(), "near".to_owned()), ("second".to_owned(), "far".to_owned())]
        );
    }

    #[test]
    fn never_double_assigns() {
        // A 5x5 grid with units and incidents scattered over it.
        let mut g = Graph::new();
        let name = |r: usize, c: usize| format!("n{r}{c}");
        for r in 0..5 {
            for c in 0..5 {
                g.add_node(Node::new(node(&name(r, c)), NodeType::Other, ""));
            }
        }
        let mut roads = Vec::new();
        for r in 0..5 {
            for c in 0..5 {
                if c + 1 < 5 {
                    roads.push((name(r, c), name(r, c + 1), 60 + (r * 7 + c) as u64));
                    roads.push((name(r, c + 1), name(r, c), 60));
                }
                if r + 1 < 5 {
                    roads.push((name(r, c), name(r + 1, c), 90));
                    roads.push((name(r + 1, c), name(r, c), 45 + c as u64));
                }
            }
        }
        for (a, b, s) in &roads {
            let w = perds_spatial::EdgeWeights::new(1.0, std::time::Duration::from_secs(*s), 1.0).unwrap();
            g.put_edge(perds_spatial::Edge::new(node(a), node(b), w)).unwrap();
        }

        let units: Vec<_> = (0..6).map(|k| ambulance(&format!("u{k}"), &name(k % 5, (k * 3) % 5))).collect();
        let incidents: Vec<_> = (0..9)
            .map(|k| {
                let sev = [Severity::Low, Severity::High, Severity::Critical][k % 3];
                incident(&format!("i{k}"), &name((k * 2) % 5, k % 5), sev, k as u64)
            })
            .collect();

        let run = |multi: bool| {
            let snap = Snapshot::new(&g, SimTime::ZERO)
                .with_units(units.clone())
                .with_incidents(incidents.clone());
            if multi {
                DispatchEngine::new(MultiSourcePolicy::new(DijkstraRouter, CostModel::TravelTime)).run(snap)
            } else {
                DispatchEngine::new(NearestAvailablePolicy::new(DijkstraRouter, CostModel::TravelTime)).run(snap)
            }
        };

        for multi in [false, true] {
            let out = run(multi);
            assert_eq!(out.commands.len(), 6, "six units, nine incidents");
            let incidents: BTreeSet<_> = out.decisions.iter().map(|d| d.incident.clone()).collect();
            let units: BTreeSet<_> = out.decisions.iter().map(|d| d.unit.clone()).collect();
            assert_eq!(incidents.len(), out.decisions.len());
            assert_eq!(units.len(), out.decisions.len());
        }
    }

    #[test]
    fn assigned_incidents_and_busy_units_are_skipped() {
        let g = abc();
        let busy = ambulance("busy", "B").assigned_to(iid("old"));
        let snap = Snapshot::new(&g, SimTime::ZERO)
            .with_units([busy, ambulance("idle", "A").with_status(UnitStatus::OutOfService)])
            .with_incidents([
                incident("old", "C", Severity::High, 0).with_status(IncidentStatus::Dispatched),
                incident("new", "C", Severity::High, 0),
            ]);
        let out = DispatchEngine::new(NearestAvailablePolicy::new(DijkstraRouter, CostModel::TravelTime))
            .run(snap);
        assert_eq!(out.considered, 1);
        assert!(out.commands.is_empty());
    }

    #[test]
    fn snapshot_rejects_conflicting_decisions() {
        let g = abc();
        let snap = Snapshot::new(&g, SimTime::ZERO)
            .with_units([ambulance("u", "B")])
            .with_incidents([incident("a", "C", Severity::Low, 0), incident("b", "C", Severity::Low, 0)]);
        let route = Route::from_path(&g, vec![node("B"), node("C")], 300.0).unwrap();
        let decide = |i: &str| DispatchDecision {
            incident:   iid(i),
            unit:       uid("u"),
            route:      route.clone(),
            rationale:  String::new(),
            decided_at: SimTime::ZERO,
        };

        let snap = snap.apply(&decide("a")).unwrap();
        assert_eq!(snap.incidents[&iid("a")].status(), IncidentStatus::Dispatched);
        assert_eq!(snap.units[&uid("u")].status(), UnitStatus::EnRoute);
        assert_eq!(snap.assignments[&iid("a")].unit, uid("u"));

        assert_eq!(snap.check(&decide("a")), Err(DispatchError::IncidentAlreadyAssigned(iid("a"))));
        assert_eq!(snap.check(&decide("b")), Err(DispatchError::UnitNotDispatchable(uid("u"))));
        assert_eq!(snap.check(&decide("zzz")), Err(DispatchError::UnknownIncident(iid("zzz"))));
    }

    #[test]
    fn snapshot_rejects_route_that_misses_the_unit() {
        let g = abc();
        let snap = Snapshot::new(&g, SimTime::ZERO)
            .with_units([ambulance("u", "A")])
            .with_incidents([incident("i", "C", Severity::Low, 0)]);
        let route = Route::from_path(&g, vec![node("B"), node("C")], 300.0).unwrap();
        let d = DispatchDecision {
            incident:   iid("i"),
            unit:       uid("u"),
            route,
            rationale:  String::new(),
            decided_at: SimTime::ZERO,
        };
        assert!(matches!(snap.check(&d), Err(DispatchError::RouteMismatch { .. })));
    }
}

// ── Policy agreement (property-based) ────────────────────────────────────────

#[cfg(test)]
mod agreement {
    use std::time::Duration;

    use perds_core::{ResponseUnit, Severity, SimTime, UnitType};
    use perds_spatial::{CostModel, DijkstraRouter, Edge, EdgeStatus, EdgeWeights, Graph, Node, NodeType};
    use proptest::prelude::*;

    use super::helpers::*;
    use crate::{DispatchPolicy, MultiSourcePolicy, NearestAvailablePolicy, Snapshot};

    /// (from, to, seconds / 100, km, closed)
    type RawEdge = (usize, usize, u64, u64, bool);

    /// (node, specialization)
    type RawUnit = (usize, u8);

    fn n(i: usize) -> String {
        format!("n{i}")
    }

    fn build(nodes: usize, edges: &[RawEdge]) -> Graph {
        let mut g = Graph::new();
        for i in 0..nodes {
            g.add_node(Node::new(node(&n(i)), NodeType::Other, ""));
        }
        for &(a, b, hundreds, km, closed) in edges {
            let w = EdgeWeights::new(km as f64, Duration::from_secs(hundreds * 100), 1.0).unwrap();
            let status = if closed { EdgeStatus::Closed } else { EdgeStatus::Open };
            g.put_edge(Edge::new(node(&n(a)), node(&n(b)), w).with_status(status)).unwrap();
        }
        g
    }

    /// Small integer weights so equal costs and equal distances are common.
    fn arb_case() -> impl Strategy<Value = (Graph, Vec<RawUnit>, usize, bool)> {
        (2..8usize).prop_flat_map(|nodes| {
            (
                proptest::collection::vec(
                    (0..nodes, 0..nodes, 1..4u64, 1..3u64, proptest::bool::weighted(0.2)),
                    0..nodes * 3,
                ),
                proptest::collection::vec((0..nodes, 0..3u8), 1..7),
                0..nodes,
                any::<bool>(),
            )
                .prop_map(move |(edges, units, goal, severe)| (build(nodes, &edges), units, goal, severe))
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// The multi-source policy picks the unit the per-unit scan picks, at
        /// the same minimum cost, and both give up on the same inputs.
        #[test]
        fn multi_source_matches_nearest((g, raw, goal, severe) in arb_case()) {
            let units: Vec<ResponseUnit> = raw
                .iter()
                .enumerate()
                .map(|(k, &(at, spec))| {
                    ResponseUnit::new(uid(&format!("u{k}")), UnitType::Ambulance, node(&n(at)))
                        .with_specialization(spec)
                })
                .collect();
            let severity = if severe { Severity::High } else { Severity::Low };
            let i = incident("I", &n(goal), severity, 0);
            let snap = Snapshot::new(&g, SimTime::ZERO)
                .with_units(units)
                .with_incidents([i.clone()]);

            let nearest = NearestAvailablePolicy::new(DijkstraRouter, CostModel::TravelTime).decide(&snap, &i);
            let multi = MultiSourcePolicy::new(DijkstraRouter, CostModel::TravelTime).decide(&snap, &i);
            match (nearest, multi) {
                (None, None) => {}
                (Some(a), Some(b)) => {
                    prop_assert_eq!(a.route.total_cost(), b.route.total_cost());
                    prop_assert_eq!(&a.unit, &b.unit);
                    prop_assert_eq!(b.route.start(), snap.units[&b.unit].location());
                    prop_assert_eq!(b.route.goal(), i.location());
                }
                (a, b) => prop_assert!(false, "only one policy decided: {a:?} / {b:?}"),
            }
        }
    }
}
