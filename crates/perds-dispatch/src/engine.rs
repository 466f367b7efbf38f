//! The dispatch engine: one pass of prioritized decisions over a snapshot.

use std::time::{Duration, Instant};

use crate::priority::prioritize;
use crate::{DispatchCommand, DispatchDecision, DispatchPolicy, Snapshot};

/// Result of one dispatch cycle.
#[derive(Debug, Clone, Default)]
pub struct DispatchOutcome {
    /// `AssignUnit` commands in decision order.
    pub commands: Vec<DispatchCommand>,

    /// Accepted decisions, parallel to `commands`.
    pub decisions: Vec<DispatchDecision>,

    /// Number of eligible incidents examined.
    pub considered: usize,

    /// Wall-clock time spent in the cycle.
    pub elapsed: Duration,
}

/// Runs a [`DispatchPolicy`] over every eligible incident in priority order.
///
/// The snapshot is folded by value: each accepted decision yields the next
/// working snapshot, so no incident and no unit is assigned twice in a pass.
#[derive(Clone, Debug, Default)]
pub struct DispatchEngine<P: DispatchPolicy> {
    pub policy: P,
}

impl<P: DispatchPolicy> DispatchEngine<P> {
    pub fn new(policy: P) -> Self {
        Self { policy }
    }

    pub fn run(&self, snapshot: Snapshot<'_>) -> DispatchOutcome {
        let started = Instant::now();
        let order = prioritize(&snapshot);
        let considered = order.len();

        let (_, decisions) = order.iter().fold(
            (snapshot, Vec::new()),
            |(working, mut decisions), incident_id| {
                let Some(incident) = working.incidents.get(incident_id) else {
                    return (working, decisions);
                };
                let Some(decision) = self.policy.decide(&working, incident) else {
                    tracing::trace!(incident = %incident_id, "no eligible unit");
                    return (working, decisions);
                };

                match working.check(&decision) {
                    Ok(()) => {
                        let next = working.commit(&decision);
                        decisions.push(decision);
                        (next, decisions)
                    }
                    Err(err) => {
                        tracing::warn!(
                            policy = self.policy.name(), incident = %incident_id, %err,
                            "decision rejected"
                        );
                        (working, decisions)
                    }
                }
            },
        );

        let commands = decisions.iter().map(DispatchDecision::to_command).collect();
        let elapsed = started.elapsed();
        tracing::debug!(
            policy = self.policy.name(),
            considered,
            assigned = decisions.len(),
            elapsed_us = elapsed.as_micros() as u64,
            "dispatch cycle"
        );
        DispatchOutcome { commands, decisions, considered, elapsed }
    }
}
