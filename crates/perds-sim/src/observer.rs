//! Dispatch observer trait for metrics and data collection.

use std::time::Duration;

use perds_core::SimTime;
use perds_dispatch::{DispatchCommand, DispatchDecision};

/// Callbacks invoked by the [`Controller`][crate::Controller] as it
/// dispatches.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example: decision logger
///
/// ```rust,ignore
/// struct DecisionLog(Vec<String>);
///
/// impl DispatchObserver for DecisionLog {
///     fn on_decision(&mut self, at: SimTime, decision: &DispatchDecision) {
///         self.0.push(format!("{at}: {} -> {}", decision.unit, decision.incident));
///     }
/// }
/// ```
pub trait DispatchObserver {
    /// Called after every dispatch-engine cycle.
    ///
    /// `considered` is the number of eligible incidents examined and
    /// `decided` the number that received a unit.
    fn on_dispatch_computed(
        &mut self,
        _at:         SimTime,
        _elapsed:    Duration,
        _considered: usize,
        _decided:    usize,
    ) {}

    /// Called once per accepted dispatch decision, before it is applied.
    fn on_decision(&mut self, _at: SimTime, _decision: &DispatchDecision) {}

    /// Called after a dispatch command (assign, reroute or cancel) has been
    /// applied to controller state.
    fn on_command_applied(&mut self, _at: SimTime, _command: &DispatchCommand) {}
}

/// A [`DispatchObserver`] that does nothing.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoopObserver;

impl DispatchObserver for NoopObserver {}

/// Running totals kept in memory.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DispatchMetrics {
    pub cycles:               u64,
    pub incidents_considered: u64,
    pub decisions:            u64,
    pub assignments:          u64,
    pub reroutes:             u64,
    pub cancellations:        u64,
    pub total_compute:        Duration,
    pub max_compute:          Duration,
    pub last_cycle_at:        Option<SimTime>,
}

impl DispatchMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mean wall-clock time per dispatch cycle.
    pub fn mean_compute(&self) -> Duration {
        if self.cycles == 0 {
            Duration::ZERO
        } else {
            self.total_compute.div_f64(self.cycles as f64)
        }
    }
}

impl DispatchObserver for DispatchMetrics {
    fn on_dispatch_computed(
        &mut self,
        at:         SimTime,
        elapsed:    Duration,
        considered: usize,
        _decided:   usize,
    ) {
        self.cycles += 1;
        self.incidents_considered += considered as u64;
        self.total_compute += elapsed;
        self.max_compute = self.max_compute.max(elapsed);
        self.last_cycle_at = Some(at);
    }

    fn on_decision(&mut self, _at: SimTime, _decision: &DispatchDecision) {
        self.decisions += 1;
    }

    fn on_command_applied(&mut self, _at: SimTime, command: &DispatchCommand) {
        match command {
            DispatchCommand::AssignUnit { .. }       => self.assignments += 1,
            DispatchCommand::RerouteUnit { .. }      => self.reroutes += 1,
            DispatchCommand::CancelAssignment { .. } => self.cancellations += 1,
        }
    }
}
