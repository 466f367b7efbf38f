//! `SimulationEngine`: time-ordered replay of system commands.
//!
//! Events live in a `BTreeMap<SimTime, VecDeque<SystemCommand>>`: the map
//! gives time order, the deque gives scheduling order among events that share
//! a timestamp.

use std::collections::{BTreeMap, VecDeque};

use perds_core::SimTime;

use crate::{SystemCommand, TimedEvent};

/// Anything that can apply a [`SystemCommand`] at a simulation time.
///
/// Implemented by [`Controller`][crate::Controller]; tests substitute
/// recorders.
pub trait CommandExecutor {
    type Error;

    fn execute(&mut self, command: SystemCommand, now: SimTime) -> Result<(), Self::Error>;
}

/// Discrete-event queue of [`TimedEvent`]s.
#[derive(Clone, Debug, Default)]
pub struct SimulationEngine {
    queue: BTreeMap<SimTime, VecDeque<SystemCommand>>,
    /// Cached event count for O(1) `len()`.
    total: usize,
}

impl SimulationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `command` at `time`.  Events at the same time run in the order
    /// they were scheduled.
    pub fn schedule(&mut self, time: SimTime, command: SystemCommand) {
        self.queue.entry(time).or_default().push_back(command);
        self.total += 1;
    }

    pub fn schedule_event(&mut self, event: TimedEvent) {
        self.schedule(event.time, event.command);
    }

    pub fn schedule_all(&mut self, events: impl IntoIterator<Item = TimedEvent>) {
        for event in events {
            self.schedule_event(event);
        }
    }

    /// Time of the earliest queued event.
    pub fn next_time(&self) -> Option<SimTime> {
        self.queue.keys().next().copied()
    }

    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Pop and execute every event with `time < until_exclusive`, in time
    /// order, and return them.  Later events stay queued.
    ///
    /// # Errors
    /// Stops at the first executor error and returns it.  The failing event
    /// has been removed from the queue; events after it have not.
    pub fn run_until<E: CommandExecutor>(
        &mut self,
        executor:        &mut E,
        until_exclusive: SimTime,
    ) -> Result<Vec<TimedEvent>, E::Error> {
        let mut executed = Vec::new();
        while let Some(event) = self.pop_before(until_exclusive) {
            tracing::debug!(time = %event.time, command = event.command.kind(), "executing event");
            executor.execute(event.command.clone(), event.time)?;
            executed.push(event);
        }
        tracing::debug!(until = %until_exclusive, executed = executed.len(), pending = self.total, "run_until done");
        Ok(executed)
    }

    fn pop_before(&mut self, until_exclusive: SimTime) -> Option<TimedEvent> {
        let mut entry = self.queue.first_entry()?;
        let time = *entry.key();
        if time >= until_exclusive {
            return None;
        }
        let command = entry.get_mut().pop_front()?;
        if entry.get().is_empty() {
            entry.remove();
        }
        self.total -= 1;
        Some(TimedEvent { time, command })
    }
}
