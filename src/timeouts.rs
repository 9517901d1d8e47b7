//! Named, replaceable deadlines.
//!
//! Every deadline has a name. Scheduling a name that is already pending replaces the old
//! deadline together with its payload, so a burst of requests under one name collapses into the
//! last one. Deadlines are measured on the unadjusted clock: animation slowdown must not stretch
//! hover delays.

use std::time::Duration;

use crate::animation::Clock;

/// Names of the timeouts used by the preview menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeoutName {
    Open,
    Close,
    Peek,
}

/// Payload carried by a named deadline.
pub trait Named {
    fn name(&self) -> TimeoutName;
}

#[derive(Debug)]
struct Pending<T> {
    deadline: Duration,
    payload: T,
}

#[derive(Debug)]
pub struct Timeouts<T> {
    clock: Clock,
    pending: Vec<Pending<T>>,
}

impl<T: Named> Timeouts<T> {
    pub fn new(clock: Clock) -> Self {
        Self {
            clock,
            pending: Vec::new(),
        }
    }

    /// Schedules `payload` to fire after `delay`, replacing a pending one with the same name.
    pub fn add(&mut self, delay: Duration, payload: T) {
        let name = payload.name();
        self.remove(name);

        let deadline = self.clock.now_unadjusted() + delay;
        trace!("scheduling {name:?} timeout in {delay:?}");
        self.pending.push(Pending { deadline, payload });
    }

    /// Cancels the pending timeout with this name, returning its payload.
    pub fn remove(&mut self, name: TimeoutName) -> Option<T> {
        let idx = self.pending.iter().position(|p| p.payload.name() == name)?;
        Some(self.pending.remove(idx).payload)
    }

    pub fn contains(&self, name: TimeoutName) -> bool {
        self.pending.iter().any(|p| p.payload.name() == name)
    }

    pub fn get(&self, name: TimeoutName) -> Option<&T> {
        self.pending
            .iter()
            .find(|p| p.payload.name() == name)
            .map(|p| &p.payload)
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Returns the earliest pending deadline.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending.iter().map(|p| p.deadline).min()
    }

    /// Takes the earliest timeout that is due, if any.
    ///
    /// Taking one at a time lets the caller schedule or cancel timeouts in response to the one
    /// that fired before the next one is looked at.
    pub fn pop_due(&mut self) -> Option<T> {
        let now = self.clock.now_unadjusted();
        let (idx, _) = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.deadline <= now)
            .min_by_key(|(_, p)| p.deadline)?;
        Some(self.pending.remove(idx).payload)
    }
}
