//! Single-instance cancellable timers.
//!
//! Each timer kind lives in its own [`TimerSlot`]. Arming a slot replaces
//! whatever was armed before, so at most one timer of each kind can be live.
//! Nothing runs on its own: the owner polls with the current time.

use std::time::{Duration, Instant};
use tracing::trace;

/// The two timer kinds the engine uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Coalesces bursts of final results before committing them.
    Settle,
    /// Confirms a trigger only after the speaker has actually paused.
    Pause,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    pub due: Instant,
    /// Bumped on every arm; lets logs tell superseded timers apart.
    pub generation: u64,
}

#[derive(Debug)]
pub struct TimerSlot {
    kind: TimerKind,
    armed: Option<Deadline>,
    generation: u64,
}

impl TimerSlot {
    pub fn new(kind: TimerKind) -> Self {
        Self {
            kind,
            armed: None,
            generation: 0,
        }
    }

    /// Arm for `now + delay`, superseding any armed deadline.
    pub fn arm(&mut self, now: Instant, delay: Duration) -> Deadline {
        self.generation += 1;
        let deadline = Deadline {
            due: now + delay,
            generation: self.generation,
        };
        if self.armed.replace(deadline).is_some() {
            trace!(timer = ?self.kind, generation = self.generation, "Timer superseded");
        }
        deadline
    }

    /// Disarm. Returns whether a timer was live.
    pub fn cancel(&mut self) -> bool {
        let was_armed = self.armed.take().is_some();
        if was_armed {
            trace!(timer = ?self.kind, "Timer cancelled");
        }
        was_armed
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.armed.map(|d| d.due)
    }

    /// Disarm and return the deadline if it has expired at `now`.
    pub fn take_expired(&mut self, now: Instant) -> Option<Deadline> {
        match self.armed {
            Some(deadline) if deadline.due <= now => self.armed.take(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arm_and_expire() {
        let t0 = Instant::now();
        let mut slot = TimerSlot::new(TimerKind::Settle);
        slot.arm(t0, Duration::from_millis(300));

        assert!(slot.take_expired(t0 + Duration::from_millis(299)).is_none());
        assert!(slot.is_armed());
        assert!(slot.take_expired(t0 + Duration::from_millis(300)).is_some());
        assert!(!slot.is_armed());
    }

    #[test]
    fn test_rearm_supersedes() {
        let t0 = Instant::now();
        let mut slot = TimerSlot::new(TimerKind::Pause);
        let first = slot.arm(t0, Duration::from_millis(100));
        let second = slot.arm(t0 + Duration::from_millis(50), Duration::from_millis(100));

        assert!(second.generation > first.generation);
        // The first deadline passing does not fire the superseded timer.
        assert!(slot.take_expired(t0 + Duration::from_millis(120)).is_none());
        assert_eq!(
            slot.take_expired(t0 + Duration::from_millis(150)),
            Some(second)
        );
    }

    #[test]
    fn test_cancel() {
        let t0 = Instant::now();
        let mut slot = TimerSlot::new(TimerKind::Pause);
        assert!(!slot.cancel());
        slot.arm(t0, Duration::from_millis(10));
        assert!(slot.cancel());
        assert!(slot.take_expired(t0 + Duration::from_secs(1)).is_none());
        assert_eq!(slot.deadline(), None);
    }
}
