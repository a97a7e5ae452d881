//! A single cancellable deadline on a virtual clock.
//!
//! The carousel never sleeps. It owns one [`Timer`], arms it with an absolute
//! deadline, and whoever drives the carousel (the live preview thread, a test,
//! the artifact replay) asks whether it is due. Arming always replaces the
//! previous deadline, so at most one advance is ever pending.

use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timer {
    deadline: Option<Duration>,
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms the timer at `deadline`, replacing any pending one.
    pub fn arm(&mut self, deadline: Duration) {
        if let Some(previous) = self.deadline.replace(deadline) {
            log::trace!("timer re-armed at {:?} (was {:?})", deadline, previous);
        } else {
            log::trace!("timer armed at {:?}", deadline);
        }
    }

    /// Cancels the pending deadline. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        let was_armed = self.deadline.take().is_some();
        if was_armed {
            log::trace!("timer cancelled");
        }
        was_armed
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Disarms and returns the deadline if it is at or before `now`.
    pub fn take_due(&mut self, now: Duration) -> Option<Duration> {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.deadline = None;
                Some(deadline)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_new_timer_is_idle() {
        let timer = Timer::new();
        assert!(!timer.is_armed());
        assert_eq!(timer.deadline(), None);
    }

    #[test]
    fn test_arm_replaces_pending_deadline() {
        let mut timer = Timer::new();
        timer.arm(ms(100));
        timer.arm(ms(300));
        assert_eq!(timer.deadline(), Some(ms(300)));
        assert_eq!(timer.take_due(ms(100)), None);
    }

    #[test]
    fn test_take_due() {
        let mut timer = Timer::new();
        timer.arm(ms(100));
        assert_eq!(timer.take_due(ms(99)), None);
        assert!(timer.is_armed());
        assert_eq!(timer.take_due(ms(100)), Some(ms(100)));
        assert!(!timer.is_armed());
        assert_eq!(timer.take_due(ms(500)), None);
    }

    #[test]
    fn test_cancel() {
        let mut timer = Timer::new();
        assert!(!timer.cancel());
        timer.arm(ms(10));
        assert!(timer.cancel());
        assert_eq!(timer.take_due(ms(1000)), None);
    }
}
