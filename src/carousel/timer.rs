//! Auto-advance state machine.
//!
//! The repeating timer is created once and never recreated; pausing and
//! resuming only move its next fire date around.

use std::time::Duration;

/// When the repeating timer should fire next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireDate {
    /// Fire right away, then every interval.
    Now,
    /// Fire after the delay, then every interval.
    After(Duration),
    /// Parked until rescheduled.
    Never,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceState {
    Running,
    Paused,
}

#[derive(Debug, Clone)]
pub struct AutoAdvance {
    auto_loop: bool,
    interval: Duration,
    state: AdvanceState,
}

impl AutoAdvance {
    pub fn new(auto_loop: bool, interval: Duration) -> Self {
        let state = if auto_loop {
            AdvanceState::Running
        } else {
            AdvanceState::Paused
        };
        Self {
            auto_loop,
            interval,
            state,
        }
    }

    pub fn state(&self) -> AdvanceState {
        self.state
    }

    pub fn auto_loop(&self) -> bool {
        self.auto_loop
    }

    pub fn is_running(&self) -> bool {
        self.state == AdvanceState::Running
    }

    /// Fire date for a timer created at setup.
    pub fn initial_fire_date(&self) -> FireDate {
        if self.auto_loop {
            FireDate::After(self.interval)
        } else {
            FireDate::Never
        }
    }

    pub fn set_auto_loop(&mut self, enabled: bool) -> FireDate {
        self.auto_loop = enabled;
        if enabled {
            self.state = AdvanceState::Running;
            FireDate::Now
        } else {
            self.state = AdvanceState::Paused;
            FireDate::Never
        }
    }

    /// A manual drag began. Returns the new fire date if the timer must move.
    pub fn drag_began(&mut self) -> Option<FireDate> {
        if !self.auto_loop {
            return None;
        }
        self.state = AdvanceState::Paused;
        Some(FireDate::Never)
    }

    /// A manual drag ended. Ticking resumes one full interval later.
    pub fn drag_ended(&mut self) -> Option<FireDate> {
        if !self.auto_loop {
            return None;
        }
        self.state = AdvanceState::Running;
        Some(FireDate::After(self.interval))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_follows_flag() {
        let on = AutoAdvance::new(true, Duration::from_secs(5));
        assert_eq!(on.state(), AdvanceState::Running);
        assert_eq!(on.initial_fire_date(), FireDate::After(Duration::from_secs(5)));

        let off = AutoAdvance::new(false, Duration::from_secs(5));
        assert_eq!(off.state(), AdvanceState::Paused);
        assert_eq!(off.initial_fire_date(), FireDate::Never);
    }

    #[test]
    fn test_drag_pauses_then_resumes_after_interval() {
        let mut advance = AutoAdvance::new(true, Duration::from_secs(5));
        assert_eq!(advance.drag_began(), Some(FireDate::Never));
        assert_eq!(advance.state(), AdvanceState::Paused);
        assert_eq!(
            advance.drag_ended(),
            Some(FireDate::After(Duration::from_secs(5)))
        );
        assert_eq!(advance.state(), AdvanceState::Running);
    }

    #[test]
    fn test_drag_ignored_when_auto_loop_off() {
        let mut advance = AutoAdvance::new(false, Duration::from_secs(5));
        assert_eq!(advance.drag_began(), None);
        assert_eq!(advance.drag_ended(), None);
        assert_eq!(advance.state(), AdvanceState::Paused);
    }

    #[test]
    fn test_toggle_auto_loop() {
        let mut advance = AutoAdvance::new(true, Duration::from_secs(5));
        assert_eq!(advance.set_auto_loop(false), FireDate::Never);
        assert!(!advance.is_running());
        assert_eq!(advance.set_auto_loop(true), FireDate::Now);
        assert!(advance.is_running());
    }
}
