//! Work-session countdown timer.
//!
//! A small state machine (Idle, Running, Expired) with start/stop/reset,
//! independent of any rendering concern. The UI drives it by polling; every
//! method has an `_at` variant taking an explicit `Instant` so transitions
//! can be tested without sleeping. Stopping keeps the remaining time, so
//! start after stop resumes the session; reset restores the full duration.

use std::time::{Duration, Instant};

/// Default work session length.
pub const WORK_MINUTES: u64 = 25;
/// Default break length.
pub const BREAK_MINUTES: u64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Idle,
    Running,
    Expired,
}

#[derive(Debug)]
pub struct SessionTimer {
    duration: Duration,
    remaining: Duration,
    state: TimerState,
    deadline: Option<Instant>,
}

impl SessionTimer {
    pub fn new(duration: Duration) -> Self {
        SessionTimer {
            duration,
            remaining: duration,
            state: TimerState::Idle,
            deadline: None,
        }
    }

    /// A timer for a standard work session.
    pub fn work() -> Self {
        SessionTimer::new(Duration::from_secs(WORK_MINUTES * 60))
    }

    /// A timer for a short break.
    pub fn short_break() -> Self {
        SessionTimer::new(Duration::from_secs(BREAK_MINUTES * 60))
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn start(&mut self) {
        self.start_at(Instant::now());
    }

    pub fn start_at(&mut self, now: Instant) {
        if self.state == TimerState::Idle && !self.remaining.is_zero() {
            self.deadline = Some(now + self.remaining);
            self.state = TimerState::Running;
        }
    }

    pub fn stop(&mut self) {
        self.stop_at(Instant::now());
    }

    /// Pause a running timer, keeping the remaining time.
    pub fn stop_at(&mut self, now: Instant) {
        if self.state == TimerState::Running {
            if let Some(deadline) = self.deadline.take() {
                self.remaining = deadline.saturating_duration_since(now);
            }
            self.state = TimerState::Idle;
        }
    }

    /// Return to Idle with the full duration, from any state.
    pub fn reset(&mut self) {
        self.remaining = self.duration;
        self.deadline = None;
        self.state = TimerState::Idle;
    }

    pub fn poll(&mut self) -> TimerState {
        self.poll_at(Instant::now())
    }

    /// Advance the state machine: a running timer whose deadline has passed
    /// becomes Expired. Returns the state after the transition.
    pub fn poll_at(&mut self, now: Instant) -> TimerState {
        if self.state == TimerState::Running {
            if let Some(deadline) = self.deadline {
                if now >= deadline {
                    self.remaining = Duration::ZERO;
                    self.deadline = None;
                    self.state = TimerState::Expired;
                }
            }
        }
        self.state
    }

    pub fn remaining(&self) -> Duration {
        self.remaining_at(Instant::now())
    }

    pub fn remaining_at(&self, now: Instant) -> Duration {
        match self.deadline {
            Some(deadline) => deadline.saturating_duration_since(now),
            None => self.remaining,
        }
    }
}
