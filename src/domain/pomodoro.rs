//! Pomodoro phase state machine
//!
//! Three phases cycle indefinitely: work, short break, long break. Every
//! `long_break_interval`-th completed work session earns a long break
//! instead of a short one. The machine owns no clock: `tick()` is meant
//! to be invoked once per second by whoever drives the timer, and does
//! nothing more than decrement and roll phases.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum PomodoroError {
    #[error("Pomodoro duration must be positive: {0}")]
    InvalidDuration(&'static str),

    #[error("Long break interval must be at least 1")]
    InvalidInterval,
}

/// Current mode of the timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Work,
    ShortBreak,
    LongBreak,
}

impl Phase {
    /// Returns true for either break phase
    pub fn is_break(&self) -> bool {
        matches!(self, Phase::ShortBreak | Phase::LongBreak)
    }

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Work => "work",
            Phase::ShortBreak => "short break",
            Phase::LongBreak => "long break",
        }
    }
}

/// Timer configuration. All fields are required inputs; defaults belong
/// to the config layer, not the machine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PomodoroConfig {
    /// Work phase length in seconds
    pub work_duration: u32,
    /// Short break length in seconds
    pub short_break_duration: u32,
    /// Long break length in seconds
    pub long_break_duration: u32,
    /// Completed work sessions between long breaks
    pub long_break_interval: u32,
    /// Automatically start break phases
    pub auto_start_breaks: bool,
    /// Automatically start work phases after breaks
    pub auto_start_work: bool,
}

impl PomodoroConfig {
    pub fn validate(&self) -> Result<(), PomodoroError> {
        if self.work_duration == 0 {
            return Err(PomodoroError::InvalidDuration("work_duration"));
        }
        if self.short_break_duration == 0 {
            return Err(PomodoroError::InvalidDuration("short_break_duration"));
        }
        if self.long_break_duration == 0 {
            return Err(PomodoroError::InvalidDuration("long_break_duration"));
        }
        if self.long_break_interval == 0 {
            return Err(PomodoroError::InvalidInterval);
        }
        Ok(())
    }

    fn duration_for(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Work => self.work_duration,
            Phase::ShortBreak => self.short_break_duration,
            Phase::LongBreak => self.long_break_duration,
        }
    }
}

/// Emitted whenever a phase completes (by countdown or by skip)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PhaseEvent {
    pub from: Phase,
    pub to: Phase,
    /// True when the completed phase was a work session
    pub work_session_completed: bool,
}

/// The pomodoro timer state machine
#[derive(Debug, Clone)]
pub struct PomodoroTimer {
    config: PomodoroConfig,
    phase: Phase,
    seconds_remaining: u32,
    completed_work_sessions: u32,
    running: bool,
}

impl PomodoroTimer {
    /// Creates a stopped timer in the work phase
    pub fn new(config: PomodoroConfig) -> Result<Self, PomodoroError> {
        config.validate()?;
        Ok(Self {
            phase: Phase::Work,
            seconds_remaining: config.work_duration,
            completed_work_sessions: 0,
            running: false,
            config,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn seconds_remaining(&self) -> u32 {
        self.seconds_remaining
    }

    pub fn completed_work_sessions(&self) -> u32 {
        self.completed_work_sessions
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Begins the countdown; a no-op if already running
    pub fn start(&mut self) {
        self.running = true;
    }

    /// Stops the countdown; a no-op if not running
    pub fn pause(&mut self) {
        self.running = false;
    }

    /// Advances the countdown by one second. Returns the phase event if
    /// this tick finished the phase; `None` while paused or mid-phase.
    pub fn tick(&mut self) -> Option<PhaseEvent> {
        if !self.running {
            return None;
        }
        self.seconds_remaining = self.seconds_remaining.saturating_sub(1);
        if self.seconds_remaining == 0 {
            Some(self.complete_phase())
        } else {
            None
        }
    }

    /// Forces the current phase to complete immediately.
    ///
    /// Skipping a work phase still counts it as a completed session,
    /// so the long-break cadence holds under manual advance.
    pub fn skip(&mut self) -> PhaseEvent {
        self.seconds_remaining = 0;
        self.complete_phase()
    }

    /// Stops the timer and restores the current phase's full duration.
    /// Never advances the phase or touches the session counter.
    pub fn reset(&mut self) {
        self.running = false;
        self.seconds_remaining = self.config.duration_for(self.phase);
    }

    fn complete_phase(&mut self) -> PhaseEvent {
        let from = self.phase;
        let work_session_completed = from == Phase::Work;

        if work_session_completed {
            self.completed_work_sessions += 1;
        }

        let next = match from {
            Phase::Work => {
                if self.completed_work_sessions % self.config.long_break_interval == 0 {
                    Phase::LongBreak
                } else {
                    Phase::ShortBreak
                }
            }
            Phase::ShortBreak | Phase::LongBreak => Phase::Work,
        };

        self.change_phase(next);

        PhaseEvent {
            from,
            to: next,
            work_session_completed,
        }
    }

    fn change_phase(&mut self, phase: Phase) {
        self.phase = phase;
        self.seconds_remaining = self.config.duration_for(phase);
        self.running = if phase.is_break() {
            self.config.auto_start_breaks
        } else {
            self.config.auto_start_work
        };
    }
}
