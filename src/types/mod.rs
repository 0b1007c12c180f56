//! Core data types for the dashboard timer.
//!
//! This module defines the data structures used for:
//! - Timer mode and lifecycle status
//! - Timer configuration with validation
//! - Timer state and its persisted record

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod constants;

use constants::{BREAK_DURATION_SECONDS, MAX_DURATION_SECONDS, WORK_DURATION_SECONDS};

// ============================================================================
// TimerMode
// ============================================================================

/// The kind of interval currently counting down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerMode {
    /// Focused work interval
    #[default]
    Work,
    /// Break interval
    Break,
}

impl TimerMode {
    /// Returns the string representation of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerMode::Work => "work",
            TimerMode::Break => "break",
        }
    }

    /// Returns the label shown under the clock.
    pub fn label(&self) -> &'static str {
        match self {
            TimerMode::Work => "WORK SESSION",
            TimerMode::Break => "BREAK TIME",
        }
    }

    /// Returns the mode that follows this one when an interval completes.
    pub fn next(&self) -> Self {
        match self {
            TimerMode::Work => TimerMode::Break,
            TimerMode::Break => TimerMode::Work,
        }
    }
}

// ============================================================================
// TimerStatus
// ============================================================================

/// Lifecycle status of the timer.
///
/// `Complete` only appears after a work interval finishes and lasts until
/// the next `start` or `reset`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimerStatus {
    /// Not started, or reset
    #[default]
    Ready,
    /// Counting down
    Running,
    /// Countdown held
    Paused,
    /// A work interval just finished
    Complete,
}

impl TimerStatus {
    /// Returns the label shown in the timer panel header.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerStatus::Ready => "READY",
            TimerStatus::Running => "RUNNING",
            TimerStatus::Paused => "PAUSED",
            TimerStatus::Complete => "COMPLETE",
        }
    }

    /// Returns true if the timer is actively counting down.
    pub fn is_running(&self) -> bool {
        matches!(self, TimerStatus::Running)
    }
}

// ============================================================================
// TimerConfig
// ============================================================================

/// Errors reported by [`TimerConfig::validate`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Work duration outside the accepted range.
    #[error("work duration must be between 1 and {max} seconds, got {got}")]
    WorkDuration { got: u32, max: u32 },

    /// Break duration outside the accepted range.
    #[error("break duration must be between 1 and {max} seconds, got {got}")]
    BreakDuration { got: u32, max: u32 },
}

/// Interval lengths for the timer.
///
/// Fixed for the lifetime of a session; the builder methods exist so a
/// future settings screen can supply other values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerConfig {
    /// Work interval length in seconds
    pub work_duration_seconds: u32,
    /// Break interval length in seconds
    pub break_duration_seconds: u32,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            work_duration_seconds: WORK_DURATION_SECONDS,
            break_duration_seconds: BREAK_DURATION_SECONDS,
        }
    }
}

impl TimerConfig {
    /// Sets the work interval length in seconds.
    pub fn with_work_seconds(mut self, seconds: u32) -> Self {
        self.work_duration_seconds = seconds;
        self
    }

    /// Sets the break interval length in seconds.
    pub fn with_break_seconds(mut self, seconds: u32) -> Self {
        self.break_duration_seconds = seconds;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_DURATION_SECONDS).contains(&self.work_duration_seconds) {
            return Err(ConfigError::WorkDuration {
                got: self.work_duration_seconds,
                max: MAX_DURATION_SECONDS,
            });
        }
        if !(1..=MAX_DURATION_SECONDS).contains(&self.break_duration_seconds) {
            return Err(ConfigError::BreakDuration {
                got: self.break_duration_seconds,
                max: MAX_DURATION_SECONDS,
            });
        }
        Ok(())
    }

    /// Returns the full length of an interval of the given mode.
    pub fn duration_for(&self, mode: TimerMode) -> u32 {
        match mode {
            TimerMode::Work => self.work_duration_seconds,
            TimerMode::Break => self.break_duration_seconds,
        }
    }

    /// Returns the `work/break` minute summary, e.g. `25/5`.
    pub fn mode_summary(&self) -> String {
        format!(
            "{}/{}",
            self.work_duration_seconds / 60,
            self.break_duration_seconds / 60
        )
    }
}

// ============================================================================
// TimerState
// ============================================================================

/// The timer's mutable state.
///
/// Only [`crate::timer::TimerEngine`] mutates this; everything else reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    /// Seconds left in the current interval
    pub remaining_seconds: u32,
    /// Current interval kind
    pub mode: TimerMode,
    /// Lifecycle status
    pub status: TimerStatus,
    /// Completed work intervals, across restarts
    pub session_count: u32,
}

impl TimerState {
    /// Creates the start-of-process state: a ready work interval.
    pub fn new(config: &TimerConfig, session_count: u32) -> Self {
        Self {
            remaining_seconds: config.work_duration_seconds,
            mode: TimerMode::Work,
            status: TimerStatus::Ready,
            session_count,
        }
    }

    /// Switches to `mode` with a full countdown.
    pub fn enter_mode(&mut self, mode: TimerMode, config: &TimerConfig) {
        self.mode = mode;
        self.remaining_seconds = config.duration_for(mode);
    }

    /// Refills the countdown for the current mode.
    pub fn refill(&mut self, config: &TimerConfig) {
        self.remaining_seconds = config.duration_for(self.mode);
    }

    /// Takes one second off the countdown.
    ///
    /// Returns false, leaving the state untouched, when the countdown is
    /// already at zero.
    pub fn count_down(&mut self) -> bool {
        if self.remaining_seconds == 0 {
            return false;
        }
        self.remaining_seconds -= 1;
        true
    }

    /// Records one completed work interval.
    pub fn record_session(&mut self) {
        self.session_count = self.session_count.saturating_add(1);
    }

    /// Minutes component of the countdown.
    pub fn minutes(&self) -> u32 {
        self.remaining_seconds / 60
    }

    /// Seconds component of the countdown.
    pub fn seconds(&self) -> u32 {
        self.remaining_seconds % 60
    }

    /// Formats the countdown as `MM:SS`.
    pub fn format_clock(&self) -> String {
        format!("{:02}:{:02}", self.minutes(), self.seconds())
    }
}

// ============================================================================
// TimerRecord
// ============================================================================

/// The persisted part of the timer: `{ "sessionCount": n }`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerRecord {
    pub session_count: u32,
}

// ============================================================================
// Tests
// ============================================================================
