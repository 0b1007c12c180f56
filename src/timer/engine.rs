//! Timer engine for the dashboard.
//!
//! This module provides the Pomodoro state machine:
//! - State transitions (Ready → Running ⇄ Paused, work ⇄ break)
//! - Countdown driven by an injectable [`TickScheduler`]
//! - Short and completion tones on transitions
//! - Persistence of the completed-session count
//!
//! ```text
//!            start              tick [expired, work]
//!   Ready ─────────▶ Running ─────────────────────▶ Complete (break)
//!     ▲  ◀──────────  │  ▲                              │
//!     │   tick [expired, break]                         │ start
//!     │               │  │ start                        ▼
//!     │         pause ▼  │                           Running
//!     │             Paused
//!     └──── reset (from any status)
//! ```

use std::sync::Arc;

use tracing::{debug, info, trace};

use super::scheduler::{TickScheduler, TickSignal};
use crate::sound::NotificationSink;
use crate::storage::{Storage, StorageKey};
use crate::types::{TimerConfig, TimerMode, TimerRecord, TimerState, TimerStatus};

// ============================================================================
// TickOutcome
// ============================================================================

/// What a tick did to the timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The tick was stale or arrived while not running.
    Ignored,
    /// One second was counted off.
    Counted {
        /// Seconds left after this tick
        remaining_seconds: u32,
    },
    /// The interval ran out and the timer switched mode.
    Completed {
        /// The mode that just finished
        finished: TimerMode,
        /// Completed work intervals after this transition
        session_count: u32,
    },
}

// ============================================================================
// TimerControls
// ============================================================================

/// The operations a keyboard shortcut or button may perform on the timer.
pub trait TimerControls {
    /// Starts or resumes the countdown.
    fn start(&mut self);

    /// Holds the countdown.
    fn pause(&mut self);

    /// Refills the current interval and returns to ready.
    fn reset(&mut self);
}

// ============================================================================
// TimerEngine
// ============================================================================

/// The Pomodoro state machine.
///
/// Owns the single [`TimerState`]. No operation fails: calls that do not
/// apply to the current status are ignored.
pub struct TimerEngine<S: TickScheduler> {
    config: TimerConfig,
    state: TimerState,
    /// Generation of the most recent arming; ticks from older ones are stale.
    generation: u64,
    scheduler: S,
    sink: Arc<dyn NotificationSink>,
    storage: Storage,
}

impl<S: TickScheduler> TimerEngine<S> {
    /// Creates an engine, restoring the session count from `storage`.
    ///
    /// A missing or corrupt timer record counts as zero sessions.
    pub fn new(
        config: TimerConfig,
        scheduler: S,
        sink: Arc<dyn NotificationSink>,
        storage: Storage,
    ) -> Self {
        let record: TimerRecord = storage.load_or_default(StorageKey::Timer);
        info!(session_count = record.session_count, "Timer engine ready");

        Self {
            state: TimerState::new(&config, record.session_count),
            config,
            generation: 0,
            scheduler,
            sink,
            storage,
        }
    }

    /// Starts the countdown. Ignored while already running.
    pub fn start(&mut self) {
        if self.state.status.is_running() {
            return;
        }

        self.state.status = TimerStatus::Running;
        self.arm();
        self.sink.notify_short();

        debug!(
            mode = self.state.mode.as_str(),
            remaining = self.state.remaining_seconds,
            "Timer started"
        );
    }

    /// Pauses the countdown, keeping the remaining time. Ignored unless
    /// running.
    pub fn pause(&mut self) {
        if !self.state.status.is_running() {
            return;
        }

        self.state.status = TimerStatus::Paused;
        self.scheduler.disarm();
        self.sink.notify_short();

        debug!(remaining = self.state.remaining_seconds, "Timer paused");
    }

    /// Stops the countdown and refills the current mode's interval.
    ///
    /// The mode is kept: resetting during a break gives a full break.
    pub fn reset(&mut self) {
        self.scheduler.disarm();
        self.state.status = TimerStatus::Ready;
        self.state.refill(&self.config);
        self.sink.notify_short();

        debug!(mode = self.state.mode.as_str(), "Timer reset");
    }

    /// Applies a tick from the scheduler.
    ///
    /// Ticks from an earlier arming, or that arrive after a pause or reset,
    /// are dropped even if they were already queued.
    pub fn on_tick(&mut self, signal: TickSignal) -> TickOutcome {
        if signal.generation != self.generation {
            trace!(
                stale = signal.generation,
                current = self.generation,
                "Dropping stale tick"
            );
            return TickOutcome::Ignored;
        }
        self.tick()
    }

    /// Counts one second off the running interval.
    ///
    /// A tick that finds the countdown already at zero completes the
    /// interval, so `00:00` stays on screen for one full second.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.state.status.is_running() {
            return TickOutcome::Ignored;
        }

        if self.state.count_down() {
            TickOutcome::Counted {
                remaining_seconds: self.state.remaining_seconds,
            }
        } else {
            self.complete()
        }
    }

    /// Finishes the current interval and switches mode.
    fn complete(&mut self) -> TickOutcome {
        self.scheduler.disarm();

        let finished = self.state.mode;
        if finished == TimerMode::Work {
            self.state.record_session();
            self.storage.save(
                StorageKey::Timer,
                &TimerRecord {
                    session_count: self.state.session_count,
                },
            );
        }

        self.state.enter_mode(finished.next(), &self.config);
        self.state.status = match finished {
            TimerMode::Work => TimerStatus::Complete,
            TimerMode::Break => TimerStatus::Ready,
        };

        self.sink.notify_complete();

        info!(
            finished = finished.as_str(),
            session_count = self.state.session_count,
            "Interval complete"
        );

        TickOutcome::Completed {
            finished,
            session_count: self.state.session_count,
        }
    }

    /// Returns the timer to its first-launch state with zero sessions.
    ///
    /// Only the confirmed clear-all-data action calls this; it is the one
    /// path on which the session count goes down. Unlike [`Self::reset`] it
    /// always lands on Work, whatever mode was current. Makes no sound.
    pub fn wipe(&mut self) {
        self.scheduler.disarm();
        self.state = TimerState::new(&self.config, 0);
        info!("Timer wiped");
    }

    fn arm(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.scheduler.arm(self.generation);
    }

    /// Returns a reference to the current timer state.
    pub fn state(&self) -> &TimerState {
        &self.state
    }

    /// Returns the interval configuration.
    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    /// Returns the tick scheduler.
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Returns the generation of the most recent arming.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns a mutable reference to the timer state (for testing).
    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut TimerState {
        &mut self.state
    }
}

impl<S: TickScheduler> TimerControls for TimerEngine<S> {
    fn start(&mut self) {
        TimerEngine::start(self);
    }

    fn pause(&mut self) {
        TimerEngine::pause(self);
    }

    fn reset(&mut self) {
        TimerEngine::reset(self);
    }
}

impl<S: TickScheduler> std::fmt::Debug for TimerEngine<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerEngine")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
