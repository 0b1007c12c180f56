//! Tick sources for the timer engine.
//!
//! The engine never sleeps. It asks a [`TickScheduler`] to deliver one
//! [`TickSignal`] per second, tagged with the generation it armed, and to stop
//! when disarmed. The Tokio scheduler drives the real dashboard; the manual
//! scheduler lets tests advance virtual time one tick at a time.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Duration, Instant, MissedTickBehavior};
use tracing::trace;

use crate::types::constants::TICK_PERIOD;

/// One tick, tagged with the arming it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSignal {
    pub generation: u64,
}

/// Arms and disarms a periodic one-second tick source.
///
/// At most one source is armed at a time: arming replaces any previous one.
pub trait TickScheduler {
    /// Starts delivering ticks tagged with `generation`.
    fn arm(&mut self, generation: u64);

    /// Stops delivering ticks. A no-op when nothing is armed.
    fn disarm(&mut self);

    /// Returns true while a tick source is armed.
    fn is_armed(&self) -> bool;
}

// ============================================================================
// TokioTickScheduler
// ============================================================================

/// Tick source backed by `tokio::time::interval`.
///
/// Each arming spawns one task that sends a [`TickSignal`] every period until
/// it is aborted. The first tick arrives one full period after arming.
#[derive(Debug)]
pub struct TokioTickScheduler {
    tx: mpsc::UnboundedSender<TickSignal>,
    period: Duration,
    task: Option<JoinHandle<()>>,
}

impl TokioTickScheduler {
    /// Creates a scheduler that delivers ticks on `tx` once per second.
    pub fn new(tx: mpsc::UnboundedSender<TickSignal>) -> Self {
        Self::with_period(tx, TICK_PERIOD)
    }

    /// Creates a scheduler with a custom period.
    pub fn with_period(tx: mpsc::UnboundedSender<TickSignal>, period: Duration) -> Self {
        Self {
            tx,
            period,
            task: None,
        }
    }
}

impl TickScheduler for TokioTickScheduler {
    fn arm(&mut self, generation: u64) {
        self.disarm();

        let tx = self.tx.clone();
        let period = self.period;
        self.task = Some(tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;
                if tx.send(TickSignal { generation }).is_err() {
                    trace!(generation, "Tick receiver closed, stopping tick task");
                    break;
                }
            }
        }));

        trace!(generation, "Tick source armed");
    }

    fn disarm(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            trace!("Tick source disarmed");
        }
    }

    fn is_armed(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for TokioTickScheduler {
    fn drop(&mut self) {
        self.disarm();
    }
}

// ============================================================================
// ManualTickScheduler
// ============================================================================

/// Scheduler for deterministic tests: it only remembers what was armed.
///
/// Tests deliver ticks themselves, usually with
/// `engine.on_tick(TickSignal { generation })` for the armed generation.
#[derive(Debug, Default, Clone)]
pub struct ManualTickScheduler {
    armed: Option<u64>,
    arm_count: usize,
    disarm_count: usize,
}

impl ManualTickScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The generation currently armed, if any.
    #[must_use]
    pub fn armed_generation(&self) -> Option<u64> {
        self.armed
    }

    /// The signal a real scheduler would deliver next, if armed.
    #[must_use]
    pub fn next_signal(&self) -> Option<TickSignal> {
        self.armed.map(|generation| TickSignal { generation })
    }

    /// How many times a source was armed.
    #[must_use]
    pub fn arm_count(&self) -> usize {
        self.arm_count
    }

    /// How many times an armed source was disarmed.
    #[must_use]
    pub fn disarm_count(&self) -> usize {
        self.disarm_count
    }
}

impl TickScheduler for ManualTickScheduler {
    fn arm(&mut self, generation: u64) {
        self.disarm();
        self.armed = Some(generation);
        self.arm_count += 1;
    }

    fn disarm(&mut self) {
        if self.armed.take().is_some() {
            self.disarm_count += 1;
        }
    }

    fn is_armed(&self) -> bool {
        self.armed.is_some()
    }
}

// ============================================================================
// Tests
// ============================================================================
