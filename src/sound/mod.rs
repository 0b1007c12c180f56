//! Notification tones for the dashboard.
//!
//! This module provides the [`NotificationSink`] contract the timer and the
//! dashboard fire on, plus three implementations:
//!
//! - [`TonePlayer`]: rodio sine tones played on a dedicated audio thread
//! - [`SilentSink`]: used when no audio device is available
//! - [`RecordingSink`]: records chimes for tests
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐   Chime    ┌──────────────────┐
//! │   TonePlayer     │──channel──▶│   audio thread   │
//! │ (NotificationSink)│           │ (rodio stream)   │
//! └──────────────────┘            └──────────────────┘
//! ```
//!
//! Both sink operations are fire-and-forget: they never block the caller and
//! never report failure.

mod error;
mod player;
mod tone;

use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

pub use error::SoundError;
pub use player::{try_create_player, TonePlayer};
pub use tone::{Chime, Tone, TONE_VOLUME};

/// Receives the dashboard's audible notifications.
pub trait NotificationSink: Send + Sync {
    /// A single brief tone: start, pause, reset and ordinary UI actions.
    fn notify_short(&self);

    /// The ascending completion sequence: an interval finished.
    fn notify_complete(&self);
}

impl NotificationSink for TonePlayer {
    fn notify_short(&self) {
        if let Err(e) = self.play(Chime::Short) {
            debug!(error = %e, "Short tone dropped");
        }
    }

    fn notify_complete(&self) {
        if let Err(e) = self.play(Chime::Complete) {
            debug!(error = %e, "Completion chime dropped");
        }
    }
}

/// A sink that makes no sound.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentSink;

impl NotificationSink for SilentSink {
    fn notify_short(&self) {}

    fn notify_complete(&self) {}
}

/// Mock sink for testing: records every chime in order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    chimes: Mutex<Vec<Chime>>,
}

impl RecordingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every chime recorded so far.
    #[must_use]
    pub fn chimes(&self) -> Vec<Chime> {
        self.chimes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns how many times `chime` was fired.
    #[must_use]
    pub fn count(&self, chime: Chime) -> usize {
        self.chimes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|c| **c == chime)
            .count()
    }

    pub fn clear(&self) {
        self.chimes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn record(&self, chime: Chime) {
        self.chimes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(chime);
    }
}

impl NotificationSink for RecordingSink {
    fn notify_short(&self) {
        self.record(Chime::Short);
    }

    fn notify_complete(&self) {
        self.record(Chime::Complete);
    }
}

/// Returns the best available sink: real tones when an audio device opens,
/// silence otherwise.
#[must_use]
pub fn default_sink() -> Arc<dyn NotificationSink> {
    match try_create_player() {
        Some(player) => player as Arc<dyn NotificationSink>,
        None => Arc::new(SilentSink),
    }
}
