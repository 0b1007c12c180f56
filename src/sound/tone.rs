//! Tone definitions for the two notification chimes.

use std::time::Duration;

/// One sine tone within a chime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    /// Pitch in hertz.
    pub frequency_hz: f32,
    /// How long the tone sounds.
    pub duration: Duration,
    /// Delay from the start of the chime.
    pub offset: Duration,
}

impl Tone {
    const fn new(frequency_hz: f32, duration_ms: u64, offset_ms: u64) -> Self {
        Self {
            frequency_hz,
            duration: Duration::from_millis(duration_ms),
            offset: Duration::from_millis(offset_ms),
        }
    }
}

/// Gain applied to every tone.
pub const TONE_VOLUME: f32 = 0.1;

const SHORT_TONES: [Tone; 1] = [Tone::new(800.0, 100, 0)];

const COMPLETE_TONES: [Tone; 3] = [
    Tone::new(600.0, 100, 0),
    Tone::new(800.0, 100, 150),
    Tone::new(1000.0, 100, 300),
];

/// The sounds the dashboard can make.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Chime {
    /// Single brief beep: start, pause, reset and ordinary UI actions.
    Short,
    /// Ascending three-tone sequence: an interval finished.
    Complete,
}

impl Chime {
    /// Returns the tones making up this chime.
    pub fn tones(&self) -> &'static [Tone] {
        match self {
            Chime::Short => &SHORT_TONES,
            Chime::Complete => &COMPLETE_TONES,
        }
    }
}
