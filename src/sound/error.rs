//! Sound system error types.
//!
//! Nothing outside `sound` ever sees these: the notification sink logs them
//! and carries on, so a machine without speakers runs the dashboard silently.

use thiserror::Error;

/// Errors that can occur in the tone playback system.
#[derive(Debug, Error)]
pub enum SoundError {
    /// Audio device is not available (e.g., no output device, headless host).
    #[error("audio device not available: {0}")]
    DeviceNotAvailable(String),

    /// Failed to create a sink on the output stream.
    #[error("failed to create audio stream: {0}")]
    StreamError(String),

    /// The audio thread is gone or refused the request.
    #[error("tone playback error: {0}")]
    PlaybackError(String),
}

impl SoundError {
    /// Returns true if this error is related to device availability.
    #[must_use]
    pub fn is_device_error(&self) -> bool {
        matches!(self, Self::DeviceNotAvailable(_) | Self::StreamError(_))
    }

    /// Returns a short hint for the log.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::DeviceNotAvailable(_) => "connect an audio output device",
            Self::StreamError(_) => "check the system audio settings",
            Self::PlaybackError(_) => "restart the dashboard to re-create the audio thread",
        }
    }
}
