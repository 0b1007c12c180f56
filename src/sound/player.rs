//! Tone player built on rodio.
//!
//! The rodio output stream is not `Send`, so it lives on a dedicated audio
//! thread. [`TonePlayer`] is the thread's mailbox: it forwards chime requests
//! over a channel and never waits for playback.

use std::sync::Arc;
use std::thread;

use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use rodio::source::{SineWave, Source};
use rodio::{OutputStream, OutputStreamHandle, Sink};
use tracing::{debug, info, warn};

use super::error::SoundError;
use super::tone::{Chime, Tone, TONE_VOLUME};

/// Sends chimes to the audio thread.
pub struct TonePlayer {
    tx: Sender<Chime>,
}

impl TonePlayer {
    /// Starts the audio thread and opens the default output device.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::DeviceNotAvailable` if no audio output device
    /// is available, or `SoundError::PlaybackError` if the audio thread
    /// cannot be started.
    pub fn spawn() -> Result<Self, SoundError> {
        let (tx, rx) = unbounded::<Chime>();
        let (ready_tx, ready_rx) = bounded::<Result<(), SoundError>>(1);

        thread::Builder::new()
            .name("retrodash-audio".to_string())
            .spawn(move || audio_thread(rx, ready_tx))
            .map_err(|e| SoundError::PlaybackError(format!("failed to start audio thread: {e}")))?;

        ready_rx
            .recv()
            .map_err(|_| SoundError::PlaybackError("audio thread exited".to_string()))??;

        debug!("Audio thread started");

        Ok(Self { tx })
    }

    /// Queues a chime. Returns as soon as the request is handed over.
    pub fn play(&self, chime: Chime) -> Result<(), SoundError> {
        self.tx
            .send(chime)
            .map_err(|_| SoundError::PlaybackError("audio thread stopped".to_string()))
    }
}

impl std::fmt::Debug for TonePlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TonePlayer").finish_non_exhaustive()
    }
}

/// Body of the audio thread. Runs until every [`TonePlayer`] sender is gone.
fn audio_thread(rx: Receiver<Chime>, ready: Sender<Result<(), SoundError>>) {
    let (_stream, handle) = match OutputStream::try_default() {
        Ok(pair) => pair,
        Err(e) => {
            let _ = ready.send(Err(SoundError::DeviceNotAvailable(e.to_string())));
            return;
        }
    };
    let _ = ready.send(Ok(()));

    for chime in rx.iter() {
        for tone in chime.tones() {
            if let Err(e) = play_tone(&handle, tone) {
                debug!(?chime, error = %e, "Tone playback failed");
            }
        }
    }

    debug!("Audio thread finished");
}

/// Plays one tone on its own detached sink so staggered tones overlap freely.
fn play_tone(handle: &OutputStreamHandle, tone: &Tone) -> Result<(), SoundError> {
    let sink = Sink::try_new(handle).map_err(|e| SoundError::StreamError(e.to_string()))?;

    let source = SineWave::new(tone.frequency_hz)
        .take_duration(tone.duration)
        .amplify(TONE_VOLUME)
        .delay(tone.offset);

    sink.append(source);
    sink.detach();
    Ok(())
}

/// Creates a tone player, returning None if audio is unavailable.
///
/// Device and stream errors are expected on headless hosts and only logged
/// at info level; any other failure is a warning.
#[must_use]
pub fn try_create_player() -> Option<Arc<TonePlayer>> {
    match TonePlayer::spawn() {
        Ok(player) => Some(Arc::new(player)),
        Err(e) if e.is_device_error() => {
            info!(error = %e, hint = e.suggestion(), "No audio device, sound disabled");
            None
        }
        Err(e) => {
            warn!(error = %e, hint = e.suggestion(), "Audio not available, sound disabled");
            None
        }
    }
}
