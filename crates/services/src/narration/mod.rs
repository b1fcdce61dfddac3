mod premium;
mod sequencer;

// Public API of the narration subsystem.
pub use premium::{FallbackNarrator, PremiumNarrator, PremiumNarratorConfig};
pub use sequencer::{SpeakOutcome, SpeechService};

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::NarrationError;

/// Speaks one utterance to completion, or until stopped.
#[async_trait]
pub trait Narrator: Send + Sync {
    /// # Errors
    ///
    /// Returns `NarrationError` if synthesis or playback fails.
    async fn speak(&self, text: &str) -> Result<(), NarrationError>;

    /// Cuts off the current utterance, if any.
    async fn stop(&self);
}

/// Plays raw audio bytes from a narration backend.
#[async_trait]
pub trait AudioSink: Send + Sync {
    /// # Errors
    ///
    /// Returns `NarrationError::Playback` if the device rejects the audio.
    async fn play(&self, audio: &[u8]) -> Result<(), NarrationError>;

    /// Cuts off in-flight playback, if any.
    async fn stop(&self);
}

/// Audio output that discards everything it is given.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullAudioSink;

#[async_trait]
impl AudioSink for NullAudioSink {
    async fn play(&self, _audio: &[u8]) -> Result<(), NarrationError> {
        Ok(())
    }

    async fn stop(&self) {}
}

/// Narrator that completes instantly without producing sound.
#[derive(Clone, Copy, Debug, Default)]
pub struct SilentNarrator;

#[async_trait]
impl Narrator for SilentNarrator {
    async fn speak(&self, _text: &str) -> Result<(), NarrationError> {
        Ok(())
    }

    async fn stop(&self) {}
}

/// Narrator that records what it was asked to say.
#[derive(Clone, Default)]
pub struct RecordingNarrator {
    spoken: Arc<Mutex<Vec<String>>>,
}

impl RecordingNarrator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().map(|spoken| spoken.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Narrator for RecordingNarrator {
    async fn speak(&self, text: &str) -> Result<(), NarrationError> {
        if let Ok(mut spoken) = self.spoken.lock() {
            spoken.push(text.to_string());
        }
        Ok(())
    }

    async fn stop(&self) {}
}
