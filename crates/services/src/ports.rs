//! Output channels a frontend plugs into the tutor.
//!
//! The console app implements these against stdout; the recording doubles
//! back the service tests.

use std::sync::{Arc, Mutex};

use tutor_core::model::{QuizQuestion, Step};

//
// ─── PORTS ─────────────────────────────────────────────────────────────────────
//

/// Draws tutor output for the child.
pub trait Renderer: Send + Sync {
    fn show_step(&self, step: &Step, position: usize, total: usize);
    fn show_question(&self, question: &QuizQuestion, disabled: &[bool; 3]);
    fn show_message(&self, text: &str);
}

/// Short feedback sounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    Click,
    Pop,
    Correct,
    Wrong,
    Win,
}

impl SoundCue {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SoundCue::Click => "click",
            SoundCue::Pop => "pop",
            SoundCue::Correct => "correct",
            SoundCue::Wrong => "wrong",
            SoundCue::Win => "win",
        }
    }
}

pub trait SoundEffects: Send + Sync {
    fn play(&self, cue: SoundCue);
}

/// Shows whether the narrator is mid-utterance.
pub trait SpeakingIndicator: Send + Sync {
    fn set_speaking(&self, speaking: bool);
}

/// Fires the end-of-walkthrough celebration.
pub trait CelebrationEffect: Send + Sync {
    fn celebrate(&self);
}

//
// ─── NULL DOUBLES ──────────────────────────────────────────────────────────────
//

/// Indicator that drops updates; for frontends without one.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSpeakingIndicator;

impl SpeakingIndicator for NullSpeakingIndicator {
    fn set_speaking(&self, _speaking: bool) {}
}

/// Sound output that stays silent.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSoundEffects;

impl SoundEffects for NullSoundEffects {
    fn play(&self, _cue: SoundCue) {}
}

/// Celebration that does nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullCelebrationEffect;

impl CelebrationEffect for NullCelebrationEffect {
    fn celebrate(&self) {}
}

//
// ─── RECORDING DOUBLES ─────────────────────────────────────────────────────────
//

/// One observed render call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderEvent {
    Step {
        text: String,
        position: usize,
        total: usize,
    },
    Question {
        text: String,
        options: [u32; 3],
        disabled: [bool; 3],
    },
    Message(String),
}

/// Renderer that records every call for later inspection.
#[derive(Clone, Default)]
pub struct RecordingRenderer {
    events: Arc<Mutex<Vec<RenderEvent>>>,
}

impl RecordingRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn events(&self) -> Vec<RenderEvent> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }

    /// Only the plain messages, in order.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                RenderEvent::Message(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: RenderEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl Renderer for RecordingRenderer {
    fn show_step(&self, step: &Step, position: usize, total: usize) {
        self.push(RenderEvent::Step {
            text: step.text().to_string(),
            position,
            total,
        });
    }

    fn show_question(&self, question: &QuizQuestion, disabled: &[bool; 3]) {
        self.push(RenderEvent::Question {
            text: question.text().to_string(),
            options: *question.options(),
            disabled: *disabled,
        });
    }

    fn show_message(&self, text: &str) {
        self.push(RenderEvent::Message(text.to_string()));
    }
}

/// Sound output that records the cues it was asked to play.
#[derive(Clone, Default)]
pub struct RecordingSoundEffects {
    cues: Arc<Mutex<Vec<SoundCue>>>,
}

impl RecordingSoundEffects {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn cues(&self) -> Vec<SoundCue> {
        self.cues.lock().map(|cues| cues.clone()).unwrap_or_default()
    }
}

impl SoundEffects for RecordingSoundEffects {
    fn play(&self, cue: SoundCue) {
        if let Ok(mut cues) = self.cues.lock() {
            cues.push(cue);
        }
    }
}

/// Indicator that records each on/off transition.
#[derive(Clone, Default)]
pub struct RecordingSpeakingIndicator {
    states: Arc<Mutex<Vec<bool>>>,
}

impl RecordingSpeakingIndicator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn states(&self) -> Vec<bool> {
        self.states.lock().map(|states| states.clone()).unwrap_or_default()
    }
}

impl SpeakingIndicator for RecordingSpeakingIndicator {
    fn set_speaking(&self, speaking: bool) {
        if let Ok(mut states) = self.states.lock() {
            states.push(speaking);
        }
    }
}

/// Celebration that counts how often it fired.
#[derive(Clone, Default)]
pub struct RecordingCelebrationEffect {
    fired: Arc<Mutex<u32>>,
}

impl RecordingCelebrationEffect {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn count(&self) -> u32 {
        self.fired.lock().map(|count| *count).unwrap_or_default()
    }
}

impl CelebrationEffect for RecordingCelebrationEffect {
    fn celebrate(&self) {
        if let Ok(mut count) = self.fired.lock() {
            *count += 1;
        }
    }
}
