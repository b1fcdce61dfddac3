#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod narration;
pub mod ports;
pub mod sessions;
pub mod settings;

pub use tutor_core::Clock;

pub use app_services::{AppServices, TutorPorts};
pub use error::{AppServicesError, NarrationError, SettingsServiceError};
pub use narration::{
    AudioSink, FallbackNarrator, Narrator, NullAudioSink, PremiumNarrator,
    PremiumNarratorConfig, RecordingNarrator, SilentNarrator, SpeakOutcome, SpeechService,
};
pub use settings::SettingsService;

pub use sessions::{
    AnswerOutcome, Lesson, NavOutcome, Pacing, ProgressLedger, QuizRound, RoundKind,
    SubmitOutcome, TutorLoopService, TutorPhase, TutorSession,
};
