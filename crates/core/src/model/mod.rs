mod operation;
mod progress;
mod question;
mod settings;
mod step;
mod theme;

pub use operation::{Operation, ParseOperationError};
pub use progress::{DAILY_CHALLENGE_GOAL, DailyAdvance, Progress, ProgressError};
pub use question::{QuizQuestion, QuizQuestionError};
pub use settings::{
    NarratorSettings, NarratorSettingsDraft, NarratorSettingsError, VoicePreference,
};
pub use step::{Step, StepSequence, StepVisual};
pub use theme::{THEMES, Theme};
