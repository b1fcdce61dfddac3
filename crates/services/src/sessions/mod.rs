mod lesson;
mod machine;
mod progress;
mod quiz_round;
mod workflow;

// Public API of the tutor session subsystem.
pub use lesson::Lesson;
pub use machine::{RoundKind, TutorPhase, TutorSession};
pub use progress::ProgressLedger;
pub use quiz_round::{AnswerJudgement, QuizRound};
pub use workflow::{
    AnswerOutcome, NavOutcome, Pacing, SubmitOutcome, TutorLoopService,
};
