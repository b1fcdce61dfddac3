use std::sync::Arc;
use std::time::Duration;

use tutor_core::model::{DAILY_CHALLENGE_GOAL, DailyAdvance, Operation};
use tutor_core::{explain, quiz};

use crate::Clock;
use crate::narration::{SpeakOutcome, SpeechService};
use crate::ports::{CelebrationEffect, Renderer, SoundCue, SoundEffects};

use super::lesson::Lesson;
use super::machine::{RoundKind, TutorSession};
use super::progress::ProgressLedger;
use super::quiz_round::{AnswerJudgement, QuizRound};

//
// ─── OUTCOMES ──────────────────────────────────────────────────────────────────
//

/// Result of submitting a problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Operands were rejected before any math was attempted.
    Rejected,
    /// The operation refused the operands and explained why.
    Refused,
    /// Quiz mode gated the walkthrough behind a question.
    AwaitingAnswer,
    /// The walkthrough began.
    LessonStarted,
}

/// Result of tapping an answer option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// The tap hit a disabled option, or no question is up.
    Ignored,
    /// Wrong answer; the option is disabled and the child tries again.
    Wrong,
    /// Correct on a gate question; the walkthrough began.
    LessonStarted,
    /// Correct; a fresh question is up.
    NextQuestion,
    /// Correct, and it finished the daily challenge.
    DailyCompleted { streak_extended: bool },
}

/// Result of a navigation command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavOutcome {
    /// Moved to (or replayed) a step.
    Rendered,
    /// Already on the first step.
    AtStart,
    /// The walkthrough finished and the session returned to idle.
    Finished,
    /// Auto-play was cut short by other speech.
    Interrupted,
    /// No walkthrough is active.
    Ignored,
}

//
// ─── PACING ────────────────────────────────────────────────────────────────────
//

/// Delays that keep the tutor from rushing a young reader.
#[derive(Debug, Clone, Copy)]
pub struct Pacing {
    pub step_gap: Duration,
    pub celebration_hold: Duration,
}

impl Pacing {
    /// No delays; lets tests run whole flows instantly.
    pub const ZERO: Pacing = Pacing {
        step_gap: Duration::ZERO,
        celebration_hold: Duration::ZERO,
    };
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            step_gap: Duration::from_millis(500),
            celebration_hold: Duration::from_secs(3),
        }
    }
}

//
// ─── TUTOR LOOP ────────────────────────────────────────────────────────────────
//

/// Drives a [`TutorSession`] through walkthroughs, quizzes and the daily
/// challenge, pushing every side effect out through the ports.
#[derive(Clone)]
pub struct TutorLoopService {
    clock: Clock,
    speech: SpeechService,
    renderer: Arc<dyn Renderer>,
    sounds: Arc<dyn SoundEffects>,
    celebration: Arc<dyn CelebrationEffect>,
    ledger: ProgressLedger,
    pacing: Pacing,
}

impl TutorLoopService {
    #[must_use]
    pub fn new(
        clock: Clock,
        speech: SpeechService,
        renderer: Arc<dyn Renderer>,
        sounds: Arc<dyn SoundEffects>,
        celebration: Arc<dyn CelebrationEffect>,
        ledger: ProgressLedger,
    ) -> Self {
        Self {
            clock,
            speech,
            renderer,
            sounds,
            celebration,
            ledger,
            pacing: Pacing::default(),
        }
    }

    #[must_use]
    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }

    /// Starts a session from persisted progress (or fresh counters when the
    /// store has none).
    pub async fn new_session(&self) -> TutorSession {
        let progress = self.ledger.load_or_default().await;
        TutorSession::new(progress)
    }

    /// Submits a problem the child typed or spoke.
    ///
    /// With `quiz_mode` on, a valid problem is gated behind a "what do you
    /// think?" question; otherwise the walkthrough starts right away.
    pub async fn submit(
        &self,
        session: &mut TutorSession,
        operation: Operation,
        a: u32,
        b: u32,
        quiz_mode: bool,
    ) -> SubmitOutcome {
        self.speech.stop().await;

        if a == 0 || b == 0 {
            self.say("Please give me two numbers bigger than zero!");
            return SubmitOutcome::Rejected;
        }

        let sequence = explain::explain(operation, a, b);
        if sequence.is_refusal() {
            let text = sequence
                .steps()
                .first()
                .map(|step| step.text().to_string())
                .unwrap_or_default();
            session.clear_to_idle();
            self.sounds.play(SoundCue::Pop);
            self.say(&text);
            return SubmitOutcome::Refused;
        }

        let Some(lesson) = Lesson::from_sequence(sequence, quiz_mode) else {
            return SubmitOutcome::Refused;
        };

        if quiz_mode {
            let question = {
                let mut rng = rand::rng();
                quiz::gate_question(operation, a, b, lesson.result(), lesson.icon(), &mut rng)
            };
            session.begin_quiz(QuizRound::new(question), RoundKind::Practice, Some(lesson));
            self.present_round(session);
            SubmitOutcome::AwaitingAnswer
        } else {
            session.begin_narration(lesson);
            self.sounds.play(SoundCue::Pop);
            self.present_step(session);
            SubmitOutcome::LessonStarted
        }
    }

    /// Starts open-ended practice questions.
    pub async fn start_quiz(&self, session: &mut TutorSession) {
        self.speech.stop().await;
        self.renderer.show_message("Quiz time! Pick the right answer.");
        let question = {
            let mut rng = rand::rng();
            quiz::situational_question(&mut rng)
        };
        session.begin_quiz(QuizRound::new(question), RoundKind::Practice, None);
        self.present_round(session);
    }

    /// Starts (or restarts) today's daily challenge run.
    pub async fn start_daily(&self, session: &mut TutorSession) {
        self.speech.stop().await;
        session.progress_mut().start_daily();
        self.ledger.persist(session.progress()).await;
        self.renderer.show_message(&format!(
            "Daily challenge! Answer {DAILY_CHALLENGE_GOAL} questions to grow your streak."
        ));
        let question = {
            let mut rng = rand::rng();
            quiz::situational_question(&mut rng)
        };
        session.begin_quiz(QuizRound::new(question), RoundKind::Daily, None);
        self.present_round(session);
    }

    /// Handles the child tapping answer option `choice`.
    pub async fn answer(&self, session: &mut TutorSession, choice: usize) -> AnswerOutcome {
        let judgement = match session.round_mut() {
            Some(round) => round.judge(choice),
            None => return AnswerOutcome::Ignored,
        };
        self.sounds.play(SoundCue::Click);

        match judgement {
            AnswerJudgement::Ignored => AnswerOutcome::Ignored,
            AnswerJudgement::Wrong => {
                self.sounds.play(SoundCue::Wrong);
                self.say("Not quite! Try another answer.");
                AnswerOutcome::Wrong
            }
            AnswerJudgement::Correct => self.accept_correct_answer(session).await,
        }
    }

    async fn accept_correct_answer(&self, session: &mut TutorSession) -> AnswerOutcome {
        self.sounds.play(SoundCue::Correct);
        session.progress_mut().award_star();
        self.ledger.persist(session.progress()).await;

        if let Some(lesson) = session.promote_pending() {
            self.renderer.show_message("That's right! You earned a star!");
            session.begin_narration(lesson);
            self.present_step(session);
            return AnswerOutcome::LessonStarted;
        }

        match session.round_kind() {
            Some(RoundKind::Daily) => {
                let advance = session.progress_mut().record_daily_correct(self.clock.today());
                self.ledger.persist(session.progress()).await;
                match advance {
                    DailyAdvance::InProgress { answered } => {
                        self.renderer.show_message(&format!(
                            "That's right! {answered} out of {DAILY_CHALLENGE_GOAL}!"
                        ));
                        self.next_question(session);
                        AnswerOutcome::NextQuestion
                    }
                    DailyAdvance::Completed { streak_extended } => {
                        session.clear_to_idle();
                        let streak = session.progress().daily_streak();
                        let days = if streak == 1 { "day" } else { "days" };
                        self.sounds.play(SoundCue::Win);
                        self.celebration.celebrate();
                        self.say(&format!(
                            "Amazing! You finished today's challenge! Your streak is {streak} {days}!"
                        ));
                        tokio::time::sleep(self.pacing.celebration_hold).await;
                        AnswerOutcome::DailyCompleted { streak_extended }
                    }
                }
            }
            _ => {
                self.renderer.show_message("That's right! You earned a star!");
                self.next_question(session);
                AnswerOutcome::NextQuestion
            }
        }
    }

    /// Moves to the next step; finishing the last step ends the walkthrough.
    pub async fn next(&self, session: &mut TutorSession) -> NavOutcome {
        let Some(lesson) = session.lesson_mut() else {
            return NavOutcome::Ignored;
        };
        if lesson.advance() {
            self.sounds.play(SoundCue::Pop);
            self.present_step(session);
            NavOutcome::Rendered
        } else {
            self.finish_lesson(session).await;
            NavOutcome::Finished
        }
    }

    /// Moves back one step.
    pub fn prev(&self, session: &mut TutorSession) -> NavOutcome {
        let Some(lesson) = session.lesson_mut() else {
            return NavOutcome::Ignored;
        };
        if lesson.retreat() {
            self.sounds.play(SoundCue::Pop);
            self.present_step(session);
            NavOutcome::Rendered
        } else {
            NavOutcome::AtStart
        }
    }

    /// Repeats the current step out loud.
    pub fn replay(&self, session: &TutorSession) -> NavOutcome {
        if session.lesson().is_some() {
            self.present_step(session);
            NavOutcome::Rendered
        } else {
            NavOutcome::Ignored
        }
    }

    /// Plays the walkthrough from the current step to the end, waiting for
    /// each step's narration before moving on.
    pub async fn play(&self, session: &mut TutorSession) -> NavOutcome {
        if session.lesson().is_none() {
            return NavOutcome::Ignored;
        }
        loop {
            let Some(text) = self.render_current(session) else {
                return NavOutcome::Interrupted;
            };
            match self.speech.speak(&text).await {
                SpeakOutcome::Superseded => return NavOutcome::Interrupted,
                SpeakOutcome::Completed | SpeakOutcome::WatchdogFired => {}
            }
            let Some(lesson) = session.lesson_mut() else {
                return NavOutcome::Interrupted;
            };
            if lesson.advance() {
                tokio::time::sleep(self.pacing.step_gap).await;
            } else {
                self.finish_lesson(session).await;
                return NavOutcome::Finished;
            }
        }
    }

    async fn finish_lesson(&self, session: &mut TutorSession) {
        let gated = session.lesson().is_some_and(Lesson::gated);
        session.clear_to_idle();
        self.speech.stop().await;
        self.sounds.play(SoundCue::Win);
        self.celebration.celebrate();
        if !gated {
            session.progress_mut().award_star();
            self.ledger.persist(session.progress()).await;
        }
        let stars = session.progress().stars();
        self.say(&format!("You did it! You now have {stars} stars!"));
        tokio::time::sleep(self.pacing.celebration_hold).await;
    }

    fn present_step(&self, session: &TutorSession) {
        if let Some(text) = self.render_current(session) {
            self.speech.speak_in_background(&text);
        }
    }

    fn render_current(&self, session: &TutorSession) -> Option<String> {
        let lesson = session.lesson()?;
        let step = lesson.current();
        self.renderer
            .show_step(step, lesson.index() + 1, lesson.steps().len());
        Some(step.text().to_string())
    }

    fn present_round(&self, session: &TutorSession) {
        let Some(round) = session.round() else {
            return;
        };
        self.renderer.show_question(round.question(), round.disabled());
        self.speech.speak_in_background(round.question().text());
    }

    fn next_question(&self, session: &mut TutorSession) {
        let question = {
            let mut rng = rand::rng();
            quiz::situational_question(&mut rng)
        };
        session.swap_question(question);
        self.present_round(session);
    }

    /// Shows a message and reads it aloud.
    fn say(&self, text: &str) {
        self.renderer.show_message(text);
        self.speech.speak_in_background(text);
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
