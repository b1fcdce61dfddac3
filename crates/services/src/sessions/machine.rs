use tutor_core::model::{Progress, QuizQuestion};

use super::lesson::Lesson;
use super::quiz_round::QuizRound;

/// Why the current quiz run is being asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundKind {
    /// Open-ended practice, including the question gating a walkthrough.
    Practice,
    /// Part of the daily challenge run.
    Daily,
}

/// Coarse phase, for frontends that render each mode differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TutorPhase {
    Idle,
    Quizzing,
    Narrating,
}

enum PhaseState {
    Idle,
    Quizzing {
        round: QuizRound,
        kind: RoundKind,
        /// The walkthrough waiting behind a gate question.
        pending: Option<Lesson>,
    },
    Narrating {
        lesson: Lesson,
    },
}

/// One child's tutoring session: the current phase plus their progress
/// counters.
///
/// Sessions are plain state; `TutorLoopService` drives the transitions and
/// owns all side effects.
pub struct TutorSession {
    phase: PhaseState,
    progress: Progress,
}

impl TutorSession {
    #[must_use]
    pub fn new(progress: Progress) -> Self {
        Self {
            phase: PhaseState::Idle,
            progress,
        }
    }

    #[must_use]
    pub fn phase(&self) -> TutorPhase {
        match self.phase {
            PhaseState::Idle => TutorPhase::Idle,
            PhaseState::Quizzing { .. } => TutorPhase::Quizzing,
            PhaseState::Narrating { .. } => TutorPhase::Narrating,
        }
    }

    #[must_use]
    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    /// The active walkthrough, while narrating.
    #[must_use]
    pub fn lesson(&self) -> Option<&Lesson> {
        match &self.phase {
            PhaseState::Narrating { lesson } => Some(lesson),
            _ => None,
        }
    }

    /// The question in play, while quizzing.
    #[must_use]
    pub fn round(&self) -> Option<&QuizRound> {
        match &self.phase {
            PhaseState::Quizzing { round, .. } => Some(round),
            _ => None,
        }
    }

    pub(crate) fn progress_mut(&mut self) -> &mut Progress {
        &mut self.progress
    }

    pub(crate) fn lesson_mut(&mut self) -> Option<&mut Lesson> {
        match &mut self.phase {
            PhaseState::Narrating { lesson } => Some(lesson),
            _ => None,
        }
    }

    pub(crate) fn round_mut(&mut self) -> Option<&mut QuizRound> {
        match &mut self.phase {
            PhaseState::Quizzing { round, .. } => Some(round),
            _ => None,
        }
    }

    pub(crate) fn round_kind(&self) -> Option<RoundKind> {
        match &self.phase {
            PhaseState::Quizzing { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    pub(crate) fn begin_narration(&mut self, lesson: Lesson) {
        self.phase = PhaseState::Narrating { lesson };
    }

    pub(crate) fn begin_quiz(&mut self, round: QuizRound, kind: RoundKind, pending: Option<Lesson>) {
        self.phase = PhaseState::Quizzing {
            round,
            kind,
            pending,
        };
    }

    /// Replaces the question in play, keeping the run going.
    pub(crate) fn swap_question(&mut self, question: QuizQuestion) {
        if let PhaseState::Quizzing { round, .. } = &mut self.phase {
            *round = QuizRound::new(question);
        }
    }

    /// Takes the walkthrough waiting behind the gate question, if any.
    pub(crate) fn promote_pending(&mut self) -> Option<Lesson> {
        match &mut self.phase {
            PhaseState::Quizzing { pending, .. } => pending.take(),
            _ => None,
        }
    }

    pub(crate) fn clear_to_idle(&mut self) {
        self.phase = PhaseState::Idle;
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use tutor_core::explain::explain;
    use tutor_core::model::Operation;

    fn build_lesson() -> Lesson {
        Lesson::from_sequence(explain(Operation::Add, 2, 2), false).unwrap()
    }

    fn build_round() -> QuizRound {
        QuizRound::new(QuizQuestion::new("What is 2 + 2?", [3, 4, 5], 4, "🍎").unwrap())
    }

    #[test]
    fn fresh_sessions_start_idle() {
        let session = TutorSession::new(Progress::new());
        assert_eq!(session.phase(), TutorPhase::Idle);
        assert!(session.lesson().is_none());
        assert!(session.round().is_none());
    }

    #[test]
    fn gate_rounds_hand_over_their_pending_lesson() {
        let mut session = TutorSession::new(Progress::new());
        session.begin_quiz(build_round(), RoundKind::Practice, Some(build_lesson()));
        assert_eq!(session.phase(), TutorPhase::Quizzing);

        let lesson = session.promote_pending().expect("gate keeps a lesson");
        assert!(session.promote_pending().is_none());

        session.begin_narration(lesson);
        assert_eq!(session.phase(), TutorPhase::Narrating);
        assert!(session.round().is_none());
    }

    #[test]
    fn swapping_a_question_resets_the_disabled_options() {
        let mut session = TutorSession::new(Progress::new());
        session.begin_quiz(build_round(), RoundKind::Daily, None);
        if let Some(round) = session.round_mut() {
            round.judge(0);
        }
        assert_eq!(session.round().unwrap().disabled(), &[true, false, false]);

        session.swap_question(QuizQuestion::new("What is 1 + 2?", [2, 3, 4], 3, "🦆").unwrap());
        assert_eq!(session.round().unwrap().disabled(), &[false; 3]);
        assert_eq!(session.round_kind(), Some(RoundKind::Daily));
    }

    #[test]
    fn clearing_returns_to_idle() {
        let mut session = TutorSession::new(Progress::new());
        session.begin_narration(build_lesson());
        session.clear_to_idle();
        assert_eq!(session.phase(), TutorPhase::Idle);
    }
}
