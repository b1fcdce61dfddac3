use tutor_core::model::QuizQuestion;

/// What a tapped option did to the round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerJudgement {
    Correct,
    /// The option was wrong and is now disabled for this round.
    Wrong,
    /// The tap hit a disabled or out-of-range option.
    Ignored,
}

/// One multiple-choice question in play. Wrong picks stay disabled until the
/// round ends, so the child narrows in on the answer.
#[derive(Debug, Clone)]
pub struct QuizRound {
    question: QuizQuestion,
    disabled: [bool; 3],
}

impl QuizRound {
    #[must_use]
    pub fn new(question: QuizQuestion) -> Self {
        Self {
            question,
            disabled: [false; 3],
        }
    }

    #[must_use]
    pub fn question(&self) -> &QuizQuestion {
        &self.question
    }

    #[must_use]
    pub fn disabled(&self) -> &[bool; 3] {
        &self.disabled
    }

    pub(crate) fn judge(&mut self, choice: usize) -> AnswerJudgement {
        if choice >= self.disabled.len() || self.disabled[choice] {
            return AnswerJudgement::Ignored;
        }
        if self.question.is_correct(choice) {
            AnswerJudgement::Correct
        } else {
            self.disabled[choice] = true;
            AnswerJudgement::Wrong
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn build_round() -> QuizRound {
        // Options [4, 7, 9], correct 7 at index 1.
        QuizRound::new(QuizQuestion::new("What is 3 + 4?", [4, 7, 9], 7, "🍎").unwrap())
    }

    #[test]
    fn correct_choice_is_accepted() {
        let mut round = build_round();
        assert_eq!(round.judge(1), AnswerJudgement::Correct);
        assert_eq!(round.disabled(), &[false; 3]);
    }

    #[test]
    fn wrong_choice_is_disabled_and_repeat_taps_ignored() {
        let mut round = build_round();
        assert_eq!(round.judge(0), AnswerJudgement::Wrong);
        assert_eq!(round.disabled(), &[true, false, false]);
        assert_eq!(round.judge(0), AnswerJudgement::Ignored);
        assert_eq!(round.judge(1), AnswerJudgement::Correct);
    }

    #[test]
    fn out_of_range_choice_is_ignored() {
        let mut round = build_round();
        assert_eq!(round.judge(3), AnswerJudgement::Ignored);
    }
}
