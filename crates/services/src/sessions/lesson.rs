use tutor_core::model::{Step, StepSequence};

/// A walkthrough the child steps through one bubble at a time.
#[derive(Debug, Clone)]
pub struct Lesson {
    steps: Vec<Step>,
    index: usize,
    result: u32,
    remainder: Option<u32>,
    gated: bool,
}

impl Lesson {
    /// Wraps a generated sequence for navigation.
    ///
    /// Refusal sequences carry no walkthrough, so they produce `None`.
    /// `gated` marks lessons reached through a quiz question, which already
    /// paid out their star.
    #[must_use]
    pub fn from_sequence(sequence: StepSequence, gated: bool) -> Option<Self> {
        let result = sequence.result()?;
        let remainder = sequence.remainder();
        let steps = sequence.into_steps();
        if steps.is_empty() {
            return None;
        }
        Some(Self {
            steps,
            index: 0,
            result,
            remainder,
            gated,
        })
    }

    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Zero-based position of the current step.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn current(&self) -> &Step {
        &self.steps[self.index]
    }

    #[must_use]
    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.index + 1 == self.steps.len()
    }

    #[must_use]
    pub fn result(&self) -> u32 {
        self.result
    }

    /// Leftover items for division walkthroughs that do not divide evenly.
    #[must_use]
    pub fn remainder(&self) -> Option<u32> {
        self.remainder
    }

    #[must_use]
    pub fn gated(&self) -> bool {
        self.gated
    }

    /// The theme emoji carried by the walkthrough, for quiz prompts.
    #[must_use]
    pub fn icon(&self) -> &'static str {
        self.steps
            .first()
            .and_then(Step::icon)
            .unwrap_or("⭐")
    }

    /// Moves to the next step; `false` when already on the last one.
    pub(crate) fn advance(&mut self) -> bool {
        if self.index + 1 < self.steps.len() {
            self.index += 1;
            true
        } else {
            false
        }
    }

    /// Moves to the previous step; `false` when already on the first one.
    pub(crate) fn retreat(&mut self) -> bool {
        if self.index > 0 {
            self.index -= 1;
            true
        } else {
            false
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
