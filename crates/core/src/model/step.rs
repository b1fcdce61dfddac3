use serde::Serialize;

/// How the renderer should draw one step.
///
/// Each variant carries exactly the numbers its drawing strategy needs; the
/// session machine hands the visual to the renderer without looking inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepVisual {
    /// Text-only card, used for intros and goal statements.
    Intro,
    /// `groups` containers holding `items_per_group` items each. Zero items
    /// draws the empty containers.
    Groups { groups: u32, items_per_group: u32 },
    /// A loose pile of `total` items.
    Total { total: u32 },
    /// An addition join: `initial` items with `added` more arriving.
    Adding { initial: u32, added: u32 },
    /// A removal. The renderer marks the LAST `taken` of `initial` items as
    /// taken away, so the picture shrinks in place instead of reflowing.
    TakingAway { initial: u32, taken: u32 },
    /// Division circling: `total` items fenced into groups of `group_size`.
    /// The renderer derives the full groups and any leftover itself.
    Grouping { total: u32, group_size: u32 },
    /// The headline count of the answer reveal.
    Result { value: u32 },
    /// Closing card carrying the full arithmetic sentence.
    Summary { total: u32 },
    /// A failure message card.
    Error,
}

/// One unit of explanation: a narrated line plus its visual payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Step {
    text: String,
    icon: Option<&'static str>,
    visual: StepVisual,
}

impl Step {
    #[must_use]
    pub fn new(text: impl Into<String>, icon: Option<&'static str>, visual: StepVisual) -> Self {
        Self {
            text: text.into(),
            icon,
            visual,
        }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The theme icon, constant across a sequence. `None` on error cards.
    #[must_use]
    pub fn icon(&self) -> Option<&'static str> {
        self.icon
    }

    #[must_use]
    pub fn visual(&self) -> StepVisual {
        self.visual
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self.visual, StepVisual::Error)
    }
}

/// The immutable output of one explanation request.
///
/// Either a successful walkthrough (`result` is `Some` and every step is
/// renderable) or a refusal carrying a single error step and no result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepSequence {
    result: Option<u32>,
    remainder: Option<u32>,
    steps: Vec<Step>,
}

impl StepSequence {
    /// A successful explanation ending in `result`.
    #[must_use]
    pub fn completed(result: u32, steps: Vec<Step>) -> Self {
        Self {
            result: Some(result),
            remainder: None,
            steps,
        }
    }

    /// A successful division with a leftover.
    #[must_use]
    pub fn with_remainder(result: u32, remainder: u32, steps: Vec<Step>) -> Self {
        Self {
            result: Some(result),
            remainder: Some(remainder),
            steps,
        }
    }

    /// A refusal: one kid-facing error card, no result, nothing to navigate.
    #[must_use]
    pub fn refusal(message: impl Into<String>) -> Self {
        Self {
            result: None,
            remainder: None,
            steps: vec![Step::new(message, None, StepVisual::Error)],
        }
    }

    #[must_use]
    pub fn result(&self) -> Option<u32> {
        self.result
    }

    #[must_use]
    pub fn remainder(&self) -> Option<u32> {
        self.remainder
    }

    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    #[must_use]
    pub fn is_refusal(&self) -> bool {
        self.result.is_none()
    }

    #[must_use]
    pub fn into_steps(self) -> Vec<Step> {
        self.steps
    }
}
