use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizQuestionError {
    #[error("answer options must be positive")]
    NonPositiveOption,
    #[error("answer options must be distinct")]
    DuplicateOption,
    #[error("correct answer {correct} is not among the options")]
    MissingCorrect { correct: u32 },
}

/// A multiple-choice word problem.
///
/// Always exactly three distinct positive options, one of which is the
/// correct answer. Options arrive pre-shuffled from the generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizQuestion {
    text: String,
    options: [u32; 3],
    correct: u32,
    icon: &'static str,
}

impl QuizQuestion {
    /// Validating constructor.
    ///
    /// # Errors
    ///
    /// Returns `QuizQuestionError` if any option is zero, the options are not
    /// distinct, or the correct answer is missing from them.
    pub fn new(
        text: impl Into<String>,
        options: [u32; 3],
        correct: u32,
        icon: &'static str,
    ) -> Result<Self, QuizQuestionError> {
        if options.contains(&0) {
            return Err(QuizQuestionError::NonPositiveOption);
        }
        if options[0] == options[1] || options[0] == options[2] || options[1] == options[2] {
            return Err(QuizQuestionError::DuplicateOption);
        }
        if !options.contains(&correct) {
            return Err(QuizQuestionError::MissingCorrect { correct });
        }
        Ok(Self {
            text: text.into(),
            options,
            correct,
            icon,
        })
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[u32; 3] {
        &self.options
    }

    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    /// Decorative icon matching the question's object.
    #[must_use]
    pub fn icon(&self) -> &'static str {
        self.icon
    }

    /// Whether the option at `choice` is the correct answer.
    ///
    /// Out-of-range indexes are simply not correct.
    #[must_use]
    pub fn is_correct(&self, choice: usize) -> bool {
        self.options.get(choice).is_some_and(|&value| value == self.correct)
    }
}
