use chrono::NaiveDate;
use thiserror::Error;

/// Correct answers needed to finish one day's challenge.
pub const DAILY_CHALLENGE_GOAL: u8 = 5;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProgressError {
    #[error("daily answer count {provided} exceeds the goal of {DAILY_CHALLENGE_GOAL}")]
    DailyCountOutOfRange { provided: u8 },
}

/// What one correct daily-challenge answer did to the counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DailyAdvance {
    /// More questions to go today.
    InProgress { answered: u8 },
    /// The final answer landed. The streak grew unless today's date was
    /// already stamped by an earlier completion.
    Completed { streak_extended: bool },
}

/// The persisted gamification counters: stars plus daily-challenge state.
///
/// Stars and the streak only ever grow; a missed day leaves the streak where
/// it was rather than resetting it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Progress {
    stars: u32,
    daily_streak: u32,
    last_daily_completion: Option<NaiveDate>,
    daily_correct: u8,
}

impl Progress {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds progress from stored counters.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError` if the daily answer count is beyond the goal.
    pub fn from_persisted(
        stars: u32,
        daily_streak: u32,
        last_daily_completion: Option<NaiveDate>,
        daily_correct: u8,
    ) -> Result<Self, ProgressError> {
        if daily_correct > DAILY_CHALLENGE_GOAL {
            return Err(ProgressError::DailyCountOutOfRange {
                provided: daily_correct,
            });
        }
        Ok(Self {
            stars,
            daily_streak,
            last_daily_completion,
            daily_correct,
        })
    }

    #[must_use]
    pub fn stars(&self) -> u32 {
        self.stars
    }

    #[must_use]
    pub fn daily_streak(&self) -> u32 {
        self.daily_streak
    }

    #[must_use]
    pub fn last_daily_completion(&self) -> Option<NaiveDate> {
        self.last_daily_completion
    }

    /// Correct answers recorded in the current daily run.
    #[must_use]
    pub fn daily_correct(&self) -> u8 {
        self.daily_correct
    }

    /// Awards one star. Correct quiz answers and finished walkthroughs both
    /// land here.
    pub fn award_star(&mut self) {
        self.stars = self.stars.saturating_add(1);
    }

    /// Begins a fresh daily run, discarding any half-finished one.
    pub fn start_daily(&mut self) {
        self.daily_correct = 0;
    }

    /// Records one correct daily answer.
    ///
    /// On the answer that reaches the goal, the completion is stamped with
    /// `today`; the streak grows only if today was not already stamped, so a
    /// second run on the same day cannot double-count.
    pub fn record_daily_correct(&mut self, today: NaiveDate) -> DailyAdvance {
        self.daily_correct = self
            .daily_correct
            .saturating_add(1)
            .min(DAILY_CHALLENGE_GOAL);
        if self.daily_correct < DAILY_CHALLENGE_GOAL {
            return DailyAdvance::InProgress {
                answered: self.daily_correct,
            };
        }

        let streak_extended = self.last_daily_completion != Some(today);
        if streak_extended {
            self.daily_streak = self.daily_streak.saturating_add(1);
        }
        self.last_daily_completion = Some(today);
        DailyAdvance::Completed { streak_extended }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 11, d).unwrap()
    }

    #[test]
    fn five_correct_answers_complete_the_day() {
        let mut progress = Progress::new();
        for answered in 1..=4 {
            assert_eq!(
                progress.record_daily_correct(day(14)),
                DailyAdvance::InProgress { answered }
            );
        }
        assert_eq!(
            progress.record_daily_correct(day(14)),
            DailyAdvance::Completed {
                streak_extended: true
            }
        );
        assert_eq!(progress.daily_streak(), 1);
        assert_eq!(progress.last_daily_completion(), Some(day(14)));
    }

    #[test]
    fn same_day_completion_does_not_double_count() {
        let mut progress = Progress::new();
        for _ in 0..5 {
            progress.record_daily_correct(day(14));
        }
        progress.start_daily();
        for _ in 0..4 {
            progress.record_daily_correct(day(14));
        }
        assert_eq!(
            progress.record_daily_correct(day(14)),
            DailyAdvance::Completed {
                streak_extended: false
            }
        );
        assert_eq!(progress.daily_streak(), 1);
    }

    #[test]
    fn next_day_completion_extends_the_streak() {
        let mut progress = Progress::new();
        for _ in 0..5 {
            progress.record_daily_correct(day(14));
        }
        progress.start_daily();
        for _ in 0..5 {
            progress.record_daily_correct(day(15));
        }
        assert_eq!(progress.daily_streak(), 2);
        assert_eq!(progress.last_daily_completion(), Some(day(15)));
    }

    #[test]
    fn a_gap_keeps_the_streak() {
        // Streaks never decay; a missed day just fails to extend it.
        let mut progress = Progress::from_persisted(3, 4, Some(day(10)), 0).unwrap();
        for _ in 0..5 {
            progress.record_daily_correct(day(20));
        }
        assert_eq!(progress.daily_streak(), 5);
    }

    #[test]
    fn start_daily_resets_the_run_counter() {
        let mut progress = Progress::new();
        progress.record_daily_correct(day(14));
        progress.record_daily_correct(day(14));
        assert_eq!(progress.daily_correct(), 2);
        progress.start_daily();
        assert_eq!(progress.daily_correct(), 0);
    }

    #[test]
    fn from_persisted_rejects_overflowing_daily_count() {
        let err = Progress::from_persisted(0, 0, None, 9).unwrap_err();
        assert_eq!(err, ProgressError::DailyCountOutOfRange { provided: 9 });
    }

    #[test]
    fn award_star_saturates() {
        let mut progress = Progress::from_persisted(u32::MAX, 0, None, 0).unwrap();
        progress.award_star();
        assert_eq!(progress.stars(), u32::MAX);
    }
}
