//! Serializes narration so at most one utterance plays at a time.
//!
//! Every new utterance supersedes the one before it, a watchdog bounds how
//! long a backend may hold the floor, and the speaking indicator is cleared
//! exactly once per utterance no matter how it ended.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::Notify;
use tokio::time::sleep;

use crate::ports::SpeakingIndicator;

use super::Narrator;

//
// ─── SPEECH SERVICE ────────────────────────────────────────────────────────────
//

/// How an utterance ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeakOutcome {
    /// The narrator finished (or failed; failures are logged and treated as
    /// finished so the session never stalls).
    Completed,
    /// The narrator overran its time budget and was cut off.
    WatchdogFired,
    /// A newer utterance or an explicit stop took over.
    Superseded,
}

/// Sequencing layer over a [`Narrator`].
///
/// Clones share one utterance slot: a `speak` on any clone supersedes the
/// utterance started on another.
#[derive(Clone)]
pub struct SpeechService {
    narrator: Arc<dyn Narrator>,
    indicator: Arc<dyn SpeakingIndicator>,
    generation: Arc<AtomicU64>,
    speaking: Arc<AtomicBool>,
    superseded: Arc<Notify>,
    per_word: Duration,
    watchdog_buffer: Duration,
}

impl SpeechService {
    #[must_use]
    pub fn new(narrator: Arc<dyn Narrator>, indicator: Arc<dyn SpeakingIndicator>) -> Self {
        Self {
            narrator,
            indicator,
            generation: Arc::new(AtomicU64::new(0)),
            speaking: Arc::new(AtomicBool::new(false)),
            superseded: Arc::new(Notify::new()),
            per_word: Duration::from_millis(500),
            watchdog_buffer: Duration::from_secs(2),
        }
    }

    /// Overrides the watchdog budget of half a second per word plus a fixed
    /// buffer.
    #[must_use]
    pub fn with_watchdog(mut self, per_word: Duration, buffer: Duration) -> Self {
        self.per_word = per_word;
        self.watchdog_buffer = buffer;
        self
    }

    /// Speaks `text`, cancelling any in-flight utterance first.
    pub async fn speak(&self, text: &str) -> SpeakOutcome {
        let generation = self.claim();
        self.speak_claimed(generation, text).await
    }

    /// Starts speaking in the background, cancelling any in-flight utterance.
    ///
    /// The utterance slot is claimed before this returns, so back-to-back
    /// calls from one task always resolve in call order: the last one speaks.
    pub fn speak_in_background(&self, text: &str) {
        let generation = self.claim();
        let service = self.clone();
        let text = text.to_string();
        tokio::spawn(async move {
            service.speak_claimed(generation, &text).await;
        });
    }

    /// Cuts off the current utterance and clears the indicator.
    ///
    /// Claims the slot even when idle, so an utterance spawned but not yet
    /// started is cancelled too; the indicator and narrator are only touched
    /// when something was actually speaking.
    pub async fn stop(&self) {
        let was_speaking = self.speaking.swap(false, Ordering::SeqCst);
        self.claim();
        if !was_speaking {
            return;
        }
        self.narrator.stop().await;
        self.indicator.set_speaking(false);
    }

    /// Takes the utterance slot and wakes whoever held it.
    fn claim(&self) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.superseded.notify_waiters();
        generation
    }

    async fn speak_claimed(&self, generation: u64, text: &str) -> SpeakOutcome {
        let notified = self.superseded.notified();
        tokio::pin!(notified);
        notified.as_mut().enable();

        if self.generation.load(Ordering::SeqCst) != generation {
            return SpeakOutcome::Superseded;
        }

        self.narrator.stop().await;
        self.speaking.store(true, Ordering::SeqCst);
        self.indicator.set_speaking(true);

        let budget = self.budget_for(text);
        let outcome = tokio::select! {
            result = self.narrator.speak(text) => {
                if let Err(err) = result {
                    tracing::warn!(%err, "narration failed");
                }
                SpeakOutcome::Completed
            }
            () = sleep(budget) => SpeakOutcome::WatchdogFired,
            () = &mut notified => SpeakOutcome::Superseded,
        };

        // Only the current holder of the slot may clear the indicator; a
        // superseding utterance has already turned it back on.
        if self.generation.load(Ordering::SeqCst) == generation {
            self.speaking.store(false, Ordering::SeqCst);
            self.indicator.set_speaking(false);
            outcome
        } else {
            SpeakOutcome::Superseded
        }
    }

    fn budget_for(&self, text: &str) -> Duration {
        let words = u32::try_from(text.split_whitespace().count())
            .unwrap_or(u32::MAX)
            .max(1);
        self.per_word
            .checked_mul(words)
            .unwrap_or(Duration::MAX)
            .saturating_add(self.watchdog_buffer)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    use async_trait::async_trait;

    use crate::error::NarrationError;
    use crate::narration::{RecordingNarrator, SilentNarrator};
    use crate::ports::RecordingSpeakingIndicator;

    /// Never finishes speaking; relies on the watchdog or supersession.
    struct HangingNarrator;

    #[async_trait]
    impl Narrator for HangingNarrator {
        async fn speak(&self, _text: &str) -> Result<(), NarrationError> {
            std::future::pending().await
        }

        async fn stop(&self) {}
    }

    /// Hangs on the first utterance, completes the rest.
    #[derive(Clone, Default)]
    struct SlowFirstNarrator {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Narrator for SlowFirstNarrator {
        async fn speak(&self, _text: &str) -> Result<(), NarrationError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                std::future::pending::<()>().await;
            }
            Ok(())
        }

        async fn stop(&self) {}
    }

    fn service_with(
        narrator: Arc<dyn Narrator>,
        indicator: &RecordingSpeakingIndicator,
    ) -> SpeechService {
        SpeechService::new(narrator, Arc::new(indicator.clone()))
    }

    #[tokio::test]
    async fn completed_speech_turns_the_indicator_off() {
        let indicator = RecordingSpeakingIndicator::new();
        let speech = service_with(Arc::new(SilentNarrator), &indicator);

        let outcome = speech.speak("all done").await;

        assert_eq!(outcome, SpeakOutcome::Completed);
        assert_eq!(indicator.states(), vec![true, false]);
    }

    #[tokio::test]
    async fn watchdog_bounds_a_hung_narrator() {
        let indicator = RecordingSpeakingIndicator::new();
        let speech = service_with(Arc::new(HangingNarrator), &indicator)
            .with_watchdog(Duration::from_millis(1), Duration::from_millis(5));

        let outcome = speech.speak("this narrator never returns").await;

        assert_eq!(outcome, SpeakOutcome::WatchdogFired);
        assert_eq!(indicator.states().last(), Some(&false));
    }

    #[tokio::test]
    async fn a_new_utterance_supersedes_the_old() {
        let indicator = RecordingSpeakingIndicator::new();
        let speech = service_with(Arc::new(SlowFirstNarrator::default()), &indicator)
            .with_watchdog(Duration::from_secs(1), Duration::from_secs(60));

        let first = tokio::spawn({
            let speech = speech.clone();
            async move { speech.speak("first").await }
        });
        sleep(Duration::from_millis(50)).await;

        let second = speech.speak("second").await;

        assert_eq!(first.await.unwrap(), SpeakOutcome::Superseded);
        assert_eq!(second, SpeakOutcome::Completed);

        let states = indicator.states();
        let offs = states.iter().filter(|on| !**on).count();
        assert_eq!(offs, 1);
        assert_eq!(states.last(), Some(&false));
    }

    #[tokio::test]
    async fn background_speech_resolves_in_claim_order() {
        let narrator = RecordingNarrator::new();
        let indicator = RecordingSpeakingIndicator::new();
        let speech = service_with(Arc::new(narrator.clone()), &indicator);

        speech.speak_in_background("one");
        let outcome = speech.speak("two").await;

        assert_eq!(outcome, SpeakOutcome::Completed);
        let spoken = narrator.spoken();
        assert_eq!(spoken.last(), Some(&"two".to_string()));
        assert!(spoken.len() <= 2);
    }

    #[tokio::test]
    async fn stop_without_speech_is_a_no_op() {
        let indicator = RecordingSpeakingIndicator::new();
        let speech = service_with(Arc::new(SilentNarrator), &indicator);

        speech.stop().await;

        assert!(indicator.states().is_empty());
    }

    #[tokio::test]
    async fn stop_cancels_speech_and_clears_the_indicator() {
        let indicator = RecordingSpeakingIndicator::new();
        let speech = service_with(Arc::new(HangingNarrator), &indicator)
            .with_watchdog(Duration::from_secs(1), Duration::from_secs(60));

        let handle = tokio::spawn({
            let speech = speech.clone();
            async move { speech.speak("cut me off").await }
        });
        sleep(Duration::from_millis(50)).await;

        speech.stop().await;

        assert_eq!(handle.await.unwrap(), SpeakOutcome::Superseded);
        assert_eq!(indicator.states(), vec![true, false]);
    }
}
