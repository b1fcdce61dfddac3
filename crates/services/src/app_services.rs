use std::sync::Arc;

use storage::repository::Storage;

use crate::Clock;
use crate::error::AppServicesError;
use crate::narration::{
    AudioSink, FallbackNarrator, Narrator, PremiumNarrator, PremiumNarratorConfig, SpeechService,
};
use crate::ports::{CelebrationEffect, Renderer, SoundEffects, SpeakingIndicator};
use crate::sessions::{ProgressLedger, TutorLoopService};
use crate::settings::SettingsService;

/// Frontend-provided output channels the tutor speaks through.
pub struct TutorPorts {
    pub renderer: Arc<dyn Renderer>,
    /// The local always-available voice.
    pub narrator: Arc<dyn Narrator>,
    pub audio: Arc<dyn AudioSink>,
    pub sounds: Arc<dyn SoundEffects>,
    pub indicator: Arc<dyn SpeakingIndicator>,
    pub celebration: Arc<dyn CelebrationEffect>,
}

/// Assembles the tutor loop and settings service over shared storage.
#[derive(Clone)]
pub struct AppServices {
    tutor: Arc<TutorLoopService>,
    settings: Arc<SettingsService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        ports: TutorPorts,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Self::with_storage(storage, clock, ports).await
    }

    /// Build services over an already-open storage aggregate.
    ///
    /// When saved settings carry a premium credential, narration goes through
    /// the hosted voice with the local one as fallback; otherwise the local
    /// voice is used directly.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if loading saved settings fails.
    pub async fn with_storage(
        storage: Storage,
        clock: Clock,
        ports: TutorPorts,
    ) -> Result<Self, AppServicesError> {
        let settings = Arc::new(SettingsService::new(Arc::clone(&storage.settings)));

        let saved = settings.load().await?;
        let narrator: Arc<dyn Narrator> = match PremiumNarratorConfig::from_settings(&saved) {
            Some(config) => Arc::new(FallbackNarrator::new(
                Arc::new(PremiumNarrator::new(config, Arc::clone(&ports.audio))),
                Arc::clone(&ports.narrator),
            )),
            None => Arc::clone(&ports.narrator),
        };

        let speech = SpeechService::new(narrator, Arc::clone(&ports.indicator));
        let ledger = ProgressLedger::new(Arc::clone(&storage.progress));
        let tutor = Arc::new(TutorLoopService::new(
            clock,
            speech,
            Arc::clone(&ports.renderer),
            Arc::clone(&ports.sounds),
            Arc::clone(&ports.celebration),
            ledger,
        ));

        Ok(Self { tutor, settings })
    }

    #[must_use]
    pub fn tutor(&self) -> Arc<TutorLoopService> {
        Arc::clone(&self.tutor)
    }

    #[must_use]
    pub fn settings(&self) -> Arc<SettingsService> {
        Arc::clone(&self.settings)
    }
}
