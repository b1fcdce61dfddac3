use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use tutor_core::model::NarratorSettings;

use crate::error::NarrationError;

use super::{AudioSink, Narrator};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Narration is slowed slightly so young listeners can follow along.
const SPEECH_SPEED: f32 = 0.9;

/// Connection details for the hosted speech endpoint.
#[derive(Clone, Debug)]
pub struct PremiumNarratorConfig {
    pub base_url: String,
    pub api_key: String,
    pub voice: &'static str,
}

impl PremiumNarratorConfig {
    /// Builds a config from saved narrator settings, if a credential is present.
    #[must_use]
    pub fn from_settings(settings: &NarratorSettings) -> Option<Self> {
        let api_key = settings.api_key()?.to_string();
        let base_url = settings
            .api_base_url()
            .unwrap_or(DEFAULT_BASE_URL)
            .to_string();
        Some(Self {
            base_url,
            api_key,
            voice: settings.voice().premium_voice(),
        })
    }
}

/// Narrator backed by a hosted text-to-speech endpoint.
pub struct PremiumNarrator {
    client: Client,
    config: PremiumNarratorConfig,
    sink: Arc<dyn AudioSink>,
}

impl PremiumNarrator {
    #[must_use]
    pub fn new(config: PremiumNarratorConfig, sink: Arc<dyn AudioSink>) -> Self {
        Self {
            client: Client::new(),
            config,
            sink,
        }
    }

    #[must_use]
    pub fn voice(&self) -> &'static str {
        self.config.voice
    }

    async fn fetch_audio(&self, text: &str) -> Result<Vec<u8>, NarrationError> {
        let url = format!("{}/audio/speech", self.config.base_url.trim_end_matches('/'));
        let payload = SpeechRequest {
            model: "tts-1",
            input: text,
            voice: self.config.voice,
            speed: SPEECH_SPEED,
        };

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.config.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(NarrationError::HttpStatus(response.status()));
        }

        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait]
impl Narrator for PremiumNarrator {
    async fn speak(&self, text: &str) -> Result<(), NarrationError> {
        let audio = self.fetch_audio(text).await?;
        self.sink.play(&audio).await
    }

    async fn stop(&self) {
        self.sink.stop().await;
    }
}

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    model: &'static str,
    input: &'a str,
    voice: &'static str,
    speed: f32,
}

/// Tries the premium narrator first and falls back to a local voice when it
/// fails, so the child always hears something.
pub struct FallbackNarrator {
    primary: Arc<dyn Narrator>,
    fallback: Arc<dyn Narrator>,
}

impl FallbackNarrator {
    #[must_use]
    pub fn new(primary: Arc<dyn Narrator>, fallback: Arc<dyn Narrator>) -> Self {
        Self { primary, fallback }
    }
}

#[async_trait]
impl Narrator for FallbackNarrator {
    async fn speak(&self, text: &str) -> Result<(), NarrationError> {
        match self.primary.speak(text).await {
            Ok(()) => Ok(()),
            Err(err) => {
                tracing::warn!(%err, "premium narration failed; using local voice");
                self.fallback.speak(text).await
            }
        }
    }

    async fn stop(&self) {
        self.primary.stop().await;
        self.fallback.stop().await;
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
