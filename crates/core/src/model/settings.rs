use std::str::FromStr;

use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum NarratorSettingsError {
    #[error("invalid base URL")]
    InvalidBaseUrl,
    #[error("unknown voice: {0}")]
    UnknownVoice(String),
}

/// Which premium narration voice to request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VoicePreference {
    #[default]
    Female,
    Male,
}

impl VoicePreference {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            VoicePreference::Female => "female",
            VoicePreference::Male => "male",
        }
    }

    /// The voice name sent to the premium speech endpoint.
    #[must_use]
    pub fn premium_voice(self) -> &'static str {
        match self {
            VoicePreference::Female => "nova",
            VoicePreference::Male => "onyx",
        }
    }
}

impl FromStr for VoicePreference {
    type Err = NarratorSettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "female" => Ok(VoicePreference::Female),
            "male" => Ok(VoicePreference::Male),
            other => Err(NarratorSettingsError::UnknownVoice(other.to_string())),
        }
    }
}

/// Narrator preferences, including the optional premium credential.
///
/// The credential is held verbatim and must never appear in logs or console
/// output; callers ask [`NarratorSettings::premium_enabled`] instead of
/// reading the key when they only need to branch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NarratorSettings {
    api_key: Option<String>,
    api_base_url: Option<String>,
    voice: VoicePreference,
}

#[derive(Clone, Debug, Default)]
pub struct NarratorSettingsDraft {
    pub api_key: Option<String>,
    pub api_base_url: Option<String>,
    pub voice: VoicePreference,
}

impl NarratorSettingsDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and normalize the draft into persisted settings.
    ///
    /// # Errors
    ///
    /// Returns `NarratorSettingsError` if the base URL is present but invalid.
    pub fn validate(self) -> Result<NarratorSettings, NarratorSettingsError> {
        let api_key = normalize_optional(self.api_key);
        let api_base_url = normalize_optional(self.api_base_url);

        if let Some(url) = api_base_url.as_ref() {
            if Url::parse(url).is_err() {
                return Err(NarratorSettingsError::InvalidBaseUrl);
            }
        }

        Ok(NarratorSettings {
            api_key,
            api_base_url,
            voice: self.voice,
        })
    }
}

impl NarratorSettings {
    /// Rebuilds settings from stored values.
    ///
    /// # Errors
    ///
    /// Returns `NarratorSettingsError` if the stored base URL is invalid.
    pub fn from_persisted(
        api_key: Option<String>,
        api_base_url: Option<String>,
        voice: VoicePreference,
    ) -> Result<Self, NarratorSettingsError> {
        NarratorSettingsDraft {
            api_key,
            api_base_url,
            voice,
        }
        .validate()
    }

    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    #[must_use]
    pub fn api_base_url(&self) -> Option<&str> {
        self.api_base_url.as_deref()
    }

    #[must_use]
    pub fn voice(&self) -> VoicePreference {
        self.voice
    }

    /// True when a premium narration credential is configured.
    #[must_use]
    pub fn premium_enabled(&self) -> bool {
        self.api_key.is_some()
    }
}

impl Default for NarratorSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base_url: None,
            voice: VoicePreference::Female,
        }
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}
