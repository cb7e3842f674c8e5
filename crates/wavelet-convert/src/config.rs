//! Configuration for a conversion session.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use wavelet_ops::DocState;

/// When a document converter is dropped from the session map.
///
/// `WhenEmpty` assumes a converter whose shadow is empty is
/// indistinguishable from a fresh one. That holds for stateless translators
/// but is not guaranteed for translators that keep per-document state, so
/// `Never` is available as a reference mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvictionPolicy {
    /// Drop the converter whenever its shadow document becomes empty.
    #[default]
    WhenEmpty,
    /// Keep every converter for the lifetime of the session.
    Never,
}

impl EvictionPolicy {
    pub fn should_evict(&self, shadow: &DocState) -> bool {
        match self {
            EvictionPolicy::WhenEmpty => shadow.is_empty(),
            EvictionPolicy::Never => false,
        }
    }
}

/// Configuration for a `WaveletConverter`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    /// Wavelet name recorded on the session span.
    pub wavelet_id: String,
    /// Converter eviction policy.
    pub eviction: EvictionPolicy,
    /// Warn once when this many document converters are live at the same time.
    pub tracked_documents_warning: usize,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            wavelet_id: "unknown".to_string(),
            eviction: EvictionPolicy::WhenEmpty,
            tracked_documents_warning: 10_000,
        }
    }
}

impl ConverterConfig {
    /// Parse from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Builder for converter configuration.
pub struct ConverterConfigBuilder {
    config: ConverterConfig,
}

impl ConverterConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: ConverterConfig::default(),
        }
    }

    pub fn wavelet_id(mut self, id: impl Into<String>) -> Self {
        self.config.wavelet_id = id.into();
        self
    }

    pub fn eviction(mut self, policy: EvictionPolicy) -> Self {
        self.config.eviction = policy;
        self
    }

    pub fn tracked_documents_warning(mut self, threshold: usize) -> Self {
        self.config.tracked_documents_warning = threshold;
        self
    }

    pub fn build(self) -> ConverterConfig {
        self.config
    }
}

impl Default for ConverterConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
