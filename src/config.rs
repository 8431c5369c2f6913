use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::history::{HistoryStore, DEFAULT_HISTORY_WINDOW};
use crate::logging::LogConfig;
use crate::model::StressModel;
use crate::noise::{NoiseSource, RngNoise, MAX_NOISE_AMPLITUDE};
use crate::scoring::ScoringWeights;

/// Main application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application metadata
    pub metadata: ConfigMetadata,

    /// Stress score model coefficients
    pub model: ModelSettings,

    /// Forecast noise settings
    pub forecast: ForecastSettings,

    /// History window and storage
    pub history: HistorySettings,

    /// Logging setup
    pub logging: LogConfig,
}

/// Configuration metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigMetadata {
    /// Configuration format version
    pub version: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

/// Stress score model settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelSettings {
    pub weights: ScoringWeights,
}

/// Forecast noise settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSettings {
    /// Half-width of the uniform daily noise (0-1)
    pub noise_amplitude: f64,

    /// Fixed seed for reproducible forecasts; entropy when unset
    pub seed: Option<u64>,
}

/// History window and storage settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistorySettings {
    /// Closed days kept for trend estimation
    pub window: usize,

    /// JSON file holding the history
    pub file: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        let now = Utc::now();

        AppConfig {
            metadata: ConfigMetadata {
                version: "1.0".to_string(),
                created_at: now,
                updated_at: now,
            },
            model: ModelSettings::default(),
            forecast: ForecastSettings::default(),
            history: HistorySettings::default(),
            logging: LogConfig::default(),
        }
    }
}

impl Default for ForecastSettings {
    fn default() -> Self {
        ForecastSettings {
            noise_amplitude: MAX_NOISE_AMPLITUDE,
            seed: None,
        }
    }
}

impl Default for HistorySettings {
    fn default() -> Self {
        HistorySettings {
            window: DEFAULT_HISTORY_WINDOW,
            file: HistoryStore::default_path(),
        }
    }
}

impl ForecastSettings {
    /// Build the noise source these settings describe
    pub fn noise_source(&self) -> Box<dyn NoiseSource> {
        match self.seed {
            Some(seed) => Box::new(RngNoise::seeded_with_amplitude(seed, self.noise_amplitude)),
            None => Box::new(RngNoise::from_entropy_with_amplitude(self.noise_amplitude)),
        }
    }
}

/// Configuration management implementation
impl AppConfig {
    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: AppConfig = toml::from_str(&content)
            .with_context(|| "Failed to parse TOML configuration")?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.metadata.updated_at = Utc::now();

        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        let toml_content = toml::to_string_pretty(self)
            .with_context(|| "Failed to serialize configuration to TOML")?;

        fs::write(&path, toml_content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        Ok(())
    }

    /// Get default configuration file path
    pub fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".stresscast")
            .join("config.toml")
    }

    /// Load configuration with fallback to defaults
    ///
    /// A missing file silently yields defaults; an unreadable or invalid
    /// one is an error.
    pub fn load_or_default() -> Result<Self> {
        let config_path = Self::default_config_path();
        if !config_path.exists() {
            return Ok(Self::default());
        }
        Self::load_from_file(&config_path)
    }

    /// Save configuration to default location
    pub fn save_default(&mut self) -> Result<()> {
        let config_path = Self::default_config_path();
        self.save_to_file(config_path)
    }

    /// Check values that the type system cannot
    pub fn validate(&self) -> Result<()> {
        self.model.weights.validate()?;

        let amplitude = self.forecast.noise_amplitude;
        if !(0.0..=MAX_NOISE_AMPLITUDE).contains(&amplitude) {
            anyhow::bail!(
                "forecast.noise_amplitude must be between 0 and {}, got {}",
                MAX_NOISE_AMPLITUDE,
                amplitude
            );
        }

        if self.history.window == 0 {
            anyhow::bail!("history.window must be at least 1");
        }

        Ok(())
    }

    /// Stress model with the configured weights
    pub fn build_model(&self) -> StressModel {
        StressModel::with_weights(self.model.weights)
    }

    /// History store for the configured file
    pub fn history_store(&self) -> HistoryStore {
        HistoryStore::new(self.history.file.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let deserialized: AppConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(config.metadata.version, deserialized.metadata.version);
        assert_eq!(config.model, deserialized.model);
        assert_eq!(config.history, deserialized.history);
    }

    #[test]
    fn test_config_file_io() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.toml");

        let mut original_config = AppConfig::default();
        original_config.model.weights.caffeine = 0.9;
        original_config.forecast.seed = Some(1234);
        original_config.history.window = 14;

        original_config.save_to_file(&config_path).unwrap();
        let loaded_config = AppConfig::load_from_file(&config_path).unwrap();

        assert_eq!(loaded_config.model.weights.caffeine, 0.9);
        assert_eq!(loaded_config.forecast.seed, Some(1234));
        assert_eq!(loaded_config.history.window, 14);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = AppConfig::default();
        config.forecast.noise_amplitude = 1.5;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.history.window = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.model.weights.sleep = f64::INFINITY;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_section_fails_to_parse() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, "[forecast]\nnoise_amplitude = 0.5\n").unwrap();

        assert!(AppConfig::load_from_file(&config_path).is_err());
    }

    #[test]
    fn test_build_model_uses_configured_weights() {
        let mut config = AppConfig::default();
        config.model.weights.work = 0.2;
        let model = config.build_model();
        assert_eq!(model.weights().work, 0.2);
    }

    #[test]
    fn test_seeded_noise_source_is_reproducible() {
        let settings = ForecastSettings {
            noise_amplitude: 0.5,
            seed: Some(7),
        };
        let mut a = settings.noise_source();
        let mut b = settings.noise_source();
        for _ in 0..10 {
            let value = a.sample();
            assert_eq!(value, b.sample());
            assert!((-0.5..=0.5).contains(&value));
        }
    }
}
