// Library interface for StressCast modules
// The CLI and the integration tests both build on this

pub mod config;
pub mod error;
pub mod export;
pub mod forecast;
pub mod history;
pub mod logging;
pub mod model;
pub mod models;
pub mod noise;
pub mod recommendations;
pub mod scoring;
pub mod tracker;

// Re-export commonly used types for convenience
pub use models::*;
pub use config::AppConfig;
pub use error::{Result, StressCastError};
pub use export::{ExportFormat, StressReport};
pub use forecast::Forecast;
pub use history::{HistoryStore, StressHistory};
pub use logging::{LogConfig, LogFormat, LogLevel};
pub use model::StressModel;
pub use noise::{FixedNoise, NoNoise, NoiseSource, RngNoise};
pub use scoring::{ScoreBreakdown, ScoringWeights};
pub use tracker::{StressTracker, TrackerState};
