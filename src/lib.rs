// Library interface for the wellness engine modules
// This allows integration tests to access the core functionality

pub mod config;
pub mod error;
pub mod exercise;
pub mod logging;
pub mod messaging;
pub mod models;
pub mod nutrition;
pub mod reminders;
pub mod sleep;
pub mod store;
pub mod suggestions;

// Re-export commonly used types for convenience
pub use models::*;
pub use error::{Result, StoreError, WellnessError};
pub use exercise::ExercisePlanner;
pub use messaging::MessagingService;
pub use nutrition::NutritionPlanner;
pub use reminders::ReminderEngine;
pub use sleep::{AnalysisPeriod, SleepAnalyzer};
pub use store::{MessagingStore, SnapshotStore, SqliteStore};
pub use suggestions::SuggestionEngine;
pub use logging::{LogConfig, LogFormat, LogLevel};
