//! Moodlog Core Library
//!
//! Shared functionality for the Moodlog mood journal:
//! - Entry model, mood/trigger catalogs, validation and integrity repair
//! - Pluggable entry store with file and in-memory backends
//! - Image mood analyzer behind a feature-extractor trait
//! - Insight engine: patterns, trends, streaks, stability, summaries
//! - History search, export/import/share payloads, local backups
//! - Configuration with embedded defaults

pub mod analyzer;
pub mod backup;
pub mod catalog;
pub mod config;
pub mod error;
pub mod export;
pub mod history;
pub mod insights;
pub mod integrity;
pub mod models;
pub mod store;

/// Entry builders and sample data for tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use analyzer::{
    ImageFeatureExtractor, ImageFeatures, ImageMoodAnalyzer, ImagePayload, LatestUpload,
    LengthHashExtractor, UploadTicket,
};
pub use backup::{BackupFile, BackupInfo, BackupManager, BackupMetadata, PruneResult};
pub use catalog::{MoodKind, TRIGGERS};
pub use config::{default_data_dir, Config, InsightConfig, UserSettings};
pub use error::{Error, Result};
pub use export::{
    ExportFile, ImportFile, ImportStats, SharePayload, ShareSummary, SharedEntry,
};
pub use history::{HistoryQuery, Period, SortOrder};
pub use insights::{InsightEngine, Insights, Streaks, SummaryReport, TimeRange, Trend};
pub use integrity::{IntegrityReport, RepairOutcome, ValidationIssue};
pub use models::{EntryDraft, EntryEdit, ImageAnalysis, Mood, MoodEntry};
pub use store::{EntryStore, JsonFileStore, Journal, MemoryStore};
