//! Image mood analysis
//!
//! Suggests moods for an uploaded photo. Feature extraction is pluggable;
//! the mapping from features to moods, confidence and insights is shared.
//!
//! # Architecture
//!
//! - `ImageFeatureExtractor` trait: colors, scene tags and emotions for a payload
//! - `LengthHashExtractor`: deterministic stand-in keyed on payload length
//! - `ImageMoodAnalyzer`: applies the simulated latency, runs the extractor,
//!   and maps features through the color/scene tables
//!
//! # Usage
//!
//! ```rust,ignore
//! let analyzer = ImageMoodAnalyzer::new(LengthHashExtractor::new());
//! let payload = ImagePayload::from_bytes("image/png", &bytes)?;
//! let analysis = analyzer.analyze_payload(&payload).await?;
//! println!("Suggested: {:?}", analysis.suggested_moods);
//! ```
//!
//! Concurrent analyses are independent and resolve in any order. Callers that
//! replace an upload while an older analysis is in flight can use
//! `LatestUpload` to drop the stale result.

mod composition;
pub mod mapping;
mod payload;
mod stub;

pub use composition::{analyze_composition, Composition};
pub use mapping::suggest_catalog_moods;
pub use payload::{mime_for_extension, ImagePayload, MAX_IMAGE_BYTES};
pub use stub::LengthHashExtractor;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::AnalyzerConfig;
use crate::error::{Error, Result};
use crate::models::ImageAnalysis;

/// Raw features pulled from an image
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImageFeatures {
    /// Dominant colors as hex strings
    pub colors: Vec<String>,
    /// Scene tags ("nature", "friends", ...)
    pub objects: Vec<String>,
    /// Detected facial emotions
    pub emotions: Vec<String>,
}

/// Interface for anything that can pull features out of an image payload
#[async_trait]
pub trait ImageFeatureExtractor: Send + Sync {
    /// Short identifier used in logs
    fn name(&self) -> &'static str;

    /// Extract features from a data URI payload
    async fn extract(&self, payload: &str) -> Result<ImageFeatures>;
}

/// Default simulated analysis latency
pub const DEFAULT_LATENCY: Duration = Duration::from_millis(2000);

/// Suggests moods for an image
#[derive(Clone)]
pub struct ImageMoodAnalyzer {
    extractor: Arc<dyn ImageFeatureExtractor>,
    latency: Duration,
}

impl ImageMoodAnalyzer {
    /// Create an analyzer with the default latency
    pub fn new(extractor: impl ImageFeatureExtractor + 'static) -> Self {
        Self {
            extractor: Arc::new(extractor),
            latency: DEFAULT_LATENCY,
        }
    }

    /// Analyzer using the deterministic extractor and configured latency
    pub fn from_config(config: &AnalyzerConfig) -> Self {
        Self::new(LengthHashExtractor::new()).with_latency(config.latency())
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }

    pub fn extractor_name(&self) -> &'static str {
        self.extractor.name()
    }

    /// Analyze a validated image payload
    pub async fn analyze_payload(&self, payload: &ImagePayload) -> Result<ImageAnalysis> {
        self.analyze(payload.data_uri()).await
    }

    /// Analyze a raw payload string
    ///
    /// Waits out the latency, then extracts features. Any extractor failure
    /// becomes the generic analysis error; it is not retried.
    pub async fn analyze(&self, payload: &str) -> Result<ImageAnalysis> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let features = match self.extractor.extract(payload).await {
            Ok(features) => features,
            Err(e) => {
                warn!(
                    extractor = self.extractor.name(),
                    error = %e,
                    "Image feature extraction failed"
                );
                return Err(Error::analysis_failed());
            }
        };

        let analysis = mapping::build_analysis(features);
        debug!(
            extractor = self.extractor.name(),
            moods = analysis.suggested_moods.len(),
            confidence = analysis.confidence,
            "Image analysis complete"
        );
        Ok(analysis)
    }
}

impl Default for ImageMoodAnalyzer {
    fn default() -> Self {
        Self::new(LengthHashExtractor::new())
    }
}

/// Ticket identifying one upload in a `LatestUpload` sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadTicket(u64);

/// Tracks the most recent upload so stale analyses can be discarded
#[derive(Debug, Default)]
pub struct LatestUpload {
    generation: AtomicU64,
}

impl LatestUpload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new upload, superseding any earlier one
    pub fn begin(&self) -> UploadTicket {
        UploadTicket(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: UploadTicket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.0
    }

    /// Keep `value` only if `ticket` is still the latest upload
    pub fn accept<T>(&self, ticket: UploadTicket, value: T) -> Option<T> {
        if self.is_current(ticket) {
            Some(value)
        } else {
            debug!(ticket = ticket.0, "Discarding stale analysis result");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenExtractor;

    #[async_trait]
    impl ImageFeatureExtractor for BrokenExtractor {
        fn name(&self) -> &'static str {
            "broken"
        }

        async fn extract(&self, _payload: &str) -> Result<ImageFeatures> {
            Err(Error::InvalidImage("decoder exploded".to_string()))
        }
    }

    fn fast_analyzer() -> ImageMoodAnalyzer {
        ImageMoodAnalyzer::default().with_latency(Duration::ZERO)
    }

    #[tokio::test]
    async fn test_analysis_bounds_for_many_lengths() {
        let analyzer = fast_analyzer();
        for len in 0..60 {
            let payload = "a".repeat(len);
            let analysis = analyzer.analyze(&payload).await.unwrap();

            assert!(analysis.confidence >= 0.6 && analysis.confidence <= 0.95);
            assert!(analysis.suggested_moods.len() <= 4);
            let mut unique = analysis.suggested_moods.clone();
            unique.sort();
            unique.dedup();
            assert_eq!(unique.len(), analysis.suggested_moods.len());
            assert!(analysis.insights.len() <= 3);
            assert!(analysis.colors.len() <= 3);
            assert_eq!(analysis.objects.len(), 2);
            assert_eq!(analysis.emotions.len(), 1);
        }
    }

    #[tokio::test]
    async fn test_known_payload() {
        // len 0: colors #FF6B6B, #4ECDC4, #45B7D1; scenes nature, sunset; emotion happy
        let analysis = fast_analyzer().analyze("").await.unwrap();
        assert_eq!(analysis.colors, vec!["#FF6B6B", "#4ECDC4", "#45B7D1"]);
        assert_eq!(analysis.objects, vec!["nature", "sunset"]);
        assert_eq!(analysis.emotions, vec!["happy"]);
        assert_eq!(
            analysis.suggested_moods,
            vec!["energetic", "passionate", "angry", "excited"]
        );
        assert!((analysis.confidence - 0.95).abs() < 1e-9);
        assert_eq!(
            analysis.insights,
            vec![
                "Natural settings often promote feelings of peace and well-being",
                "Blue tones suggest calmness and tranquility",
                "Facial expressions indicate positive emotional state",
            ]
        );
    }

    #[tokio::test]
    async fn test_extractor_failure_is_generic_error() {
        let analyzer = ImageMoodAnalyzer::new(BrokenExtractor).with_latency(Duration::ZERO);
        let err = analyzer.analyze("anything").await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to analyze image");
    }

    #[tokio::test]
    async fn test_latency_is_applied() {
        let latency = Duration::from_millis(40);
        let analyzer = ImageMoodAnalyzer::default().with_latency(latency);
        let start = std::time::Instant::now();
        analyzer.analyze("abc").await.unwrap();
        assert!(start.elapsed() >= latency);
        assert_eq!(ImageMoodAnalyzer::default().latency(), DEFAULT_LATENCY);
    }

    #[tokio::test]
    async fn test_latest_upload_discards_stale_result() {
        let analyzer = fast_analyzer();
        let uploads = LatestUpload::new();

        let first = uploads.begin();
        let second = uploads.begin();

        let (a, b) = tokio::join!(analyzer.analyze("first"), analyzer.analyze("second!"));

        assert!(uploads.accept(first, a.unwrap()).is_none());
        assert!(uploads.accept(second, b.unwrap()).is_some());
    }
}
