//! Deterministic feature extractor keyed on payload length
//!
//! Not computer vision: every feature is selected from a fixed palette by
//! `len(payload) mod palette_size`, where the length counts UTF-16 code
//! units. Results are reproducible for a given
//! input, which is the only property this extractor guarantees.

use async_trait::async_trait;

use crate::error::Result;

use super::{ImageFeatureExtractor, ImageFeatures};

const COLOR_PALETTE: [&str; 10] = [
    "#FF6B6B", "#4ECDC4", "#45B7D1", "#96CEB4", "#FFEAA7", "#DDA0DD", "#98D8C8", "#F7DC6F",
    "#BB8FCE", "#85C1E9",
];

const SCENE_PALETTE: [&str; 12] = [
    "nature", "sunset", "food", "pets", "friends", "family", "city", "home", "art", "books",
    "workout", "travel",
];

const EMOTION_PALETTE: [&str; 6] = ["happy", "sad", "neutral", "surprised", "peaceful", "excited"];

/// Payload length in UTF-16 code units
pub(crate) fn payload_units(payload: &str) -> usize {
    payload.encode_utf16().count()
}

/// Length-hash stand-in for a real vision model
#[derive(Debug, Clone, Copy, Default)]
pub struct LengthHashExtractor;

impl LengthHashExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Up to three palette colors starting at `len mod 10`; the slice does
    /// not wrap, so it shortens near the end of the palette
    pub fn dominant_colors(payload: &str) -> Vec<String> {
        let start = payload_units(payload) % COLOR_PALETTE.len();
        let end = (start + 3).min(COLOR_PALETTE.len());
        COLOR_PALETTE[start..end]
            .iter()
            .map(|c| c.to_string())
            .collect()
    }

    /// Two adjacent scene tags, wrapping around the palette
    pub fn scene_elements(payload: &str) -> Vec<String> {
        let idx = payload_units(payload) % SCENE_PALETTE.len();
        vec![
            SCENE_PALETTE[idx].to_string(),
            SCENE_PALETTE[(idx + 1) % SCENE_PALETTE.len()].to_string(),
        ]
    }

    pub fn emotions(payload: &str) -> Vec<String> {
        let idx = payload_units(payload) % EMOTION_PALETTE.len();
        vec![EMOTION_PALETTE[idx].to_string()]
    }
}

#[async_trait]
impl ImageFeatureExtractor for LengthHashExtractor {
    fn name(&self) -> &'static str {
        "length-hash"
    }

    async fn extract(&self, payload: &str) -> Result<ImageFeatures> {
        Ok(ImageFeatures {
            colors: Self::dominant_colors(payload),
            objects: Self::scene_elements(payload),
            emotions: Self::emotions(payload),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colors_start_at_length_mod_ten() {
        let colors = LengthHashExtractor::dominant_colors("abc");
        assert_eq!(colors, vec!["#96CEB4", "#FFEAA7", "#DDA0DD"]);
    }

    #[test]
    fn test_colors_do_not_wrap() {
        assert_eq!(LengthHashExtractor::dominant_colors("12345678").len(), 2);
        assert_eq!(
            LengthHashExtractor::dominant_colors("123456789"),
            vec!["#85C1E9"]
        );
        assert_eq!(LengthHashExtractor::dominant_colors("1234567890").len(), 3);
    }

    #[test]
    fn test_scenes_wrap() {
        let payload = "x".repeat(11);
        assert_eq!(
            LengthHashExtractor::scene_elements(&payload),
            vec!["travel", "nature"]
        );
    }

    #[test]
    fn test_emotion() {
        assert_eq!(LengthHashExtractor::emotions(""), vec!["happy"]);
        assert_eq!(LengthHashExtractor::emotions("12345"), vec!["excited"]);
    }

    #[test]
    fn test_length_counts_utf16_units() {
        assert_eq!(payload_units("é€"), 2);
        assert_eq!(payload_units("😀"), 2);

        let accented = "é".repeat(7);
        let ascii = "x".repeat(7);
        assert_eq!(
            LengthHashExtractor::dominant_colors(&accented),
            LengthHashExtractor::dominant_colors(&ascii)
        );
        assert_eq!(
            LengthHashExtractor::scene_elements(&accented),
            LengthHashExtractor::scene_elements(&ascii)
        );
        assert_eq!(
            LengthHashExtractor::emotions(&accented),
            LengthHashExtractor::emotions(&ascii)
        );
    }

    #[tokio::test]
    async fn test_extract_is_deterministic() {
        let extractor = LengthHashExtractor::new();
        let a = extractor.extract("data:image/png;base64,AAAA").await.unwrap();
        let b = extractor.extract("data:image/png;base64,BBBB").await.unwrap();
        assert_eq!(a, b);
    }
}
