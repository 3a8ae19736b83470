//! Feature → mood mapping tables
//!
//! Everything here is independent of how features were extracted: given
//! colors, scene tags and emotions, produce suggested moods, a confidence
//! score, and insight sentences.

use crate::catalog::MoodKind;
use crate::models::ImageAnalysis;

use super::ImageFeatures;

/// Maximum number of suggested moods returned
pub const MAX_SUGGESTED_MOODS: usize = 4;
/// Maximum number of insight sentences returned
pub const MAX_INSIGHTS: usize = 3;

/// Coarse color name for a palette hex value ("gray" when unmapped)
pub fn color_name(hex: &str) -> &'static str {
    match hex.to_ascii_uppercase().as_str() {
        "#FF6B6B" => "red",
        "#4ECDC4" | "#45B7D1" | "#85C1E9" => "blue",
        "#96CEB4" | "#98D8C8" => "green",
        "#FFEAA7" | "#F7DC6F" => "yellow",
        "#DDA0DD" | "#BB8FCE" => "purple",
        _ => "gray",
    }
}

/// Color psychology associations
pub fn color_moods(name: &str) -> &'static [&'static str] {
    match name {
        "red" => &["energetic", "passionate", "angry", "excited"],
        "blue" => &["calm", "peaceful", "sad", "serene"],
        "green" => &["peaceful", "natural", "balanced", "hopeful"],
        "yellow" => &["happy", "optimistic", "cheerful", "energetic"],
        "orange" => &["enthusiastic", "warm", "creative", "social"],
        "purple" => &["creative", "mysterious", "spiritual", "imaginative"],
        "pink" => &["loving", "gentle", "romantic", "nurturing"],
        "black" => &["serious", "elegant", "mysterious", "sad"],
        "white" => &["pure", "clean", "peaceful", "minimalist"],
        "brown" => &["grounded", "stable", "natural", "comfortable"],
        "gray" => &["neutral", "balanced", "calm", "professional"],
        _ => &[],
    }
}

/// Scene associations
pub fn scene_moods(scene: &str) -> &'static [&'static str] {
    match scene {
        "nature" => &["peaceful", "calm", "refreshed", "grateful"],
        "sunset" => &["peaceful", "romantic", "reflective", "grateful"],
        "beach" => &["relaxed", "peaceful", "happy", "free"],
        "mountains" => &["inspired", "peaceful", "adventurous", "strong"],
        "city" => &["energetic", "busy", "social", "ambitious"],
        "food" => &["satisfied", "social", "grateful", "happy"],
        "pets" => &["happy", "loving", "grateful", "peaceful"],
        "friends" => &["social", "happy", "grateful", "connected"],
        "family" => &["loving", "grateful", "connected", "secure"],
        "workout" => &["energetic", "strong", "accomplished", "healthy"],
        "art" => &["creative", "inspired", "expressive", "thoughtful"],
        "books" => &["peaceful", "thoughtful", "learning", "focused"],
        "music" => &["expressive", "emotional", "creative", "energetic"],
        "travel" => &["adventurous", "excited", "grateful", "free"],
        "work" => &["focused", "productive", "professional", "busy"],
        "home" => &["comfortable", "peaceful", "secure", "relaxed"],
        _ => &[],
    }
}

/// Union of color moods, scene moods and emotions, first-seen order, no duplicates
pub fn collect_moods(features: &ImageFeatures) -> Vec<String> {
    let color_words = features
        .colors
        .iter()
        .flat_map(|c| color_moods(color_name(c)).iter().copied());
    let scene_words = features
        .objects
        .iter()
        .flat_map(|s| scene_moods(s).iter().copied());
    let emotion_words = features.emotions.iter().map(String::as_str);

    let mut moods: Vec<String> = Vec::new();
    for word in color_words.chain(scene_words).chain(emotion_words) {
        if !moods.iter().any(|m| m == word) {
            moods.push(word.to_string());
        }
    }
    moods
}

/// Confidence grows with the number of distinct mood tags, capped at 0.95
pub fn confidence(distinct_moods: usize) -> f64 {
    (0.6 + 0.05 * distinct_moods as f64).min(0.95)
}

/// Templated insight sentences, evaluated in fixed priority order
pub fn insights(features: &ImageFeatures) -> Vec<String> {
    let has_scene = |tag: &str| features.objects.iter().any(|o| o == tag);
    let has_color = |name: &str| features.colors.iter().any(|c| color_name(c) == name);

    let rules: [(bool, &str); 6] = [
        (
            has_scene("nature"),
            "Natural settings often promote feelings of peace and well-being",
        ),
        (
            has_scene("friends") || has_scene("family"),
            "Social connections are visible, suggesting feelings of belonging and love",
        ),
        (has_color("blue"), "Blue tones suggest calmness and tranquility"),
        (
            has_color("yellow"),
            "Warm yellow colors indicate positivity and energy",
        ),
        (
            has_scene("workout") || has_scene("travel"),
            "Active lifestyle elements suggest energy and accomplishment",
        ),
        (
            features.emotions.iter().any(|e| e == "happy"),
            "Facial expressions indicate positive emotional state",
        ),
    ];

    rules
        .iter()
        .filter(|(matched, _)| *matched)
        .take(MAX_INSIGHTS)
        .map(|(_, text)| text.to_string())
        .collect()
}

/// Turn extracted features into the final analysis
pub fn build_analysis(features: ImageFeatures) -> ImageAnalysis {
    let mut moods = collect_moods(&features);
    let confidence = confidence(moods.len());
    moods.truncate(MAX_SUGGESTED_MOODS);
    let insights = insights(&features);

    ImageAnalysis {
        suggested_moods: moods,
        confidence,
        insights,
        colors: features.colors,
        objects: features.objects,
        emotions: features.emotions,
    }
}

/// Catalog moods whose label contains a suggested word (case-insensitive)
///
/// Used to preselect moods in the entry composer; one catalog mood per
/// suggestion, no duplicates.
pub fn suggest_catalog_moods(analysis: &ImageAnalysis) -> Vec<MoodKind> {
    let mut selected = Vec::new();
    for word in &analysis.suggested_moods {
        let word = word.to_lowercase();
        let found = MoodKind::all()
            .iter()
            .copied()
            .find(|m| m.label().to_lowercase().contains(&word));
        if let Some(kind) = found {
            if !selected.contains(&kind) {
                selected.push(kind);
            }
        }
    }
    selected
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features(colors: &[&str], objects: &[&str], emotions: &[&str]) -> ImageFeatures {
        ImageFeatures {
            colors: colors.iter().map(|s| s.to_string()).collect(),
            objects: objects.iter().map(|s| s.to_string()).collect(),
            emotions: emotions.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_color_name() {
        assert_eq!(color_name("#FF6B6B"), "red");
        assert_eq!(color_name("#45b7d1"), "blue");
        assert_eq!(color_name("#000000"), "gray");
    }

    #[test]
    fn test_collect_moods_dedupes_in_order() {
        let f = features(&["#4ECDC4"], &["nature"], &["peaceful"]);
        let moods = collect_moods(&f);
        // blue: calm, peaceful, sad, serene; nature adds refreshed, grateful
        assert_eq!(
            moods,
            vec!["calm", "peaceful", "sad", "serene", "refreshed", "grateful"]
        );
    }

    #[test]
    fn test_confidence_bounds() {
        assert!((confidence(0) - 0.6).abs() < 1e-9);
        assert!((confidence(4) - 0.8).abs() < 1e-9);
        assert!((confidence(50) - 0.95).abs() < 1e-9);
    }

    #[test]
    fn test_insight_priority_and_cap() {
        let f = features(&["#4ECDC4", "#FFEAA7"], &["nature", "friends"], &["happy"]);
        let insights = insights(&f);
        assert_eq!(insights.len(), MAX_INSIGHTS);
        assert!(insights[0].starts_with("Natural settings"));
        assert!(insights[1].starts_with("Social connections"));
        assert!(insights[2].starts_with("Blue tones"));
    }

    #[test]
    fn test_build_analysis_truncates_after_confidence() {
        let f = features(&["#FF6B6B", "#4ECDC4"], &["city"], &["excited"]);
        let analysis = build_analysis(f);
        assert_eq!(analysis.suggested_moods.len(), MAX_SUGGESTED_MOODS);
        // 8 color words + busy, social, ambitious = 11 distinct
        assert!((analysis.confidence - 0.95).abs() < 1e-9);
    }

    #[test]
    fn test_suggest_catalog_moods() {
        let analysis = ImageAnalysis {
            suggested_moods: vec![
                "happy".into(),
                "peaceful".into(),
                "sad".into(),
                "serene".into(),
            ],
            confidence: 0.8,
            insights: vec![],
            colors: vec![],
            objects: vec![],
            emotions: vec![],
        };
        let moods = suggest_catalog_moods(&analysis);
        assert_eq!(
            moods,
            vec![MoodKind::VeryHappy, MoodKind::Peaceful, MoodKind::Sad]
        );
    }
}
