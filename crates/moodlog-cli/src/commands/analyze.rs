//! Image mood analysis commands

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use moodlog_core::analyzer::{analyze_composition, mime_for_extension};
use moodlog_core::{ImageAnalysis, ImageMoodAnalyzer, ImagePayload};

/// Read an image file into a validated payload
pub fn load_image(path: &Path) -> Result<ImagePayload> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let Some(mime) = mime_for_extension(ext) else {
        bail!(
            "Unsupported image type '{}'. Use jpg, png, gif, webp, bmp or svg.",
            path.display()
        );
    };

    let bytes =
        fs::read(path).with_context(|| format!("Failed to read image: {}", path.display()))?;
    ImagePayload::from_bytes(mime, &bytes)
        .with_context(|| format!("Invalid image: {}", path.display()))
}

/// Print an analysis the way the entry composer shows it
pub fn print_analysis(analysis: &ImageAnalysis) {
    println!(
        "   Suggested moods: {}",
        if analysis.suggested_moods.is_empty() {
            "-".to_string()
        } else {
            analysis.suggested_moods.join(", ")
        }
    );
    println!("   Confidence: {:.0}%", analysis.confidence * 100.0);
    println!("   Colors: {}", analysis.colors.join(" "));
    if !analysis.objects.is_empty() {
        println!("   Scene: {}", analysis.objects.join(", "));
    }
    for insight in &analysis.insights {
        println!("   💡 {}", insight);
    }
}

pub async fn cmd_analyze(analyzer: &ImageMoodAnalyzer, path: &Path, json: bool) -> Result<()> {
    let payload = load_image(path)?;

    if !json {
        println!("🔍 Analyzing {}...", path.display());
    }
    let analysis = analyzer
        .analyze_payload(&payload)
        .await
        .context("Image analysis failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
        return Ok(());
    }

    print_analysis(&analysis);

    let composition = analyze_composition(payload.data_uri());
    println!(
        "   Composition: brightness {:.2}, contrast {:.2}, saturation {:.2}, mood score {:.1}",
        composition.brightness,
        composition.contrast,
        composition.saturation,
        composition.mood_score
    );

    Ok(())
}
