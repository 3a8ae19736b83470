//! Composition estimate (brightness, contrast, saturation)

use serde::{Deserialize, Serialize};

use super::stub::payload_units;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Composition {
    pub brightness: f64,
    pub contrast: f64,
    pub saturation: f64,
    /// Overall mood score in (0, 1]
    pub mood_score: f64,
}

/// Deterministic composition estimate keyed on payload length
pub fn analyze_composition(payload: &str) -> Composition {
    let len = payload_units(payload);
    Composition {
        brightness: (len % 100) as f64 / 100.0,
        contrast: ((len * 2) % 100) as f64 / 100.0,
        saturation: ((len * 3) % 100) as f64 / 100.0,
        mood_score: ((len % 10) + 1) as f64 / 10.0,
    }
}
