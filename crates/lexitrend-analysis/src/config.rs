//! Analysis configuration
//!
//! Every constant of the analyses (category list, group labels, bandwidth,
//! colors, period annotations, chart layout, output paths) lives in
//! [`AnalysisConfig`]. The defaults reproduce the published figures; a JSON
//! file may override any subset of fields.
//!
//! ```
//! use lexitrend_analysis::config::AnalysisConfig;
//!
//! let config: AnalysisConfig =
//!     serde_json::from_str(r#"{ "trends": { "lowess_frac": 0.4 } }"#).unwrap();
//! assert_eq!(config.trends.lowess_frac, 0.4);
//! assert_eq!(config.categories, ["Affect", "Cognition", "Perception"]);
//! ```

use std::{collections::BTreeMap, path::PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// LIWC categories analysed, in report order.
    pub categories: Vec<String>,
    pub comparison: ComparisonConfig,
    pub regression: RegressionConfig,
    pub trends: TrendChartConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            categories: ["Affect", "Cognition", "Perception"]
                .map(String::from)
                .to_vec(),
            comparison: ComparisonConfig::default(),
            regression: RegressionConfig::default(),
            trends: TrendChartConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ComparisonConfig {
    /// Label of the first group in report headers.
    pub first_label: String,
    /// Label of the second group in report headers.
    pub second_label: String,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            first_label: "Fiction".to_owned(),
            second_label: "Non-fiction".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RegressionConfig {
    /// Confidence level of slope intervals and fit bands.
    pub confidence_level: f64,
    /// Directory receiving one trend chart per category.
    pub plot_dir: PathBuf,
    /// Chart size in pixels.
    pub plot_size: (u32, u32),
}

impl Default for RegressionConfig {
    fn default() -> Self {
        Self {
            confidence_level: 0.95,
            plot_dir: PathBuf::from("plots"),
            plot_size: (960, 720),
        }
    }
}

/// 8-bit RGB color, serialized as `[r, g, b]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const RED: Self = Self(255, 0, 0);
    pub const GOLDENROD: Self = Self(218, 165, 32);
    pub const TEAL: Self = Self(0, 128, 128);
    pub const GRAY: Self = Self(128, 128, 128);
}

/// Text box anchored at a data coordinate of the trend chart.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PeriodAnnotation {
    /// Horizontal centre of the box, in years.
    pub year: f64,
    /// Bottom of the box, in chart units (0-100).
    pub y: f64,
    /// Box text; `\n` separates lines.
    pub label: String,
}

impl PeriodAnnotation {
    #[must_use]
    pub fn new(year: f64, y: f64, label: &str) -> Self {
        Self {
            year,
            y,
            label: label.to_owned(),
        }
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.label.lines()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TrendChartConfig {
    /// LOWESS bandwidth fraction.
    pub lowess_frac: f64,
    /// Line and point color per category.
    pub colors: BTreeMap<String, Rgb>,
    /// Color for categories missing from `colors`.
    pub fallback_color: Rgb,
    pub annotations: Vec<PeriodAnnotation>,
    pub title: Vec<String>,
    pub x_label: String,
    pub y_label: String,
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
    /// Spacing of y ticks and dashed gridlines.
    pub y_tick_step: f64,
    /// Figure size in inches.
    pub figure_size: (f64, f64),
    pub dpi: u32,
    pub figure_path: PathBuf,
}

impl Default for TrendChartConfig {
    fn default() -> Self {
        let colors = [
            ("Affect", Rgb::RED),
            ("Cognition", Rgb::GOLDENROD),
            ("Perception", Rgb::TEAL),
        ]
        .into_iter()
        .map(|(category, color)| (category.to_owned(), color))
        .collect();

        Self {
            lowess_frac: 0.25,
            colors,
            fallback_color: Rgb::GRAY,
            annotations: vec![
                PeriodAnnotation::new(
                    1815.0,
                    97.0,
                    "Sentimental Novel\nRomanticism\nMoral Realism",
                ),
                PeriodAnnotation::new(1875.0, 87.0, "Realism\nPsychological Novel"),
                PeriodAnnotation::new(1920.0, 68.0, "Modernism\nStream-of-\nConsciousness"),
                PeriodAnnotation::new(1962.0, 87.0, "Noir/Detective\nPostwar Realism"),
                PeriodAnnotation::new(
                    2005.0,
                    97.0,
                    "Postmodernism\nAutofiction\nSensory Realism\nProcedural Thriller",
                ),
            ],
            title: vec![
                "Psychological Lexicon Trends in English-Language Fiction (1800–2010)".to_owned(),
                "0–100 Normalised Scores".to_owned(),
            ],
            x_label: "Year".to_owned(),
            y_label: "Normalised Score (0–100)".to_owned(),
            x_range: (1800.0, 2030.0),
            y_range: (0.0, 100.0),
            y_tick_step: 20.0,
            figure_size: (11.0, 6.0),
            dpi: 150,
            figure_path: PathBuf::from("Figure_4_trends.png"),
        }
    }
}

impl TrendChartConfig {
    #[must_use]
    pub fn color_of(&self, category: &str) -> Rgb {
        self.colors
            .get(category)
            .copied()
            .unwrap_or(self.fallback_color)
    }

    /// Figure size in pixels at the configured DPI.
    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    #[must_use]
    pub fn pixel_size(&self) -> (u32, u32) {
        let dpi = f64::from(self.dpi);
        let (w, h) = self.figure_size;
        ((w * dpi).round() as u32, (h * dpi).round() as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_figure_size() {
        assert_eq!(TrendChartConfig::default().pixel_size(), (1650, 900));
    }

    #[test]
    fn test_default_colors() {
        let config = TrendChartConfig::default();
        assert_eq!(config.color_of("Affect"), Rgb::RED);
        assert_eq!(config.color_of("Cognition"), Rgb::GOLDENROD);
        assert_eq!(config.color_of("Perception"), Rgb::TEAL);
        assert_eq!(config.color_of("Social"), Rgb::GRAY);
    }

    #[test]
    fn test_annotation_lines() {
        let config = TrendChartConfig::default();
        let modernism = &config.annotations[2];
        assert_eq!(
            modernism.lines().collect::<Vec<_>>(),
            ["Modernism", "Stream-of-", "Consciousness"]
        );
        assert_eq!(config.annotations.len(), 5);
    }

    #[test]
    fn test_json_round_trip_keeps_overrides() {
        let json = r#"{
            "categories": ["Affect", "Social"],
            "comparison": { "first_label": "Poetry" },
            "trends": { "colors": { "Social": [1, 2, 3] }, "dpi": 300 }
        }"#;
        let config: AnalysisConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.categories, ["Affect", "Social"]);
        assert_eq!(config.comparison.first_label, "Poetry");
        assert_eq!(config.comparison.second_label, "Non-fiction");
        assert_eq!(config.trends.color_of("Social"), Rgb(1, 2, 3));
        assert_eq!(config.trends.pixel_size(), (3300, 1800));
        assert_eq!(config.regression, RegressionConfig::default());
    }
}
