//! The persisted style record and its resolution policy

use serde::{Deserialize, Deserializer, Serialize, de};
use tracing::{debug, warn};

use super::types::{DisplaySize, MarkerShape, RepresentationMode};
use crate::color::RgbaColor;
use crate::constants::{defaults, validation};
use crate::error::StyleError;

/// Parameters that only apply to bars mode.
///
/// Kept as one group so the four values are either all present or all absent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BarStyle {
    pub bar_max_height_percent: f64,
    pub bar_min_height_percent: f64,
    pub bar_corner_radius: f64,
    pub bar_spacing: f64,
}

impl Default for BarStyle {
    fn default() -> Self {
        Self {
            bar_max_height_percent: defaults::BAR_MAX_HEIGHT_PERCENT,
            bar_min_height_percent: defaults::BAR_MIN_HEIGHT_PERCENT,
            bar_corner_radius: defaults::BAR_CORNER_RADIUS,
            bar_spacing: defaults::BAR_SPACING,
        }
    }
}

/// Everything a renderer needs to draw a digit matrix for one display size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleConfig {
    pub background_color: RgbaColor,

    /// One color per digit column; read through [`StyleConfig::line_color`]
    pub line_colors: [RgbaColor; 4],

    #[serde(default)]
    pub representation: RepresentationMode,

    pub line_width: f64,
    pub marker_size: f64,

    /// Vertical excursion of the line as a fraction of the row height
    pub line_amplitude_percent: f64,

    pub vertical_spacing: f64,
    pub widget_padding: f64,

    /// Horizontal inset per side as a fraction of the width
    #[serde(default = "default_horizontal_padding_percent")]
    pub horizontal_padding_percent: f64,

    #[serde(default)]
    pub marker_shape: MarkerShape,

    /// Bars-only group, flattened into the record and omitted when absent
    #[serde(flatten, deserialize_with = "deserialize_bar_group")]
    pub bar: Option<BarStyle>,
}

/// Wire form of the bar keys; each one may be missing on its own
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBarStyle {
    bar_max_height_percent: Option<f64>,
    bar_min_height_percent: Option<f64>,
    bar_corner_radius: Option<f64>,
    bar_spacing: Option<f64>,
}

/// All four bar keys or none of them. A mistyped or incomplete group is a
/// decode error instead of being dropped.
fn deserialize_bar_group<'de, D>(deserializer: D) -> Result<Option<BarStyle>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = RawBarStyle::deserialize(deserializer)?;
    match (
        raw.bar_max_height_percent,
        raw.bar_min_height_percent,
        raw.bar_corner_radius,
        raw.bar_spacing,
    ) {
        (None, None, None, None) => Ok(None),
        (Some(max), Some(min), Some(radius), Some(spacing)) => Ok(Some(BarStyle {
            bar_max_height_percent: max,
            bar_min_height_percent: min,
            bar_corner_radius: radius,
            bar_spacing: spacing,
        })),
        (max, min, radius, spacing) => {
            let missing: Vec<&str> = [
                ("barMaxHeightPercent", max.is_none()),
                ("barMinHeightPercent", min.is_none()),
                ("barCornerRadius", radius.is_none()),
                ("barSpacing", spacing.is_none()),
            ]
            .into_iter()
            .filter_map(|(key, absent)| absent.then_some(key))
            .collect();
            Err(de::Error::custom(format!(
                "incomplete bar group, missing {}",
                missing.join(", ")
            )))
        }
    }
}

fn default_horizontal_padding_percent() -> f64 {
    defaults::HORIZONTAL_PADDING_PERCENT
}

/// Baseline style for a display size
pub fn default_style(size: DisplaySize) -> StyleConfig {
    StyleConfig {
        background_color: RgbaColor::BLACK,
        line_colors: [
            RgbaColor::BLUE,
            RgbaColor::CYAN,
            RgbaColor::YELLOW,
            RgbaColor::ORANGE,
        ],
        representation: RepresentationMode::LineGraph,
        line_width: defaults::LINE_WIDTH,
        marker_size: defaults::MARKER_SIZE,
        line_amplitude_percent: defaults::LINE_AMPLITUDE_PERCENT,
        vertical_spacing: size.default_vertical_spacing(),
        widget_padding: defaults::WIDGET_PADDING,
        horizontal_padding_percent: defaults::HORIZONTAL_PADDING_PERCENT,
        marker_shape: MarkerShape::Circle,
        bar: None,
    }
}

/// Populate the bar group when bars mode is active and the group is missing.
/// Any other input is returned unchanged.
pub fn ensure_bar_defaults(mut config: StyleConfig) -> StyleConfig {
    config.ensure_bar_defaults();
    config
}

impl StyleConfig {
    /// Color for column `index`, wrapping past the fourth slot
    pub fn line_color(&self, index: usize) -> RgbaColor {
        self.line_colors[index % self.line_colors.len()]
    }

    /// In-place form of [`ensure_bar_defaults`]; returns true if the group was filled
    pub fn ensure_bar_defaults(&mut self) -> bool {
        if self.representation == RepresentationMode::Bars && self.bar.is_none() {
            debug!("Populating bar defaults");
            self.bar = Some(BarStyle::default());
            return true;
        }
        false
    }

    /// Switch representation, filling bar defaults on the way into bars mode
    pub fn set_representation(&mut self, mode: RepresentationMode) {
        self.representation = mode;
        self.ensure_bar_defaults();
    }

    /// Bar group with defaults substituted when it has not been populated yet
    pub fn resolved_bar_style(&self) -> BarStyle {
        self.bar.unwrap_or_default()
    }

    pub fn encode(&self) -> Result<Vec<u8>, StyleError> {
        serde_json::to_vec_pretty(self).map_err(StyleError::Encode)
    }

    /// Strict on structure, lenient on the representation tag
    pub fn decode(bytes: &[u8]) -> Result<Self, StyleError> {
        serde_json::from_slice(bytes).map_err(StyleError::Decode)
    }

    /// Bring values back into their documented ranges.
    /// Returns the names of corrected fields.
    pub fn validate_and_clamp(&mut self) -> Vec<&'static str> {
        let mut corrected = Vec::new();

        if self.background_color.clamp_channels() {
            corrected.push("backgroundColor");
        }
        if self
            .line_colors
            .iter_mut()
            .fold(false, |changed, c| c.clamp_channels() || changed)
        {
            corrected.push("lineColors");
        }

        positive(&mut self.line_width, "lineWidth", defaults::LINE_WIDTH, &mut corrected);
        positive(&mut self.marker_size, "markerSize", defaults::MARKER_SIZE, &mut corrected);
        within(&mut self.line_amplitude_percent, "lineAmplitudePercent", 0.0, 1.0, &mut corrected);
        within(&mut self.vertical_spacing, "verticalSpacing", 0.0, f64::MAX, &mut corrected);
        within(&mut self.widget_padding, "widgetPadding", 0.0, f64::MAX, &mut corrected);
        within(&mut self.horizontal_padding_percent, "horizontalPaddingPercent", 0.0, f64::MAX, &mut corrected);
        if self.horizontal_padding_percent >= validation::HORIZONTAL_PADDING_PERCENT_LIMIT {
            warn!(
                value = self.horizontal_padding_percent,
                using = defaults::HORIZONTAL_PADDING_PERCENT,
                "horizontalPaddingPercent leaves no width, using default"
            );
            self.horizontal_padding_percent = defaults::HORIZONTAL_PADDING_PERCENT;
            corrected.push("horizontalPaddingPercent");
        }

        if let Some(bar) = self.bar.as_mut() {
            within(&mut bar.bar_max_height_percent, "barMaxHeightPercent", 0.0, 1.0, &mut corrected);
            within(&mut bar.bar_min_height_percent, "barMinHeightPercent", 0.0, 1.0, &mut corrected);
            if bar.bar_min_height_percent > bar.bar_max_height_percent {
                warn!(
                    min = bar.bar_min_height_percent,
                    max = bar.bar_max_height_percent,
                    "barMinHeightPercent exceeds barMaxHeightPercent, lowering min"
                );
                bar.bar_min_height_percent = bar.bar_max_height_percent;
                corrected.push("barMinHeightPercent");
            }
            within(&mut bar.bar_corner_radius, "barCornerRadius", 0.0, f64::MAX, &mut corrected);
            within(&mut bar.bar_spacing, "barSpacing", 0.0, f64::MAX, &mut corrected);
        }

        corrected
    }
}

/// Stroke-like dimensions must stay positive; bad values take the default
fn positive(value: &mut f64, field: &'static str, fallback: f64, corrected: &mut Vec<&'static str>) {
    if value.is_nan() || *value <= 0.0 {
        warn!(field, value = *value, using = fallback, "value not positive, using default");
        *value = fallback;
        corrected.push(field);
    }
}

fn within(value: &mut f64, field: &'static str, min: f64, max: f64, corrected: &mut Vec<&'static str>) {
    if value.is_nan() {
        warn!(field, using = min, "value is NaN, using minimum");
        *value = min;
        corrected.push(field);
    } else if *value < min {
        warn!(field, value = *value, min, "value below minimum, clamping");
        *value = min;
        corrected.push(field);
    } else if *value > max {
        warn!(field, value = *value, max, "value exceeds maximum, clamping");
        *value = max;
        corrected.push(field);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bars_style() -> StyleConfig {
        let mut style = default_style(DisplaySize::Standard);
        style.set_representation(RepresentationMode::Bars);
        style
    }

    #[test]
    fn test_default_style_baseline() {
        let style = default_style(DisplaySize::Compact);
        assert_eq!(style.background_color, RgbaColor::BLACK);
        assert_eq!(
            style.line_colors,
            [RgbaColor::BLUE, RgbaColor::CYAN, RgbaColor::YELLOW, RgbaColor::ORANGE]
        );
        assert_eq!(style.representation, RepresentationMode::LineGraph);
        assert_eq!(style.line_width, 3.0);
        assert_eq!(style.marker_size, 5.0);
        assert_eq!(style.line_amplitude_percent, 1.0);
        assert_eq!(style.widget_padding, 12.0);
        assert_eq!(style.horizontal_padding_percent, 0.1);
        assert_eq!(style.marker_shape, MarkerShape::Circle);
        assert!(style.bar.is_none());
    }

    #[test]
    fn test_default_style_spacing_per_size() {
        assert_eq!(default_style(DisplaySize::Compact).vertical_spacing, 5.0);
        assert_eq!(default_style(DisplaySize::Standard).vertical_spacing, 6.0);
        assert_eq!(default_style(DisplaySize::Expanded).vertical_spacing, 8.0);
    }

    #[test]
    fn test_default_styles_differ_only_in_spacing() {
        let mut small = default_style(DisplaySize::Compact);
        small.vertical_spacing = 8.0;
        assert_eq!(small, default_style(DisplaySize::Expanded));
    }

    #[test]
    fn test_line_color_wraps() {
        let style = default_style(DisplaySize::Standard);
        assert_eq!(style.line_color(4), style.line_color(0));
        assert_eq!(style.line_color(7), RgbaColor::ORANGE);
    }

    #[test]
    fn test_ensure_bar_defaults_populates_group() {
        let mut style = default_style(DisplaySize::Standard);
        style.representation = RepresentationMode::Bars;
        let style = ensure_bar_defaults(style);
        let bar = style.bar.unwrap();
        assert_eq!(bar.bar_max_height_percent, 0.9);
        assert_eq!(bar.bar_min_height_percent, 0.25);
        assert_eq!(bar.bar_corner_radius, 4.0);
        assert_eq!(bar.bar_spacing, 3.0);
    }

    #[test]
    fn test_ensure_bar_defaults_ignores_other_modes() {
        let mut style = default_style(DisplaySize::Standard);
        style.representation = RepresentationMode::Dots;
        assert_eq!(ensure_bar_defaults(style.clone()), style);
    }

    #[test]
    fn test_ensure_bar_defaults_keeps_existing_values() {
        let mut style = bars_style();
        style.bar.as_mut().unwrap().bar_spacing = 9.0;
        assert_eq!(ensure_bar_defaults(style.clone()).bar.unwrap().bar_spacing, 9.0);
    }

    #[test]
    fn test_ensure_bar_defaults_idempotent() {
        for mode in [RepresentationMode::LineGraph, RepresentationMode::Dots, RepresentationMode::Bars] {
            let mut style = default_style(DisplaySize::Expanded);
            style.representation = mode;
            let once = ensure_bar_defaults(style);
            assert_eq!(ensure_bar_defaults(once.clone()), once);
        }
    }

    #[test]
    fn test_leaving_bars_keeps_group() {
        let mut style = bars_style();
        style.set_representation(RepresentationMode::LineGraph);
        assert!(style.bar.is_some());
    }

    #[test]
    fn test_round_trip_without_bar_fields() {
        let style = default_style(DisplaySize::Compact);
        let bytes = style.encode().unwrap();
        let text = String::from_utf8(bytes.clone()).unwrap();
        assert!(!text.contains("barMaxHeightPercent"));
        assert!(!text.contains("null"));
        assert_eq!(StyleConfig::decode(&bytes).unwrap(), style);
    }

    #[test]
    fn test_round_trip_with_bar_fields() {
        let mut style = bars_style();
        style.line_colors[2] = RgbaColor::new(0.1, 0.2, 0.3, 0.4);
        style.marker_shape = MarkerShape::Square;
        style.line_amplitude_percent = 0.37;
        let bytes = style.encode().unwrap();
        let text = String::from_utf8(bytes.clone()).unwrap();
        assert!(text.contains("\"barCornerRadius\""));
        assert!(text.contains("\"representation\": \"bars\""));
        assert_eq!(StyleConfig::decode(&bytes).unwrap(), style);
    }

    #[test]
    fn test_encoded_shape_uses_camel_case_keys() {
        let value: serde_json::Value =
            serde_json::from_slice(&default_style(DisplaySize::Standard).encode().unwrap()).unwrap();
        let object = value.as_object().unwrap();
        for key in [
            "backgroundColor",
            "lineColors",
            "representation",
            "lineWidth",
            "markerSize",
            "lineAmplitudePercent",
            "verticalSpacing",
            "widgetPadding",
            "horizontalPaddingPercent",
            "markerShape",
        ] {
            assert!(object.contains_key(key), "missing {key}");
        }
        assert_eq!(object.len(), 10);
        assert_eq!(value["backgroundColor"]["alpha"], 1.0);
    }

    #[test]
    fn test_decode_rejects_malformed_payloads() {
        assert!(StyleConfig::decode(b"not json").is_err());
        assert!(StyleConfig::decode(b"{}").is_err());

        let mut value: serde_json::Value =
            serde_json::from_slice(&default_style(DisplaySize::Standard).encode().unwrap()).unwrap();
        value["lineColors"].as_array_mut().unwrap().pop();
        assert!(StyleConfig::decode(value.to_string().as_bytes()).is_err());
    }

    #[test]
    fn test_decode_rejects_unknown_marker_shape() {
        let mut value: serde_json::Value =
            serde_json::from_slice(&default_style(DisplaySize::Standard).encode().unwrap()).unwrap();
        value["markerShape"] = serde_json::json!("triangle");
        assert!(StyleConfig::decode(value.to_string().as_bytes()).is_err());
    }

    #[test]
    fn test_decode_upgrades_older_payload() {
        // First revision: no representation, horizontal padding or marker shape
        let payload = r#"{
            "backgroundColor": {"red": 0, "green": 0, "blue": 0, "alpha": 1},
            "lineColors": [
                {"red": 0, "green": 0, "blue": 1, "alpha": 1},
                {"red": 0, "green": 1, "blue": 1, "alpha": 1},
                {"red": 1, "green": 1, "blue": 0, "alpha": 1},
                {"red": 1, "green": 0.5, "blue": 0, "alpha": 1}
            ],
            "lineWidth": 2,
            "markerSize": 4,
            "lineAmplitudePercent": 0.8,
            "verticalSpacing": 10,
            "widgetPadding": 8
        }"#;
        let style = StyleConfig::decode(payload.as_bytes()).unwrap();
        assert_eq!(style.representation, RepresentationMode::LineGraph);
        assert_eq!(style.horizontal_padding_percent, 0.1);
        assert_eq!(style.marker_shape, MarkerShape::Circle);
        assert_eq!(style.line_width, 2.0);
        assert!(style.bar.is_none());
    }

    #[test]
    fn test_decode_maps_legacy_representation_label() {
        let mut value: serde_json::Value =
            serde_json::from_slice(&default_style(DisplaySize::Standard).encode().unwrap()).unwrap();
        value["representation"] = serde_json::json!("Artistic Bars");
        let style = StyleConfig::decode(value.to_string().as_bytes()).unwrap();
        assert_eq!(style.representation, RepresentationMode::Bars);
    }

    fn encoded_bars_value() -> serde_json::Value {
        serde_json::from_slice(&bars_style().encode().unwrap()).unwrap()
    }

    #[test]
    fn test_decode_rejects_mistyped_bar_field() {
        let mut value = encoded_bars_value();
        value["barSpacing"] = serde_json::json!("wide");
        let result = StyleConfig::decode(value.to_string().as_bytes());
        assert!(matches!(result, Err(StyleError::Decode(_))));
    }

    #[test]
    fn test_decode_rejects_incomplete_bar_group() {
        let mut value = encoded_bars_value();
        value.as_object_mut().unwrap().remove("barCornerRadius");
        match StyleConfig::decode(value.to_string().as_bytes()) {
            Err(StyleError::Decode(e)) => assert!(e.to_string().contains("barCornerRadius")),
            other => panic!("expected decode error, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_keeps_full_bar_group() {
        let mut value = encoded_bars_value();
        value["barSpacing"] = serde_json::json!(7.5);
        let style = StyleConfig::decode(value.to_string().as_bytes()).unwrap();
        assert_eq!(style.bar.unwrap().bar_spacing, 7.5);
        assert_eq!(style.bar.unwrap().bar_corner_radius, defaults::BAR_CORNER_RADIUS);
    }

    #[test]
    fn test_validate_and_clamp_accepts_range_edges() {
        let mut style = bars_style();
        style.line_width = 0.05;
        style.marker_size = 0.01;
        style.horizontal_padding_percent = 0.495;
        style.line_amplitude_percent = 0.0;
        let before = style.clone();
        assert!(style.validate_and_clamp().is_empty());
        assert_eq!(style, before);
    }

    #[test]
    fn test_validate_and_clamp_resets_full_width_padding() {
        let mut style = default_style(DisplaySize::Compact);
        style.horizontal_padding_percent = 0.5;
        assert_eq!(style.validate_and_clamp(), vec!["horizontalPaddingPercent"]);
        assert_eq!(style.horizontal_padding_percent, defaults::HORIZONTAL_PADDING_PERCENT);
    }

    #[test]
    fn test_validate_and_clamp_corrects_out_of_range_values() {
        let mut style = bars_style();
        style.line_width = 0.0;
        style.line_amplitude_percent = 1.5;
        style.horizontal_padding_percent = 0.7;
        style.vertical_spacing = -2.0;
        style.background_color.alpha = 2.0;
        if let Some(bar) = style.bar.as_mut() {
            bar.bar_min_height_percent = 0.95;
            bar.bar_max_height_percent = 0.5;
        }

        let corrected = style.validate_and_clamp();
        assert!(corrected.contains(&"lineWidth"));
        assert!(corrected.contains(&"lineAmplitudePercent"));
        assert!(corrected.contains(&"horizontalPaddingPercent"));
        assert!(corrected.contains(&"verticalSpacing"));
        assert!(corrected.contains(&"backgroundColor"));
        assert!(corrected.contains(&"barMinHeightPercent"));

        assert_eq!(style.line_width, defaults::LINE_WIDTH);
        assert_eq!(style.line_amplitude_percent, 1.0);
        assert_eq!(style.horizontal_padding_percent, defaults::HORIZONTAL_PADDING_PERCENT);
        assert_eq!(style.vertical_spacing, 0.0);
        assert_eq!(style.background_color.alpha, 1.0);
        let bar = style.bar.unwrap();
        assert_eq!(bar.bar_min_height_percent, bar.bar_max_height_percent);
    }

    #[test]
    fn test_validate_and_clamp_noop_for_defaults() {
        let mut style = bars_style();
        assert!(style.validate_and_clamp().is_empty());
    }
}
