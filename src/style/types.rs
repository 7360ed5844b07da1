//! Closed variant types used by the style model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

use crate::constants::{defaults, store};

/// Widget footprint class, used only as the style partition key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DisplaySize {
    /// Small widget
    #[serde(rename = "systemSmall")]
    Compact,
    /// Medium widget
    #[serde(rename = "systemMedium")]
    Standard,
    /// Large widget
    #[serde(rename = "systemLarge")]
    Expanded,
}

impl DisplaySize {
    pub const ALL: [DisplaySize; 3] = [Self::Compact, Self::Standard, Self::Expanded];

    /// Stable token persisted in record keys
    pub fn token(&self) -> &'static str {
        match self {
            Self::Compact => "systemSmall",
            Self::Standard => "systemMedium",
            Self::Expanded => "systemLarge",
        }
    }

    /// Key of the persisted record for this size (e.g. `widgetStyle_systemSmall`)
    pub fn style_key(&self) -> String {
        format!("{}{}", store::KEY_PREFIX, self.token())
    }

    /// The only size-dependent default
    pub fn default_vertical_spacing(&self) -> f64 {
        match self {
            Self::Compact => defaults::VERTICAL_SPACING_COMPACT,
            Self::Standard => defaults::VERTICAL_SPACING_STANDARD,
            Self::Expanded => defaults::VERTICAL_SPACING_EXPANDED,
        }
    }
}

impl fmt::Display for DisplaySize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for DisplaySize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "small" | "compact" | "systemsmall" => Ok(Self::Compact),
            "medium" | "standard" | "systemmedium" => Ok(Self::Standard),
            "large" | "expanded" | "systemlarge" => Ok(Self::Expanded),
            other => Err(format!(
                "unknown display size '{other}' (expected small, medium or large)"
            )),
        }
    }
}

/// Rendering strategy for a digit matrix
///
/// Decoding never fails on the tag: earlier revisions persisted labels such
/// as `"Line Graph"` or `"Artistic Bars"`, and those map to the nearest
/// current variant. Anything unrecognized becomes [`RepresentationMode::LineGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "String")]
pub enum RepresentationMode {
    #[default]
    LineGraph,
    Dots,
    Bars,
}

impl RepresentationMode {
    pub fn tag(&self) -> &'static str {
        match self {
            Self::LineGraph => "lineGraph",
            Self::Dots => "dots",
            Self::Bars => "bars",
        }
    }

    /// Map a persisted tag (current or legacy) onto a supported variant
    pub fn from_tag(tag: &str) -> Option<Self> {
        let normalized: String = tag
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "linegraph" | "line" | "lines" => Some(Self::LineGraph),
            "dots" | "dot" | "dotgrid" => Some(Self::Dots),
            "bars" | "bar" | "barchart" | "artisticbars" => Some(Self::Bars),
            _ => None,
        }
    }
}

impl From<String> for RepresentationMode {
    fn from(tag: String) -> Self {
        Self::from_tag(&tag).unwrap_or_else(|| {
            warn!(tag = %tag, fallback = Self::LineGraph.tag(), "Unknown representation tag, using fallback");
            Self::LineGraph
        })
    }
}

impl fmt::Display for RepresentationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for RepresentationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s).ok_or_else(|| {
            format!("unknown representation '{s}' (expected lineGraph, dots or bars)")
        })
    }
}

/// Marker drawn at each point of a line graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerShape {
    #[default]
    Circle,
    Square,
}

impl FromStr for MarkerShape {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "circle" => Ok(Self::Circle),
            "square" => Ok(Self::Square),
            other => Err(format!("unknown marker shape '{other}' (expected circle or square)")),
        }
    }
}
