//! Application-wide constants
//!
//! Every default, range limit and storage token lives here so the style
//! model, the store and the CLI agree on one set of values.

/// Style store location and key layout
pub mod store {
    /// Directory created under the platform config dir
    pub const APP_DIR: &str = "binary-time";

    /// Subdirectory holding one JSON document per display size
    pub const STYLES_DIR: &str = "styles";

    /// Prefix for the per-size record key (e.g. `widgetStyle_systemSmall`)
    pub const KEY_PREFIX: &str = "widgetStyle_";

    /// File extension of a persisted record
    pub const RECORD_EXTENSION: &str = "json";

    /// Environment variable that overrides the store directory
    pub const DIR_ENV: &str = "BINARY_TIME_STORE_DIR";
}

/// Baseline style values shared by every display size
pub mod defaults {
    pub const LINE_WIDTH: f64 = 3.0;
    pub const MARKER_SIZE: f64 = 5.0;
    pub const LINE_AMPLITUDE_PERCENT: f64 = 1.0;
    pub const WIDGET_PADDING: f64 = 12.0;
    pub const HORIZONTAL_PADDING_PERCENT: f64 = 0.1;

    /// Vertical spacing per display size
    pub const VERTICAL_SPACING_COMPACT: f64 = 5.0;
    pub const VERTICAL_SPACING_STANDARD: f64 = 6.0;
    pub const VERTICAL_SPACING_EXPANDED: f64 = 8.0;

    /// Bar group, populated the first time bars mode is selected
    pub const BAR_MAX_HEIGHT_PERCENT: f64 = 0.9;
    pub const BAR_MIN_HEIGHT_PERCENT: f64 = 0.25;
    pub const BAR_CORNER_RADIUS: f64 = 4.0;
    pub const BAR_SPACING: f64 = 3.0;
}

/// Limits enforced when a persisted style is loaded
pub mod validation {
    /// Exclusive upper bound of the per-side horizontal inset
    pub const HORIZONTAL_PADDING_PERCENT_LIMIT: f64 = 0.5;
}

/// Host refresh cadence used by the `watch` command
pub mod refresh {
    /// Live preview interval in seconds
    pub const PREVIEW_INTERVAL_SECS: u64 = 1;
}

/// Default canvas used by `render` when no bounds are given
pub mod canvas {
    pub const DEFAULT_WIDTH: f64 = 170.0;
    pub const DEFAULT_HEIGHT: f64 = 170.0;
}
