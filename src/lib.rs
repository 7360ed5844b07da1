//! Binary clock core
//!
//! Converts wall-clock time into 4×4 binary digit matrices and resolves the
//! per-size style used to draw them.
//!
//! - **converter**: instant + zone → [`converter::DigitMatrix`]
//! - **style**: [`style::StyleConfig`] record, defaults and bar resolution
//! - **store**: per-size persistence with fallback to defaults
//! - **summary**: accessibility label derived from the matrices
//! - **render**: matrices + style → drawing primitives

#![forbid(unsafe_code)]

pub mod color;
pub mod constants;
pub mod converter;
pub mod error;
pub mod render;
pub mod store;
pub mod style;
pub mod summary;

pub use color::RgbaColor;
pub use converter::{
    ClockReading, DigitColumn, DigitMatrix, date_to_digit_matrix, digit_to_binary,
    time_to_digit_matrix,
};
pub use error::{ConvertError, StoreError, StyleError};
pub use store::{FileBackend, MemoryBackend, StyleBackend, StyleEditor, StyleStore};
pub use style::{
    BarStyle, DisplaySize, MarkerShape, RepresentationMode, StyleConfig, default_style,
    ensure_bar_defaults,
};
pub use summary::accessibility_label;
