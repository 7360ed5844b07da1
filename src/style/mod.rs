//! Style configuration model
//!
//! - **types**: closed variants (display size, representation, marker shape)
//! - **config**: the persisted [`StyleConfig`] record with per-size defaults

pub mod config;
pub mod types;

pub use config::{BarStyle, StyleConfig, default_style, ensure_bar_defaults};
pub use types::{DisplaySize, MarkerShape, RepresentationMode};
