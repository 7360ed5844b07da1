//! Per-size style persistence
//!
//! [`StyleStore`] wraps a raw [`StyleBackend`] with the fallback policy:
//! a missing, malformed or unreachable record always resolves to the
//! default style for that size, and failed writes are logged, never raised.

use tracing::{debug, error, info, warn};

mod backend;
mod editor;

pub use backend::{FileBackend, MemoryBackend, StyleBackend, resolve_store_dir};
pub use editor::{StyleChanged, StyleEditor};

use crate::error::StoreError;
use crate::style::{DisplaySize, StyleConfig, default_style};

pub struct StyleStore<B> {
    backend: B,
}

impl<B: StyleBackend> StyleStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Saved style for `size`, or its default when none can be used
    pub fn load(&self, size: DisplaySize) -> StyleConfig {
        let key = size.style_key();
        let bytes = match self.backend.read(&key) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                debug!(size = %size, "No saved style, using default");
                return default_style(size);
            }
            Err(e) => {
                error!(size = %size, key = %key, error = %e, "Style store unavailable, using default");
                return default_style(size);
            }
        };

        match StyleConfig::decode(&bytes) {
            Ok(mut style) => {
                let corrected = style.validate_and_clamp();
                if !corrected.is_empty() {
                    info!(size = %size, fields = ?corrected, "Corrected out-of-range style values");
                }
                style.ensure_bar_defaults();
                style
            }
            Err(e) => {
                warn!(size = %size, key = %key, error = %e, "Failed to decode saved style, using default");
                default_style(size)
            }
        }
    }

    /// Persist `style` for `size`; failures are logged and swallowed
    pub fn save(&self, size: DisplaySize, style: &StyleConfig) {
        if let Err(e) = self.try_save(size, style) {
            error!(size = %size, error = %e, "Failed to save style");
        }
    }

    pub fn try_save(&self, size: DisplaySize, style: &StyleConfig) -> Result<(), StoreError> {
        let bytes = style.encode()?;
        self.backend.write(&size.style_key(), &bytes)
    }

    /// Forget the saved style so the next load returns defaults
    pub fn reset(&self, size: DisplaySize) -> Result<(), StoreError> {
        self.backend.remove(&size.style_key())
    }
}
