//! Editing surface for one display size
//!
//! Holds the in-memory copy, saves on every change and tells listeners
//! (renderers, refresh loops) that the style for a size was replaced.

use std::sync::mpsc::Sender;
use tracing::{debug, error, info};

use super::{StyleBackend, StyleStore};
use crate::style::{DisplaySize, RepresentationMode, StyleConfig, default_style};

/// Sent after a style was saved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleChanged {
    pub size: DisplaySize,
}

pub struct StyleEditor<'a, B> {
    store: &'a StyleStore<B>,
    size: DisplaySize,
    style: StyleConfig,
    notifier: Option<Sender<StyleChanged>>,
}

impl<'a, B: StyleBackend> StyleEditor<'a, B> {
    pub fn open(store: &'a StyleStore<B>, size: DisplaySize) -> Self {
        let style = store.load(size);
        Self { store, size, style, notifier: None }
    }

    pub fn with_notifier(mut self, sender: Sender<StyleChanged>) -> Self {
        self.notifier = Some(sender);
        self
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    /// Apply `edit`, then save and notify if anything changed.
    /// Returns whether the style changed.
    pub fn update<F>(&mut self, edit: F) -> bool
    where
        F: FnOnce(&mut StyleConfig),
    {
        let mut next = self.style.clone();
        edit(&mut next);
        next.ensure_bar_defaults();
        if next == self.style {
            debug!(size = %self.size, "Edit left style unchanged");
            return false;
        }
        self.style = next;
        self.store.save(self.size, &self.style);
        self.notify();
        true
    }

    pub fn set_representation(&mut self, mode: RepresentationMode) -> bool {
        self.update(|style| style.set_representation(mode))
    }

    /// Drop the saved record and go back to the defaults for this size.
    /// When the record cannot be removed the current style is kept.
    pub fn reset(&mut self) -> bool {
        if let Err(e) = self.store.reset(self.size) {
            error!(size = %self.size, error = %e, "Failed to remove saved style");
            return false;
        }
        self.style = default_style(self.size);
        info!(size = %self.size, "Style reset to defaults");
        self.notify();
        true
    }

    pub fn into_style(self) -> StyleConfig {
        self.style
    }

    fn notify(&self) {
        if let Some(sender) = &self.notifier
            && sender.send(StyleChanged { size: self.size }).is_err()
        {
            debug!(size = %self.size, "Style listener gone");
        }
    }
}
