//! Rendering functions for the TUI.
//!
//! This module contains all UI rendering logic, organized by view type.

mod hint;
mod overlay;

pub use hint::render_hint;
pub use overlay::render_overlay;

use crate::overlay::Overlay;
use ratatui::{Frame, layout::Rect};

/// Key labels shown on screen.
#[derive(Debug, Clone)]
pub struct Hints {
    pub toggle: String,
    pub quit: String,
}

/// Draw the whole screen. Returns the area of the results list while the
/// overlay is open.
pub fn ui(f: &mut Frame, overlay: &Overlay, hints: &Hints) -> Option<Rect> {
    if overlay.is_visible() {
        Some(render_overlay(f, overlay))
    } else {
        render_hint(f, hints);
        None
    }
}
