//! TUI widgets for speedy-tui.
//!
//! # Widgets in Use
//!
//! - [`result_line`] - One row of the results list
//!
//! # Utilities
//!
//! - [`kind_glyph`] - Result kind to display glyph
//! - [`score_label`] - Optional score to a percentage label

mod result;

pub use result::{kind_glyph, result_line, score_label};
