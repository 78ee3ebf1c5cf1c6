//! Terminal search overlay for the Speedy launcher.
//!
//! The [`overlay::Overlay`] controller owns all overlay state. Keys reach it
//! through a [`shortcut::KeyBus`] that claims the global shortcuts first;
//! activations are routed to the shell by [`dispatch`], and [`render`]
//! draws the current state with ratatui.

mod colors;

pub mod dispatch;
pub mod overlay;
pub mod render;
pub mod shortcut;
pub mod widgets;
