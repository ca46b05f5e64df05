//! Rendering module
//!
//! Themes and HUD helpers are platform-free; the Canvas 2D painter is
//! browser-only.

pub mod theme;

#[cfg(target_arch = "wasm32")]
pub mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;
pub use theme::{THEMES, Theme, theme_for_level};
