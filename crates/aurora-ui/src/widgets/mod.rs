//! Reusable, registry-backed screen primitives.

pub mod gauge;
pub mod text;

pub use gauge::{render_gauge, GaugeSpec};
pub use text::render_text;

/// Height of one text row or gauge
pub const ROW_HEIGHT: i32 = 15;

pub const FONT: &str = "gothic-14";
