//! Labelled horizontal gauge: a label in the left third, a bordered track in
//! the right two-thirds, and a coloured fill sized by the value.

use crate::error::RenderError;
use crate::registry::{ElementKind, ViewRegistry};
use crate::surface::{Colour, Element, RectElement, Surface, TextAlign, TextElement, TextOverflow, Vec2};
use crate::widgets::{FONT, ROW_HEIGHT};

pub const BORDER: i32 = 4;
pub const MIN_BAR_WIDTH: i32 = 1;

#[derive(Debug, Clone, PartialEq)]
pub struct GaugeSpec {
    pub value: f64,
    pub width: i32,
    pub min: f64,
    pub max: f64,
    pub position: Vec2,
    pub label: String,
    pub colour: Colour,
}

/// Constrain `value` to `[min, max]`. NaN reads as `min`.
pub fn clamp_value(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        min
    } else if value > max {
        max
    } else if value < min {
        min
    } else {
        value
    }
}

/// Width of the filled bar in pixels.
///
/// The value is normalised by `min + max`, not by the range. Gauge
/// calibration on the watch depends on this exact arithmetic.
pub fn bar_width(value: f64, width: i32, min: f64, max: f64) -> i32 {
    let value = clamp_value(value, min, max);
    let divisor = min + max;
    if divisor == 0.0 {
        return MIN_BAR_WIDTH;
    }

    let track = 2.0 / 3.0 * f64::from(width);
    let bar = (track * (value / divisor * 100.0) / 100.0).ceil();

    if bar.is_finite() && bar >= f64::from(MIN_BAR_WIDTH) {
        bar as i32
    } else {
        MIN_BAR_WIDTH
    }
}

/// Size of the fill rectangle for a bar width; never negative.
pub fn fill_size(bar: i32) -> Vec2 {
    Vec2::new((bar - BORDER).max(0), ROW_HEIGHT - BORDER)
}

pub fn label_id(id: &str) -> String {
    format!("{}_label", id)
}

pub fn track_id(id: &str) -> String {
    format!("{}_track", id)
}

pub fn fill_id(id: &str) -> String {
    format!("{}_fill", id)
}

/// Draw or update the gauge registered under `id`. Returns the bar width.
///
/// Only the fill is touched once the gauge exists; label and track are
/// fixed at creation.
pub fn render_gauge<S>(
    registry: &mut ViewRegistry,
    surface: &mut S,
    id: &str,
    spec: &GaugeSpec,
) -> Result<i32, RenderError>
where
    S: Surface + ?Sized,
{
    let bar = bar_width(spec.value, spec.width, spec.min, spec.max);
    tracing::debug!("{} - {}", spec.label, bar);

    let fill = fill_id(id);
    if registry.contains(&fill) {
        let size = fill_size(bar);
        registry.update(&fill, ElementKind::GaugeFill, surface, |s, h| {
            s.set_size(h, size)
        })?;
        return Ok(bar);
    }

    let Vec2 { x, y } = spec.position;
    let third = spec.width / 3;
    let track_width = 2 * spec.width / 3;

    registry.get_or_create(&label_id(id), ElementKind::GaugeLabel, surface, || {
        Element::Text(TextElement {
            position: Vec2::new(x, y),
            size: Vec2::new(third, ROW_HEIGHT),
            text: spec.label.clone(),
            font: FONT,
            align: TextAlign::Left,
            overflow: TextOverflow::Ellipsis,
        })
    })?;

    registry.get_or_create(&track_id(id), ElementKind::GaugeTrack, surface, || {
        Element::Rect(RectElement {
            position: Vec2::new(x + third, y),
            size: Vec2::new(track_width, ROW_HEIGHT),
            background: Colour::Black,
            border: Some(Colour::White),
        })
    })?;

    registry.get_or_create(&fill, ElementKind::GaugeFill, surface, || {
        Element::Rect(RectElement {
            position: Vec2::new(x + third + BORDER / 2, y + BORDER / 2),
            size: fill_size(bar),
            background: spec.colour.clone(),
            border: None,
        })
    })?;

    Ok(bar)
}
