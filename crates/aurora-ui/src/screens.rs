//! The splash and the main watch face.

use aurora_api::time::{hours_minutes, parse_timestamp};
use aurora_api::{DataSnapshot, Reading};
use chrono::FixedOffset;

use crate::error::RenderError;
use crate::registry::{ElementKind, ViewRegistry};
use crate::surface::{Colour, Element, ImageElement, Surface, Vec2};
use crate::widgets::{render_gauge, render_text, GaugeSpec};

pub const SPLASH_ID: &str = "splash";
pub const SPLASH_IMAGE: &str = "images/logo-144.png";

const MARGIN: i32 = 10;
/// Gauges are inset this far from each screen edge.
const GAUGE_INSET: i32 = 8;

/// Screen geometry the main face is laid out against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenLayout {
    pub width: i32,
    pub height: i32,
}

impl ScreenLayout {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: i32::try_from(width).unwrap_or(i32::MAX),
            height: i32::try_from(height).unwrap_or(i32::MAX),
        }
    }

    fn gauge_width(&self) -> i32 {
        (self.width - 2 * GAUGE_INSET).max(0)
    }
}

impl Default for ScreenLayout {
    fn default() -> Self {
        Self::new(144, 168)
    }
}

pub fn show_splash<S>(
    registry: &mut ViewRegistry,
    surface: &mut S,
    layout: &ScreenLayout,
) -> Result<(), RenderError>
where
    S: Surface + ?Sized,
{
    registry.get_or_create(SPLASH_ID, ElementKind::Image, surface, || {
        Element::Image(ImageElement {
            position: Vec2::new(0, 0),
            size: Vec2::new(layout.width, layout.height),
            image: SPLASH_IMAGE.to_string(),
        })
    })?;
    Ok(())
}

/// Remove the splash if it is still showing. Safe to call on every refresh.
pub fn clear_splash<S>(registry: &mut ViewRegistry, surface: &mut S) -> Result<bool, RenderError>
where
    S: Surface + ?Sized,
{
    registry.remove(SPLASH_ID, surface)
}

/// `HH:MM` of an API timestamp in `zone`, or `--:--` when it can't be read.
pub fn clock_or_placeholder(raw: &str, zone: &FixedOffset) -> String {
    parse_timestamp(raw)
        .map(|dt| hours_minutes(&dt, zone))
        .unwrap_or_else(|| "--:--".to_string())
}

/// Gauge input for a reading; unreadable values sit at the gauge minimum.
fn gauge_value(reading: &Reading) -> f64 {
    reading.whole().unwrap_or(f64::NAN)
}

/// Bz is drawn inverted and shifted so southward (negative) Bz fills the bar.
fn bz_gauge_value(bz: &Reading) -> f64 {
    bz.whole().map(|v| 20.0 - v).unwrap_or(f64::NAN)
}

pub fn kp_line(snapshot: &DataSnapshot) -> String {
    format!("Kp / 1hr: {} / {}", snapshot.ace.kp, snapshot.ace.kp1hour)
}

pub fn probability_line(snapshot: &DataSnapshot) -> String {
    format!(
        "Prob. / High.: {}% / {}%",
        snapshot.probability.calculated.value, snapshot.probability.highest.value
    )
}

pub fn retrieved_line(snapshot: &DataSnapshot, zone: &FixedOffset) -> String {
    format!("Retrieved: {}", clock_or_placeholder(&snapshot.ace.date, zone))
}

/// Gauge specs of the main face, keyed by registry id.
pub fn main_gauges(snapshot: &DataSnapshot, layout: &ScreenLayout) -> [(&'static str, GaugeSpec); 3] {
    let width = layout.gauge_width();
    let ace = &snapshot.ace;
    [
        (
            "bz",
            GaugeSpec {
                value: bz_gauge_value(&ace.bz),
                width,
                min: 0.0,
                max: 40.0,
                position: Vec2::new(MARGIN, 60),
                label: "Bz".into(),
                colour: Colour::from_token(&ace.colour.bz),
            },
        ),
        (
            "speed",
            GaugeSpec {
                value: gauge_value(&ace.speed),
                width,
                min: 200.0,
                max: 1000.0,
                position: Vec2::new(MARGIN, 80),
                label: "Spd.".into(),
                colour: Colour::from_token(&ace.colour.speed),
            },
        ),
        (
            "density",
            GaugeSpec {
                value: gauge_value(&ace.density),
                width,
                min: 0.0,
                max: 20.0,
                position: Vec2::new(MARGIN, 100),
                label: "Den.".into(),
                colour: Colour::from_token(&ace.colour.density),
            },
        ),
    ]
}

/// Draw or update the main face from a snapshot.
pub fn render_main_screen<S>(
    registry: &mut ViewRegistry,
    surface: &mut S,
    snapshot: &DataSnapshot,
    layout: &ScreenLayout,
    zone: &FixedOffset,
) -> Result<(), RenderError>
where
    S: Surface + ?Sized,
{
    tracing::debug!("Showing data");

    render_text(registry, surface, "kp", &kp_line(snapshot), layout.width, Vec2::new(MARGIN, 10))?;
    render_text(
        registry,
        surface,
        "probability",
        &probability_line(snapshot),
        layout.width,
        Vec2::new(MARGIN, 30),
    )?;
    render_text(
        registry,
        surface,
        "retrieved",
        &retrieved_line(snapshot, zone),
        layout.width,
        Vec2::new(MARGIN, 130),
    )?;

    for (id, spec) in main_gauges(snapshot, layout) {
        render_gauge(registry, surface, id, &spec)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessSurface;

    fn snapshot(json: serde_json::Value) -> DataSnapshot {
        serde_json::from_value(json).unwrap()
    }

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    #[test]
    fn test_default_gauge_width() {
        assert_eq!(ScreenLayout::default().gauge_width(), 128);
    }

    #[test]
    fn test_bz_is_inverted_and_shifted() {
        assert_eq!(bz_gauge_value(&Reading::from(-5.0)), 25.0);
        assert_eq!(bz_gauge_value(&Reading::from("-5.9")), 25.0);
        assert_eq!(bz_gauge_value(&Reading::from("3.2")), 17.0);
        assert!(bz_gauge_value(&Reading::default()).is_nan());
        assert_eq!(bz_gauge_value(&Reading::from("-1e30")), 1e30);
    }

    #[test]
    fn test_extreme_bz_renders_at_gauge_bounds() {
        let mut registry = ViewRegistry::new();
        let mut surface = HeadlessSurface::new();
        let layout = ScreenLayout::default();

        for (bz, bar) in [("-1e30", 86), ("1e30", 1)] {
            let s = snapshot(serde_json::json!({"ace": {"bz": bz, "speed": 400, "density": 3}}));
            render_main_screen(&mut registry, &mut surface, &s, &layout, &utc()).unwrap();

            let fill = registry.get("bz_fill").unwrap().handle;
            assert_eq!(surface.element(fill).unwrap().size().x, (bar - 4).max(0));
        }
    }

    #[test]
    fn test_lines() {
        let s = snapshot(serde_json::json!({
            "ace": {"kp": 4, "kp1hour": "4.33", "date": "2024-01-01T09:07:00Z"},
            "probability": {"calculated": {"value": 10}, "highest": {"value": 20}}
        }));
        assert_eq!(kp_line(&s), "Kp / 1hr: 4 / 4.33");
        assert_eq!(probability_line(&s), "Prob. / High.: 10% / 20%");
        assert_eq!(retrieved_line(&s, &utc()), "Retrieved: 09:07");
    }

    #[test]
    fn test_unreadable_date_shows_placeholder() {
        let s = snapshot(serde_json::json!({"ace": {"date": "soon"}}));
        assert_eq!(retrieved_line(&s, &utc()), "Retrieved: --:--");
    }

    #[test]
    fn test_main_screen_twice_creates_one_set() {
        let mut registry = ViewRegistry::new();
        let mut surface = HeadlessSurface::new();
        let layout = ScreenLayout::default();

        let first = snapshot(serde_json::json!({
            "ace": {"kp": 2, "kp1hour": 3, "bz": 1, "speed": 350, "density": 2,
                    "date": "2024-01-01T00:00:00Z"}
        }));
        let second = snapshot(serde_json::json!({
            "ace": {"kp": 5, "kp1hour": 6, "bz": -12, "speed": 700, "density": 9,
                    "date": "2024-01-01T00:01:00Z"}
        }));

        render_main_screen(&mut registry, &mut surface, &first, &layout, &utc()).unwrap();
        let after_first = surface.created_count();
        render_main_screen(&mut registry, &mut surface, &second, &layout, &utc()).unwrap();

        // 3 texts + 3 gauges of 3 elements each
        assert_eq!(after_first, 12);
        assert_eq!(surface.created_count(), 12);
        assert!(surface.contains_text("Kp / 1hr: 5 / 6"));
        assert!(surface.contains_text("Retrieved: 00:01"));
    }

    #[test]
    fn test_splash_lifecycle() {
        let mut registry = ViewRegistry::new();
        let mut surface = HeadlessSurface::new();

        show_splash(&mut registry, &mut surface, &ScreenLayout::default()).unwrap();
        assert_eq!(surface.live_count(), 1);

        assert!(clear_splash(&mut registry, &mut surface).unwrap());
        assert!(!clear_splash(&mut registry, &mut surface).unwrap());
        assert_eq!(surface.live_count(), 0);
    }
}
