//! Watch-face rendering and the refresh loop.
//!
//! Renderers draw through the `Surface` seam and keep their elements in a
//! `ViewRegistry`, so each refresh updates elements in place instead of
//! rebuilding the screen.

pub mod app;
pub mod cards;
pub mod controller;
pub mod error;
pub mod error_mapping;
pub mod headless;
pub mod menu;
pub mod registry;
pub mod screens;
pub mod surface;
pub mod widgets;

pub use app::{App, AppCommand, AppEvent};
pub use controller::{RefreshController, RefreshOutcome, RefreshReport, RefreshState, RefreshTrigger};
pub use error::{RefreshError, RenderError};
pub use headless::HeadlessSurface;
pub use menu::{MenuAction, MenuOutcome};
pub use registry::{ElementKind, ViewRegistry};
pub use surface::{Card, Colour, Element, ElementHandle, Menu, Surface, SurfaceError, Vec2};
