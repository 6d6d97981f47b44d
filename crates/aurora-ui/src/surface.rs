//! The drawing surface seam: elements, cards and menus as the device UI
//! toolkit understands them.

use thiserror::Error;

/// Opaque id of an element attached to the window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementHandle(pub u64);

impl std::fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Screen position or size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Vec2 {
    pub x: i32,
    pub y: i32,
}

impl Vec2 {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Colour token. The feed names severity colours ("green", "orange", ...)
/// which are passed through to the toolkit as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Colour {
    Black,
    White,
    Token(String),
}

impl Colour {
    /// Map a feed colour name to a token; empty names draw white.
    pub fn from_token(token: &str) -> Self {
        match token.trim().to_ascii_lowercase().as_str() {
            "" | "white" => Colour::White,
            "black" => Colour::Black,
            other => Colour::Token(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Colour::Black => "black",
            Colour::White => "white",
            Colour::Token(name) => name,
        }
    }
}

/// The face only draws left-aligned text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
}

/// Text wider than its element is cut with an ellipsis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextOverflow {
    Ellipsis,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextElement {
    pub position: Vec2,
    pub size: Vec2,
    pub text: String,
    pub font: &'static str,
    pub align: TextAlign,
    pub overflow: TextOverflow,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RectElement {
    pub position: Vec2,
    pub size: Vec2,
    pub background: Colour,
    pub border: Option<Colour>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageElement {
    pub position: Vec2,
    pub size: Vec2,
    pub image: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Text(TextElement),
    Rect(RectElement),
    Image(ImageElement),
}

impl Element {
    pub fn size(&self) -> Vec2 {
        match self {
            Element::Text(t) => t.size,
            Element::Rect(r) => r.size,
            Element::Image(i) => i.size,
        }
    }

    pub fn position(&self) -> Vec2 {
        match self {
            Element::Text(t) => t.position,
            Element::Rect(r) => r.position,
            Element::Image(i) => i.position,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CardStyle {
    #[default]
    Large,
    Small,
}

/// A full-screen, optionally scrollable text card
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Card {
    pub title: String,
    pub subtitle: Option<String>,
    pub body: String,
    pub scrollable: bool,
    pub style: CardStyle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MenuStyle {
    pub background: Colour,
    pub text: Colour,
    pub highlight_background: Colour,
    pub highlight_text: Colour,
}

impl MenuStyle {
    /// White on black, inverted when highlighted
    pub fn inverted() -> Self {
        Self {
            background: Colour::Black,
            text: Colour::White,
            highlight_background: Colour::White,
            highlight_text: Colour::Black,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MenuItem {
    pub title: String,
    pub subtitle: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MenuSection {
    pub title: Option<String>,
    pub items: Vec<MenuItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Menu {
    pub style: MenuStyle,
    pub sections: Vec<MenuSection>,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SurfaceError {
    #[error("element {0} is not attached to the window")]
    StaleHandle(ElementHandle),

    #[error("element {handle} does not support {operation}")]
    Unsupported {
        handle: ElementHandle,
        operation: &'static str,
    },
}

/// The device UI toolkit as consumed by the renderers.
pub trait Surface {
    /// Attach a new element to the window.
    fn add(&mut self, element: Element) -> ElementHandle;

    fn set_text(&mut self, handle: ElementHandle, text: &str) -> Result<(), SurfaceError>;

    fn set_size(&mut self, handle: ElementHandle, size: Vec2) -> Result<(), SurfaceError>;

    /// Detach an element from the window.
    fn remove(&mut self, handle: ElementHandle) -> Result<(), SurfaceError>;

    fn show_card(&mut self, card: Card);

    fn show_menu(&mut self, menu: Menu);

    fn hide_menu(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colour_tokens() {
        assert_eq!(Colour::from_token(""), Colour::White);
        assert_eq!(Colour::from_token("Black"), Colour::Black);
        assert_eq!(Colour::from_token(" orange "), Colour::Token("orange".into()));
        assert_eq!(Colour::from_token("red").as_str(), "red");
    }
}
