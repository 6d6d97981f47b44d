use crate::error::RenderError;
use crate::registry::{ElementKind, ViewRegistry};
use crate::surface::{Element, Surface, TextAlign, TextElement, TextOverflow, Vec2};
use crate::widgets::{FONT, ROW_HEIGHT};

/// Draw a single line of text under `id`, or replace its text if it already
/// exists. Position and width are fixed at creation.
pub fn render_text<S>(
    registry: &mut ViewRegistry,
    surface: &mut S,
    id: &str,
    text: &str,
    width: i32,
    position: Vec2,
) -> Result<(), RenderError>
where
    S: Surface + ?Sized,
{
    if registry.contains(id) {
        return registry.update(id, ElementKind::Text, surface, |s, h| s.set_text(h, text));
    }

    registry.get_or_create(id, ElementKind::Text, surface, || {
        Element::Text(TextElement {
            position,
            size: Vec2::new(width, ROW_HEIGHT),
            text: text.to_string(),
            font: FONT,
            align: TextAlign::Left,
            overflow: TextOverflow::Ellipsis,
        })
    })?;
    Ok(())
}
