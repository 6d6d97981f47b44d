//! In-memory surface: keeps the element tree, the shown cards and menus, and
//! logs every change. Backs the binary and the tests.

use std::collections::BTreeMap;

use crate::surface::{Card, Element, ElementHandle, Menu, Surface, SurfaceError, Vec2};

/// How many shown cards and menus are remembered.
pub const HISTORY_LIMIT: usize = 16;

fn push_capped<T>(history: &mut Vec<T>, item: T) {
    if history.len() >= HISTORY_LIMIT {
        history.remove(0);
    }
    history.push(item);
}

#[derive(Debug, Default)]
pub struct HeadlessSurface {
    next_handle: u64,
    elements: BTreeMap<ElementHandle, Element>,
    created: usize,
    cards: Vec<Card>,
    menus: Vec<Menu>,
    menu_open: bool,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn element(&self, handle: ElementHandle) -> Option<&Element> {
        self.elements.get(&handle)
    }

    /// Elements currently attached to the window
    pub fn live_count(&self) -> usize {
        self.elements.len()
    }

    /// Elements ever attached, including removed ones
    pub fn created_count(&self) -> usize {
        self.created
    }

    /// Text of every text element, top to bottom then left to right
    pub fn texts(&self) -> Vec<String> {
        let mut texts: Vec<(Vec2, String)> = self
            .elements
            .values()
            .filter_map(|e| match e {
                Element::Text(t) => Some((t.position, t.text.clone())),
                _ => None,
            })
            .collect();
        texts.sort_by_key(|(pos, _)| (pos.y, pos.x));
        texts.into_iter().map(|(_, text)| text).collect()
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().iter().any(|t| t == needle)
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn last_card(&self) -> Option<&Card> {
        self.cards.last()
    }

    pub fn menus(&self) -> &[Menu] {
        &self.menus
    }

    pub fn last_menu(&self) -> Option<&Menu> {
        self.menus.last()
    }

    pub fn is_menu_open(&self) -> bool {
        self.menu_open
    }

    fn element_mut(&mut self, handle: ElementHandle) -> Result<&mut Element, SurfaceError> {
        self.elements
            .get_mut(&handle)
            .ok_or(SurfaceError::StaleHandle(handle))
    }
}

impl Surface for HeadlessSurface {
    fn add(&mut self, element: Element) -> ElementHandle {
        self.next_handle += 1;
        let handle = ElementHandle(self.next_handle);
        tracing::debug!("add {} {:?}", handle, element);
        self.elements.insert(handle, element);
        self.created += 1;
        handle
    }

    fn set_text(&mut self, handle: ElementHandle, text: &str) -> Result<(), SurfaceError> {
        match self.element_mut(handle)? {
            Element::Text(t) => {
                if t.text != text {
                    tracing::info!("{} text: {}", handle, text);
                }
                t.text = text.to_string();
                Ok(())
            }
            _ => Err(SurfaceError::Unsupported {
                handle,
                operation: "set_text",
            }),
        }
    }

    fn set_size(&mut self, handle: ElementHandle, size: Vec2) -> Result<(), SurfaceError> {
        match self.element_mut(handle)? {
            Element::Rect(r) => r.size = size,
            Element::Text(t) => t.size = size,
            Element::Image(i) => i.size = size,
        }
        tracing::debug!("{} size: {}x{}", handle, size.x, size.y);
        Ok(())
    }

    fn remove(&mut self, handle: ElementHandle) -> Result<(), SurfaceError> {
        self.elements
            .remove(&handle)
            .map(|_| tracing::debug!("remove {}", handle))
            .ok_or(SurfaceError::StaleHandle(handle))
    }

    fn show_card(&mut self, card: Card) {
        tracing::info!("card '{}':\n{}", card.title, card.body);
        push_capped(&mut self.cards, card);
    }

    fn show_menu(&mut self, menu: Menu) {
        for section in &menu.sections {
            if let Some(title) = &section.title {
                tracing::info!("menu section: {}", title);
            }
            for item in &section.items {
                tracing::info!("  menu item: {}", item.title);
            }
        }
        push_capped(&mut self.menus, menu);
        self.menu_open = true;
    }

    fn hide_menu(&mut self) {
        self.menu_open = false;
    }
}
