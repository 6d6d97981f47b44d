//! Identifier-keyed element registry.
//!
//! An id is created at most once per window; every later render with the
//! same id updates the stored element in place.

use std::collections::HashMap;

use crate::error::RenderError;
use crate::surface::{Element, ElementHandle, Surface, SurfaceError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Text,
    GaugeLabel,
    GaugeTrack,
    GaugeFill,
    Image,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryEntry {
    pub handle: ElementHandle,
    pub kind: ElementKind,
}

#[derive(Debug, Default)]
pub struct ViewRegistry {
    entries: HashMap<String, RegistryEntry>,
}

impl ViewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<RegistryEntry> {
        self.entries.get(id).copied()
    }

    pub fn kind(&self, id: &str) -> Option<ElementKind> {
        self.entries.get(id).map(|e| e.kind)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Return the element stored under `id`, building and attaching it with
    /// `factory` only when the id is new.
    pub fn get_or_create<S, F>(
        &mut self,
        id: &str,
        kind: ElementKind,
        surface: &mut S,
        factory: F,
    ) -> Result<ElementHandle, RenderError>
    where
        S: Surface + ?Sized,
        F: FnOnce() -> Element,
    {
        if let Some(entry) = self.entries.get(id) {
            check_kind(id, kind, entry.kind)?;
            return Ok(entry.handle);
        }

        let handle = surface.add(factory());
        tracing::debug!("registered '{}' as {:?} ({})", id, kind, handle);
        self.entries
            .insert(id.to_string(), RegistryEntry { handle, kind });
        Ok(handle)
    }

    /// Apply `mutation` to the element stored under `id`.
    ///
    /// Unknown ids are an error, never an implicit create.
    pub fn update<S, F>(
        &self,
        id: &str,
        kind: ElementKind,
        surface: &mut S,
        mutation: F,
    ) -> Result<(), RenderError>
    where
        S: Surface + ?Sized,
        F: FnOnce(&mut S, ElementHandle) -> Result<(), SurfaceError>,
    {
        let entry = self
            .entries
            .get(id)
            .ok_or_else(|| RenderError::UnknownElement(id.to_string()))?;
        check_kind(id, kind, entry.kind)?;
        mutation(surface, entry.handle)?;
        Ok(())
    }

    /// Detach and forget `id`. Returns `false` when nothing was registered.
    /// A failed detach leaves the entry in place.
    pub fn remove<S>(&mut self, id: &str, surface: &mut S) -> Result<bool, RenderError>
    where
        S: Surface + ?Sized,
    {
        let Some(entry) = self.entries.get(id) else {
            return Ok(false);
        };

        // Forget the id only once the element is really gone.
        surface.remove(entry.handle)?;
        self.entries.remove(id);
        tracing::debug!("removed '{}'", id);
        Ok(true)
    }
}

fn check_kind(id: &str, expected: ElementKind, found: ElementKind) -> Result<(), RenderError> {
    if expected == found {
        Ok(())
    } else {
        Err(RenderError::KindMismatch {
            id: id.to_string(),
            expected,
            found,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessSurface;
    use crate::surface::{ImageElement, Vec2};

    fn image() -> Element {
        Element::Image(ImageElement {
            position: Vec2::default(),
            size: Vec2::new(144, 168),
            image: "images/logo-144.png".into(),
        })
    }

    #[test]
    fn test_factory_runs_once() {
        let mut registry = ViewRegistry::new();
        let mut surface = HeadlessSurface::new();
        let mut calls = 0;

        let first = registry
            .get_or_create("splash", ElementKind::Image, &mut surface, || {
                calls += 1;
                image()
            })
            .unwrap();
        let second = registry
            .get_or_create("splash", ElementKind::Image, &mut surface, || {
                calls += 1;
                image()
            })
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(calls, 1);
        assert_eq!(surface.created_count(), 1);
    }

    #[test]
    fn test_update_unknown_id_is_error() {
        let registry = ViewRegistry::new();
        let mut surface = HeadlessSurface::new();

        let err = registry
            .update("missing", ElementKind::Text, &mut surface, |s, h| {
                s.set_text(h, "x")
            })
            .unwrap_err();

        assert!(matches!(err, RenderError::UnknownElement(id) if id == "missing"));
        assert_eq!(surface.created_count(), 0);
    }

    #[test]
    fn test_kind_mismatch() {
        let mut registry = ViewRegistry::new();
        let mut surface = HeadlessSurface::new();
        registry
            .get_or_create("splash", ElementKind::Image, &mut surface, image)
            .unwrap();

        let err = registry
            .get_or_create("splash", ElementKind::Text, &mut surface, image)
            .unwrap_err();
        assert!(matches!(err, RenderError::KindMismatch { .. }));
    }

    #[test]
    fn test_failed_detach_keeps_entry() {
        let mut registry = ViewRegistry::new();
        let mut surface = HeadlessSurface::new();
        let handle = registry
            .get_or_create("splash", ElementKind::Image, &mut surface, image)
            .unwrap();

        // detached behind the registry's back
        surface.remove(handle).unwrap();

        let err = registry.remove("splash", &mut surface).unwrap_err();
        assert!(matches!(err, RenderError::Surface(SurfaceError::StaleHandle(h)) if h == handle));
        assert!(registry.contains("splash"));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut registry = ViewRegistry::new();
        let mut surface = HeadlessSurface::new();
        registry
            .get_or_create("splash", ElementKind::Image, &mut surface, image)
            .unwrap();

        assert!(registry.remove("splash", &mut surface).unwrap());
        assert!(!registry.remove("splash", &mut surface).unwrap());
        assert!(registry.is_empty());
        assert_eq!(surface.live_count(), 0);
    }
}
