//! Text surface access
//!
//! The host owns the editable surface. The engine only sees it through
//! [`TextSurface`], looked up by identifier through a [`SurfaceProvider`];
//! a failed lookup is an `Option::None`, never an error.

use std::collections::HashMap;

/// An editable plain-text surface (a textarea, a text widget, ...)
pub trait TextSurface {
    /// Current raw value
    fn value(&self) -> String;

    /// Selection offsets in Unicode scalar values, `None` if they cannot be
    /// read. Hosts that track UTF-16 code units (a DOM textarea, for one)
    /// must convert before returning them, and convert back in
    /// [`TextSurface::set_selection_range`].
    fn selection_range(&self) -> Option<(usize, usize)>;

    /// Whether the surface currently has input focus
    fn is_focused(&self) -> bool;

    fn focus(&mut self);

    fn set_value(&mut self, value: &str);

    fn set_selection_range(&mut self, start: usize, end: usize);
}

/// Resolves surface identifiers to live surfaces
pub trait SurfaceProvider {
    fn surface(&mut self, id: &str) -> Option<&mut dyn TextSurface>;
}

/// In-memory surface, for headless hosts and tests
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemorySurface {
    value: String,
    selection: (usize, usize),
    focused: bool,
}

impl MemorySurface {
    pub fn new(value: &str) -> Self {
        Self {
            value: value.to_string(),
            selection: (0, 0),
            focused: false,
        }
    }

    /// Builder-style selection setter
    pub fn with_selection(mut self, start: usize, end: usize) -> Self {
        self.selection = (start, end);
        self
    }

    /// Builder-style focus setter
    pub fn focused(mut self) -> Self {
        self.focused = true;
        self
    }

    pub fn blur(&mut self) {
        self.focused = false;
    }

    pub fn selection(&self) -> (usize, usize) {
        self.selection
    }
}

impl TextSurface for MemorySurface {
    fn value(&self) -> String {
        self.value.clone()
    }

    fn selection_range(&self) -> Option<(usize, usize)> {
        Some(self.selection)
    }

    fn is_focused(&self) -> bool {
        self.focused
    }

    fn focus(&mut self) {
        self.focused = true;
    }

    fn set_value(&mut self, value: &str) {
        self.value = value.to_string();
    }

    fn set_selection_range(&mut self, start: usize, end: usize) {
        self.selection = (start, end);
    }
}

/// Surfaces keyed by identifier
#[derive(Debug, Default)]
pub struct SurfaceRegistry {
    surfaces: HashMap<String, MemorySurface>,
}

impl SurfaceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a surface
    pub fn insert(&mut self, id: &str, surface: MemorySurface) {
        self.surfaces.insert(id.to_string(), surface);
    }

    pub fn get(&self, id: &str) -> Option<&MemorySurface> {
        self.surfaces.get(id)
    }

    pub fn remove(&mut self, id: &str) -> Option<MemorySurface> {
        self.surfaces.remove(id)
    }
}

impl SurfaceProvider for SurfaceRegistry {
    fn surface(&mut self, id: &str) -> Option<&mut dyn TextSurface> {
        self.surfaces
            .get_mut(id)
            .map(|surface| surface as &mut dyn TextSurface)
    }
}
