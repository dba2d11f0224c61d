//! Shared test utilities for the lazyload test suite.
//!
//! Provides [`FakeDocument`], an in-memory visual tree implementing the
//! [`Document`] collaborator contract, plus a small builder for elements.
//! Preloads are recorded rather than executed, so tests drive completion
//! explicitly through `LazyLoader::complete_load`.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let mut doc = FakeDocument::new(1024, 800);
//! let img = doc.push(element(".js-lazy").attr("data-src", "a.jpg"));
//!
//! let mut engine = LazyLoader::new(LazyConfig::default(), &doc);
//! engine.init(&mut doc);
//! assert_eq!(doc.preloads, vec![(img, "a.jpg".to_string())]);
//! ```

use std::collections::BTreeMap;

use crate::dom::{Document, ElementKind, Rect, Viewport};

/// One element of the fake tree. Fields are public so tests can assert on
/// them directly.
#[derive(Debug, Clone)]
pub struct FakeElement {
    /// The selector this element matches in [`FakeDocument::query`].
    pub selector: String,
    pub kind: ElementKind,
    pub rect: Rect,
    pub attributes: BTreeMap<String, String>,
    pub classes: Vec<String>,
    /// Visible source applied via `set_image_source`.
    pub image_source: Option<String>,
    /// URL applied via `set_background_image`.
    pub background_image: Option<String>,
    /// URL the element was swapped for via `replace_with_image`.
    pub replaced_with: Option<String>,
}

/// Build an element matching `selector`: a raster image spanning the top
/// 50px of the viewport, no attributes. Chain the builder methods to adjust.
pub fn element(selector: &str) -> FakeElement {
    FakeElement {
        selector: selector.to_string(),
        kind: ElementKind::RasterImage,
        rect: Rect {
            top: 0.0,
            bottom: 50.0,
        },
        attributes: BTreeMap::new(),
        classes: Vec::new(),
        image_source: None,
        background_image: None,
        replaced_with: None,
    }
}

impl FakeElement {
    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    /// Position the element's bounding box at `top..bottom`, relative to
    /// the viewport origin.
    pub fn between(mut self, top: f64, bottom: f64) -> Self {
        self.rect = Rect { top, bottom };
        self
    }

    pub fn of_kind(mut self, kind: ElementKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }
}

/// In-memory visual tree. Handles are indices into `elements`, so they
/// stay valid across mutation and replacement.
#[derive(Debug)]
pub struct FakeDocument {
    pub elements: Vec<FakeElement>,
    viewport: Viewport,
    pixel_ratio: f64,
    /// Dispatched preloads in order: (handle, resolved URL).
    pub preloads: Vec<(usize, String)>,
}

impl FakeDocument {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            elements: Vec::new(),
            viewport: Viewport { width, height },
            pixel_ratio: 1.0,
            preloads: Vec::new(),
        }
    }

    pub fn with_pixel_ratio(mut self, ratio: f64) -> Self {
        self.pixel_ratio = ratio;
        self
    }

    /// Add an element and return its handle.
    pub fn push(&mut self, el: FakeElement) -> usize {
        self.elements.push(el);
        self.elements.len() - 1
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport = Viewport { width, height };
    }

    /// Move an element's bounding box, simulating scroll or layout change.
    pub fn move_element(&mut self, handle: usize, top: f64, bottom: f64) {
        self.elements[handle].rect = Rect { top, bottom };
    }

    pub fn el(&self, handle: usize) -> &FakeElement {
        &self.elements[handle]
    }
}

impl Document for FakeDocument {
    type Handle = usize;

    fn query(&self, selector: &str) -> Vec<usize> {
        self.elements
            .iter()
            .enumerate()
            .filter(|(_, el)| el.selector == selector)
            .map(|(i, _)| i)
            .collect()
    }

    fn attribute(&self, element: &usize, name: &str) -> Option<String> {
        self.elements[*element].attributes.get(name).cloned()
    }

    fn remove_attribute(&mut self, element: &usize, name: &str) {
        self.elements[*element].attributes.remove(name);
    }

    fn add_class(&mut self, element: &usize, class: &str) {
        let el = &mut self.elements[*element];
        if !el.classes.iter().any(|c| c == class) {
            el.classes.push(class.to_string());
        }
    }

    fn has_class(&self, element: &usize, class: &str) -> bool {
        self.elements[*element].classes.iter().any(|c| c == class)
    }

    fn bounding_box(&self, element: &usize) -> Rect {
        self.elements[*element].rect
    }

    fn element_kind(&self, element: &usize) -> ElementKind {
        self.elements[*element].kind
    }

    fn set_image_source(&mut self, element: &usize, url: &str) {
        self.elements[*element].image_source = Some(url.to_string());
    }

    fn set_background_image(&mut self, element: &usize, url: &str) {
        self.elements[*element].background_image = Some(url.to_string());
    }

    fn replace_with_image(&mut self, element: &usize, url: &str) {
        let el = &mut self.elements[*element];
        el.kind = ElementKind::RasterImage;
        el.replaced_with = Some(url.to_string());
        el.image_source = Some(url.to_string());
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    fn begin_preload(&mut self, element: &usize, url: &str) {
        self.preloads.push((*element, url.to_string()));
    }
}
