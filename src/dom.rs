//! Collaborator contract between the engine and the host's visual tree.
//!
//! The engine never touches a real DOM. Everything it needs from the host —
//! element queries, attributes, classes, geometry, and the preload primitive —
//! goes through the [`Document`] trait. A host adapter (browser binding,
//! embedded webview, test double) implements it and forwards scroll/resize
//! events to the engine's notification methods.
//!
//! ## Preload protocol
//!
//! [`Document::begin_preload`] is fire-and-forget: the adapter starts an
//! asynchronous image fetch and returns immediately. When the fetch settles,
//! the adapter reports back via
//! [`LazyLoader::complete_load`](crate::LazyLoader::complete_load) with a
//! [`LoadOutcome`]. Completions may arrive after the engine has destroyed
//! itself; they are still applied.

use thiserror::Error;

/// Vertical extent of an element's bounding box, relative to the viewport
/// origin. Negative `top` means the element starts above the visible area.
///
/// Horizontal extent is deliberately absent: the intersection test assumes
/// vertical scrolling and ignores horizontal position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub top: f64,
    pub bottom: f64,
}

/// Current viewport dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// How an element receives its resolved URL on load success.
///
/// Dispatched once per element, at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// An image node: the resolved URL becomes its visible source.
    RasterImage,
    /// A vector-image placeholder: replaced in-place by a concrete image
    /// node carrying the resolved URL and the original geometry attributes.
    VectorImagePlaceholder,
    /// Anything else: the resolved URL is applied as a CSS background-image.
    GenericBackgroundTarget,
}

/// Result of an asynchronous preload, reported by the host adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded,
    Failed,
}

/// Terminal per-element failure, passed to the `on_error` callback.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadFailure {
    /// The underlying image fetch failed.
    #[error("invalid")]
    Invalid,
}

/// The host's visual tree, as seen by the engine.
///
/// `Handle` identifies an element across calls. For
/// [`ElementKind::VectorImagePlaceholder`] elements, the handle must remain
/// valid through [`replace_with_image`](Document::replace_with_image) and
/// refer to the replacement node afterwards.
pub trait Document {
    /// Owned element identifier, stable across tree mutation.
    type Handle: Clone + PartialEq + 'static;

    /// All elements matching `selector`, in tree order.
    fn query(&self, selector: &str) -> Vec<Self::Handle>;

    /// Value of the named attribute, if present.
    fn attribute(&self, element: &Self::Handle, name: &str) -> Option<String>;

    /// Remove the named attribute. No-op if absent.
    fn remove_attribute(&mut self, element: &Self::Handle, name: &str);

    /// Add a CSS class to the element.
    fn add_class(&mut self, element: &Self::Handle, class: &str);

    /// Whether the element carries the given CSS class.
    fn has_class(&self, element: &Self::Handle, class: &str) -> bool;

    /// The element's bounding box relative to the viewport.
    fn bounding_box(&self, element: &Self::Handle) -> Rect;

    /// How the element should receive its resolved URL.
    fn element_kind(&self, element: &Self::Handle) -> ElementKind;

    /// Set the visible source of an image node.
    fn set_image_source(&mut self, element: &Self::Handle, url: &str);

    /// Set the element's CSS background-image to the given URL.
    fn set_background_image(&mut self, element: &Self::Handle, url: &str);

    /// Replace a placeholder node in-place with a concrete image node
    /// carrying `url` and the original position/size attributes. The handle
    /// refers to the replacement afterwards.
    fn replace_with_image(&mut self, element: &Self::Handle, url: &str);

    /// Current viewport dimensions.
    fn viewport(&self) -> Viewport;

    /// Device pixel ratio; values above 1.0 select retina sources.
    fn device_pixel_ratio(&self) -> f64;

    /// Start an asynchronous image preload for `url`. Fire-and-forget: the
    /// adapter reports completion later via `LazyLoader::complete_load`.
    fn begin_preload(&mut self, element: &Self::Handle, url: &str);
}
