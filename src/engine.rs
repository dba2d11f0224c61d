//! The lazy-loading engine.
//!
//! [`LazyLoader`] owns the candidate-element set, the viewport-intersection
//! test, throttled revalidation, per-element source resolution, and the
//! lifecycle state machine. It is a plain struct: all state lives in fields,
//! so any number of independent engines can run in one process.
//!
//! ## Lifecycle
//!
//! ```text
//! Destroyed --init()/re_init()--> Active
//! Active    --validate pass-----> Active      (candidates remain)
//! Active    --candidates empty--> Destroyed   (auto, post-pass check)
//! Active    --destroy()---------> Destroyed
//! ```
//!
//! Notifications (`notify_scroll`, `notify_resize`, `revalidate`) are no-ops
//! while `Destroyed` — the engine is effectively unbound from its event
//! sources. Preload completions are the one exception: they are applied in
//! any state, because dispatched loads cannot be cancelled.
//!
//! ## Candidate ownership
//!
//! An element is a candidate iff it has not yet begun a load attempt. It
//! leaves the set the moment its preload is dispatched — in-flight elements
//! are excluded from future validation passes regardless of eventual
//! outcome. The set can therefore empty out (auto-destroying the engine)
//! while loads are still in flight; listeners are only needed for future
//! scroll/resize discovery, not for in-flight completions.

use std::time::{Duration, Instant};

use log::{debug, trace};

use crate::config::LazyConfig;
use crate::dom::{Document, ElementKind, LoadFailure, LoadOutcome, Rect, Viewport};
use crate::source::{select_attribute, select_url};
use crate::throttle::Throttle;

/// Minimum interval between throttled revalidation passes.
const REVALIDATE_INTERVAL: Duration = Duration::from_millis(250);

/// Minimum interval between viewport-size refreshes on resize.
const RESIZE_INTERVAL: Duration = Duration::from_millis(500);

/// Engine lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Initial and terminal state: not watching anything.
    Destroyed,
    /// Watching candidates; scroll/resize notifications trigger passes.
    Active,
}

type SuccessCallback<H> = Box<dyn FnMut(&H)>;
type ErrorCallback<H> = Box<dyn FnMut(&H, LoadFailure)>;

/// A dispatched preload awaiting its completion from the host.
struct InFlight<H> {
    element: H,
    url: String,
    kind: ElementKind,
}

/// Viewport-aware lazy loader over a [`Document`] collaborator.
///
/// The engine does not own the document: every operation borrows it, so the
/// host keeps full access to its tree between calls.
pub struct LazyLoader<D: Document> {
    config: LazyConfig,
    candidates: Vec<D::Handle>,
    in_flight: Vec<InFlight<D::Handle>>,
    active_source_attribute: String,
    viewport: Viewport,
    is_retina: bool,
    state: Lifecycle,
    revalidate_gate: Throttle,
    resize_gate: Throttle,
    on_success: Option<SuccessCallback<D::Handle>>,
    on_error: Option<ErrorCallback<D::Handle>>,
}

impl<D: Document> LazyLoader<D> {
    /// Construct an engine from config. Pixel density and the initial
    /// viewport are snapshotted here; `is_retina` never changes afterwards.
    ///
    /// The engine starts `Destroyed` — call [`init`](Self::init) to start
    /// watching.
    pub fn new(mut config: LazyConfig, doc: &D) -> Self {
        // Largest-first matching relies on this order everywhere downstream
        config
            .breakpoints
            .sort_by(|a, b| b.min_width.cmp(&a.min_width));
        let active_source_attribute = config.source_attribute.clone();
        Self {
            config,
            candidates: Vec::new(),
            in_flight: Vec::new(),
            active_source_attribute,
            viewport: doc.viewport(),
            is_retina: doc.device_pixel_ratio() > 1.0,
            state: Lifecycle::Destroyed,
            revalidate_gate: Throttle::new(REVALIDATE_INTERVAL),
            resize_gate: Throttle::new(RESIZE_INTERVAL),
            on_success: None,
            on_error: None,
        }
    }

    /// Register a callback fired once per element that loads successfully.
    pub fn on_success(mut self, callback: impl FnMut(&D::Handle) + 'static) -> Self {
        self.on_success = Some(Box::new(callback));
        self
    }

    /// Register a callback fired once per element whose load fails.
    pub fn on_error(mut self, callback: impl FnMut(&D::Handle, LoadFailure) + 'static) -> Self {
        self.on_error = Some(Box::new(callback));
        self
    }

    /// Current lifecycle state.
    pub fn state(&self) -> Lifecycle {
        self.state
    }

    /// Elements still awaiting a load attempt.
    pub fn candidate_count(&self) -> usize {
        self.candidates.len()
    }

    /// Dispatched preloads not yet completed by the host.
    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }

    /// The attribute candidate sources are currently read from. Fixed at
    /// [`init`](Self::init) time; resizes do not recompute it.
    pub fn active_source_attribute(&self) -> &str {
        &self.active_source_attribute
    }

    /// Full (re)setup: refresh the viewport snapshot, pick the breakpoint
    /// source attribute, query a fresh candidate set, go `Active`, and run
    /// an immediate validation pass. Callable from any state; replaces any
    /// previous candidate set.
    pub fn init(&mut self, doc: &mut D) {
        self.viewport = doc.viewport();
        self.active_source_attribute = select_attribute(
            &self.config.breakpoints,
            self.viewport.width,
            &self.config.source_attribute,
        )
        .to_string();
        self.candidates = doc.query(&self.config.selector);
        self.revalidate_gate.reset();
        self.resize_gate.reset();
        self.state = Lifecycle::Active;
        debug!(
            "init: {} candidates for {:?}, source attribute {:?}, viewport {}x{}",
            self.candidates.len(),
            self.config.selector,
            self.active_source_attribute,
            self.viewport.width,
            self.viewport.height,
        );
        self.validate(doc, false);
    }

    /// Run a validation pass now. No-op while `Destroyed`. With `force`,
    /// every remaining candidate is loaded regardless of position.
    pub fn revalidate(&mut self, doc: &mut D, force: bool) {
        if self.state == Lifecycle::Destroyed {
            return;
        }
        self.validate(doc, force);
    }

    /// Throttled scroll notification: at most one validation pass per
    /// 250 ms window, intervening calls dropped.
    pub fn notify_scroll(&mut self, doc: &mut D) {
        self.notify_scroll_at(doc, Instant::now());
    }

    /// [`notify_scroll`](Self::notify_scroll) with an explicit timestamp,
    /// for hosts that carry their own clock.
    pub fn notify_scroll_at(&mut self, doc: &mut D, now: Instant) {
        if self.state == Lifecycle::Destroyed {
            return;
        }
        if self.revalidate_gate.allow(now) {
            self.validate(doc, false);
        }
    }

    /// Throttled resize notification: refreshes the viewport snapshot and
    /// revalidates, each behind its own gate (500 ms and 250 ms).
    pub fn notify_resize(&mut self, doc: &mut D) {
        self.notify_resize_at(doc, Instant::now());
    }

    /// [`notify_resize`](Self::notify_resize) with an explicit timestamp.
    pub fn notify_resize_at(&mut self, doc: &mut D, now: Instant) {
        if self.state == Lifecycle::Destroyed {
            return;
        }
        if self.resize_gate.allow(now) {
            self.viewport = doc.viewport();
        }
        if self.revalidate_gate.allow(now) {
            self.validate(doc, false);
        }
    }

    /// Re-activate with a freshly queried candidate set, excluding elements
    /// already carrying the success class. Useful after new elements are
    /// inserted into the tree. Keeps the source attribute and viewport
    /// snapshot from the last `init`.
    pub fn re_init(&mut self, doc: &mut D) {
        let fresh: Vec<D::Handle> = doc
            .query(&self.config.selector)
            .into_iter()
            .filter(|el| !doc.has_class(el, &self.config.success_class))
            .collect();
        if fresh.is_empty() {
            return;
        }
        debug!("re_init: {} candidates", fresh.len());
        self.candidates = fresh;
        self.state = Lifecycle::Active;
        self.revalidate(doc, false);
    }

    /// Stop watching: go `Destroyed` and drop candidate references.
    /// Idempotent. Does not cancel in-flight preloads — their completions
    /// still apply via [`complete_load`](Self::complete_load).
    pub fn destroy(&mut self) {
        if self.state == Lifecycle::Active {
            debug!("destroyed with {} loads in flight", self.in_flight.len());
        }
        self.state = Lifecycle::Destroyed;
        self.candidates.clear();
    }

    /// Apply the outcome of a dispatched preload. Works in any lifecycle
    /// state; completions for unknown elements are ignored.
    ///
    /// On success the resolved URL lands on the element according to its
    /// kind, then the success class and callback fire. On failure the error
    /// class and callback fire. Exactly one of the two happens per element.
    pub fn complete_load(&mut self, doc: &mut D, element: &D::Handle, outcome: LoadOutcome) {
        let Some(pos) = self.in_flight.iter().position(|f| &f.element == element) else {
            return;
        };
        let flight = self.in_flight.remove(pos);
        match outcome {
            LoadOutcome::Failed => {
                trace!("load failed: {}", flight.url);
                doc.add_class(element, &self.config.error_class);
                if let Some(cb) = self.on_error.as_mut() {
                    cb(element, LoadFailure::Invalid);
                }
            }
            LoadOutcome::Loaded => {
                trace!("load complete: {}", flight.url);
                match flight.kind {
                    ElementKind::RasterImage => doc.set_image_source(element, &flight.url),
                    ElementKind::VectorImagePlaceholder => {
                        doc.replace_with_image(element, &flight.url)
                    }
                    ElementKind::GenericBackgroundTarget => {
                        doc.set_background_image(element, &flight.url)
                    }
                }
                doc.add_class(element, &self.config.success_class);
                if let Some(cb) = self.on_success.as_mut() {
                    cb(element);
                }
            }
        }
    }

    /// One validation pass over the candidate set, in insertion order.
    /// A candidate loads when it intersects the expanded viewport, already
    /// carries the success class, or `force` is set. Afterwards, an empty
    /// set transitions the engine to `Destroyed`.
    fn validate(&mut self, doc: &mut D, force: bool) {
        let pass: Vec<D::Handle> = self.candidates.clone();
        for el in &pass {
            let visible = in_viewport(
                &doc.bounding_box(el),
                self.viewport.height as f64,
                self.config.offset,
            );
            if visible || doc.has_class(el, &self.config.success_class) || force {
                self.load(doc, el);
            }
        }
        if self.candidates.is_empty() {
            debug!("candidate set empty, auto-destroying");
            self.destroy();
        }
    }

    /// Resolve and dispatch one element's load.
    ///
    /// An element with no resolvable source attribute stays a candidate for
    /// a future pass — not an error, no callback. Otherwise the source
    /// attributes are stripped from the markup, the preload is dispatched,
    /// and the element leaves the candidate set immediately.
    fn load(&mut self, doc: &mut D, element: &D::Handle) {
        let value = doc
            .attribute(element, &self.active_source_attribute)
            .or_else(|| doc.attribute(element, &self.config.source_attribute));
        let Some(value) = value else {
            return;
        };
        let url = select_url(&value, &self.config.separator, self.is_retina).to_string();

        for bp in &self.config.breakpoints {
            doc.remove_attribute(element, &bp.attribute);
        }
        doc.remove_attribute(element, &self.config.source_attribute);

        let kind = doc.element_kind(element);
        trace!("dispatching preload: {url}");
        self.in_flight.push(InFlight {
            element: element.clone(),
            url: url.clone(),
            kind,
        });
        doc.begin_preload(element, &url);
        self.candidates.retain(|c| c != element);
    }
}

/// Whether a bounding box overlaps the viewport expanded by `offset`
/// pixels top and bottom: the top edge has entered the extended window
/// from above, or the bottom edge is still inside it from below.
fn in_viewport(rect: &Rect, viewport_height: f64, offset: f64) -> bool {
    let bottom_line = viewport_height + offset;
    (rect.top >= 0.0 && rect.top <= bottom_line)
        || (rect.bottom <= bottom_line && rect.bottom >= -offset)
}
