//! # Lazyload
//!
//! A viewport-aware lazy-loading engine for images and background images.
//! Off-screen elements keep a placeholder until they approach the viewport;
//! the engine then resolves a source URL from responsive breakpoints and
//! pixel density, preloads it, and applies it to the element.
//!
//! # Architecture: One Engine, One Seam
//!
//! All non-trivial logic lives in a single [`LazyLoader`] instance:
//! viewport-intersection testing, throttled revalidation, breakpoint/retina
//! source selection, and a small lifecycle state machine
//! (init → active → destroyed, with re-init support). The engine is
//! UI-agnostic — it reaches the host's visual tree only through the
//! [`Document`] trait, so the same core drives a browser binding, an
//! embedded webview, or the in-memory tree the test suite uses.
//!
//! ```text
//! host events ──> LazyLoader ──> Document (host visual tree)
//!  scroll/resize    │  ▲           query / attrs / geometry / classes
//!                   │  └────────── begin_preload completions
//!                   └── candidate set, throttles, lifecycle
//! ```
//!
//! Intersection testing, throttling, and source resolution are deliberately
//! not separate components: they share the engine's mutable state (cached
//! viewport, active source attribute) too tightly to split without hurting
//! clarity. The pure parts that *can* stand alone do — see the module map.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | The [`LazyLoader`]: candidate set, intersection test, load dispatch, lifecycle |
//! | [`dom`] | Collaborator contract — the [`Document`] trait and its geometry/outcome types |
//! | [`config`] | `lazy.toml` loading, layered merging, validation |
//! | [`source`] | Pure source resolution: breakpoint → attribute, separator/retina URL split |
//! | [`throttle`] | Minimum-interval gate bounding scroll/resize handler frequency |
//!
//! # Design Decisions
//!
//! ## Plain Instance State
//!
//! Every piece of engine state is a field of [`LazyLoader`]. There is no
//! module-level shared state, so multiple independent engines can coexist
//! in one process (e.g. one per embedded view).
//!
//! ## Host-Driven Time and Events
//!
//! The engine never installs event listeners or spawns tasks. The host
//! forwards scroll/resize as [`LazyLoader::notify_scroll`] /
//! [`notify_resize`](LazyLoader::notify_resize) calls and delivers preload
//! results via [`complete_load`](LazyLoader::complete_load). "Unbinding
//! listeners" on destroy is therefore just the engine ignoring
//! notifications — except completions, which apply in any state because a
//! dispatched preload cannot be cancelled.
//!
//! ## Single Load Attempt
//!
//! A failed fetch is terminal for that element: error class, `on_error`
//! callback, no retry. An element whose source attribute is missing is the
//! one non-terminal case — it stays a candidate for a future pass, so
//! markup that gains its attribute late still loads.
//!
//! ## Breakpoint Selection Is Fixed At Init
//!
//! The active source attribute is computed once per [`LazyLoader::init`]
//! from the viewport width at that moment. Resizes refresh the cached
//! viewport for intersection testing but do not re-select the attribute;
//! call `init` again to re-evaluate breakpoints.
//!
//! # Example
//!
//! ```no_run
//! use lazyload::{Document, LazyConfig, LazyLoader};
//!
//! fn run<D: Document>(doc: &mut D) {
//!     let config = LazyConfig::default();
//!     let mut engine = LazyLoader::new(config, doc)
//!         .on_success(|_| log::info!("element loaded"));
//!     engine.init(doc);
//!     // ... host event loop forwards scroll/resize and completions:
//!     engine.notify_scroll(doc);
//! }
//! ```

pub mod config;
pub mod dom;
pub mod engine;
pub mod source;
pub mod throttle;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use config::{Breakpoint, ConfigError, LazyConfig, load_config, stock_config_toml};
pub use dom::{Document, ElementKind, LoadFailure, LoadOutcome, Rect, Viewport};
pub use engine::{LazyLoader, Lifecycle};
