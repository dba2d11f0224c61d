//! Centralized source resolution for candidate elements.
//!
//! Two independent decisions happen before an element can load, and both
//! live here so the engine body stays free of string plumbing:
//!
//! 1. **Which attribute** to read the source value from, based on the
//!    viewport width and the configured breakpoints.
//! 2. **Which URL** inside that value to use, based on pixel density and
//!    the configured separator.
//!
//! ## Source Values
//!
//! A source value is either a single URL or two URLs joined by the
//! separator (standard first, retina second):
//! - `"hero.jpg"` → always `"hero.jpg"`
//! - `"hero.jpg | hero@2x.jpg"` → `"hero@2x.jpg"` on retina displays,
//!   `"hero.jpg"` otherwise

use crate::config::Breakpoint;

/// Select the source attribute for the given viewport width.
///
/// Scans `breakpoints` in order and returns the attribute of the first
/// entry whose `min_width` fits the viewport. Callers must pass the slice
/// sorted by descending `min_width` so the largest matching breakpoint
/// wins. Falls back to `default_attribute` when nothing matches.
pub fn select_attribute<'a>(
    breakpoints: &'a [Breakpoint],
    viewport_width: u32,
    default_attribute: &'a str,
) -> &'a str {
    breakpoints
        .iter()
        .find(|bp| bp.min_width <= viewport_width)
        .map(|bp| bp.attribute.as_str())
        .unwrap_or(default_attribute)
}

/// Pick the URL variant from a separator-delimited source value.
///
/// Index 1 (the retina variant) is used when `retina` is true and a second
/// part exists; index 0 otherwise. A value without the separator is
/// returned as-is regardless of `retina`.
pub fn select_url<'a>(value: &'a str, separator: &str, retina: bool) -> &'a str {
    let mut parts = value.split(separator);
    let standard = parts.next().unwrap_or(value);
    match parts.next() {
        Some(second) if retina => second,
        _ => standard,
    }
}
