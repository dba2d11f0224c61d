//! Engine configuration module.
//!
//! Handles loading, validating, and merging `lazy.toml` files. Configuration
//! is layered: stock defaults are overridden by whatever the caller supplies,
//! either as a plain [`LazyConfig`] value built in code or as a sparse TOML
//! file merged on top of the defaults.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! source_attribute = "data-src"   # Attribute holding the candidate source
//! selector = ".js-lazy"           # Criterion selecting candidate elements
//! separator = " | "               # Splits a value into standard/retina URLs
//! offset = 100.0                  # Extra pixel margin for the viewport test
//! error_class = "has-error"       # Marker class applied on load failure
//! success_class = "is-loaded"     # Marker class applied on load success
//!
//! # Responsive breakpoints: viewport-width threshold -> source attribute.
//! # The engine picks the first entry (largest min_width first) whose
//! # min_width fits the viewport at init time.
//! [[breakpoints]]
//! min_width = 992
//! attribute = "data-src-medium"
//!
//! [[breakpoints]]
//! min_width = 480
//! attribute = "data-src-small"
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse — override just the values you want:
//!
//! ```toml
//! # Only widen the pre-load margin
//! offset = 300.0
//! ```
//!
//! Unknown keys are rejected to catch typos early. A caller-supplied
//! `breakpoints` array fully replaces the default (empty) one; breakpoint
//! entries are never merged element-by-element.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// A responsive breakpoint: viewport-width threshold → source attribute.
///
/// When the viewport is at least `min_width` pixels wide at init time, the
/// engine reads candidate sources from `attribute` instead of the default
/// source attribute. Breakpoints are matched largest-first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Breakpoint {
    /// Minimum viewport width in pixels for this breakpoint to apply.
    pub min_width: u32,
    /// Attribute name holding the source value at this breakpoint
    /// (e.g. `"data-src-medium"`).
    pub attribute: String,
}

/// Engine configuration, immutable once a [`LazyLoader`](crate::LazyLoader)
/// is constructed from it.
///
/// All fields have sensible defaults. Config files need only specify the
/// values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LazyConfig {
    /// Default attribute holding the candidate-source value.
    pub source_attribute: String,
    /// Criterion selecting candidate elements from the visual tree.
    pub selector: String,
    /// Delimiter splitting a source value into `[standard, retina]` parts.
    pub separator: String,
    /// Responsive breakpoints, matched largest `min_width` first.
    pub breakpoints: Vec<Breakpoint>,
    /// Extra pixel margin added to the viewport-intersection test.
    pub offset: f64,
    /// Marker class applied to an element whose load failed.
    pub error_class: String,
    /// Marker class applied to an element whose load succeeded.
    pub success_class: String,
}

impl Default for LazyConfig {
    fn default() -> Self {
        Self {
            source_attribute: "data-src".to_string(),
            selector: ".js-lazy".to_string(),
            separator: " | ".to_string(),
            breakpoints: Vec::new(),
            offset: 100.0,
            error_class: "has-error".to_string(),
            success_class: "is-loaded".to_string(),
        }
    }
}

impl LazyConfig {
    /// Validate config values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source_attribute.is_empty() {
            return Err(ConfigError::Validation(
                "source_attribute must not be empty".into(),
            ));
        }
        if self.selector.is_empty() {
            return Err(ConfigError::Validation("selector must not be empty".into()));
        }
        if self.separator.is_empty() {
            return Err(ConfigError::Validation(
                "separator must not be empty".into(),
            ));
        }
        if !self.offset.is_finite() || self.offset < 0.0 {
            return Err(ConfigError::Validation(
                "offset must be a finite value >= 0".into(),
            ));
        }
        for bp in &self.breakpoints {
            if bp.attribute.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "breakpoint at min_width {} has an empty attribute",
                    bp.min_width
                )));
            }
        }
        let mut widths: Vec<u32> = self.breakpoints.iter().map(|b| b.min_width).collect();
        widths.sort_unstable();
        widths.dedup();
        if widths.len() != self.breakpoints.len() {
            return Err(ConfigError::Validation(
                "breakpoint min_width values must be unique".into(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Name of the config file looked up by [`load_config`].
const CONFIG_FILENAME: &str = "lazy.toml";

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(LazyConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely — this
///   includes arrays, so a user `breakpoints` list replaces the default.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a `lazy.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `lazy.toml` exists in the directory.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join(CONFIG_FILENAME);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<LazyConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: LazyConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `lazy.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(root: &Path) -> Result<LazyConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `lazy.toml` with all keys and explanations.
pub fn stock_config_toml() -> &'static str {
    r#"# Lazyload Configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# Attribute holding the candidate-source value. A value is either a single
# URL or two URLs joined by the separator (standard | retina).
source_attribute = "data-src"

# Criterion selecting candidate elements from the visual tree.
selector = ".js-lazy"

# Delimiter splitting a source value into [standard, retina] parts.
separator = " | "

# Extra pixel margin added to the viewport-intersection test. Elements
# within this many pixels of the viewport edge start loading early.
offset = 100.0

# Marker class applied to an element whose load failed.
error_class = "has-error"

# Marker class applied to an element whose load succeeded.
success_class = "is-loaded"

# ---------------------------------------------------------------------------
# Responsive breakpoints
# ---------------------------------------------------------------------------
# Each entry maps a minimum viewport width to an alternate source attribute.
# The engine picks the first entry (largest min_width first) that fits the
# viewport width at init time. No entries = always use source_attribute.
#
# [[breakpoints]]
# min_width = 992
# attribute = "data-src-medium"
#
# [[breakpoints]]
# min_width = 480
# attribute = "data-src-small"
"#
}
