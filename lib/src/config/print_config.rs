//! Print configuration types.
//!
//! This module provides the process parameters that drive slicing and
//! G-code emission, and the JSON settings file that may supply some of them.

use crate::{CoordF, Error, Result};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;

/// Main print configuration containing the user-facing process parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct PrintConfig {
    // === Layers ===
    /// Layer height (mm).
    pub layer_height: CoordF,

    // === Motion ===
    /// Print feed rate (mm/min), used for perimeter, travel and infill moves.
    pub feed_rate: CoordF,

    // === Extrusion ===
    /// Extrusion width (mm).
    pub extrusion_width: CoordF,

    // === Infill ===
    /// Grid infill line spacing (mm).
    pub infill_spacing: CoordF,
}

impl PrintConfig {
    /// Create a new PrintConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set layer height.
    pub fn layer_height(mut self, height: CoordF) -> Self {
        self.layer_height = height;
        self
    }

    /// Builder method: set print feed rate.
    pub fn feed_rate(mut self, feed_rate: CoordF) -> Self {
        self.feed_rate = feed_rate;
        self
    }

    /// Builder method: set extrusion width.
    pub fn extrusion_width(mut self, width: CoordF) -> Self {
        self.extrusion_width = width;
        self
    }

    /// Builder method: set infill spacing.
    pub fn infill_spacing(mut self, spacing: CoordF) -> Self {
        self.infill_spacing = spacing;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if !(self.layer_height.is_finite() && self.layer_height > 0.0) {
            return Err(Error::Config("Layer height must be positive".into()));
        }
        if !(self.feed_rate.is_finite() && self.feed_rate > 0.0) {
            return Err(Error::Config("Feed rate must be positive".into()));
        }
        if !(self.extrusion_width.is_finite() && self.extrusion_width > 0.0) {
            return Err(Error::Config("Extrusion width must be positive".into()));
        }
        if !(self.infill_spacing.is_finite() && self.infill_spacing > 0.0) {
            return Err(Error::Config("Infill spacing must be positive".into()));
        }
        Ok(())
    }
}

impl Default for PrintConfig {
    fn default() -> Self {
        Self {
            layer_height: 0.5,
            feed_rate: 1200.0,
            extrusion_width: 0.4,
            infill_spacing: 2.0,
        }
    }
}

/// Settings read from a JSON file.
///
/// Every key is optional. A key left out of the file stays `None`, so callers
/// can tell "not configured" apart from a default value.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub layer_height: Option<CoordF>,
    pub feed_rate: Option<CoordF>,
    pub extrusion_width: Option<CoordF>,
    pub infill_spacing: Option<CoordF>,
    /// Perimeter wall count for the external slicer.
    pub perimeters: Option<u32>,
}

impl ConfigFile {
    /// Load settings from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
            .map_err(|e| Error::Config(format!("failed to parse {}: {}", path.display(), e)))
    }

    /// Parse settings from JSON text.
    pub fn from_json(content: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }
}

impl fmt::Display for PrintConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PrintConfig(layer={:.2}mm, width={:.2}mm, infill={:.2}mm, feed={}mm/min)",
            self.layer_height, self.extrusion_width, self.infill_spacing, self.feed_rate
        )
    }
}
