//! Pipeline module - orchestrates the complete slicing process.
//!
//! This module provides a high-level API for the whole path:
//! geometry source → layers → G-code
//!
//! # Example
//!
//! ```rust,ignore
//! use toolpath::{load_stl, prepare_model, PrintConfig, PrintPipeline};
//!
//! let mut mesh = load_stl("model.stl")?;
//! prepare_model(&mut mesh)?;
//!
//! let pipeline = PrintPipeline::new(PrintConfig::default());
//! let gcode = pipeline.process(&mesh)?;
//! gcode.write_to_file("output.gcode")?;
//! ```

use crate::config::PrintConfig;
use crate::gcode::{GCode, ToolpathEmitter};
use crate::slice::{GeometrySource, Layer, Slicer};
use crate::Result;
use log::info;

/// Runs the layer sequencer and the toolpath emitter in order.
#[derive(Clone, Debug)]
pub struct PrintPipeline {
    config: PrintConfig,
}

impl PrintPipeline {
    /// Create a new pipeline with the given configuration.
    pub fn new(config: PrintConfig) -> Self {
        Self { config }
    }

    /// Create a pipeline with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(PrintConfig::default())
    }

    /// Get the configuration.
    pub fn config(&self) -> &PrintConfig {
        &self.config
    }

    /// Process a model through the complete pipeline and return G-code.
    pub fn process<S: GeometrySource + ?Sized>(&self, source: &S) -> Result<GCode> {
        self.process_with_callback(source, |_, _| {})
    }

    /// Process a model with a progress callback.
    ///
    /// The callback receives (stage_name, progress_0_to_1).
    pub fn process_with_callback<S, F>(&self, source: &S, mut callback: F) -> Result<GCode>
    where
        S: GeometrySource + ?Sized,
        F: FnMut(&str, f64),
    {
        self.config.validate()?;
        info!("Processing with {}", self.config);

        callback("slicing", 0.0);
        let layers = self.slice(source)?;
        callback("slicing", 1.0);

        callback("gcode", 0.0);
        let gcode = self.emit(&layers)?;
        callback("gcode", 1.0);

        Ok(gcode)
    }

    /// Slice `source` into layers at the configured layer height.
    pub fn slice<S: GeometrySource + ?Sized>(&self, source: &S) -> Result<Vec<Layer>> {
        Slicer::new(self.config.layer_height).slice(source)
    }

    /// Emit G-code for already sliced layers.
    pub fn emit(&self, layers: &[Layer]) -> Result<GCode> {
        ToolpathEmitter::new(&self.config).emit(layers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point3F;
    use crate::mesh::TriangleMesh;
    use crate::Error;

    #[test]
    fn test_process_cube() {
        let mesh = TriangleMesh::cuboid(Point3F::default(), Point3F::new(10.0, 10.0, 2.0));
        let pipeline = PrintPipeline::new(PrintConfig::new().layer_height(0.5));

        let mut stages = Vec::new();
        let gcode = pipeline
            .process_with_callback(&mesh, |stage, progress| {
                stages.push((stage.to_string(), progress))
            })
            .unwrap();

        assert_eq!(gcode.stats().layer_count, 4);
        assert_eq!(gcode.lines()[0], "G21 ; Set units to millimeters");
        assert_eq!(gcode.lines().last().unwrap(), "M84 ; Disable motors");
        assert_eq!(stages.len(), 4);
        assert_eq!(stages[3], ("gcode".to_string(), 1.0));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mesh = TriangleMesh::cuboid(Point3F::default(), Point3F::new(1.0, 1.0, 1.0));
        let pipeline = PrintPipeline::new(PrintConfig::new().infill_spacing(0.0));
        assert!(matches!(pipeline.process(&mesh), Err(Error::Config(_))));
    }

    #[test]
    fn test_empty_model() {
        let pipeline = PrintPipeline::with_defaults();
        assert!(matches!(
            pipeline.process(&TriangleMesh::default()),
            Err(Error::NoValidSlices)
        ));
    }
}
