//! # Toolpath
//!
//! Layer slicing, G-code toolpath synthesis and toolpath reconstruction for a
//! single-extruder, layer-by-layer fabrication device.
//!
//! This library provides the full path from a solid model to machine motion and back:
//! - Layer sequencing at a fixed layer height
//! - Contour extraction from planar cross-sections
//! - Fixed-spacing orthogonal grid infill
//! - G-code emission (startup, per-layer perimeters and infill, shutdown)
//! - Toolpath reconstruction from G-code with sticky coordinates
//! - An alternate pipeline delegating to an external slicer executable
//!
//! ## Example
//!
//! ```rust,ignore
//! use toolpath::{load_stl, PrintConfig, PrintPipeline};
//!
//! let mesh = load_stl("model.stl")?;
//! let pipeline = PrintPipeline::new(PrintConfig::default());
//! let gcode = pipeline.process(&mesh)?;
//! gcode.write_to_file("output.gcode")?;
//! ```

pub mod config;
pub mod external;
pub mod gcode;
pub mod geometry;
pub mod infill;
pub mod mesh;
pub mod pipeline;
pub mod slice;

pub use config::{ConfigFile, PrintConfig};
pub use external::{read_with_retry, ExternalParams, ExternalSlicer, RetryPolicy, Slic3r, ToolError};
pub use gcode::{
    reconstruct, reconstruct_file, Cursor, GCode, GCodeCommand, GCodeStats, GCodeWriter,
    LayerRole, Reconstruction, ToolpathEmitter, EXTRUSION_MULTIPLIER, LAYER_CHANGE_FEED_RATE,
};
pub use geometry::{BoundingBox, Line, Point3F, PointF, Polygon};
pub use infill::{generate_grid, GridInfill};
pub use mesh::{load_stl, prepare_model, MeshRepair, TriangleMesh};
pub use pipeline::PrintPipeline;
pub use slice::{
    extract_contours, slice_heights, CrossSection, GeometrySource, Layer, ModelExtent,
    PlanarSection, PlaneTransform, Slicer, MIN_CONTOUR_POINTS,
};

/// Floating-point coordinate type, in millimetres.
pub type CoordF = f64;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for slicing and toolpath operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Mesh error: {0}")]
    Mesh(String),

    #[error("No valid slices were found; check the model and layer height")]
    NoValidSlices,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("External slicer error: {0}")]
    External(#[from] ToolError),
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
