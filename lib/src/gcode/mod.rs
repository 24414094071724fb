//! G-code generation and reconstruction module.
//!
//! This module provides the types that turn sliced layers into G-code and
//! replay G-code back into motion:
//! - [`GCodeCommand`] - A single instruction and its textual form
//! - [`GCodeWriter`] - Line buffer collecting commands and comments
//! - [`ToolpathEmitter`] - Startup, per-layer and shutdown emission
//! - [`GCode`] - Finished instruction stream with statistics
//! - [`reconstruct`] - Sticky-coordinate replay of a stream into 3D points

mod emitter;
mod generator;
mod reconstruct;
mod writer;

pub use emitter::{LayerRole, ToolpathEmitter, EXTRUSION_MULTIPLIER, LAYER_CHANGE_FEED_RATE};
pub use generator::{GCode, GCodeStats};
pub use reconstruct::{reconstruct, reconstruct_file, Cursor, Reconstruction};
pub use writer::GCodeWriter;

/// G-code command types.
#[derive(Clone, Debug, PartialEq)]
pub enum GCodeCommand {
    /// G1 - Linear move
    LinearMove {
        x: Option<f64>,
        y: Option<f64>,
        z: Option<f64>,
        f: Option<f64>,
        e: Option<f64>,
    },
    /// G21 - Millimetre units
    MillimeterUnits,
    /// G28 - Home. No axis flag set homes every axis.
    Home { x: bool, y: bool, z: bool },
    /// G90 - Absolute positioning
    AbsolutePositioning,
    /// M104 - Set extruder temperature (no wait)
    SetExtruderTemp { s: u32 },
    /// M140 - Set bed temperature (no wait)
    SetBedTemp { s: u32 },
    /// M107 - Fan off
    FanOff,
    /// M84 - Disable motors
    DisableMotors,
    /// Comment
    Comment(String),
}

impl GCodeCommand {
    /// Linear move in the XY plane with feed rate and optional extrusion.
    pub fn move_xy(x: f64, y: f64, f: f64, e: Option<f64>) -> Self {
        GCodeCommand::LinearMove {
            x: Some(x),
            y: Some(y),
            z: None,
            f: Some(f),
            e,
        }
    }

    /// Linear move along Z only.
    pub fn move_z(z: f64, f: f64) -> Self {
        GCodeCommand::LinearMove {
            x: None,
            y: None,
            z: Some(z),
            f: Some(f),
            e: None,
        }
    }

    /// True for commands that move the tool.
    pub fn is_motion(&self) -> bool {
        matches!(self, GCodeCommand::LinearMove { .. })
    }

    /// Convert the command to a G-code string.
    ///
    /// Coordinates and extrusion use two decimals. Feed rates use the
    /// shortest decimal form (`F1200`, `F1500.5`).
    pub fn to_gcode(&self) -> String {
        match self {
            GCodeCommand::LinearMove { x, y, z, f, e } => {
                let mut cmd = String::from("G1");
                if let Some(v) = x {
                    cmd.push_str(&format!(" X{:.2}", v));
                }
                if let Some(v) = y {
                    cmd.push_str(&format!(" Y{:.2}", v));
                }
                if let Some(v) = z {
                    cmd.push_str(&format!(" Z{:.2}", v));
                }
                if let Some(v) = f {
                    cmd.push_str(&format!(" F{}", v));
                }
                if let Some(v) = e {
                    cmd.push_str(&format!(" E{:.2}", v));
                }
                cmd
            }
            GCodeCommand::MillimeterUnits => "G21".to_string(),
            GCodeCommand::Home { x, y, z } => {
                let mut cmd = String::from("G28");
                if *x {
                    cmd.push_str(" X0");
                }
                if *y {
                    cmd.push_str(" Y0");
                }
                if *z {
                    cmd.push_str(" Z0");
                }
                cmd
            }
            GCodeCommand::AbsolutePositioning => "G90".to_string(),
            GCodeCommand::SetExtruderTemp { s } => format!("M104 S{}", s),
            GCodeCommand::SetBedTemp { s } => format!("M140 S{}", s),
            GCodeCommand::FanOff => "M107".to_string(),
            GCodeCommand::DisableMotors => "M84".to_string(),
            GCodeCommand::Comment(text) => format!("; {}", text),
        }
    }
}
