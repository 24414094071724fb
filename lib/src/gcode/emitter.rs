//! Toolpath emission.
//!
//! The emitter walks `Startup -> PerLayer* -> Shutdown` once per call:
//!
//! 1. Startup: units, positioning, homing, heaters and fan off
//! 2. Per layer: layer comment, Z move, perimeter loops, grid infill on interior layers
//! 3. Shutdown: heaters and fan off, XY home, motors off

use super::{GCode, GCodeCommand, GCodeWriter};
use crate::config::PrintConfig;
use crate::geometry::Polygon;
use crate::infill::GridInfill;
use crate::slice::Layer;
use crate::{CoordF, Error, Result};
use log::{debug, info, warn};

/// Extrusion per move, as a fraction of the extrusion width.
pub const EXTRUSION_MULTIPLIER: CoordF = 0.1;

/// Feed rate of the Z move at each layer change (mm/min).
pub const LAYER_CHANGE_FEED_RATE: CoordF = 500.0;

/// Position of a layer in the stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayerRole {
    /// Index 0. Also used for a single-layer print.
    First,
    /// Strictly between the first and the last layer.
    Interior,
    /// Index `N - 1`.
    Last,
}

impl LayerRole {
    /// Role of layer `index` in a stack of `count` layers.
    pub fn of(index: usize, count: usize) -> Self {
        if index == 0 {
            LayerRole::First
        } else if index + 1 >= count {
            LayerRole::Last
        } else {
            LayerRole::Interior
        }
    }

    /// Only interior layers receive grid infill.
    pub fn has_infill(self) -> bool {
        self == LayerRole::Interior
    }
}

/// Serializes sliced layers into a G-code stream.
#[derive(Clone, Debug)]
pub struct ToolpathEmitter {
    layer_height: CoordF,
    feed_rate: CoordF,
    extrusion_width: CoordF,
    infill: GridInfill,
}

impl ToolpathEmitter {
    /// Create an emitter from a print configuration.
    pub fn new(config: &PrintConfig) -> Self {
        Self {
            layer_height: config.layer_height,
            feed_rate: config.feed_rate,
            extrusion_width: config.extrusion_width,
            infill: GridInfill::new(config.infill_spacing),
        }
    }

    /// Extrusion amount carried by every extruding move.
    pub fn extrusion(&self) -> CoordF {
        self.extrusion_width * EXTRUSION_MULTIPLIER
    }

    /// Emit the full stream for `layers`.
    ///
    /// Fails before writing anything when `layers` is empty. The output only
    /// depends on the inputs, so repeated calls give identical streams.
    pub fn emit(&self, layers: &[Layer]) -> Result<GCode> {
        if layers.is_empty() {
            return Err(Error::NoValidSlices);
        }

        let mut writer = GCodeWriter::new();
        self.startup(&mut writer);

        let count = layers.len();
        for (i, layer) in layers.iter().enumerate() {
            self.layer(&mut writer, i, LayerRole::of(i, count), layer);
        }

        self.shutdown(&mut writer);

        let gcode = writer.finish(count);
        info!("G-code generated: {}", gcode.stats());
        Ok(gcode)
    }

    fn startup(&self, writer: &mut GCodeWriter) {
        writer.command_with_comment(&GCodeCommand::MillimeterUnits, "Set units to millimeters");
        writer.command_with_comment(&GCodeCommand::AbsolutePositioning, "Absolute positioning");
        writer.command_with_comment(
            &GCodeCommand::Home {
                x: false,
                y: false,
                z: false,
            },
            "Home all axes",
        );
        Self::heaters_off(writer);
    }

    fn shutdown(&self, writer: &mut GCodeWriter) {
        Self::heaters_off(writer);
        writer.command_with_comment(&GCodeCommand::DisableMotors, "Disable motors");
    }

    fn heaters_off(writer: &mut GCodeWriter) {
        writer.command_with_comment(
            &GCodeCommand::SetExtruderTemp { s: 0 },
            "Turn off extruder heater",
        );
        writer.command_with_comment(&GCodeCommand::SetBedTemp { s: 0 }, "Turn off bed heater");
        writer.command_with_comment(&GCodeCommand::FanOff, "Turn off fan");
        writer.command_with_comment(
            &GCodeCommand::Home {
                x: true,
                y: true,
                z: false,
            },
            "Home X and Y",
        );
    }

    fn layer(&self, writer: &mut GCodeWriter, index: usize, role: LayerRole, layer: &Layer) {
        writer.comment(format!("Layer {}", index));
        writer.command(&GCodeCommand::move_z(
            index as CoordF * self.layer_height,
            LAYER_CHANGE_FEED_RATE,
        ));

        if !layer.has_contours() {
            warn!("No valid contours in layer {}, skipping", index);
            return;
        }

        writer.comment("Perimeter walls");
        for contour in &layer.contours {
            self.perimeter(writer, contour);
        }

        if role.has_infill() {
            self.grid_infill(writer, layer);
        }
        debug!("Layer {} emitted ({:?})", index, role);
    }

    fn perimeter(&self, writer: &mut GCodeWriter, contour: &Polygon) {
        let e = Some(self.extrusion());
        for p in contour.points() {
            writer.command(&GCodeCommand::move_xy(p.x, p.y, self.feed_rate, e));
        }
        if let Some(first) = contour.first_point() {
            writer.command(&GCodeCommand::move_xy(first.x, first.y, self.feed_rate, e));
        }
    }

    fn grid_infill(&self, writer: &mut GCodeWriter, layer: &Layer) {
        let bounds = layer.bounding_box();
        writer.comment("Grid infill pattern");
        for line in self.infill.generate(&bounds) {
            if !bounds.contains(line.a) {
                continue;
            }
            writer.command(&GCodeCommand::move_xy(line.a.x, line.a.y, self.feed_rate, None));
            writer.command(&GCodeCommand::move_xy(
                line.b.x,
                line.b.y,
                self.feed_rate,
                Some(self.extrusion()),
            ));
        }
    }
}
