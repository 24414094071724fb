//! G-code line buffer.

use super::{GCode, GCodeCommand, GCodeStats};

/// Collects G-code lines in emission order.
#[derive(Debug, Default)]
pub struct GCodeWriter {
    lines: Vec<String>,
    motion_count: usize,
}

impl GCodeWriter {
    /// Create an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a command.
    pub fn command(&mut self, cmd: &GCodeCommand) {
        self.count(cmd);
        self.lines.push(cmd.to_gcode());
    }

    /// Append a command followed by an inline comment (`G21 ; ...`).
    pub fn command_with_comment(&mut self, cmd: &GCodeCommand, comment: &str) {
        self.count(cmd);
        self.lines.push(format!("{} ; {}", cmd.to_gcode(), comment));
    }

    /// Append a full-line comment.
    pub fn comment(&mut self, text: impl Into<String>) {
        self.lines.push(GCodeCommand::Comment(text.into()).to_gcode());
    }

    /// Number of lines written so far.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// True if nothing was written.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Finish into a [`GCode`] stream.
    pub fn finish(self, layer_count: usize) -> GCode {
        let stats = GCodeStats {
            layer_count,
            line_count: self.lines.len(),
            motion_count: self.motion_count,
        };
        GCode::new(self.lines, stats)
    }

    fn count(&mut self, cmd: &GCodeCommand) {
        if cmd.is_motion() {
            self.motion_count += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writer_lines() {
        let mut writer = GCodeWriter::new();
        writer.command_with_comment(&GCodeCommand::MillimeterUnits, "Set units to millimeters");
        writer.comment("Layer 0");
        writer.command(&GCodeCommand::move_z(0.0, 500.0));

        assert_eq!(writer.len(), 3);
        let gcode = writer.finish(1);
        assert_eq!(
            gcode.lines(),
            &[
                "G21 ; Set units to millimeters".to_string(),
                "; Layer 0".to_string(),
                "G1 Z0.00 F500".to_string(),
            ]
        );
        assert_eq!(gcode.stats().motion_count, 1);
        assert_eq!(gcode.stats().line_count, 3);
    }
}
