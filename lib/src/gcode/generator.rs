//! Finished G-code stream.

use crate::Result;
use std::fmt;
use std::fs;
use std::path::Path;

/// Summary of a generated stream.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GCodeStats {
    /// Layers emitted.
    pub layer_count: usize,
    /// Total lines, comments included.
    pub line_count: usize,
    /// Motion (`G1`) lines.
    pub motion_count: usize,
}

impl fmt::Display for GCodeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} layers, {} lines, {} moves",
            self.layer_count, self.line_count, self.motion_count
        )
    }
}

/// An ordered G-code instruction stream.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GCode {
    lines: Vec<String>,
    stats: GCodeStats,
}

impl GCode {
    pub(crate) fn new(lines: Vec<String>, stats: GCodeStats) -> Self {
        Self { lines, stats }
    }

    /// All lines, in order.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Generation statistics.
    pub fn stats(&self) -> &GCodeStats {
        &self.stats
    }

    /// The first `n` lines (fewer if the stream is shorter).
    pub fn preview(&self, n: usize) -> &[String] {
        &self.lines[..n.min(self.lines.len())]
    }

    /// Lines joined with `\n`, without a trailing newline.
    pub fn content(&self) -> String {
        self.lines.join("\n")
    }

    /// Write the stream to `path`, replacing any existing file.
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.content())?;
        Ok(())
    }
}

impl fmt::Display for GCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.content())
    }
}
