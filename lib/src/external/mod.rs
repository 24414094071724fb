//! External slicer integration.
//!
//! The alternate pipeline hands the whole model to a third-party slicing
//! executable and reads back the G-code it writes. The tool sits behind
//! [`ExternalSlicer`] so the rest of the crate never spawns processes.

use log::{error, info, warn};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::thread;
use std::time::Duration;

/// Errors from the external slicer path.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("input model not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("slicer exited with status {}", .code.map_or_else(|| "unknown".to_string(), |c| c.to_string()))]
    Failed { code: Option<i32> },

    #[error("G-code file was not generated: {}", .0.display())]
    MissingOutput(PathBuf),

    #[error("file still locked after {attempts} attempts: {}", .path.display())]
    Locked { path: PathBuf, attempts: u32 },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Parameters passed to the external slicer.
#[derive(Clone, Debug, PartialEq)]
pub struct ExternalParams {
    pub input: PathBuf,
    pub output: PathBuf,
    pub layer_height: f64,
    pub extrusion_width: f64,
    pub perimeters: u32,
}

impl ExternalParams {
    /// Parameters with one perimeter wall.
    pub fn new(
        input: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
        layer_height: f64,
        extrusion_width: f64,
    ) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            layer_height,
            extrusion_width,
            perimeters: 1,
        }
    }

    /// Builder method: set perimeter count.
    pub fn perimeters(mut self, count: u32) -> Self {
        self.perimeters = count;
        self
    }

    /// Command-line arguments, input path last.
    pub fn args(&self) -> Vec<String> {
        vec![
            "--layer-height".to_string(),
            self.layer_height.to_string(),
            "--extrusion-width".to_string(),
            self.extrusion_width.to_string(),
            "--perimeters".to_string(),
            self.perimeters.to_string(),
            "--output".to_string(),
            self.output.display().to_string(),
            self.input.display().to_string(),
        ]
    }
}

/// A slicing tool run as a separate step.
pub trait ExternalSlicer {
    /// Slice `params.input` and return the path of the written G-code.
    fn run(&self, params: &ExternalParams) -> Result<PathBuf, ToolError>;
}

/// Slic3r command-line slicer.
#[derive(Clone, Debug)]
pub struct Slic3r {
    executable: PathBuf,
}

impl Slic3r {
    /// Use the given executable.
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    /// Path of the executable.
    pub fn executable(&self) -> &Path {
        &self.executable
    }
}

impl Default for Slic3r {
    /// `slic3r` looked up on `PATH`.
    fn default() -> Self {
        Self::new("slic3r")
    }
}

impl ExternalSlicer for Slic3r {
    fn run(&self, params: &ExternalParams) -> Result<PathBuf, ToolError> {
        if !params.input.exists() {
            return Err(ToolError::InputNotFound(params.input.clone()));
        }

        if let Some(dir) = params.output.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }

        let args = params.args();
        info!("Running {} {}", self.executable.display(), args.join(" "));

        let output = Command::new(&self.executable)
            .args(&args)
            .output()
            .map_err(|source| ToolError::Spawn {
                program: self.executable.display().to_string(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !stdout.trim().is_empty() {
            info!("{}", stdout.trim());
        }
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            warn!("{}", stderr.trim());
        }

        if !output.status.success() {
            error!("Slicer encountered an error");
            return Err(ToolError::Failed {
                code: output.status.code(),
            });
        }
        info!("Slicer completed successfully");

        if !params.output.exists() {
            return Err(ToolError::MissingOutput(params.output.clone()));
        }
        Ok(params.output.clone())
    }
}

/// Bounded retry for reading a file another process may still hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 5,
            delay: Duration::from_secs(2),
        }
    }
}

/// Read `path` as lines, retrying while access is denied.
///
/// Invalid UTF-8 is replaced rather than rejected. Other IO errors fail
/// immediately.
pub fn read_with_retry(path: &Path, policy: &RetryPolicy) -> Result<Vec<String>, ToolError> {
    read_lines_with(path, policy, |p| fs::read(p))
}

fn read_lines_with<F>(path: &Path, policy: &RetryPolicy, mut read: F) -> Result<Vec<String>, ToolError>
where
    F: FnMut(&Path) -> io::Result<Vec<u8>>,
{
    for attempt in 1..=policy.attempts {
        match read(path) {
            Ok(bytes) => {
                return Ok(String::from_utf8_lossy(&bytes)
                    .lines()
                    .map(str::to_string)
                    .collect());
            }
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
                if attempt == policy.attempts {
                    break;
                }
                warn!(
                    "File is locked, retrying in {:?} ({}/{})",
                    policy.delay, attempt, policy.attempts
                );
                thread::sleep(policy.delay);
            }
            Err(e) => return Err(e.into()),
        }
    }

    error!("Unable to read {} after {} attempts", path.display(), policy.attempts);
    Err(ToolError::Locked {
        path: path.to_path_buf(),
        attempts: policy.attempts,
    })
}
