//! Toolpath CLI - Command-line interface for the toolpath library
//!
//! Usage:
//!   toolpath-cli slice <input.stl> -o <output.gcode> [options]
//!   toolpath-cli slice <input.stl> --config print.json
//!   toolpath-cli external <input.stl> --slicer /path/to/slic3r [--config print.json] [options]
//!   toolpath-cli reconstruct <input.gcode> --export points.json

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, LevelFilter};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use toolpath::{
    load_stl, prepare_model, read_with_retry, reconstruct_file, ConfigFile, ExternalParams,
    ExternalSlicer, GeometrySource, PrintConfig, PrintPipeline, RetryPolicy, Slic3r,
};

/// Number of G-code lines shown after a run.
const PREVIEW_LINES: usize = 10;

const LAYER_HEIGHT_PROMPT: &str = "Enter layer height (mm, recommended: 0.5-1mm): ";
const FEED_RATE_PROMPT: &str = "Enter printing speed (mm/min): ";
const EXTRUSION_WIDTH_PROMPT: &str = "Enter extrusion width: ";
const INFILL_SPACING_PROMPT: &str = "Enter infill spacing (mm): ";
const PERIMETERS_PROMPT: &str = "Enter number of perimeter walls (default: 1): ";

/// Layer slicing, G-code generation and toolpath reconstruction
#[derive(Parser, Debug)]
#[command(name = "toolpath-cli")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Slice an STL file and generate G-code
    Slice {
        /// Input STL file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output G-code file
        #[arg(short, long, value_name = "OUTPUT", default_value = "output.gcode")]
        output: PathBuf,

        /// Settings file (JSON format); keys it leaves out are prompted for
        #[arg(short, long, value_name = "CONFIG")]
        config: Option<PathBuf>,

        #[command(flatten)]
        process: ProcessArgs,

        /// Slice the model as loaded, without repair or placement
        #[arg(long)]
        no_prepare: bool,
    },

    /// Slice an STL file with the external Slic3r executable
    External {
        /// Input STL file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output G-code file
        #[arg(short, long, value_name = "OUTPUT", default_value = "output.gcode")]
        output: PathBuf,

        /// Slic3r executable
        #[arg(long, value_name = "PATH", default_value = "slic3r")]
        slicer: PathBuf,

        /// Settings file (JSON format); keys it leaves out are prompted for
        #[arg(short, long, value_name = "CONFIG")]
        config: Option<PathBuf>,

        /// Layer height in mm (prompted for when missing)
        #[arg(long)]
        layer_height: Option<f64>,

        /// Extrusion width in mm (prompted for when missing)
        #[arg(long)]
        extrusion_width: Option<f64>,

        /// Number of perimeter walls (prompted for when missing, default 1)
        #[arg(long)]
        perimeters: Option<u32>,
    },

    /// Replay a G-code file into 3D toolpath points
    Reconstruct {
        /// Input G-code file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Write the points as JSON for plotting
        #[arg(long, value_name = "FILE")]
        export: Option<PathBuf>,
    },
}

/// Process parameters given on the command line.
#[derive(Args, Debug, Default)]
struct ProcessArgs {
    /// Layer height in mm (prompted for when missing)
    #[arg(long)]
    layer_height: Option<f64>,

    /// Printing speed in mm/min (prompted for when missing)
    #[arg(long)]
    feed_rate: Option<f64>,

    /// Extrusion width in mm (prompted for when missing)
    #[arg(long)]
    extrusion_width: Option<f64>,

    /// Grid infill spacing in mm (prompted for when missing)
    #[arg(long)]
    infill_spacing: Option<f64>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let log_level = if cli.debug {
        LevelFilter::Debug
    } else if cli.verbose {
        LevelFilter::Info
    } else {
        LevelFilter::Warn
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();

    match cli.command {
        Commands::Slice {
            input,
            output,
            config,
            process,
            no_prepare,
        } => {
            let file = load_config_file(config.as_deref())?;
            let print_config =
                resolve_print_config(&process, &file, &mut |label: &str| prompt(label))?;
            cmd_slice(&input, &output, print_config, !no_prepare)
        }
        Commands::External {
            input,
            output,
            slicer,
            config,
            layer_height,
            extrusion_width,
            perimeters,
        } => {
            if !input.exists() {
                bail!("STL file not found: {}", input.display());
            }
            let file = load_config_file(config.as_deref())?;
            let mut ask = |label: &str| prompt(label);
            let layer_height =
                resolve(layer_height, file.layer_height, LAYER_HEIGHT_PROMPT, &mut ask)?;
            let extrusion_width =
                resolve(extrusion_width, file.extrusion_width, EXTRUSION_WIDTH_PROMPT, &mut ask)?;
            let mut ask_count = |label: &str| prompt_or(label, 1);
            let perimeters =
                resolve(perimeters, file.perimeters, PERIMETERS_PROMPT, &mut ask_count)?;

            let params = ExternalParams::new(input, output, layer_height, extrusion_width)
                .perimeters(perimeters);
            cmd_external(&slicer, &params)
        }
        Commands::Reconstruct { input, export } => cmd_reconstruct(&input, export.as_deref()),
    }
}

/// Read the settings file, or nothing when none was given.
fn load_config_file(path: Option<&Path>) -> Result<ConfigFile> {
    match path {
        Some(path) => {
            info!("Loading settings from: {}", path.display());
            ConfigFile::from_file(path).context("Failed to load settings file")
        }
        None => Ok(ConfigFile::default()),
    }
}

/// Fill a print configuration from flags, then the settings file, then `ask`.
fn resolve_print_config(
    flags: &ProcessArgs,
    file: &ConfigFile,
    ask: &mut dyn FnMut(&str) -> Result<f64>,
) -> Result<PrintConfig> {
    Ok(PrintConfig::new()
        .layer_height(resolve(flags.layer_height, file.layer_height, LAYER_HEIGHT_PROMPT, ask)?)
        .feed_rate(resolve(flags.feed_rate, file.feed_rate, FEED_RATE_PROMPT, ask)?)
        .extrusion_width(resolve(
            flags.extrusion_width,
            file.extrusion_width,
            EXTRUSION_WIDTH_PROMPT,
            ask,
        )?)
        .infill_spacing(resolve(
            flags.infill_spacing,
            file.infill_spacing,
            INFILL_SPACING_PROMPT,
            ask,
        )?))
}

fn resolve<T>(
    flag: Option<T>,
    from_file: Option<T>,
    label: &str,
    ask: &mut dyn FnMut(&str) -> Result<T>,
) -> Result<T> {
    match flag.or(from_file) {
        Some(value) => Ok(value),
        None => ask(label),
    }
}

/// Ask for a value on stdin.
fn prompt<T: FromStr>(label: &str) -> Result<T> {
    let answer = read_answer(label)?;
    answer
        .parse()
        .ok()
        .with_context(|| format!("Invalid input '{}': please enter a numerical value", answer))
}

/// Ask for a value on stdin, using `default` for an empty answer.
fn prompt_or<T: FromStr>(label: &str, default: T) -> Result<T> {
    let answer = read_answer(label)?;
    if answer.is_empty() {
        return Ok(default);
    }
    answer
        .parse()
        .ok()
        .with_context(|| format!("Invalid input '{}': please enter a numerical value", answer))
}

fn read_answer(label: &str) -> Result<String> {
    print!("{}", label);
    io::stdout().flush()?;

    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        bail!("No input given for: {}", label.trim_end_matches(": ").trim());
    }
    Ok(line.trim().to_string())
}

fn print_preview<S: AsRef<str>>(output: &Path, lines: &[S]) {
    println!();
    println!("G-code Preview ({}):", output.display());
    for line in lines.iter().take(PREVIEW_LINES) {
        println!("{}", line.as_ref());
    }
}

fn cmd_slice(input: &Path, output: &Path, config: PrintConfig, prepare: bool) -> Result<()> {
    info!("Loading STL file: {}", input.display());

    // Create progress bar
    let progress = ProgressBar::new(100);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}% {msg}")?
            .progress_chars("#>-"),
    );

    progress.set_message("Loading mesh...");
    progress.set_position(5);

    let mut mesh = load_stl(input).context("Failed to load STL file")?;
    info!("Mesh loaded: {} triangles", mesh.face_count());

    if prepare {
        progress.set_message("Preparing model...");
        prepare_model(&mut mesh).context("Failed to prepare model")?;
    }
    progress.set_position(10);

    if let Some(extent) = mesh.extent() {
        info!("Model height: {:.2} mm", extent.height());
    }

    let pipeline = PrintPipeline::new(config);
    let gcode = pipeline.process_with_callback(&mesh, |stage, stage_progress| {
        let (base, range, message) = match stage {
            "slicing" => (10, 40, "Slicing layers..."),
            "gcode" => (50, 40, "Generating G-code..."),
            _ => (10, 10, "Processing..."),
        };
        progress.set_position(base + (stage_progress * range as f64) as u64);
        progress.set_message(message);
    });
    let gcode = match gcode {
        Ok(gcode) => gcode,
        Err(e) => {
            progress.abandon_with_message("Failed");
            return Err(e).context("Slicing failed");
        }
    };

    progress.set_message("Writing output...");
    progress.set_position(95);

    gcode
        .write_to_file(output)
        .context("Failed to write G-code file")?;

    progress.set_position(100);
    progress.finish_with_message("Done!");

    println!();
    println!("Slicing complete!");
    println!("  Output: {}", output.display());
    println!("  Layers: {}", gcode.stats().layer_count);
    println!("  G-code lines: {}", gcode.line_count());

    print_preview(output, gcode.preview(PREVIEW_LINES));

    Ok(())
}

fn cmd_external(slicer: &Path, params: &ExternalParams) -> Result<()> {
    let slicer = Slic3r::new(slicer);
    let written = slicer.run(params).context("External slicer failed")?;
    println!("G-code saved to {}", written.display());

    let lines = read_with_retry(&written, &RetryPolicy::default())
        .context("Unable to read the generated G-code")?;
    print_preview(&written, &lines);

    Ok(())
}

fn cmd_reconstruct(input: &Path, export: Option<&Path>) -> Result<()> {
    info!("Reading G-code file: {}", input.display());

    let reconstruction = reconstruct_file(input).context("Failed to read G-code file")?;
    let Some((lo, hi)) = reconstruction.bounds() else {
        bail!("No valid X/Y movement detected in {}", input.display());
    };

    let levels = reconstruction.distinct_z_levels();

    println!("Toolpath Information:");
    println!("  File: {}", input.display());
    println!("  Points: {}", reconstruction.len());
    println!("  Bounding box:");
    println!("    Min: ({:.3}, {:.3}, {:.3}) mm", lo.x, lo.y, lo.z);
    println!("    Max: ({:.3}, {:.3}, {:.3}) mm", hi.x, hi.y, hi.z);
    println!("  Z levels: {}", levels.len());

    if let Some(path) = export {
        let json = reconstruction
            .points_json()
            .context("Failed to serialize points")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("  Exported points to {}", path.display());
    }

    Ok(())
}
