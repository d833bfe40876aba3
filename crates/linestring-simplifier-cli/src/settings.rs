use clap::{Args, Parser, Subcommand};
use linestring_simplifier_lib::SimplifyOptions;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
/// Linestring Simplifier - Reduce GeoJSON LineStrings and GPX tracks to a coordinate budget
pub struct Settings {
    /// Force debug logging (overrides RUST_LOG)
    #[clap(short, long, global = true)]
    pub verbose: bool,

    /// Pretty-print the JSON output
    #[clap(long, global = true)]
    pub pretty: bool,

    /// Write the JSON output to a file instead of stdout
    #[clap(short, long, global = true, value_name = "FILE")]
    pub output: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Simplify a geometry to at most N coordinates
    Simplify {
        /// GeoJSON geometry or Feature, GPX file, or `-` for stdin
        #[clap(value_name = "INPUT")]
        input: PathBuf,

        /// Coordinate budget (at least 2)
        #[clap(short = 'n', long)]
        max_coordinates: usize,

        #[clap(flatten)]
        detection: DetectionArgs,
    },

    /// Validate a geometry and report its corners, curves and minimum budget
    Analyze {
        #[clap(value_name = "INPUT")]
        input: PathBuf,

        #[clap(flatten)]
        detection: DetectionArgs,
    },

    /// Simplify the same geometry to several budgets
    Preview {
        #[clap(value_name = "INPUT")]
        input: PathBuf,

        /// Comma separated budgets, e.g. 10,50,100
        #[clap(long, value_delimiter = ',', required = true)]
        options: Vec<usize>,

        #[clap(flatten)]
        detection: DetectionArgs,
    },
}

/// Corner and curve detection flags shared by every subcommand
#[derive(Args, Debug, Clone)]
pub struct DetectionArgs {
    /// Do not keep sharp turns as critical points
    #[clap(long)]
    pub no_preserve_corners: bool,

    /// Do not keep curve representatives as critical points
    #[clap(long)]
    pub no_preserve_curves: bool,

    /// Minimum bearing change in degrees for a corner (range: (0, 180])
    #[clap(long, default_value = "30.0")]
    pub min_angle: f64,

    /// Minimum accumulated turning in degrees for a curve
    #[clap(long, default_value = "45.0")]
    pub curve_threshold: f64,
}

impl DetectionArgs {
    pub fn to_options(&self) -> SimplifyOptions {
        SimplifyOptions {
            preserve_corners: !self.no_preserve_corners,
            preserve_curves: !self.no_preserve_curves,
            min_angle_for_corners: self.min_angle,
            curve_detection_threshold: self.curve_threshold,
        }
    }
}

impl Command {
    pub fn input(&self) -> &Path {
        match self {
            Command::Simplify { input, .. }
            | Command::Analyze { input, .. }
            | Command::Preview { input, .. } => input,
        }
    }

    pub fn detection(&self) -> &DetectionArgs {
        match self {
            Command::Simplify { detection, .. }
            | Command::Analyze { detection, .. }
            | Command::Preview { detection, .. } => detection,
        }
    }
}

impl Settings {
    /// Parse the command line, exiting with clap's usage message on error
    pub fn from_cli() -> Self {
        match Settings::try_parse() {
            Ok(args) => args,
            Err(e) => e.exit(),
        }
    }
}
