//! Command-line parsing for the least-squares trend calculator.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the math/fitting code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::models::DEFAULT_MODEL;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "trend", version, about = "Least-squares trend calculator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit one model, print the matrices, equation and R², and optionally plot/export.
    Fit(FitArgs),
    /// Fit every catalog model and rank them by R².
    Rank(RankArgs),
    /// List the model catalog.
    Models,
    /// Print a seeded synthetic point list drawn around a model.
    Sample(SampleArgs),
    /// Solve the normal equations for a raw `X` and `y`, printing every stage.
    ///
    /// `X` may have any number of columns; inverses are only computed up to 3×3.
    Solve(SolveArgs),
    /// Plot a previously exported curve JSON.
    Plot(PlotArgs),
    /// Launch the interactive TUI.
    ///
    /// Points are edited in place; every edit or model change refits and redraws.
    Tui(TuiArgs),
}

/// Where to read points from and which model to fit.
#[derive(Debug, Args, Clone)]
pub struct InputArgs {
    /// Points file (one `x, y` pair per line). Reads stdin when omitted.
    #[arg(short = 'f', long, value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Model key (see `trend models`).
    #[arg(short = 'm', long, env = "TREND_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,
}

/// Options for `fit`.
#[derive(Debug, Args, Clone)]
pub struct FitArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Hide the intermediate matrices.
    #[arg(long)]
    pub no_matrices: bool,

    /// Render an ASCII plot in the terminal (enabled by default).
    #[arg(long, default_value_t = true)]
    pub plot: bool,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,

    /// Export per-point results to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export curve (model + coefficients + fitted grid) to JSON.
    #[arg(long = "export-curve")]
    pub export_curve: Option<PathBuf>,
}

/// Options for `rank`.
#[derive(Debug, Args, Clone)]
pub struct RankArgs {
    /// Points file (one `x, y` pair per line). Reads stdin when omitted.
    #[arg(short = 'f', long, value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Show the top-N models.
    #[arg(long, default_value_t = 10)]
    pub top: usize,
}

/// Options for `sample`.
#[derive(Debug, Args, Clone)]
pub struct SampleArgs {
    /// Model key the sample is drawn around.
    #[arg(short = 'm', long, env = "TREND_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Model coefficients, comma separated (e.g. `--coef 1,-0.5`).
    #[arg(
        long = "coef",
        value_delimiter = ',',
        allow_negative_numbers = true,
        required = true
    )]
    pub coefficients: Vec<f64>,

    /// Number of points.
    #[arg(short = 'n', long, default_value_t = 20)]
    pub count: usize,

    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub x_min: f64,

    #[arg(long, default_value_t = 10.0, allow_negative_numbers = true)]
    pub x_max: f64,

    /// Standard deviation of the Gaussian noise added to y.
    #[arg(long, default_value_t = 0.5)]
    pub noise: f64,

    /// Random seed (same seed, same points).
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

/// Options for `solve`.
#[derive(Debug, Args, Clone)]
pub struct SolveArgs {
    /// Design matrix file: one row per line, columns separated by commas or spaces.
    #[arg(long = "x", value_name = "FILE")]
    pub x: PathBuf,

    /// Observations file, same format (usually one value per line).
    #[arg(long = "y", value_name = "FILE")]
    pub y: PathBuf,
}

/// Options for plotting a saved curve.
#[derive(Debug, Args, Clone)]
pub struct PlotArgs {
    /// Curve JSON file produced by `trend fit --export-curve`.
    #[arg(long, value_name = "JSON")]
    pub curve: PathBuf,

    /// Optional points file to overlay.
    #[arg(short = 'f', long, value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Plot width (columns).
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,
}

/// Options for the TUI.
#[derive(Debug, Args, Clone)]
pub struct TuiArgs {
    /// Points file to start from (the editor starts empty otherwise).
    #[arg(short = 'f', long, value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Initially selected model.
    #[arg(short = 'm', long, env = "TREND_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,
}
