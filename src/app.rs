//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - installs the stderr log subscriber (not for the TUI)
//! - runs fits / rankings / samples
//! - prints reports/plots
//! - writes optional exports

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Command, FitArgs, PlotArgs, RankArgs, SampleArgs, SolveArgs};
use crate::data::{SampleConfig, generate_sample};
use crate::domain::FitConfig;
use crate::error::AppError;

pub mod pipeline;

/// Environment variable holding the log filter (`warn` when unset).
pub const LOG_ENV: &str = "TREND_LOG";

/// Entry point for the `trend` binary.
pub fn run() -> Result<(), AppError> {
    // Optional; a missing `.env` is not an error.
    dotenvy::dotenv().ok();

    // We want `trend` and `trend -m KEY` to behave like `trend tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    // Log lines would corrupt the TUI's alternate screen.
    if !matches!(cli.command, Command::Tui(_)) {
        init_logging();
    }

    match cli.command {
        Command::Fit(args) => handle_fit(args),
        Command::Rank(args) => handle_rank(args),
        Command::Models => handle_models(),
        Command::Sample(args) => handle_sample(args),
        Command::Solve(args) => handle_solve(args),
        Command::Plot(args) => handle_plot(args),
        Command::Tui(args) => crate::tui::run(args),
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    // A subscriber may already be installed (e.g. when embedded); keep it.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn handle_fit(args: FitArgs) -> Result<(), AppError> {
    let config = fit_config_from_args(&args);
    let run = pipeline::run_fit(&config)?;

    println!("{}", crate::report::format_fit_summary(&run.stats, &run.fit));
    if config.show_matrices {
        println!("{}", crate::report::format_matrices(&run.fit.stages));
    }
    if !run.residuals.is_empty() {
        println!("{}", crate::report::format_residuals(&run.residuals));
    }

    if config.plot {
        let trend = run.fit.trend_fn();
        let plot = crate::plot::render_ascii_plot(
            &run.points,
            trend.as_ref(),
            config.plot_width,
            config.plot_height,
        );
        println!("{plot}");
    }

    // Optional exports.
    if let Some(path) = &config.export_results {
        crate::io::write_results_csv(path, &run.residuals)?;
    }
    if let Some(path) = &config.export_curve {
        crate::io::write_curve_json(path, &run.fit, &run.stats)?;
    }

    Ok(())
}

fn handle_rank(args: RankArgs) -> Result<(), AppError> {
    let points = crate::io::load_points(args.file.as_deref())?;
    let ranking = crate::fit::rank_models(&points);

    println!("{}", crate::report::format_rankings(&ranking, args.top));

    if ranking.best().is_none() {
        return Err(AppError::no_data(format!(
            "No model produced a usable fit ({} point(s)).",
            points.len()
        )));
    }
    Ok(())
}

fn handle_models() -> Result<(), AppError> {
    print!("{}", crate::report::format_catalog(crate::models::all()));
    Ok(())
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    let config = SampleConfig {
        model_key: args.model,
        coefficients: args.coefficients,
        count: args.count,
        x_min: args.x_min,
        x_max: args.x_max,
        noise: args.noise,
        seed: args.seed,
    };
    let points = generate_sample(&config)?;
    print!("{}", crate::report::format_points(&points));
    Ok(())
}

fn handle_solve(args: SolveArgs) -> Result<(), AppError> {
    let solve = pipeline::run_solve(&args.x, &args.y)?;
    print!("{}", crate::report::format_matrices(&solve));
    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let curve = crate::io::read_curve_json(&args.curve)?;
    let points = match &args.file {
        Some(path) => crate::io::load_points(Some(path))?,
        None => Vec::new(),
    };

    println!("Model: {} ({})", curve.model.key, curve.model.label);
    let plot = crate::plot::render_ascii_plot_from_curve_file(&curve, &points, args.width, args.height);
    println!("{plot}");
    Ok(())
}

pub fn fit_config_from_args(args: &FitArgs) -> FitConfig {
    FitConfig {
        input: args.input.file.clone(),
        model_key: args.input.model.clone(),
        show_matrices: !args.no_matrices,
        plot: args.plot && !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        export_results: args.export.clone(),
        export_curve: args.export_curve.clone(),
    }
}

/// Rewrite argv so `trend` defaults to `trend tui`.
///
/// Rules:
/// - `trend`                      -> `trend tui`
/// - `trend -m KEY ...`           -> `trend tui -m KEY ...`
/// - `trend --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(
        arg1.as_str(),
        "fit" | "rank" | "models" | "sample" | "solve" | "plot" | "tui"
    );
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_opens_the_tui() {
        assert_eq!(rewrite_args(argv(&["trend"])), argv(&["trend", "tui"]));
        assert_eq!(
            rewrite_args(argv(&["trend", "-m", "y=b1x"])),
            argv(&["trend", "tui", "-m", "y=b1x"])
        );
    }

    #[test]
    fn subcommands_and_help_are_untouched() {
        for args in [
            argv(&["trend", "fit", "-f", "p.txt"]),
            argv(&["trend", "models"]),
            argv(&["trend", "solve", "--x", "x.txt", "--y", "y.txt"]),
            argv(&["trend", "--help"]),
            argv(&["trend", "-V"]),
        ] {
            assert_eq!(rewrite_args(args.clone()), args);
        }
    }

    #[test]
    fn no_plot_overrides_plot() {
        let cli = crate::cli::Cli::try_parse_from(["trend", "fit", "--no-plot", "--no-matrices"]).unwrap();
        let Command::Fit(args) = cli.command else {
            panic!("expected fit");
        };
        let config = fit_config_from_args(&args);
        assert!(!config.plot);
        assert!(!config.show_matrices);
        assert!(config.input.is_none());
    }
}
