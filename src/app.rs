//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and initializes logging
//! - parses CLI arguments
//! - runs the web form, or a one-off fit that prints/plots/exports

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::{Command, FitArgs, ServeArgs};
use crate::domain::{PlotLabels, SampleSet};
use crate::error::AppError;
use crate::io::{content_type_for_path, parse_manual, read_samples};

pub mod config;
pub mod pipeline;

pub use config::ServerConfig;

const DEFAULT_LOG_FILTER: &str = "poly_curves=info,tower_http=info";

/// Entry point for the `poly` binary.
pub fn run() -> Result<(), AppError> {
    // `.env` must be loaded before clap reads `env = …` fallbacks.
    dotenvy::dotenv().ok();
    init_tracing();

    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Serve(args) => handle_serve(args),
        Command::Fit(args) => handle_fit(args),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    // `try_init` so embedding callers (and tests) that already set a subscriber win.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn handle_serve(args: ServeArgs) -> Result<(), AppError> {
    let config = ServerConfig::from_args(&args)?;
    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| AppError::Io(format!("Failed to start async runtime: {e}")))?;
    runtime.block_on(crate::web::serve(config))
}

fn handle_fit(args: FitArgs) -> Result<(), AppError> {
    let samples = load_samples(&args)?;
    let labels = PlotLabels {
        title: args.title.clone(),
        x_label: args.x_label.clone(),
        y_label: args.y_label.clone(),
    };

    let run = pipeline::run_fit(samples, args.degree, labels)?;
    println!(
        "{}",
        crate::report::format_run_summary(&run.entry.samples, &run.selection, &run.entry.labels)
    );

    if let Some(path) = &args.out {
        let size = config::plot_size(args.width, args.height)?;
        crate::plot::render_fit(path, &run.entry.samples, &run.entry.fit, &run.entry.labels, size)?;
        info!(path = %path.display(), "chart written");
    }
    if let Some(path) = &args.export {
        crate::io::write_residuals_csv(path, &run.entry.samples, &run.entry.fit)?;
    }
    if let Some(path) = &args.export_curve {
        crate::io::write_curve_json(path, &run.entry)?;
    }

    Ok(())
}

fn load_samples(args: &FitArgs) -> Result<SampleSet, AppError> {
    match (&args.input, &args.x, &args.y) {
        (Some(path), _, _) => {
            let content_type = content_type_for_path(path)?;
            let bytes = std::fs::read(path)
                .map_err(|e| AppError::Io(format!("Failed to read '{}': {e}", path.display())))?;
            read_samples(content_type, &bytes)
        }
        (None, Some(x), Some(y)) => parse_manual(x, y),
        _ => Err(AppError::invalid("Provide --input FILE or both --x and --y.")),
    }
}

/// Rewrite argv so `poly` defaults to `poly serve`.
///
/// Rules:
/// - `poly`                     -> `poly serve`
/// - `poly --port 8080 ...`     -> `poly serve --port 8080 ...`
/// - `poly --help/--version/-h` -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("serve".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    if arg1.starts_with('-') {
        argv.insert(1, "serve".to_string());
    }
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_serves() {
        assert_eq!(rewrite_args(argv(&["poly"])), argv(&["poly", "serve"]));
        assert_eq!(
            rewrite_args(argv(&["poly", "--port", "8080"])),
            argv(&["poly", "serve", "--port", "8080"])
        );
    }

    #[test]
    fn subcommands_and_help_are_untouched() {
        assert_eq!(rewrite_args(argv(&["poly", "--help"])), argv(&["poly", "--help"]));
        assert_eq!(
            rewrite_args(argv(&["poly", "fit", "-i", "a.csv"])),
            argv(&["poly", "fit", "-i", "a.csv"])
        );
    }

    #[test]
    fn load_samples_reads_csv_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        std::fs::write(&path, "1,2,3\n2,4,6\n").unwrap();

        let cli = crate::cli::Cli::try_parse_from(["poly", "fit", "-i", path.to_str().unwrap()]).unwrap();
        let Command::Fit(args) = cli.command else {
            panic!("expected fit");
        };
        let samples = load_samples(&args).unwrap();
        assert_eq!(samples.ys(), &[2.0, 4.0, 6.0]);
    }

    #[test]
    fn fit_command_exports_curve_and_csv() {
        let dir = tempfile::tempdir().unwrap();
        let curve = dir.path().join("curve.json");
        let csv = dir.path().join("fit.csv");

        let cli = crate::cli::Cli::try_parse_from([
            "poly",
            "fit",
            "--x",
            "1,2,3,4",
            "--y",
            "1,4,9,16",
            "--degree",
            "2",
            "--export-curve",
            curve.to_str().unwrap(),
            "--export",
            csv.to_str().unwrap(),
        ])
        .unwrap();
        let Command::Fit(args) = cli.command else {
            panic!("expected fit");
        };
        handle_fit(args).unwrap();

        let loaded = crate::io::read_curve_json(&curve).unwrap();
        assert_eq!(loaded.degree, 2);
        assert!(csv.exists());
    }
}
