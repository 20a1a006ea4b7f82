//! Command-line parsing for the polynomial fitting service.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the fitting/rendering code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::DegreeSpec;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "poly", version, about = "Polynomial curve fitting web form")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the web form (default when no subcommand is given).
    Serve(ServeArgs),
    /// Fit samples from a file or inline lists and print the result.
    Fit(FitArgs),
}

/// Web server options. Each flag can also come from the environment (or `.env`).
#[derive(Debug, Args, Clone)]
pub struct ServeArgs {
    /// Interface to bind.
    #[arg(long, env = "POLY_BIND", default_value = "0.0.0.0")]
    pub bind: String,

    /// Port to listen on.
    #[arg(short = 'p', long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// Directory rendered images are written to and served from under `/static`.
    #[arg(long, env = "POLY_STATIC_DIR", default_value = "static")]
    pub static_dir: PathBuf,

    /// Image width (pixels).
    #[arg(long, default_value_t = 1000)]
    pub width: u32,

    /// Image height (pixels).
    #[arg(long, default_value_t = 500)]
    pub height: u32,

    /// Maximum accepted request body (uploads included), in bytes.
    #[arg(long, default_value_t = 10 * 1024 * 1024)]
    pub max_upload_bytes: usize,
}

/// Options for a one-off fit.
#[derive(Debug, Args, Clone)]
pub struct FitArgs {
    /// Sample file (.txt, .csv or .docx): first line x-values, second line y-values.
    #[arg(short = 'i', long, required_unless_present = "x", conflicts_with_all = ["x", "y"])]
    pub input: Option<PathBuf>,

    /// Comma-separated x-values (instead of --input).
    #[arg(long, requires = "y")]
    pub x: Option<String>,

    /// Comma-separated y-values (instead of --input).
    #[arg(long, requires = "x")]
    pub y: Option<String>,

    /// Polynomial degree, or `auto` to pick the best of 1..=3 by R².
    #[arg(short = 'd', long, default_value = "auto")]
    pub degree: DegreeSpec,

    /// Chart title.
    #[arg(long, default_value = "Curve fit")]
    pub title: String,

    /// X-axis label.
    #[arg(long, default_value = "x")]
    pub x_label: String,

    /// Y-axis label.
    #[arg(long, default_value = "y")]
    pub y_label: String,

    /// Render the chart to this PNG path.
    #[arg(short = 'o', long)]
    pub out: Option<PathBuf>,

    /// Export per-sample fitted values to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export curve (degree + coefficients + fitted grid) to JSON.
    #[arg(long = "export-curve")]
    pub export_curve: Option<PathBuf>,

    /// Image width (pixels).
    #[arg(long, default_value_t = 1000)]
    pub width: u32,

    /// Image height (pixels).
    #[arg(long, default_value_t = 500)]
    pub height: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_accepts_inline_lists() {
        let cli = Cli::try_parse_from(["poly", "fit", "--x", "1,2,3", "--y", "2,4,6", "-d", "1"]).unwrap();
        let Command::Fit(args) = cli.command else {
            panic!("expected fit");
        };
        assert_eq!(args.degree, DegreeSpec::Fixed(1));
        assert_eq!(args.x.as_deref(), Some("1,2,3"));
    }

    #[test]
    fn fit_rejects_input_and_lists_together() {
        let res = Cli::try_parse_from(["poly", "fit", "-i", "a.txt", "--x", "1", "--y", "2"]);
        assert!(res.is_err());
    }

    #[test]
    fn fit_needs_some_samples() {
        assert!(Cli::try_parse_from(["poly", "fit"]).is_err());
        assert!(Cli::try_parse_from(["poly", "fit", "--x", "1,2"]).is_err());
    }

    #[test]
    fn degree_defaults_to_auto() {
        let cli = Cli::try_parse_from(["poly", "fit", "-i", "data.csv"]).unwrap();
        let Command::Fit(args) = cli.command else {
            panic!("expected fit");
        };
        assert_eq!(args.degree, DegreeSpec::Auto);
    }
}
