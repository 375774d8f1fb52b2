//! Command-line parsing for the market dashboard.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the decoding/allocation code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::domain::{BASE_YEAR, DEFAULT_SELECTED_YEAR, FORECAST_YEAR, SegmentAxis};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "mkt", version, about = "Market research dashboard (terminal edition)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Total market KPIs, YoY trend and the distribution of every segmentation.
    Overview(SourceArgs),
    /// Detail screen for one segmentation: KPIs, growth table, stacked breakdowns.
    Segment(SegmentArgs),
    /// Drill into one category (and optionally a related or stacked sub-segment).
    Drill(DrillArgs),
    /// Compare up to four years for one segmentation.
    Compare(CompareArgs),
    /// Write the expanded dataset (JSON) or one segmentation (CSV).
    Export(ExportArgs),
    /// Launch the interactive TUI.
    Tui(SourceArgs),
}

/// Where to load data from and which years to look at.
#[derive(Debug, Args, Clone)]
pub struct SourceArgs {
    /// Dataset URL (defaults to `MARKET_DATA_URL`, then a local dev server).
    #[arg(long, conflicts_with = "file")]
    pub url: Option<String>,

    /// Read the compact dataset from a local JSON file instead of fetching it.
    #[arg(short = 'f', long, value_name = "JSON")]
    pub file: Option<PathBuf>,

    /// Selected year for KPIs, distributions and breakdowns.
    #[arg(short = 'y', long, default_value_t = DEFAULT_SELECTED_YEAR)]
    pub year: i32,

    /// Base year for growth figures.
    #[arg(long, default_value_t = BASE_YEAR)]
    pub base_year: i32,

    /// Forecast year for growth figures.
    #[arg(long, default_value_t = FORECAST_YEAR)]
    pub forecast_year: i32,

    /// Render an ASCII trend plot where the command supports one.
    #[arg(long)]
    pub plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 80)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,

    /// Debug-level logging (overridden by `RUST_LOG`).
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

#[derive(Debug, Args, Clone)]
pub struct SegmentArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Segmentation axis.
    #[arg(value_enum)]
    pub axis: SegmentAxis,

    /// Read stacked breakdowns from the payload's cross-tabs when present
    /// instead of the proportional estimate.
    #[arg(long)]
    pub measured: bool,
}

#[derive(Debug, Args, Clone)]
pub struct DrillArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Segmentation axis of the category.
    #[arg(value_enum)]
    pub axis: SegmentAxis,

    /// Category name, exactly as in the dataset.
    pub name: String,

    /// Open a related segment of the category (second drill level).
    #[arg(long, conflicts_with = "stacked_by")]
    pub related: Option<String>,

    /// Break the category down by another axis...
    #[arg(long, value_enum, requires = "sub")]
    pub stacked_by: Option<SegmentAxis>,

    /// ...and open this sub-segment of the stacked bar.
    #[arg(long, requires = "stacked_by")]
    pub sub: Option<String>,
}

#[derive(Debug, Args, Clone)]
pub struct CompareArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Segmentation axis.
    #[arg(value_enum)]
    pub axis: SegmentAxis,

    /// Years to compare (comma separated, at most four).
    #[arg(long, value_delimiter = ',', required = true)]
    pub years: Vec<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Json,
    Csv,
}

#[derive(Debug, Args, Clone)]
pub struct ExportArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Output path.
    #[arg(short = 'o', long, value_name = "PATH")]
    pub out: PathBuf,

    #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
    pub format: ExportFormat,

    /// Segmentation to export (CSV only; defaults to the total market).
    #[arg(long, value_enum)]
    pub axis: Option<SegmentAxis>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_drill_with_stacked_sub_segment() {
        let cli = Cli::parse_from([
            "mkt", "drill", "end-user", "OE", "--stacked-by", "region", "--sub", "Europe", "-f", "data.json",
        ]);
        let Command::Drill(args) = cli.command else {
            panic!("expected drill");
        };
        assert_eq!(args.axis, SegmentAxis::EndUser);
        assert_eq!(args.stacked_by, Some(SegmentAxis::Region));
        assert_eq!(args.sub.as_deref(), Some("Europe"));
        assert_eq!(args.source.year, DEFAULT_SELECTED_YEAR);
    }

    #[test]
    fn segment_measured_is_opt_in() {
        let cli = Cli::parse_from(["mkt", "segment", "end-user", "-f", "data.json"]);
        let Command::Segment(args) = cli.command else {
            panic!("expected segment");
        };
        assert!(!args.measured);

        let cli = Cli::parse_from(["mkt", "segment", "end-user", "--measured", "-f", "data.json"]);
        let Command::Segment(args) = cli.command else {
            panic!("expected segment");
        };
        assert!(args.measured);
    }

    #[test]
    fn parses_compare_years_list() {
        let cli = Cli::parse_from(["mkt", "compare", "application", "--years", "2016,2024,2034"]);
        let Command::Compare(args) = cli.command else {
            panic!("expected compare");
        };
        assert_eq!(args.years, vec![2016, 2024, 2034]);
    }
}
