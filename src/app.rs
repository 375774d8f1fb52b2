//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - sets up logging
//! - loads and decodes the market dataset
//! - prints reports/plots
//! - writes optional exports

use clap::Parser;
use tracing::info;

use crate::cli::{Command, CompareArgs, DrillArgs, ExportArgs, ExportFormat, SegmentArgs, SourceArgs};
use crate::domain::{DashboardConfig, DataSource};
use crate::error::AppError;

pub mod pipeline;

use pipeline::DrillTarget;

/// Comparison mode shows at most this many years side by side.
const MAX_COMPARE_YEARS: usize = 4;

/// Entry point for the `mkt` binary.
pub fn run() -> Result<(), AppError> {
    // `mkt` and `mkt -f data.json` behave like `mkt tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    let (verbose, tui) = match &cli.command {
        Command::Overview(a) => (a.verbose, false),
        Command::Tui(a) => (a.verbose, true),
        Command::Segment(a) => (a.source.verbose, false),
        Command::Drill(a) => (a.source.verbose, false),
        Command::Compare(a) => (a.source.verbose, false),
        Command::Export(a) => (a.source.verbose, false),
    };
    let log_notice = crate::logging::init(verbose, tui);

    match cli.command {
        Command::Overview(args) => handle_overview(args),
        Command::Segment(args) => handle_segment(args),
        Command::Drill(args) => handle_drill(args),
        Command::Compare(args) => handle_compare(args),
        Command::Export(args) => handle_export(args),
        Command::Tui(args) => handle_tui(args, log_notice),
    }
}

fn handle_overview(args: SourceArgs) -> Result<(), AppError> {
    let config = config_from_args(&args)?;
    let dataset = pipeline::load(&config)?;
    let screen = pipeline::overview_screen(&dataset, &config);

    println!("{}", crate::report::format_overview(&dataset, &screen.kpis, &config));

    if config.plot {
        let plot = crate::plot::render_trend_plot(&dataset.total_market, config.plot_width, config.plot_height);
        println!("{plot}");
    }
    Ok(())
}

fn handle_segment(args: SegmentArgs) -> Result<(), AppError> {
    let config = config_from_args(&args.source)?;
    let dataset = pipeline::load(&config)?;
    let mut screen = pipeline::segment_screen(&dataset, args.axis, &config);
    if args.measured {
        screen.stacked = crate::view::measured_stacked_views(&dataset, args.axis, config.selected_year);
    }

    println!(
        "{}",
        crate::report::format_segment_detail(&screen.view, &screen.kpis, &screen.growth, &screen.stacked, &config)
    );
    Ok(())
}

fn handle_drill(args: DrillArgs) -> Result<(), AppError> {
    let config = config_from_args(&args.source)?;
    let dataset = pipeline::load(&config)?;

    let target = match (&args.related, args.stacked_by, &args.sub) {
        (Some(related), _, _) => DrillTarget::Related(related),
        (None, Some(stack_axis), Some(sub)) => DrillTarget::Stacked {
            stack_axis,
            sub_segment: sub,
        },
        _ => DrillTarget::Category,
    };
    let drill = pipeline::resolve_drill(&dataset, args.axis, &args.name, target, &config)?;

    println!("{}", crate::report::format_drill_down(&drill, &config));

    if config.plot {
        let plot = crate::plot::render_trend_plot(&drill.series, config.plot_width, config.plot_height);
        println!("{plot}");
    }
    Ok(())
}

fn handle_compare(args: CompareArgs) -> Result<(), AppError> {
    let config = config_from_args(&args.source)?;
    if args.years.len() > config.max_compare_years {
        return Err(AppError::usage(format!(
            "At most {} years can be compared (got {})",
            config.max_compare_years,
            args.years.len()
        )));
    }
    let selection = crate::view::YearSelection::from_years(&args.years, config.max_compare_years)
        .ok_or_else(|| AppError::usage("Select at least one year to compare"))?;

    let dataset = pipeline::load(&config)?;
    let view = crate::view::segment_view(&dataset, args.axis);
    let rows = crate::view::year_comparison(view.series, selection.years());

    println!("{}", crate::report::format_comparison(view.title, &rows, selection.years()));
    Ok(())
}

fn handle_export(args: ExportArgs) -> Result<(), AppError> {
    let config = config_from_args(&args.source)?;
    let dataset = pipeline::load(&config)?;

    match args.format {
        ExportFormat::Json => {
            crate::io::write_dataset_json(&args.out, &dataset, &config.source.describe())?;
        }
        ExportFormat::Csv => {
            let series = match args.axis {
                Some(axis) => dataset.segments(axis).as_slice().to_vec(),
                None => vec![dataset.total_market.clone()],
            };
            crate::io::write_series_csv(&args.out, &series, &dataset.years)?;
        }
    }

    info!(path = %args.out.display(), format = ?args.format, "export written");
    Ok(())
}

fn handle_tui(args: SourceArgs, log_notice: Option<String>) -> Result<(), AppError> {
    let config = config_from_args(&args)?;
    crate::tui::run(config, log_notice)
}

pub fn config_from_args(args: &SourceArgs) -> Result<DashboardConfig, AppError> {
    if args.forecast_year <= args.base_year {
        return Err(AppError::usage(format!(
            "Forecast year ({}) must be after base year ({})",
            args.forecast_year, args.base_year
        )));
    }

    let source = match (&args.file, &args.url) {
        (Some(path), _) => DataSource::File(path.clone()),
        (None, Some(url)) => DataSource::Url(url.clone()),
        (None, None) => DataSource::Url(crate::data::env_url()),
    };

    Ok(DashboardConfig {
        source,
        selected_year: args.year,
        base_year: args.base_year,
        forecast_year: args.forecast_year,
        max_compare_years: MAX_COMPARE_YEARS,
        plot: args.plot,
        plot_width: args.width,
        plot_height: args.height,
    })
}

/// Rewrite argv so `mkt` defaults to `mkt tui`.
///
/// Rules:
/// - `mkt`                      -> `mkt tui`
/// - `mkt -f data.json ...`     -> `mkt tui -f data.json ...`
/// - `mkt --help/--version/-h`  -> unchanged (show top-level help/version)
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
        "overview" | "segment" | "drill" | "compare" | "export" | "tui"
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
