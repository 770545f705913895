use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use log::{error, info, warn};
use serde_json::json;
use simplelog::{Config, LevelFilter, WriteLogger};

use pagefit::fit::{FitRequest, FitTarget, Rotation};
use pagefit::geometry::{Orientation, ReadingDirection, Size};
use pagefit::layout::compute_layout;
use pagefit::library::PageLibrary;
use pagefit::panic_handler;
use pagefit::settings::Settings;
use pagefit::sort::sort_alphanumeric;
use pagefit::spread::SpreadPlanner;
use pagefit::zoom::ZoomMode;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Settings file, defaults to the user config directory
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, default_value = "info")]
    log_level: LevelFilter,

    #[arg(long, default_value = "pagefit.log")]
    log_file: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print names in alphanumeric order
    Sort { names: Vec<String> },

    /// Fit a WxH source into a WxH target; -1 leaves an axis unbounded
    Fit {
        source: Size,
        #[arg(value_parser = parse_fit_target, allow_hyphen_values = true)]
        target: FitTarget,
        /// Ignore the aspect ratio
        #[arg(long)]
        stretch: bool,
        #[arg(long)]
        scale_up: bool,
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        rotation: i32,
    },

    /// Lay out pages of the given sizes in a viewport
    Layout {
        #[arg(long)]
        viewport: Size,
        #[arg(long)]
        manga: bool,
        #[arg(long, default_value_t = 0)]
        spacing: i32,
        /// Axis pages are centered on, 0 or 1
        #[arg(long, default_value_t = 1)]
        alignment: usize,
        #[arg(required = true)]
        pages: Vec<Size>,
    },

    /// Plan the spread shown at a page of a directory
    Plan {
        dir: PathBuf,
        #[arg(long)]
        viewport: Size,
        #[arg(long, default_value_t = 0)]
        page: usize,
        #[arg(long)]
        double: bool,
        #[arg(long)]
        manga: bool,
        #[arg(long, value_parser = parse_zoom_mode)]
        zoom: Option<ZoomMode>,
    },
}

fn parse_fit_target(s: &str) -> std::result::Result<FitTarget, String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WxH, got {s:?}"))?;
    let w = w.trim().parse::<i32>().map_err(|e| format!("bad width {w:?}: {e}"))?;
    let h = h.trim().parse::<i32>().map_err(|e| format!("bad height {h:?}: {e}"))?;
    Ok(FitTarget::new(w, h))
}

fn parse_zoom_mode(s: &str) -> std::result::Result<ZoomMode, String> {
    [
        ZoomMode::Best,
        ZoomMode::Width,
        ZoomMode::Height,
        ZoomMode::Manual,
        ZoomMode::Size,
    ]
    .into_iter()
    .find(|mode| mode.as_str().eq_ignore_ascii_case(s))
    .ok_or_else(|| format!("unknown zoom mode {s:?}, expected best, width, height, manual or size"))
}

fn load_settings(path: Option<&PathBuf>) -> Result<Settings> {
    match path {
        Some(path) => Settings::load_from_path(path),
        None => Settings::load().or_else(|e| {
            warn!("Using default settings: {e:#}");
            Ok(Settings::default())
        }),
    }
}

fn run(cli: Cli) -> Result<()> {
    let output = match cli.command {
        Command::Sort { mut names } => {
            sort_alphanumeric(&mut names);
            serde_json::to_value(names)?
        }
        Command::Fit {
            source,
            target,
            stretch,
            scale_up,
            rotation,
        } => {
            let settings = load_settings(cli.config.as_ref())?;
            let request = FitRequest::new(source, target)
                .keep_ratio(settings.keep_ratio && !stretch)
                .scale_up(scale_up || settings.scale_up)
                .rotation(Rotation::from_degrees(rotation)?);
            let size = request.fit()?;
            json!({ "request": request, "size": size })
        }
        Command::Layout {
            viewport,
            manga,
            spacing,
            alignment,
            pages,
        } => {
            let orientation = if manga { Orientation::MANGA } else { Orientation::WESTERN };
            let layout = compute_layout(&pages, viewport, orientation, spacing, alignment)?;
            serde_json::to_value(layout)?
        }
        Command::Plan {
            dir,
            viewport,
            page,
            double,
            manga,
            zoom,
        } => {
            let mut settings = load_settings(cli.config.as_ref())?;
            if double {
                settings.double_page = true;
            }
            if manga {
                settings.reading_direction = ReadingDirection::Manga;
            }
            if let Some(zoom) = zoom {
                settings.zoom_mode = zoom;
            }

            let library = PageLibrary::scan(&dir, settings.scan_options())?;
            if library.is_empty() {
                bail!("No pages found in {}", dir.display());
            }
            let sizes = library.sizes();
            let planner = SpreadPlanner::new(settings.spread_options());
            let plan = planner
                .plan(&sizes, page, viewport)
                .with_context(|| format!("Failed to plan page {page} of {}", dir.display()))?;
            let files: Vec<_> = plan.pages.iter().filter_map(|&p| library.get(p)).collect();

            json!({
                "files": files,
                "plan": plan,
                "next": planner.next_index(&sizes, page),
                "previous": planner.previous_index(&sizes, page),
            })
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    WriteLogger::init(
        cli.log_level,
        Config::default(),
        File::create(&cli.log_file).with_context(|| format!("Failed to create log file {:?}", cli.log_file))?,
    )?;
    panic_handler::initialize_panic_handler();

    info!("Starting pagefit");
    let res = run(cli);
    if let Err(err) = &res {
        error!("Application error: {err:?}");
    }
    info!("Shutting down pagefit");
    res
}
