mod script;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use grid::render::SvgSurface;
use grid::surface::Observer;
use grid::{Cell, Engine, GridData, GridError, Settings};
use serde::Serialize;
use tracing::{debug, info};

use crate::script::ScriptError;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("invalid grid file {path}: {source}")]
    GridFile { path: PathBuf, source: serde_json::Error },
    #[error("script {path}: {source}")]
    Script { path: PathBuf, source: ScriptError },
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("stdout: {0}")]
    Stdout(io::Error),
}

#[derive(Parser, Debug)]
#[command(name = "digviewer", about = "Render dataset grids and replay selections")]
struct Cli {
    /// Log each cell state change.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the grid as SVG. With --out, the selection is printed to stdout.
    Render(GridArgs),
    /// Print the selected cells as JSON.
    Selected(GridArgs),
}

#[derive(Args, Debug)]
struct GridArgs {
    /// Grid file: `{ "datasets": [...], "rows": [...], "columns": [...], "groups": [...] }`.
    #[arg(long)]
    input: PathBuf,

    /// Settings JSON file.
    #[arg(long, env = "DIGVIEWER_SETTINGS")]
    settings: Option<PathBuf>,

    /// Selection script replayed after loading.
    #[arg(long)]
    script: Option<PathBuf>,

    /// SVG output path; stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,

    #[arg(long, default_value_t = 0.0)]
    width: f64,

    #[arg(long, default_value_t = 0.0)]
    height: f64,
}

/// Observer that logs host notifications.
#[derive(Debug, Default)]
struct LogObserver {
    changes: usize,
}

impl Observer for LogObserver {
    fn grid_loaded(&mut self) {
        info!("grid loaded");
    }

    fn cell_state_changed(&mut self, cell: &Cell, selected: bool) {
        self.changes += 1;
        debug!(row = %cell.row, column = %cell.column, selected, "cell state changed");
    }

    fn grid_selection_changed(&mut self) {
        info!(changes = self.changes, "selection changed");
    }
}

#[derive(Serialize)]
struct SelectionReport<'a> {
    count: usize,
    selected: Vec<&'a Cell>,
}

fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    let level = if cli.verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    tracing_subscriber::fmt().with_max_level(level).with_writer(io::stderr).init();

    match cli.command {
        Command::Render(args) => run_render(&args),
        Command::Selected(args) => run_selected(&args),
    }
}

fn run_render(args: &GridArgs) -> Result<(), CliError> {
    let engine = load(args)?;
    let svg = engine.surface().markup();
    match &args.out {
        Some(path) => {
            fs::write(path, svg).map_err(|source| CliError::Write { path: path.clone(), source })?;
            info!(path = %path.display(), bytes = svg.len(), "svg written");
            print_selection(&engine)
        }
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{svg}").map_err(CliError::Stdout)
        }
    }
}

fn run_selected(args: &GridArgs) -> Result<(), CliError> {
    let engine = load(args)?;
    print_selection(&engine)
}

/// Build an engine, draw the grid, and replay the script if one was given.
fn load(args: &GridArgs) -> Result<Engine<SvgSurface, LogObserver>, CliError> {
    let settings = match &args.settings {
        Some(path) => Settings::from_json(&read(path)?)?,
        None => Settings::default(),
    };
    let data: GridData = serde_json::from_str(&read(&args.input)?)
        .map_err(|source| CliError::GridFile { path: args.input.clone(), source })?;

    let mut engine = Engine::new(settings, SvgSurface::new(), LogObserver::default());
    engine.set_viewport(args.width, args.height)?;
    engine.draw_grid(data)?;

    if let Some(path) = &args.script {
        let commands =
            script::parse(&read(path)?).map_err(|source| CliError::Script { path: path.clone(), source })?;
        script::replay(&mut engine, &commands)?;
    }
    Ok(engine)
}

fn print_selection(engine: &Engine<SvgSurface, LogObserver>) -> Result<(), CliError> {
    let selected = engine.selected_cells();
    let report = SelectionReport { count: selected.len(), selected };
    let json = serde_json::to_string_pretty(&report)?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{json}").map_err(CliError::Stdout)
}

fn read(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Read { path: path.to_path_buf(), source })
}
