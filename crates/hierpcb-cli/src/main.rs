mod error;

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use hierpcb_board::{Board, JsonBoardLoader, StableId};
use hierpcb_engine::{
    anchor_candidates, enforce, EngineConfig, SelectionStore, SubLayoutCache,
};
use hierpcb_hierarchy::{
    reset_to_default_where, EnforcementSelection, Hierarchy, SheetPath, SubLayoutBinding,
};
use tracing::{info, warn};

use crate::error::{exit_code, CliError, ErrorCode};

#[derive(Parser)]
#[command(version, about = "Propagate sub-layouts into hierarchical board instances", long_about = None)]
struct Cli {
    /// Also write logs to this file
    #[arg(long, global = true, value_name = "FILE")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the board's hierarchy and the sub-layouts bound to it
    Tree {
        #[arg(value_name = "BOARD")]
        board: PathBuf,

        /// Engine configuration (YAML)
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
    /// List anchor candidates of a sub-layout, best guess first
    Anchors {
        #[arg(value_name = "SUBLAYOUT")]
        sub_layout: PathBuf,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Enforce sub-layouts onto the selected instances
    Run(RunArgs),
}

#[derive(Args)]
struct RunArgs {
    #[arg(value_name = "BOARD")]
    board: PathBuf,

    /// Instance to enforce, optionally with its anchor (`/a/b=/sw1`)
    #[arg(long = "select", value_name = "PATH[=ANCHOR]", value_parser = parse_selector)]
    select: Vec<Selector>,

    /// Ignore the saved selection and enforce the default instances
    #[arg(long, conflicts_with = "select")]
    defaults: bool,

    /// Engine configuration (YAML)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write the result here instead of overwriting BOARD
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Plan and report without writing anything
    #[arg(long)]
    dry_run: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone)]
struct Selector {
    path: SheetPath,
    anchor: Option<StableId>,
}

fn parse_selector(raw: &str) -> Result<Selector, CliError> {
    let (path, anchor) = match raw.split_once('=') {
        Some((path, anchor)) => (path, Some(anchor)),
        None => (raw, None),
    };
    if !path.starts_with('/') {
        return Err(CliError::usage(format!("instance path must start with '/': {path}")));
    }
    let anchor = match anchor {
        Some(a) if a.is_empty() => return Err(CliError::usage("empty anchor")),
        Some(a) => Some(StableId::new(a)),
        None => None,
    };
    Ok(Selector {
        path: SheetPath::from(path.to_string()),
        anchor,
    })
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = if err.use_stderr() {
                ErrorCode::Usage.status()
            } else {
                0
            };
            let _ = err.print();
            std::process::exit(code);
        }
    };

    if let Err(err) = init_logging(cli.log_file.as_deref()) {
        eprintln!("error: {err:#}");
        std::process::exit(ErrorCode::Input.status());
    }

    if let Err(err) = dispatch(cli.command) {
        eprintln!("error: {err:#}");
        std::process::exit(exit_code(&err).status());
    }
}

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let file_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("could not open log file {}", path.display()))?;
            Some(
                fmt::layer()
                    .with_writer(Mutex::new(file))
                    .with_ansi(false)
                    .with_target(true),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();
    Ok(())
}

fn dispatch(command: Command) -> Result<()> {
    match command {
        Command::Tree { board, config } => tree(&board, config.as_deref()),
        Command::Anchors { sub_layout, json } => anchors(&sub_layout, json),
        Command::Run(args) => run(args),
    }
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(path) => Ok(EngineConfig::load(path)?),
        None => Ok(EngineConfig::default()),
    }
}

fn build_hierarchy(board_path: &Path, board: &Board, config: &EngineConfig) -> Hierarchy {
    let base_dir = board_path.parent().unwrap_or_else(|| Path::new(""));
    let binding = SubLayoutBinding::new(base_dir, config.sublayout_extension.as_str());
    Hierarchy::from_board(board, &binding)
}

fn tree(board_path: &Path, config: Option<&Path>) -> Result<()> {
    let config = load_config(config)?;
    let board = Board::load(board_path)?;
    let hierarchy = build_hierarchy(board_path, &board, &config);
    println!("{}", hierarchy.render_tree());
    Ok(())
}

fn anchors(path: &Path, json: bool) -> Result<()> {
    let sub = Board::load(path)?;
    let candidates = anchor_candidates(&sub, EngineConfig::default().ignore_region);
    if candidates.is_empty() {
        return Err(CliError::input(format!(
            "{} has no footprints with schematic paths",
            path.display()
        ))
        .into());
    }
    if json {
        println!("{}", serde_json::to_string_pretty(&candidates)?);
        return Ok(());
    }
    for (i, candidate) in candidates.iter().enumerate() {
        let marker = if i == 0 { "*" } else { " " };
        println!(
            "{marker} {}\t{}\t{:.2}",
            candidate.stable_id, candidate.reference, candidate.area
        );
    }
    Ok(())
}

fn run(args: RunArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let mut board = Board::load(&args.board)?;
    let hierarchy = build_hierarchy(&args.board, &board, &config);
    let cache = SubLayoutCache::new(JsonBoardLoader);
    let store = SelectionStore::for_board(&args.board);

    let selection = if !args.select.is_empty() {
        let mut selection = EnforcementSelection::new();
        for selector in args.select {
            selection.enable(selector.path, selector.anchor);
        }
        selection
    } else {
        let saved = if args.defaults {
            EnforcementSelection::new()
        } else {
            store.load()?
        };
        if saved.is_empty() {
            info!("no saved selection, enforcing default instances");
            reset_to_default_where(&hierarchy, |node| {
                node.sub_layout.as_deref().is_some_and(|path| match cache.get(path) {
                    Ok(sub) => !sub.footprints.is_empty(),
                    Err(err) => {
                        warn!(%err, "skipping unreadable sub-layout");
                        false
                    }
                })
            })
        } else {
            saved
        }
    };

    let report = enforce(&mut board, &hierarchy, &selection, &cache, &config)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{report}");
    }

    if args.dry_run {
        info!("dry run, nothing written");
    } else {
        let target = args.output.as_deref().unwrap_or(&args.board);
        board.save(target)?;
        store.save(&report.selection_used(&hierarchy, &selection))?;
        info!(board = %target.display(), selection = %store.path().display(), "saved");
    }

    let failed = report.failed().count();
    if failed > 0 {
        return Err(CliError::processing(format!("{failed} job(s) failed")).into());
    }
    Ok(())
}
