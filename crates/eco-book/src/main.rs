//! ECO Book - query the ECO opening classification from the command line.

mod output;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use eco_graph::notation::movetext_tokens;
use eco_graph::{ClassificationGraph, SharedGraph};
use opening_book::{BookConfig, BookGame, BookOptions, BookPosInput, BookRegistry, BookSource, EcoBook};
use output::MovesReport;
use rand::rngs::StdRng;
use rand::SeedableRng;
use shakmaty::fen::Fen;
use shakmaty::san::San;
use shakmaty::{CastlingMode, Chess};

#[derive(Parser)]
#[command(name = "eco-book")]
#[command(about = "ECO opening book and classifier")]
struct Cli {
    /// Configuration file (defaults to book.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Opening dataset (.json or .tsv) to use instead of the built-in one
    #[arg(long, global = true)]
    dataset: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the book moves for a position
    Moves {
        #[command(flatten)]
        position: PositionArgs,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Name the opening reached by a move sequence
    Classify {
        #[command(flatten)]
        position: PositionArgs,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Pick a weighted random book move
    Pick {
        #[command(flatten)]
        position: PositionArgs,
        /// Seed for reproducible picks
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Show classification graph size
    Stats,
}

#[derive(clap::Args)]
struct PositionArgs {
    /// Moves from the start position, in SAN or UCI (move numbers allowed)
    moves: Vec<String>,
    /// Start from this FEN instead of the standard position
    #[arg(long)]
    fen: Option<String>,
}

impl PositionArgs {
    fn game(&self) -> anyhow::Result<BookGame> {
        let start = match &self.fen {
            Some(fen) => parse_fen(fen)?,
            None => Chess::default(),
        };
        replay(start, &self.moves.join(" "))
    }
}

fn parse_fen(fen: &str) -> anyhow::Result<Chess> {
    let fen: Fen = fen.parse().map_err(|e| anyhow!("invalid FEN '{}': {}", fen, e))?;
    fen.into_position::<Chess>(CastlingMode::Standard)
        .map_err(|e| anyhow!("illegal FEN position: {}", e))
}

fn replay(start: Chess, movetext: &str) -> anyhow::Result<BookGame> {
    let mut game = BookGame::from_position(start);
    for (ply, token) in movetext_tokens(movetext).iter().enumerate() {
        game.play(token)
            .with_context(|| format!("move {} '{}'", ply + 1, token))?;
    }
    Ok(game)
}

/// Book options from the configuration, with the ECO book selected when no
/// configuration file is given and `book.toml` is absent.
fn load_config(path: Option<&Path>) -> anyhow::Result<BookConfig> {
    let path = match path {
        Some(path) if !path.exists() => {
            anyhow::bail!("config file {} does not exist", path.display())
        }
        Some(path) => path.to_path_buf(),
        None => {
            let default = BookConfig::config_path();
            if !default.exists() {
                return Ok(BookConfig {
                    book: BookOptions::new(BookSource::ECO_TOKEN),
                    ..BookConfig::default()
                });
            }
            default
        }
    };
    tracing::info!("Loading config from {:?}", path);
    BookConfig::load_from(&path).with_context(|| format!("loading {}", path.display()))
}

fn build_graph(shared: &SharedGraph) -> anyhow::Result<&ClassificationGraph> {
    shared
        .get()
        .map_err(|e| anyhow!("failed to build classification graph: {}", e))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    if cli.dataset.is_some() {
        config.dataset = cli.dataset;
    }
    match &config.dataset {
        Some(path) => tracing::info!("Dataset: {:?}", path),
        None => tracing::info!("Dataset: built-in"),
    }

    let shared = Arc::new(config.shared_graph());
    let graph = build_graph(&shared)?;

    let mut registry = BookRegistry::new().with_book(Box::new(EcoBook::new(shared.clone())));
    registry.set_options(config.book);
    if registry.active_book().is_none() {
        tracing::warn!("No book selected by options ({:?})", registry.options().source);
    }

    match cli.command {
        Commands::Moves { position, json } => {
            let game = position.game()?;
            let pos = game.curr_pos();
            let report = MovesReport::new(
                &pos,
                game.ply(),
                graph.name_of(&pos),
                registry.all_book_moves(&game),
            );
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", report.to_text());
            }
        }
        Commands::Classify { position, json } => {
            let game = position.game()?;
            let result = graph.classify_game(game.start(), game.moves());
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print!("{}", output::classification_text(result.as_ref()));
            }
        }
        Commands::Pick { position, seed } => {
            let game = position.game()?;
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_os_rng(),
            };
            match registry.book_move(&game, &mut rng) {
                Some(mv) => println!("{}", San::from_move(&game.curr_pos(), mv)),
                None => println!("No book move"),
            }
        }
        Commands::Stats => print!("{}", output::stats_text(graph)),
    }

    Ok(())
}
