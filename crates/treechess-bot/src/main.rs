//! Command-line front end for the treechess engine.
//!
//! Searches a position for the best move, compares the search strategies,
//! counts move-generation leaves, or plays a game against itself.

mod config;
mod report;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use config::BotConfig;
use report::{BestMoveReport, ComparisonReport, StrategyLine};
use tracing_subscriber::EnvFilter;
use treechess_core::Description;
use treechess_engine::movegen::perft::perft_divide;
use treechess_engine::{Evaluator, Game, StalematePolicy, StrategyKind};

#[derive(Parser)]
#[command(name = "treechess-bot")]
#[command(about = "Fixed-depth chess search")]
struct Cli {
    /// Configuration file (defaults to treechess.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Search strategy: naive or alpha-beta
    #[arg(short, long, global = true)]
    strategy: Option<StrategyKind>,
    /// Search depth in plies
    #[arg(short, long, global = true)]
    depth: Option<u32>,
    /// Score stalemate as a loss for the stalemated side
    #[arg(long, global = true)]
    stalemate_loss: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search a position and print the chosen move
    Best {
        /// Position in FEN; defaults to the configured start position
        fen: Option<String>,
        /// Moves to play before searching, in coordinate notation
        #[arg(short, long, num_args = 1..)]
        moves: Vec<String>,
        /// Print a JSON report
        #[arg(long)]
        json: bool,
    },
    /// Search a position with every strategy
    Compare {
        fen: Option<String>,
        #[arg(short, long, num_args = 1..)]
        moves: Vec<String>,
        #[arg(long)]
        json: bool,
    },
    /// Count leaf positions per root move
    Perft {
        fen: Option<String>,
        #[arg(short, long, num_args = 1..)]
        moves: Vec<String>,
    },
    /// Let the engine play both sides
    Selfplay {
        fen: Option<String>,
        /// Stop after this many plies
        #[arg(long)]
        max_plies: Option<u32>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let path = cli.config.clone().unwrap_or_else(BotConfig::config_path);
    let mut config = BotConfig::load_from(&path)
        .with_context(|| format!("loading {}", path.display()))?;
    if let Some(strategy) = cli.strategy {
        config.strategy = strategy;
    }
    if let Some(depth) = cli.depth {
        config.depth = depth;
    }
    if cli.stalemate_loss {
        config.stalemate = StalematePolicy::Loss;
    }
    config.validate()?;

    match cli.command {
        Commands::Best { fen, moves, json } => best(&config, fen, &moves, json),
        Commands::Compare { fen, moves, json } => compare(&config, fen, &moves, json),
        Commands::Perft { fen, moves } => perft(&config, fen, &moves),
        Commands::Selfplay { fen, max_plies } => {
            if let Some(max_plies) = max_plies {
                config.max_plies = max_plies;
            }
            selfplay(&config, fen)
        }
    }
}

/// Builds a game from the given FEN, the configured start position, or the
/// standard one, then plays `moves`.
fn setup(config: &BotConfig, fen: Option<String>, moves: &[String]) -> Result<Game> {
    let fen = fen
        .or_else(|| config.start_fen.clone())
        .unwrap_or_else(|| Description::STARTPOS.to_string());
    let mut game = Game::from_fen(&fen).with_context(|| format!("loading position '{fen}'"))?;
    for m in moves {
        game.apply_uci(m)?;
    }
    Ok(game)
}

fn evaluator(config: &BotConfig) -> Evaluator {
    Evaluator::new(config.stalemate)
}

fn best(config: &BotConfig, fen: Option<String>, moves: &[String], json: bool) -> Result<()> {
    let mut game = setup(config, fen, moves)?;
    let start_fen = game.position().to_fen();
    let mut strategy = config.strategy.build(evaluator(config));

    tracing::info!(
        strategy = strategy.name(),
        depth = config.depth,
        fen = %start_fen,
        "searching"
    );
    let turn = game.play_turn(strategy.as_mut(), config.depth)?;
    let report = BestMoveReport::new(start_fen, strategy.name(), config.depth, &turn);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", game.position());
        println!(
            "bestmove {} score {} moves {}",
            report.best_move, report.score, report.moves_evaluated
        );
    }
    Ok(())
}

fn compare(config: &BotConfig, fen: Option<String>, moves: &[String], json: bool) -> Result<()> {
    let game = setup(config, fen, moves)?;
    let mut position = game.position().clone();
    let fen = position.to_fen();

    let mut lines = Vec::new();
    for kind in [StrategyKind::Naive, StrategyKind::AlphaBeta] {
        let mut strategy = kind.build(evaluator(config));
        let outcome = strategy.select_move(&mut position, config.depth)?;
        tracing::info!(
            strategy = strategy.name(),
            moves_evaluated = outcome.moves_evaluated,
            "search finished"
        );
        lines.push(StrategyLine::new(strategy.name(), &outcome));
    }
    let report = ComparisonReport::new(fen, config.depth, lines);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }
    for line in &report.lines {
        println!(
            "{:<12} {} score {} moves {}",
            line.strategy, line.best_move, line.score, line.moves_evaluated
        );
    }
    if !report.agree {
        bail!("strategies disagree at depth {}", config.depth);
    }
    Ok(())
}

fn perft(config: &BotConfig, fen: Option<String>, moves: &[String]) -> Result<()> {
    let game = setup(config, fen, moves)?;
    let mut position = game.position().clone();

    tracing::info!(depth = config.depth, "running perft");
    let divide = perft_divide(&mut position, config.depth);
    let mut total: u64 = 0;
    for (mv, count) in &divide {
        println!("{mv}: {count}");
        total += *count;
    }
    println!();
    println!("Nodes searched: {total}");
    Ok(())
}

fn selfplay(config: &BotConfig, fen: Option<String>) -> Result<()> {
    let mut game = setup(config, fen, &[])?;
    let mut strategy = config.strategy.build(evaluator(config));

    tracing::info!(
        strategy = strategy.name(),
        depth = config.depth,
        max_plies = config.max_plies,
        "starting self-play"
    );
    while !game.is_over() && game.history().len() < config.max_plies as usize {
        let mover = game.position().side_to_move();
        let turn = game.play_turn(strategy.as_mut(), config.depth)?;
        println!(
            "{:>3}. {} {} (score {}, moves {})",
            game.history().len(),
            mover,
            turn.mv,
            turn.score,
            turn.moves_evaluated
        );
    }

    println!("{}", game.position());
    println!("{}", game.position().to_fen());
    println!("Result: {:?} after {} plies", game.status(), game.history().len());
    Ok(())
}
