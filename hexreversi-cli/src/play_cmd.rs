//! Play command - one game between two strategies, printed turn by turn
//!
//! ## Architecture
//!
//! - Level 1: run() - orchestration
//! - Level 2: BoardArgs::resolve(), play_game(), report_result()
//! - Level 3: formatting

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use hexreversi_core::{Game, GameConfig, GameResult, ReadOnlyGame, Shape, StrategyKind, Tile};

use crate::controller::{Action, Controller};
use crate::render::{render_board, render_scores};

// ============================================================================
// COMMAND ARGUMENTS
// ============================================================================

/// Board and player selection shared by every command
#[derive(Args, Clone, Debug, Default)]
pub struct BoardArgs {
    /// JSON game configuration; flags below override it
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Board shape (hex or square)
    #[arg(long)]
    pub shape: Option<Shape>,

    /// Rings for hex, side length for square
    #[arg(long)]
    pub size: Option<usize>,

    /// Black player (highscore, avoidcorners, combo)
    #[arg(long)]
    pub black: Option<StrategyKind>,

    /// White player (highscore, avoidcorners, combo)
    #[arg(long)]
    pub white: Option<StrategyKind>,
}

impl BoardArgs {
    /// Config file (or defaults) with command-line overrides applied
    pub fn resolve(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::load(path)
                .with_context(|| format!("Failed to load config: {}", path.display()))?,
            None => GameConfig::default(),
        };
        if let Some(shape) = self.shape {
            config.shape = shape;
        }
        if let Some(size) = self.size {
            config.size = size;
        }
        if let Some(black) = self.black {
            config.black = black;
        }
        if let Some(white) = self.white {
            config.white = white;
        }
        config.topology().context("Invalid board")?;
        Ok(config)
    }
}

#[derive(Args)]
pub struct PlayArgs {
    #[command(flatten)]
    pub board: BoardArgs,

    /// Only print the final position
    #[arg(long)]
    pub quiet: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run play command
pub fn run(args: PlayArgs) -> Result<()> {
    let config = args.board.resolve()?;

    tracing::info!(
        "Starting {} game (size {}): black={} white={}",
        config.shape,
        config.size,
        config.black,
        config.white
    );

    let game = config.new_game()?;
    if !args.quiet {
        println!("{}\n", render_board(&game));
    }

    let (game, actions) = play_game(&config, game, args.quiet)?;
    report_result(&game, actions.len());

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn play_game(config: &GameConfig, game: Game, quiet: bool) -> Result<(Game, Vec<Action>)> {
    let controller = Controller::from_config(config);
    controller.run(game, |game, action| {
        tracing::debug!(?action, "action");
        if !quiet {
            println!("{}", describe_action(action));
            println!("{}", render_board(game));
            println!("{}\n", render_scores(game));
        }
    })
}

fn report_result(game: &Game, actions: usize) {
    println!("{}", render_board(game));
    println!("\n=== Game Over ({} actions) ===", actions);
    println!("{}", describe_result(game.result()));
    println!(
        "Scores: black: {} white: {}",
        game.score(Tile::Black),
        game.score(Tile::White)
    );
}

// ============================================================================
// LEVEL 3 - FORMATTING
// ============================================================================

fn describe_action(action: &Action) -> String {
    match action {
        Action::Move { color, coord } => format!("{:?} plays {}", color, coord),
        Action::Pass(color) => format!("{:?} passes", color),
    }
}

fn describe_result(result: GameResult) -> &'static str {
    match result {
        GameResult::BlackWins => "Black wins!",
        GameResult::WhiteWins => "White wins!",
        GameResult::Draw => "Tie game!",
        GameResult::Ongoing => "Game still in progress",
    }
}
