//! Match command - play a series of games between two strategies
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: play_match(), report_results()
//! - Level 3: play_single_game(), compute_match_statistics()
//! - Level 4: formatting utilities

use anyhow::Result;
use clap::Args;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use hexreversi_core::{GameConfig, GameResult, ReadOnlyGame, StrategyKind, Tile};

use crate::controller::{random_opening, Controller};
use crate::play_cmd::BoardArgs;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct MatchArgs {
    #[command(flatten)]
    pub board: BoardArgs,

    /// Number of games to play (will alternate colors)
    #[arg(long, default_value = "10")]
    pub games: usize,

    /// Random legal moves played before the strategies take over
    #[arg(long, default_value = "4")]
    pub opening_moves: usize,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Result of a single game
#[derive(Clone, Debug)]
struct GameRecord {
    game_number: usize,
    result: GameResult,
    moves: usize,
    black_score: usize,
    white_score: usize,
    black_strategy: StrategyKind,
    white_strategy: StrategyKind,
}

/// Aggregated match results
#[derive(Clone, Debug)]
struct MatchResults {
    games: Vec<GameRecord>,
    first: StrategyKind,
    second: StrategyKind,
    first_wins: usize,
    second_wins: usize,
    white_wins: usize,
    black_wins: usize,
    draws: usize,
    avg_moves: f32,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run match command
///
/// 1. Resolve the board and the two strategies
/// 2. Play the match (multiple games)
/// 3. Report results
pub fn run(args: MatchArgs, seed: Option<u64>) -> Result<()> {
    let config = args.board.resolve()?;

    tracing::info!(
        "Starting match: {} vs {} on {} size {} ({} games, {} opening moves)",
        config.black,
        config.white,
        config.shape,
        config.size,
        args.games,
        args.opening_moves
    );

    let results = play_match(&config, &args, seed)?;

    report_results(&results, &args)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Play all games in the match
fn play_match(config: &GameConfig, args: &MatchArgs, seed: Option<u64>) -> Result<MatchResults> {
    let mut rng = create_rng(seed);
    let mut games = Vec::with_capacity(args.games);

    for game_num in 0..args.games {
        // Alternate colors for fairness
        let (black, white) = if game_num % 2 == 1 {
            (config.white, config.black)
        } else {
            (config.black, config.white)
        };

        let record = play_single_game(config, black, white, game_num + 1, args, &mut rng)?;

        tracing::info!(
            "Game {}: {:?} ({} moves, {}-{})",
            record.game_number,
            record.result,
            record.moves,
            record.black_score,
            record.white_score
        );

        games.push(record);
    }

    Ok(compute_match_statistics(config.black, config.white, games))
}

/// Report match results
fn report_results(results: &MatchResults, args: &MatchArgs) -> Result<()> {
    if args.json {
        println!("{}", format_json_results(results)?);
    } else {
        print_text_results(results);
    }
    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Play a single game from a randomized opening
fn play_single_game(
    config: &GameConfig,
    black: StrategyKind,
    white: StrategyKind,
    game_number: usize,
    args: &MatchArgs,
    rng: &mut ChaCha8Rng,
) -> Result<GameRecord> {
    let mut game = config.new_game()?;
    let opening = random_opening(&mut game, args.opening_moves, rng)?;

    let controller = Controller::from_kinds(black, white);
    let (game, played) = controller.run(game, |_, action| {
        tracing::trace!(game = game_number, ?action, "action");
    })?;

    Ok(GameRecord {
        game_number,
        result: game.result(),
        moves: opening.len() + played.len(),
        black_score: game.score(Tile::Black),
        white_score: game.score(Tile::White),
        black_strategy: black,
        white_strategy: white,
    })
}

/// Compute aggregate statistics from game records
fn compute_match_statistics(
    first: StrategyKind,
    second: StrategyKind,
    games: Vec<GameRecord>,
) -> MatchResults {
    let count = |result: GameResult| games.iter().filter(|g| g.result == result).count();
    let white_wins = count(GameResult::WhiteWins);
    let black_wins = count(GameResult::BlackWins);
    let draws = count(GameResult::Draw);

    // Odd-numbered games have `first` playing black
    let first_wins = games
        .iter()
        .filter(|g| match g.result {
            GameResult::BlackWins => g.game_number % 2 == 1,
            GameResult::WhiteWins => g.game_number % 2 == 0,
            GameResult::Draw | GameResult::Ongoing => false,
        })
        .count();
    let second_wins = white_wins + black_wins - first_wins;

    let total_moves: usize = games.iter().map(|g| g.moves).sum();
    let avg_moves = if games.is_empty() {
        0.0
    } else {
        total_moves as f32 / games.len() as f32
    };

    MatchResults {
        games,
        first,
        second,
        first_wins,
        second_wins,
        white_wins,
        black_wins,
        draws,
        avg_moves,
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Create RNG from seed or random
fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

fn percent(part: usize, total: usize) -> f32 {
    if total > 0 {
        part as f32 / total as f32 * 100.0
    } else {
        0.0
    }
}

/// Results as pretty-printed JSON
fn format_json_results(results: &MatchResults) -> Result<String> {
    #[derive(serde::Serialize)]
    struct JsonGame {
        game_number: usize,
        result: String,
        moves: usize,
        black_score: usize,
        white_score: usize,
        black_strategy: StrategyKind,
        white_strategy: StrategyKind,
    }

    #[derive(serde::Serialize)]
    struct JsonOutput {
        total_games: usize,
        first: StrategyKind,
        second: StrategyKind,
        first_wins: usize,
        second_wins: usize,
        white_wins: usize,
        black_wins: usize,
        draws: usize,
        avg_moves: f32,
        games: Vec<JsonGame>,
    }

    let output = JsonOutput {
        total_games: results.games.len(),
        first: results.first,
        second: results.second,
        first_wins: results.first_wins,
        second_wins: results.second_wins,
        white_wins: results.white_wins,
        black_wins: results.black_wins,
        draws: results.draws,
        avg_moves: results.avg_moves,
        games: results
            .games
            .iter()
            .map(|g| JsonGame {
                game_number: g.game_number,
                result: format!("{:?}", g.result),
                moves: g.moves,
                black_score: g.black_score,
                white_score: g.white_score,
                black_strategy: g.black_strategy,
                white_strategy: g.white_strategy,
            })
            .collect(),
    };

    Ok(serde_json::to_string_pretty(&output)?)
}

/// Print results as text
fn print_text_results(results: &MatchResults) {
    let total = results.games.len();

    println!("\n=== Match Results ===");
    println!("Total games: {}", total);
    println!(
        "{:<12} {} ({:.1}%)",
        format!("{}:", results.first),
        results.first_wins,
        percent(results.first_wins, total)
    );
    println!(
        "{:<12} {} ({:.1}%)",
        format!("{}:", results.second),
        results.second_wins,
        percent(results.second_wins, total)
    );
    println!(
        "Draws:       {} ({:.1}%)",
        results.draws,
        percent(results.draws, total)
    );
    println!(
        "By color:    black {} / white {}",
        results.black_wins, results.white_wins
    );
    println!("Avg moves:   {:.1}", results.avg_moves);

    println!("\nGame details:");
    for game in &results.games {
        println!(
            "  Game {}: {} (black) vs {} (white): {:?} {}-{} in {} moves",
            game.game_number,
            game.black_strategy,
            game.white_strategy,
            game.result,
            game.black_score,
            game.white_score,
            game.moves
        );
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use hexreversi_core::Shape;

    fn record(
        game_number: usize,
        result: GameResult,
        moves: usize,
        black: StrategyKind,
        white: StrategyKind,
    ) -> GameRecord {
        GameRecord {
            game_number,
            result,
            moves,
            black_score: 0,
            white_score: 0,
            black_strategy: black,
            white_strategy: white,
        }
    }

    fn args(games: usize) -> MatchArgs {
        MatchArgs {
            board: BoardArgs {
                shape: Some(Shape::Hex),
                size: Some(4),
                black: Some(StrategyKind::Combo),
                white: Some(StrategyKind::HighScore),
                ..Default::default()
            },
            games,
            opening_moves: 2,
            json: false,
        }
    }

    #[test]
    fn test_compute_match_statistics_empty() {
        let results = compute_match_statistics(StrategyKind::Combo, StrategyKind::HighScore, vec![]);
        assert_eq!(results.white_wins, 0);
        assert_eq!(results.black_wins, 0);
        assert_eq!(results.draws, 0);
        assert_eq!(results.first_wins, 0);
        assert_eq!(results.avg_moves, 0.0);
    }

    #[test]
    fn test_compute_match_statistics() {
        use StrategyKind::{AvoidCorners as A, HighScore as H};
        let games = vec![
            record(1, GameResult::WhiteWins, 10, A, H),
            record(2, GameResult::WhiteWins, 20, H, A),
            record(3, GameResult::BlackWins, 30, A, H),
            record(4, GameResult::Draw, 40, H, A),
        ];

        let results = compute_match_statistics(A, H, games);
        assert_eq!(results.white_wins, 2);
        assert_eq!(results.black_wins, 1);
        assert_eq!(results.draws, 1);
        // Game 1 went to H, games 2 and 3 went to A
        assert_eq!(results.first_wins, 2);
        assert_eq!(results.second_wins, 1);
        assert_eq!(results.avg_moves, 25.0);
    }

    #[test]
    fn test_play_match_alternates_colors() {
        let args = args(4);
        let config = args.board.resolve().unwrap();
        let results = play_match(&config, &args, Some(1)).unwrap();

        assert_eq!(results.games.len(), 4);
        for game in &results.games {
            let expected_black = if game.game_number % 2 == 1 {
                StrategyKind::Combo
            } else {
                StrategyKind::HighScore
            };
            assert_eq!(game.black_strategy, expected_black);
            assert_ne!(game.result, GameResult::Ongoing);
        }
        assert_eq!(
            results.first_wins + results.second_wins + results.draws,
            results.games.len()
        );
    }

    #[test]
    fn test_play_match_is_seeded() {
        let args = args(3);
        let config = args.board.resolve().unwrap();
        let a = play_match(&config, &args, Some(9)).unwrap();
        let b = play_match(&config, &args, Some(9)).unwrap();
        for (x, y) in a.games.iter().zip(&b.games) {
            assert_eq!(x.result, y.result);
            assert_eq!(x.moves, y.moves);
            assert_eq!(x.black_score, y.black_score);
        }
    }

    #[test]
    fn test_format_json_results() {
        use StrategyKind::{Combo as C, HighScore as H};
        let games = vec![
            record(1, GameResult::BlackWins, 12, C, H),
            record(2, GameResult::Draw, 14, H, C),
        ];
        let results = compute_match_statistics(C, H, games);

        let json = format_json_results(&results).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["total_games"], 2);
        assert_eq!(value["first"], "combo");
        assert_eq!(value["first_wins"], 1);
        assert_eq!(value["draws"], 1);
        assert_eq!(value["games"][1]["black_strategy"], "highscore");
        assert_eq!(value["games"][0]["result"], "BlackWins");
    }

    #[test]
    fn test_create_rng_deterministic() {
        let mut rng1 = create_rng(Some(42));
        let mut rng2 = create_rng(Some(42));

        use rand::Rng;
        assert_eq!(rng1.gen::<u64>(), rng2.gen::<u64>());
    }
}
