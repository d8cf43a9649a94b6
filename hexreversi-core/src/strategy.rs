//! One-ply move selection heuristics
//!
//! Strategies only read the game through [`ReadOnlyGame`]. They compose by
//! wrapping a fallback strategy at construction time.

use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::board::CubeCoord;
use crate::error::{ReversiError, Result};
use crate::game::{ReadOnlyGame, Tile};

/// Legal moves mapped to the number of tiles each would turn, placed tile
/// included
pub type Candidates = FxHashMap<CubeCoord, usize>;

/// Picks a move for `color`; InvalidState when it has nothing to offer
pub trait Strategy {
    fn choose_move(&self, game: &dyn ReadOnlyGame, color: Tile) -> Result<CubeCoord>;
}

impl<S: Strategy + ?Sized> Strategy for Box<S> {
    fn choose_move(&self, game: &dyn ReadOnlyGame, color: Tile) -> Result<CubeCoord> {
        (**self).choose_move(game, color)
    }
}

// ============================================================================
// CANDIDATE ENUMERATION
// ============================================================================

/// Every empty cell where `color` would capture something
pub fn candidate_moves(game: &dyn ReadOnlyGame, color: Tile) -> Candidates {
    let mut candidates = Candidates::default();
    for coord in game.empty_cells() {
        if let Ok(tiles) = game.preview_capture(coord, color) {
            if tiles.len() > 1 {
                candidates.insert(coord, tiles.len());
            }
        }
    }
    tracing::trace!(?color, count = candidates.len(), "enumerated candidate moves");
    candidates
}

/// Upper-left bias: larger (s - r) first, then smaller r
fn upper_left_key(coord: CubeCoord) -> (i32, Reverse<i32>) {
    (coord.s() - coord.r(), Reverse(coord.r()))
}

/// The more upper-left of two coordinates
pub fn upper_left(a: CubeCoord, b: CubeCoord) -> CubeCoord {
    if upper_left_key(b) > upper_left_key(a) {
        b
    } else {
        a
    }
}

/// Highest scoring candidate, ties broken toward the upper-left
pub fn highest_scoring(candidates: &Candidates) -> Result<CubeCoord> {
    candidates
        .iter()
        .max_by_key(|&(&coord, &score)| (score, upper_left_key(coord)))
        .map(|(&coord, _)| coord)
        .ok_or_else(|| ReversiError::state("No possible moves"))
}

// ============================================================================
// HIGHEST SCORE
// ============================================================================

/// Greedy: take the move that turns the most tiles
#[derive(Clone, Copy, Debug, Default)]
pub struct HighestScore;

impl Strategy for HighestScore {
    fn choose_move(&self, game: &dyn ReadOnlyGame, color: Tile) -> Result<CubeCoord> {
        highest_scoring(&candidate_moves(game, color))
    }
}

// ============================================================================
// AVOID AROUND CORNERS
// ============================================================================

/// Greedy, but never plays next to a corner. Falls back to `backup` when
/// every legal move is next to one.
#[derive(Default)]
pub struct AvoidAroundCorners {
    backup: Option<Box<dyn Strategy>>,
}

impl AvoidAroundCorners {
    pub fn new() -> Self {
        Self { backup: None }
    }

    pub fn with_backup(backup: impl Strategy + 'static) -> Self {
        Self { backup: Some(Box::new(backup)) }
    }

    /// Cells one hex step from any corner. The hex neighbor table is used
    /// for every board shape.
    fn risky_cells(game: &dyn ReadOnlyGame) -> FxHashSet<CubeCoord> {
        game.corners()
            .iter()
            .flat_map(|corner| corner.neighbors().collect::<Vec<_>>())
            .collect()
    }
}

impl Strategy for AvoidAroundCorners {
    fn choose_move(&self, game: &dyn ReadOnlyGame, color: Tile) -> Result<CubeCoord> {
        let risky = Self::risky_cells(game);
        let allowed: Candidates = candidate_moves(game, color)
            .into_iter()
            .filter(|(coord, _)| !risky.contains(coord))
            .collect();

        if !allowed.is_empty() {
            return highest_scoring(&allowed);
        }
        match &self.backup {
            Some(backup) => {
                tracing::trace!(?color, "every move is next to a corner, using backup");
                backup.choose_move(game, color)
            }
            None => Err(ReversiError::state("No possible moves")),
        }
    }
}

impl fmt::Debug for AvoidAroundCorners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AvoidAroundCorners")
            .field("has_backup", &self.backup.is_some())
            .finish()
    }
}

// ============================================================================
// NAMED STRATEGIES
// ============================================================================

/// Strategies selectable by name
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    /// [`HighestScore`]
    HighScore,
    /// [`AvoidAroundCorners`] with no backup
    AvoidCorners,
    /// [`AvoidAroundCorners`] backed by [`HighestScore`]
    Combo,
}

impl StrategyKind {
    pub fn build(self) -> Box<dyn Strategy> {
        match self {
            StrategyKind::HighScore => Box::new(HighestScore),
            StrategyKind::AvoidCorners => Box::new(AvoidAroundCorners::new()),
            StrategyKind::Combo => Box::new(AvoidAroundCorners::with_backup(HighestScore)),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::HighScore => write!(f, "highscore"),
            StrategyKind::AvoidCorners => write!(f, "avoidcorners"),
            StrategyKind::Combo => write!(f, "combo"),
        }
    }
}

impl FromStr for StrategyKind {
    type Err = ReversiError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "highscore" => Ok(StrategyKind::HighScore),
            "avoidcorners" => Ok(StrategyKind::AvoidCorners),
            "combo" => Ok(StrategyKind::Combo),
            other => Err(ReversiError::argument(format!("Invalid player type: {}", other))),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Topology;
    use crate::game::{CapturedTile, Game, Snapshot};
    use std::cell::RefCell;

    /// Read-only game whose only legal moves are a fixed score table
    struct ScoreTable {
        topology: Topology,
        scores: Vec<(CubeCoord, usize)>,
        looked_up: RefCell<Vec<CubeCoord>>,
    }

    impl ScoreTable {
        fn hex(scores: &[(CubeCoord, usize)]) -> Self {
            Self::with_topology(Topology::hex(4).unwrap(), scores)
        }

        fn with_topology(topology: Topology, scores: &[(CubeCoord, usize)]) -> Self {
            Self {
                topology,
                scores: scores.to_vec(),
                looked_up: RefCell::new(Vec::new()),
            }
        }
    }

    impl ReadOnlyGame for ScoreTable {
        fn topology(&self) -> Topology {
            self.topology
        }

        fn state_at(&self, _coord: CubeCoord) -> Result<Tile> {
            Ok(Tile::Empty)
        }

        fn preview_capture(&self, coord: CubeCoord, _color: Tile) -> Result<Vec<CapturedTile>> {
            self.looked_up.borrow_mut().push(coord);
            let score = self
                .scores
                .iter()
                .find(|(c, _)| *c == coord)
                .map(|&(_, score)| score)
                .ok_or_else(|| ReversiError::state("Invalid move"))?;
            Ok(vec![CapturedTile { coord, tile: Tile::Empty }; score])
        }

        fn score(&self, _color: Tile) -> usize {
            0
        }

        fn active_color(&self) -> Tile {
            Tile::Black
        }

        fn snapshot(&self) -> Snapshot {
            Vec::new()
        }

        fn empty_cells(&self) -> Vec<CubeCoord> {
            self.scores.iter().map(|&(coord, _)| coord).collect()
        }
    }

    fn cube(q: i32, r: i32, s: i32) -> CubeCoord {
        CubeCoord::new(q, r, s)
    }

    #[test]
    fn test_picks_highest_score() {
        let table = ScoreTable::hex(&[
            (cube(0, -3, 3), 6),
            (cube(-1, -2, 3), 3),
            (cube(0, 2, -2), 4),
            (cube(-2, 2, 0), 5),
        ]);
        assert_eq!(HighestScore.choose_move(&table, Tile::Black), Ok(cube(0, -3, 3)));
        // Every candidate was examined
        assert_eq!(table.looked_up.borrow().len(), 4);
    }

    #[test]
    fn test_picks_highest_score_even_when_bottom_right() {
        let table = ScoreTable::hex(&[
            (cube(0, 2, -2), 4),
            (cube(1, -2, 1), 3),
            (cube(0, -2, 2), 2),
        ]);
        assert_eq!(HighestScore.choose_move(&table, Tile::Black), Ok(cube(0, 2, -2)));
    }

    #[test]
    fn test_tie_picks_upper() {
        let table = ScoreTable::hex(&[
            (cube(-3, 0, 3), 2),
            (cube(-2, -1, 3), 2),
            (cube(0, -3, 3), 2),
            (cube(-1, -2, 3), 2),
        ]);
        assert_eq!(HighestScore.choose_move(&table, Tile::Black), Ok(cube(0, -3, 3)));
    }

    #[test]
    fn test_tie_picks_left() {
        let table = ScoreTable::hex(&[
            (cube(0, 0, 0), 2),
            (cube(-1, 0, 1), 2),
            (cube(-3, 0, 3), 2),
            (cube(-2, 0, 2), 2),
        ]);
        assert_eq!(HighestScore.choose_move(&table, Tile::Black), Ok(cube(-3, 0, 3)));
    }

    #[test]
    fn test_tie_on_diagonal_prefers_smaller_r() {
        // (s - r) is equal for both; the smaller r wins
        let a = cube(1, -1, 0);
        let b = cube(-1, 0, 1);
        assert_eq!(a.s() - a.r(), 1);
        assert_eq!(b.s() - b.r(), 1);
        assert_eq!(upper_left(a, b), a);
        assert_eq!(upper_left(b, a), a);

        let table = ScoreTable::hex(&[(b, 2), (a, 2)]);
        assert_eq!(HighestScore.choose_move(&table, Tile::White), Ok(a));
    }

    #[test]
    fn test_starting_board_tie() {
        let game = Game::hex(3).unwrap();
        let candidates = candidate_moves(&game, Tile::White);
        assert_eq!(candidates.len(), 6);
        assert!(candidates.values().all(|&score| score == 2));
        assert_eq!(HighestScore.choose_move(&game, Tile::White), Ok(cube(1, -2, 1)));
    }

    #[test]
    fn test_no_moves_is_invalid_state() {
        let table = ScoreTable::hex(&[]);
        assert!(matches!(
            HighestScore.choose_move(&table, Tile::Black),
            Err(ReversiError::InvalidState(_))
        ));

        let game = Game::hex(2).unwrap();
        assert!(matches!(
            HighestScore.choose_move(&game, Tile::White),
            Err(ReversiError::InvalidState(_))
        ));
        assert!(matches!(
            AvoidAroundCorners::with_backup(HighestScore).choose_move(&game, Tile::White),
            Err(ReversiError::InvalidState(_))
        ));
    }

    #[test]
    fn test_avoid_skips_corner_neighbors() {
        // (1,-3,2) and (0,-2,2) touch the (0,-3,3) corner
        let table = ScoreTable::hex(&[
            (cube(1, -3, 2), 5),
            (cube(0, -2, 2), 4),
            (cube(2, -1, -1), 2),
        ]);
        let strategy = AvoidAroundCorners::new();
        assert_eq!(strategy.choose_move(&table, Tile::Black), Ok(cube(2, -1, -1)));
    }

    #[test]
    fn test_avoid_keeps_corners_themselves() {
        let table = ScoreTable::hex(&[
            (cube(0, -3, 3), 3),
            (cube(1, -3, 2), 7),
            (cube(1, 0, -1), 2),
        ]);
        let strategy = AvoidAroundCorners::new();
        assert_eq!(strategy.choose_move(&table, Tile::Black), Ok(cube(0, -3, 3)));
    }

    #[test]
    fn test_avoid_without_backup_fails() {
        let table = ScoreTable::hex(&[(cube(1, -3, 2), 5), (cube(-1, -2, 3), 2)]);
        let strategy = AvoidAroundCorners::new();
        assert!(matches!(
            strategy.choose_move(&table, Tile::Black),
            Err(ReversiError::InvalidState(_))
        ));
    }

    #[test]
    fn test_avoid_falls_back_to_backup() {
        let table = ScoreTable::hex(&[(cube(1, -3, 2), 5), (cube(-1, -2, 3), 2)]);
        let strategy = AvoidAroundCorners::with_backup(HighestScore);
        assert_eq!(strategy.choose_move(&table, Tile::Black), Ok(cube(1, -3, 2)));
    }

    #[test]
    fn test_avoid_chains_through_another_avoid() {
        let table = ScoreTable::hex(&[(cube(1, -3, 2), 5)]);
        let strategy =
            AvoidAroundCorners::with_backup(AvoidAroundCorners::with_backup(HighestScore));
        assert_eq!(strategy.choose_move(&table, Tile::Black), Ok(cube(1, -3, 2)));
    }

    #[test]
    fn test_avoid_uses_hex_adjacency_on_square_boards() {
        // On a square board the diagonal neighbor of a corner is not a hex
        // neighbor, so it stays playable
        let topology = Topology::square(8).unwrap();
        let beside = CubeCoord::from_array(0, 1, 1);
        let diagonal = CubeCoord::from_array(1, 1, 1);
        let table = ScoreTable::with_topology(topology, &[(beside, 5), (diagonal, 2)]);
        assert_eq!(AvoidAroundCorners::new().choose_move(&table, Tile::Black), Ok(diagonal));
    }

    #[test]
    fn test_strategy_kind_parse() {
        assert_eq!("highscore".parse::<StrategyKind>(), Ok(StrategyKind::HighScore));
        assert_eq!("AvoidCorners".parse::<StrategyKind>(), Ok(StrategyKind::AvoidCorners));
        assert_eq!("combo".parse::<StrategyKind>(), Ok(StrategyKind::Combo));
        assert!("human".parse::<StrategyKind>().is_err());
        for kind in [StrategyKind::HighScore, StrategyKind::AvoidCorners, StrategyKind::Combo] {
            assert_eq!(kind.to_string().parse::<StrategyKind>(), Ok(kind));
        }
    }

    #[test]
    fn test_built_strategies_play_real_games() {
        let game = Game::square(8).unwrap();
        for kind in [StrategyKind::HighScore, StrategyKind::AvoidCorners, StrategyKind::Combo] {
            let strategy = kind.build();
            let choice = strategy.choose_move(&game, Tile::White).unwrap();
            assert!(game.is_legal_move(choice, Tile::White));
        }
    }
}
