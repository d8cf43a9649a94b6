//! Game state, move validation and capture

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::{CubeCoord, Shape, Topology};
use crate::error::{ReversiError, Result};

// ============================================================================
// CORE TYPES
// ============================================================================

/// Contents of a board cell. Black and White double as player colors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    #[default]
    Empty,
    Black,
    White,
}

impl Tile {
    /// The other color; Empty stays Empty
    pub fn opposite(self) -> Self {
        match self {
            Tile::Black => Tile::White,
            Tile::White => Tile::Black,
            Tile::Empty => Tile::Empty,
        }
    }

    pub fn is_color(self) -> bool {
        self != Tile::Empty
    }

    pub fn to_char(self) -> char {
        match self {
            Tile::Empty => '_',
            Tile::Black => 'X',
            Tile::White => 'O',
        }
    }
}

/// Game result
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    Ongoing,
    BlackWins,
    WhiteWins,
    Draw,
}

/// A tile a move would affect, copied out of the board
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CapturedTile {
    pub coord: CubeCoord,
    /// State of the tile before the move
    pub tile: Tile,
}

/// Independent copy of the board, row-major. `None` marks cells outside
/// the board shape.
pub type Snapshot = Vec<Vec<Option<Tile>>>;

/// Receives the active color whenever a turn begins
pub trait TurnObserver {
    fn on_turn_begins(&mut self, active: Tile);
}

impl<F: FnMut(Tile)> TurnObserver for F {
    fn on_turn_begins(&mut self, active: Tile) {
        self(active)
    }
}

// ============================================================================
// READ-ONLY QUERIES
// ============================================================================

/// Observation-only view of a game. Nothing returned here aliases the
/// live board.
pub trait ReadOnlyGame {
    fn topology(&self) -> Topology;

    /// State of the tile at `coord`; InvalidArgument if there is no tile
    fn state_at(&self, coord: CubeCoord) -> Result<Tile>;

    /// Tiles a move would affect, captured tiles in scan order and the
    /// placed tile last
    fn preview_capture(&self, coord: CubeCoord, color: Tile) -> Result<Vec<CapturedTile>>;

    fn score(&self, color: Tile) -> usize;

    fn active_color(&self) -> Tile;

    fn snapshot(&self) -> Snapshot;

    fn shape(&self) -> Shape {
        self.topology().shape()
    }

    fn size(&self) -> usize {
        self.topology().size()
    }

    fn empty_cells(&self) -> Vec<CubeCoord> {
        self.topology()
            .cells()
            .into_iter()
            .filter(|&coord| self.state_at(coord) == Ok(Tile::Empty))
            .collect()
    }

    fn corners(&self) -> Vec<CubeCoord> {
        self.topology().corners()
    }

    fn is_legal_move(&self, coord: CubeCoord, color: Tile) -> bool {
        self.preview_capture(coord, color)
            .map(|tiles| tiles.len() > 1)
            .unwrap_or(false)
    }

    fn has_any_move(&self, color: Tile) -> bool {
        self.empty_cells()
            .into_iter()
            .any(|coord| self.is_legal_move(coord, color))
    }

    /// No legal move for either color anywhere on the board
    fn is_terminal(&self) -> bool {
        !self.has_any_move(Tile::Black) && !self.has_any_move(Tile::White)
    }
}

// ============================================================================
// GAME
// ============================================================================

/// A game of Reversi on a hex or square board
pub struct Game {
    topology: Topology,

    /// Row-major cells; `None` outside the board shape
    cells: Vec<Option<Tile>>,

    /// Color that acted last; never Empty
    last_moved: Tile,

    /// Whether the last action was a pass
    just_passed: bool,

    observers: Vec<Box<dyn TurnObserver>>,
}

impl Game {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// New game with the opening tiles in place. White moves first.
    pub fn new(topology: Topology) -> Self {
        let side = topology.side();
        let mut cells = Vec::with_capacity(side * side);
        for row in 0..side as i32 {
            for col in 0..side as i32 {
                cells.push(topology.contains(row, col).then_some(Tile::Empty));
            }
        }

        let mut game = Self {
            topology,
            cells,
            last_moved: Tile::Black,
            just_passed: false,
            observers: Vec::new(),
        };
        match topology.shape() {
            Shape::Hex => game.seed_hex_ring(),
            Shape::Square => game.seed_square_block(),
        }
        game
    }

    pub fn hex(size: usize) -> Result<Self> {
        Ok(Self::new(Topology::hex(size)?))
    }

    pub fn square(size: usize) -> Result<Self> {
        Ok(Self::new(Topology::square(size)?))
    }

    /// Resume from an existing position with `to_move` about to play
    pub fn from_grid(shape: Shape, grid: Snapshot, to_move: Tile) -> Result<Self> {
        if !to_move.is_color() {
            return Err(ReversiError::argument("The player to move must be a color"));
        }
        let side = grid.len();
        if grid.iter().any(|row| row.len() != side) {
            return Err(ReversiError::argument("Board must be square"));
        }
        let topology = Topology::from_side(shape, side)?;

        let mut cells = Vec::with_capacity(side * side);
        for (row, line) in grid.into_iter().enumerate() {
            for (col, cell) in line.into_iter().enumerate() {
                let on_board = topology.contains(row as i32, col as i32);
                match (on_board, cell) {
                    (true, Some(tile)) => cells.push(Some(tile)),
                    (false, None) => cells.push(None),
                    (true, None) => {
                        return Err(ReversiError::argument(format!(
                            "Missing tile at row {}, col {}",
                            row, col
                        )))
                    }
                    (false, Some(_)) => {
                        return Err(ReversiError::argument(format!(
                            "Tile outside the board at row {}, col {}",
                            row, col
                        )))
                    }
                }
            }
        }

        Ok(Self {
            topology,
            cells,
            last_moved: to_move.opposite(),
            just_passed: false,
            observers: Vec::new(),
        })
    }

    /// Alternating ring of six around the center cell, clockwise from the
    /// upper-left neighbor:
    ///
    /// ```text
    ///   X O
    ///  O _ X
    ///   X O
    /// ```
    fn seed_hex_ring(&mut self) {
        let c = (self.topology.side() / 2) as i32;
        self.set(c - 1, c, Tile::Black);
        self.set(c - 1, c + 1, Tile::White);
        self.set(c, c + 1, Tile::Black);
        self.set(c + 1, c, Tile::White);
        self.set(c + 1, c - 1, Tile::Black);
        self.set(c, c - 1, Tile::White);
    }

    /// Alternating 2x2 block in the middle of the board
    fn seed_square_block(&mut self) {
        let c = (self.topology.side() / 2) as i32 - 1;
        self.set(c, c, Tile::Black);
        self.set(c, c + 1, Tile::White);
        self.set(c + 1, c, Tile::White);
        self.set(c + 1, c + 1, Tile::Black);
    }

    fn set(&mut self, row: i32, col: i32, tile: Tile) {
        let side = self.topology.side();
        if self.topology.contains(row, col) {
            self.cells[row as usize * side + col as usize] = Some(tile);
        }
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn buffer(&self) -> i32 {
        self.topology.buffer()
    }

    /// Side length of the backing array
    pub fn side(&self) -> usize {
        self.topology.side()
    }

    /// Color that acted last
    pub fn last_moved(&self) -> Tile {
        self.last_moved
    }

    /// Whether the last action was a pass
    pub fn just_passed(&self) -> bool {
        self.just_passed
    }

    /// Outcome by score once neither color can move
    pub fn result(&self) -> GameResult {
        if !self.is_terminal() {
            return GameResult::Ongoing;
        }
        let black = self.score(Tile::Black);
        let white = self.score(Tile::White);
        if black > white {
            GameResult::BlackWins
        } else if white > black {
            GameResult::WhiteWins
        } else {
            GameResult::Draw
        }
    }

    fn tile_at(&self, row: i32, col: i32) -> Option<Tile> {
        if self.topology.contains(row, col) {
            self.cells[row as usize * self.topology.side() + col as usize]
        } else {
            None
        }
    }

    // ========================================================================
    // CAPTURE
    // ========================================================================

    /// Every cell a move would turn to `color`, as (flat index, coordinate),
    /// with the placed cell last
    fn capture_set(&self, coord: CubeCoord, color: Tile) -> Result<Vec<(usize, CubeCoord)>> {
        let placed = match self.topology.index(coord) {
            Some(index) => index,
            None => return Err(ReversiError::argument(format!("No tile at {}", coord))),
        };
        if self.cells[placed] != Some(Tile::Empty) {
            return Err(ReversiError::argument(format!("Tile at {} is occupied", coord)));
        }

        let buffer = self.topology.buffer();
        let (row, col) = (coord.row(buffer), coord.col(buffer));
        let mut flips = Vec::new();
        for &(dr, dc) in self.topology.directions() {
            self.collect_sandwich(row, col, dr, dc, color, &mut flips);
        }
        flips.push((placed, coord));
        Ok(flips)
    }

    /// Scan outward from (row, col) and keep the run of opposing tiles only
    /// if it is closed off by a `color` tile
    fn collect_sandwich(
        &self,
        row: i32,
        col: i32,
        dr: i32,
        dc: i32,
        color: Tile,
        flips: &mut Vec<(usize, CubeCoord)>,
    ) {
        let opponent = color.opposite();
        let side = self.topology.side();
        let buffer = self.topology.buffer();
        let mut run = Vec::new();
        let (mut r, mut c) = (row + dr, col + dc);

        loop {
            match self.tile_at(r, c) {
                Some(tile) if tile == color => {
                    flips.append(&mut run);
                    return;
                }
                Some(tile) if tile == opponent => {
                    run.push((r as usize * side + c as usize, CubeCoord::from_array(r, c, buffer)));
                }
                // Empty cell or board edge: no sandwich this way
                _ => return,
            }
            r += dr;
            c += dc;
        }
    }

    // ========================================================================
    // ACTIONS
    // ========================================================================

    /// Register an observer for turn changes. Observers are called in
    /// registration order.
    pub fn subscribe(&mut self, observer: impl TurnObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Announce the first turn without changing the board
    pub fn start(&mut self) {
        tracing::debug!(active = ?self.active_color(), shape = %self.topology.shape(), "game started");
        self.notify_turn_change();
    }

    /// Place a `color` tile at `coord` and flip every sandwiched run
    pub fn make_move(&mut self, coord: CubeCoord, color: Tile) -> Result<()> {
        if !color.is_color() {
            return Err(ReversiError::argument("Cannot play as an empty tile"));
        }
        if self.is_terminal() {
            return Err(ReversiError::state("Cannot move when the game is over"));
        }
        if color == self.last_moved {
            return Err(ReversiError::argument(format!("Not {:?}'s turn", color)));
        }
        if self.state_at(coord)? != Tile::Empty {
            return Err(ReversiError::state(format!(
                "Cannot place a tile on top of another at {}",
                coord
            )));
        }

        let flips = self.capture_set(coord, color)?;
        if flips.len() <= 1 {
            return Err(ReversiError::state(format!("Move at {} captures nothing", coord)));
        }
        for &(index, _) in &flips {
            self.cells[index] = Some(color);
        }

        self.last_moved = color;
        self.just_passed = false;
        tracing::debug!(%coord, ?color, flipped = flips.len() - 1, "move");
        self.notify_turn_change();
        Ok(())
    }

    /// Hand the turn to the other color. A second pass in a row fails.
    pub fn pass(&mut self) -> Result<()> {
        if self.is_terminal() {
            return Err(ReversiError::state("Cannot pass when the game is over"));
        }
        if self.just_passed {
            return Err(ReversiError::state("Both players passed; the game is over"));
        }

        self.last_moved = self.last_moved.opposite();
        self.just_passed = true;
        tracing::debug!(passed = ?self.last_moved, "pass");
        self.notify_turn_change();
        Ok(())
    }

    fn notify_turn_change(&mut self) {
        let active = self.active_color();
        for observer in &mut self.observers {
            observer.on_turn_begins(active);
        }
    }
}

impl ReadOnlyGame for Game {
    fn topology(&self) -> Topology {
        self.topology
    }

    fn state_at(&self, coord: CubeCoord) -> Result<Tile> {
        self.topology
            .index(coord)
            .and_then(|index| self.cells[index])
            .ok_or_else(|| ReversiError::argument(format!("No tile at {}", coord)))
    }

    fn preview_capture(&self, coord: CubeCoord, color: Tile) -> Result<Vec<CapturedTile>> {
        if !color.is_color() {
            return Err(ReversiError::argument("Cannot play as an empty tile"));
        }
        let flips = self.capture_set(coord, color)?;
        if flips.len() <= 1 {
            return Err(ReversiError::state(format!("Move at {} captures nothing", coord)));
        }
        Ok(flips
            .into_iter()
            .map(|(index, coord)| CapturedTile {
                coord,
                tile: self.cells[index].unwrap_or_default(),
            })
            .collect())
    }

    fn score(&self, color: Tile) -> usize {
        self.cells.iter().filter(|&&cell| cell == Some(color)).count()
    }

    fn active_color(&self) -> Tile {
        self.last_moved.opposite()
    }

    fn snapshot(&self) -> Snapshot {
        self.cells
            .chunks(self.topology.side())
            .map(|row| row.to_vec())
            .collect()
    }
}

impl fmt::Debug for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Game")
            .field("topology", &self.topology)
            .field("last_moved", &self.last_moved)
            .field("just_passed", &self.just_passed)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// TESTS
// ============================================================================
