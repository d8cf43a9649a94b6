//! Board geometry: cube coordinates and per-shape topology
//!
//! Every cell is addressed by a cube coordinate (q, r, s) with q + r + s = 0,
//! whatever the board shape. A [`Topology`] maps those coordinates onto a
//! dense square array through its buffer and says which array cells exist.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ReversiError, Result};

// ============================================================================
// DIRECTIONS
// ============================================================================

/// Hex neighbor offsets in (row, col) deltas, clockwise from the upper-left
pub const HEX_DIRECTIONS: [(i32, i32); 6] = [
    (-1, 0),  // upper-left
    (-1, 1),  // upper-right
    (0, 1),   // right
    (1, 0),   // lower-right
    (1, -1),  // lower-left
    (0, -1),  // left
];

/// Square neighbor offsets in (row, col) deltas, clockwise from the upper-left
pub const SQUARE_DIRECTIONS: [(i32, i32); 8] = [
    (-1, -1), // upper-left
    (-1, 0),  // up
    (-1, 1),  // upper-right
    (0, 1),   // right
    (1, 1),   // lower-right
    (1, 0),   // down
    (1, -1),  // lower-left
    (0, -1),  // left
];

/// The hex directions above expressed as cube deltas (dq, dr, ds)
pub const CUBE_DIRECTIONS: [(i32, i32, i32); 6] = [
    (0, -1, 1),
    (1, -1, 0),
    (1, 0, -1),
    (0, 1, -1),
    (-1, 1, 0),
    (-1, 0, 1),
];

// ============================================================================
// CUBE COORDINATES
// ============================================================================

/// Cube coordinates. The q-axis runs from lower-left to upper-right, the
/// r-axis from top to bottom and the s-axis from upper-left to lower-right.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CubeCoord {
    q: i32,
    r: i32,
    s: i32,
}

impl CubeCoord {
    /// Panics unless q + r + s == 0
    pub const fn new(q: i32, r: i32, s: i32) -> Self {
        assert!(q + r + s == 0, "cube coordinates must sum to zero");
        Self { q, r, s }
    }

    /// Build from two axes, deriving s
    pub const fn axial(q: i32, r: i32) -> Self {
        Self { q, r, s: -q - r }
    }

    /// Build from array indices under the given buffer
    pub const fn from_array(row: i32, col: i32, buffer: i32) -> Self {
        Self::axial(col + 1 - buffer, row + 1 - buffer)
    }

    pub const fn q(&self) -> i32 {
        self.q
    }

    pub const fn r(&self) -> i32 {
        self.r
    }

    pub const fn s(&self) -> i32 {
        self.s
    }

    /// Array row under the given buffer (may fall outside the array)
    pub const fn row(&self, buffer: i32) -> i32 {
        (buffer - 1) + self.r
    }

    /// Array column under the given buffer (may fall outside the array)
    pub const fn col(&self, buffer: i32) -> i32 {
        (buffer - 1) + self.q
    }

    /// Distance from the origin
    pub fn distance_to_center(&self) -> i32 {
        self.q.abs().max(self.r.abs()).max(self.s.abs())
    }

    /// Hex neighbor in direction (0-5), clockwise from the upper-left
    pub fn neighbor(&self, direction: usize) -> CubeCoord {
        let (dq, dr, ds) = CUBE_DIRECTIONS[direction % 6];
        CubeCoord::new(self.q + dq, self.r + dr, self.s + ds)
    }

    /// All six hex neighbors
    pub fn neighbors(&self) -> impl Iterator<Item = CubeCoord> + '_ {
        (0..6).map(move |direction| self.neighbor(direction))
    }
}

impl fmt::Display for CubeCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q: {}, r: {}, s: {}", self.q, self.r, self.s)
    }
}

// ============================================================================
// SHAPES
// ============================================================================

/// Board shape
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    Hex,
    Square,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Hex => write!(f, "hex"),
            Shape::Square => write!(f, "square"),
        }
    }
}

impl FromStr for Shape {
    type Err = ReversiError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "hex" => Ok(Shape::Hex),
            "square" => Ok(Shape::Square),
            other => Err(ReversiError::argument(format!("Invalid board type: {}", other))),
        }
    }
}

// ============================================================================
// TOPOLOGY
// ============================================================================

/// Largest accepted size; keeps `2 * side` within i32 for either shape
pub const MAX_SIZE: usize = (i32::MAX / 4) as usize;

/// Per-shape board constants: sizing, buffer, cell mask and neighbor table
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Topology {
    shape: Shape,
    size: i32,
}

impl Topology {
    /// Hexagonal board with `size` rings (size >= 2)
    pub fn hex(size: usize) -> Result<Self> {
        if size <= 1 {
            return Err(ReversiError::argument(format!("Invalid hex board size: {}", size)));
        }
        Ok(Self { shape: Shape::Hex, size: checked_size(Shape::Hex, size)? })
    }

    /// Square board with an even side length (size > 1)
    pub fn square(size: usize) -> Result<Self> {
        if size <= 1 || size % 2 != 0 {
            return Err(ReversiError::argument(format!(
                "Invalid square board size: {}",
                size
            )));
        }
        Ok(Self { shape: Shape::Square, size: checked_size(Shape::Square, size)? })
    }

    pub fn new(shape: Shape, size: usize) -> Result<Self> {
        match shape {
            Shape::Hex => Self::hex(size),
            Shape::Square => Self::square(size),
        }
    }

    /// Recover the topology from the side length of a dense array
    pub fn from_side(shape: Shape, side: usize) -> Result<Self> {
        match shape {
            Shape::Hex => {
                if side < 3 || side % 2 == 0 {
                    return Err(ReversiError::argument(format!(
                        "Invalid hex board side: {}",
                        side
                    )));
                }
                Self::hex(side / 2 + 1)
            }
            Shape::Square => Self::square(side),
        }
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Rings for a hex board, side length for a square board
    pub fn size(&self) -> usize {
        self.size as usize
    }

    /// Side length of the backing array
    pub fn side(&self) -> usize {
        match self.shape {
            Shape::Hex => (2 * self.size - 1) as usize,
            Shape::Square => self.size as usize,
        }
    }

    pub fn buffer(&self) -> i32 {
        match self.shape {
            Shape::Hex => self.size,
            Shape::Square => 1,
        }
    }

    /// Neighbor offsets in (row, col) deltas
    pub fn directions(&self) -> &'static [(i32, i32)] {
        match self.shape {
            Shape::Hex => &HEX_DIRECTIONS,
            Shape::Square => &SQUARE_DIRECTIONS,
        }
    }

    /// Whether the array cell (row, col) exists on this board
    pub fn contains(&self, row: i32, col: i32) -> bool {
        let side = self.side() as i32;
        let buffer = self.buffer();
        row >= 0
            && col >= 0
            && row < side
            && col < side
            && row + col >= buffer - 1
            && row + col < 2 * side - buffer
    }

    /// Flat array index of a coordinate, if it has a backing cell
    pub fn index(&self, coord: CubeCoord) -> Option<usize> {
        let buffer = self.buffer();
        let (row, col) = (coord.row(buffer), coord.col(buffer));
        if self.contains(row, col) {
            Some(row as usize * self.side() + col as usize)
        } else {
            None
        }
    }

    /// Every cell of the board, derived from the geometry alone
    pub fn cells(&self) -> Vec<CubeCoord> {
        match self.shape {
            Shape::Hex => {
                let max = self.size - 1;
                let mut cells = Vec::new();
                for r in -max..=max {
                    for q in -max..=max {
                        let coord = CubeCoord::axial(q, r);
                        if coord.s().abs() <= max {
                            cells.push(coord);
                        }
                    }
                }
                cells
            }
            Shape::Square => {
                let side = self.size;
                (0..side)
                    .flat_map(|row| (0..side).map(move |col| CubeCoord::from_array(row, col, 1)))
                    .collect()
            }
        }
    }

    /// Extreme cells: 6 for hex, 4 for square
    pub fn corners(&self) -> Vec<CubeCoord> {
        match self.shape {
            Shape::Hex => {
                let max = self.size - 1;
                let neg = -max;
                vec![
                    CubeCoord::new(0, neg, max),
                    CubeCoord::new(0, max, neg),
                    CubeCoord::new(neg, 0, max),
                    CubeCoord::new(max, 0, neg),
                    CubeCoord::new(neg, max, 0),
                    CubeCoord::new(max, neg, 0),
                ]
            }
            Shape::Square => {
                let max = self.size - 1;
                vec![
                    CubeCoord::from_array(0, 0, 1),
                    CubeCoord::from_array(max, 0, 1),
                    CubeCoord::from_array(max, max, 1),
                    CubeCoord::from_array(0, max, 1),
                ]
            }
        }
    }
}

fn checked_size(shape: Shape, size: usize) -> Result<i32> {
    i32::try_from(size)
        .ok()
        .filter(|_| size <= MAX_SIZE)
        .ok_or_else(|| ReversiError::argument(format!("{} board size too large: {}", shape, size)))
}

// ============================================================================
// TESTS
// ============================================================================
