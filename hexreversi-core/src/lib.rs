//! HexReversi Core - Rule engine and move heuristics
//!
//! This crate provides the core game logic for HexReversi:
//! - Board geometry (cube coordinates over hex or square grids)
//! - Game state, capture rules and turn/pass sequencing
//! - One-ply move selection strategies with fallback chaining
//! - Game configuration

pub mod board;
pub mod config;
pub mod error;
pub mod game;
pub mod strategy;

// Re-exports for convenient access
pub use board::{
    CubeCoord, Shape, Topology, CUBE_DIRECTIONS, HEX_DIRECTIONS, MAX_SIZE, SQUARE_DIRECTIONS,
};
pub use config::GameConfig;
pub use error::{ReversiError, Result};
pub use game::{CapturedTile, Game, GameResult, ReadOnlyGame, Snapshot, Tile, TurnObserver};
pub use strategy::{
    candidate_moves, highest_scoring, AvoidAroundCorners, Candidates, HighestScore, Strategy,
    StrategyKind,
};
