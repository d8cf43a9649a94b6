//! Drives a game between two strategies through the turn-change contract
//!
//! The controller subscribes to the game, calls `start()`, and answers every
//! announced turn with the active player's strategy. A strategy with no legal
//! move passes; a refused pass ends the game.

use std::cell::Cell;
use std::rc::Rc;

use anyhow::{anyhow, Result};
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

use hexreversi_core::{
    candidate_moves, CubeCoord, Game, GameConfig, ReadOnlyGame, ReversiError, Strategy,
    StrategyKind, Tile,
};

/// One action taken during a game
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Move { color: Tile, coord: CubeCoord },
    Pass(Tile),
}

/// Two strategies, one per color
pub struct Controller {
    black: Box<dyn Strategy>,
    white: Box<dyn Strategy>,
}

impl Controller {
    pub fn new(black: Box<dyn Strategy>, white: Box<dyn Strategy>) -> Self {
        Self { black, white }
    }

    pub fn from_kinds(black: StrategyKind, white: StrategyKind) -> Self {
        Self::new(black.build(), white.build())
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::from_kinds(config.black, config.white)
    }

    fn strategy(&self, color: Tile) -> Option<&dyn Strategy> {
        match color {
            Tile::Black => Some(self.black.as_ref()),
            Tile::White => Some(self.white.as_ref()),
            Tile::Empty => None,
        }
    }

    /// Play until neither side can act and hand back the finished game.
    /// The game is consumed because `run` leaves its own observer subscribed.
    /// `on_action` sees the game after every action.
    pub fn run(
        &self,
        mut game: Game,
        mut on_action: impl FnMut(&Game, &Action),
    ) -> Result<(Game, Vec<Action>)> {
        let pending = Rc::new(Cell::new(None));
        let inbox = Rc::clone(&pending);
        game.subscribe(move |active: Tile| inbox.set(Some(active)));
        game.start();

        let mut actions = Vec::new();
        while let Some(color) = pending.take() {
            let strategy = self
                .strategy(color)
                .ok_or_else(|| anyhow!("No strategy plays {:?}", color))?;
            let action = match strategy.choose_move(&game, color) {
                Ok(coord) => {
                    game.make_move(coord, color)?;
                    Action::Move { color, coord }
                }
                Err(ReversiError::InvalidState(_)) => match game.pass() {
                    Ok(()) => Action::Pass(color),
                    Err(ReversiError::InvalidState(reason)) => {
                        tracing::debug!("game over: {}", reason);
                        break;
                    }
                    Err(e) => return Err(e.into()),
                },
                Err(e) => return Err(e.into()),
            };
            on_action(&game, &action);
            actions.push(action);
        }

        Ok((game, actions))
    }
}

/// Play `plies` uniformly random legal moves (passing when stuck) to vary
/// the opening
pub fn random_opening(game: &mut Game, plies: usize, rng: &mut ChaCha8Rng) -> Result<Vec<Action>> {
    let mut actions = Vec::with_capacity(plies);
    for _ in 0..plies {
        let color = game.active_color();
        let mut legal: Vec<CubeCoord> = candidate_moves(&*game, color).into_keys().collect();
        // Hash order is not stable across runs
        legal.sort_by_key(|c| (c.r(), c.q()));

        match legal.choose(rng) {
            Some(&coord) => {
                game.make_move(coord, color)?;
                actions.push(Action::Move { color, coord });
            }
            None => {
                if game.pass().is_err() {
                    break;
                }
                actions.push(Action::Pass(color));
            }
        }
    }
    Ok(actions)
}
