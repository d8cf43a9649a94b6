//! Plain-text board rendering

use hexreversi_core::{CubeCoord, ReadOnlyGame, Shape, Tile};

/// Draw the board with `X` for black, `O` for white and `_` for empty.
/// Hex rows are indented so the cells line up as a hexagon.
pub fn render_board(game: &dyn ReadOnlyGame) -> String {
    let topology = game.topology();
    let side = topology.side() as i32;
    let buffer = topology.buffer();
    let middle = topology.size() as i32 - 1;

    let mut lines = Vec::with_capacity(side as usize);
    for row in 0..side {
        let indent = match topology.shape() {
            Shape::Hex => (row - middle).unsigned_abs() as usize,
            Shape::Square => 0,
        };
        let cells: Vec<String> = (0..side)
            .filter_map(|col| game.state_at(CubeCoord::from_array(row, col, buffer)).ok())
            .map(|tile| tile.to_char().to_string())
            .collect();
        lines.push(format!("{}{}", " ".repeat(indent), cells.join(" ")));
    }
    lines.join("\n")
}

/// One-line score summary
pub fn render_scores(game: &dyn ReadOnlyGame) -> String {
    format!(
        "{}: {}  {}: {}",
        Tile::Black.to_char(),
        game.score(Tile::Black),
        Tile::White.to_char(),
        game.score(Tile::White)
    )
}
