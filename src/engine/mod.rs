//! Board engine: the 4x4 grid, directional moves, tile spawning and the
//! game-over check.
//!
//! Every direction is handled by one left-oriented routine: the grid is
//! rotated so the requested direction points left, collapsed, merged,
//! collapsed again, and rotated back.
//!
//! ```
//! use slide_2048::engine::{apply_move, is_terminal, Direction, Grid, MoveOutcome};
//!
//! let g = Grid::from_rows([[0, 2, 0, 2], [0; 4], [0; 4], [0; 4]]);
//! match apply_move(&g, 0, Direction::Left) {
//!     MoveOutcome::Moved { grid, score, .. } => {
//!         assert_eq!(grid.rows()[0], [4, 0, 0, 0]);
//!         assert_eq!(score, 4);
//!         assert!(!is_terminal(&grid));
//!     }
//!     MoveOutcome::Unchanged => unreachable!(),
//! }
//! ```

pub mod grid;
mod moves;
mod spawn;
mod terminal;

pub use grid::{Grid, Rotation, Score, Tile, SIZE};
pub use moves::{apply_move, MoveOutcome};
pub use spawn::{spawn_tile, spawn_tile_with, FOUR_PROBABILITY};
pub use terminal::is_terminal;

/// A direction to move/merge tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Left, Direction::Down, Direction::Right];

    /// Rotation that maps this direction onto "left"; `None` for `Left` itself.
    #[inline]
    pub fn rotation(self) -> Option<Rotation> {
        match self {
            Direction::Up => Some(Rotation::Ccw90),
            Direction::Left => None,
            Direction::Down => Some(Rotation::Cw90),
            Direction::Right => Some(Rotation::Half),
        }
    }

    /// WASD key map, case-insensitive.
    pub fn from_key(key: char) -> Option<Self> {
        match key.to_ascii_lowercase() {
            'w' => Some(Direction::Up),
            'a' => Some(Direction::Left),
            's' => Some(Direction::Down),
            'd' => Some(Direction::Right),
            _ => None,
        }
    }
}
