use super::grid::Grid;
use super::moves::shift;
use super::Direction;

/// True if no move in any direction changes the board.
///
/// Each direction is tried on its own copy, so the verdict does not depend
/// on the order they are checked in. Score is never touched.
pub fn is_terminal(grid: &Grid) -> bool {
    Direction::ALL.iter().all(|&dir| shift(*grid, 0, dir).0 == *grid)
}
