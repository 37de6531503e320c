use super::grid::{Grid, Score};
use super::Direction;

/// Result of applying a direction to a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The board changed. `score` already includes `gained`.
    Moved { grid: Grid, score: Score, gained: Score },
    /// Nothing moved or merged; the caller must not spawn or end the turn.
    Unchanged,
}

impl MoveOutcome {
    #[inline]
    pub fn is_moved(&self) -> bool { matches!(self, MoveOutcome::Moved { .. }) }
}

/// Slide/merge tiles in `direction`. No randomness.
///
/// The input grid is never touched; on `Unchanged` the caller's grid and
/// score are exactly what they were.
pub fn apply_move(grid: &Grid, score: Score, direction: Direction) -> MoveOutcome {
    let (moved, new_score) = shift(*grid, score, direction);
    if moved == *grid {
        return MoveOutcome::Unchanged;
    }
    MoveOutcome::Moved { grid: moved, score: new_score, gained: new_score.saturating_sub(score) }
}

pub(crate) fn shift(grid: Grid, score: Score, direction: Direction) -> (Grid, Score) {
    let rotation = direction.rotation();
    let oriented = match rotation {
        Some(r) => grid.rotated(r),
        None => grid,
    };
    let (merged, score) = oriented.collapse_left().combine_left(score);
    let packed = merged.collapse_left();
    let restored = match rotation {
        Some(r) => packed.rotated(r.inverse()),
        None => packed,
    };
    (restored, score)
}
