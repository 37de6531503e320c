use log::debug;
use rand::Rng;

use super::grid::{Grid, Tile};
use crate::error::EngineError;

/// Chance that a spawned tile is a 4 rather than a 2.
pub const FOUR_PROBABILITY: f64 = 0.2;

/// Insert a 2 (80%) or 4 (20%) into a uniformly chosen empty cell.
///
/// Returns the `(x, y)` of the new tile, or `ExhaustedBoard` if the grid has
/// no empty cell (the grid is left as it was).
///
/// ```
/// use slide_2048::engine::{spawn_tile, Grid};
/// use rand::{rngs::StdRng, SeedableRng};
/// let mut rng = StdRng::seed_from_u64(123);
/// let mut g = Grid::new();
/// spawn_tile(&mut g, &mut rng).unwrap();
/// assert_eq!(g.count_empty(), 15);
/// ```
pub fn spawn_tile<R: Rng + ?Sized>(grid: &mut Grid, rng: &mut R) -> Result<(usize, usize), EngineError> {
    spawn_tile_with(grid, rng, FOUR_PROBABILITY)
}

/// Like [`spawn_tile`] with an explicit chance of spawning a 4.
/// Out-of-range probabilities are clamped to `[0, 1]`.
pub fn spawn_tile_with<R: Rng + ?Sized>(
    grid: &mut Grid,
    rng: &mut R,
    four_probability: f64,
) -> Result<(usize, usize), EngineError> {
    let empty = grid.empty_cells();
    if empty.is_empty() {
        return Err(EngineError::ExhaustedBoard);
    }
    let (x, y) = empty[rng.gen_range(0..empty.len())];
    let tile = generate_random_tile(rng, four_probability);
    grid.set(x, y, tile);
    debug!("spawned {tile} at ({x}, {y})");
    Ok((x, y))
}

fn generate_random_tile<R: Rng + ?Sized>(rng: &mut R, four_probability: f64) -> Tile {
    let p = if four_probability.is_finite() { four_probability.clamp(0.0, 1.0) } else { FOUR_PROBABILITY };
    if rng.gen_bool(p) { 4 } else { 2 }
}
