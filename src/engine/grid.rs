use std::fmt;

use crate::error::EngineError;

/// Side length of the board.
pub const SIZE: usize = 4;

/// A cell value. `0` is an empty cell; anything else is a tile.
pub type Tile = i64;
/// Running score of a game.
pub type Score = i64;

type Rows = [[Tile; SIZE]; SIZE];

/// A quarter-turn multiple. Counter-clockwise is the positive direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rotation {
    /// +90° (equivalently -270°).
    Ccw90,
    /// -90° (equivalently +270°).
    Cw90,
    /// ±180°.
    Half,
}

impl Rotation {
    /// Validate an angle in degrees. Only ±90, ±180 and ±270 are accepted.
    pub fn from_degrees(degrees: i32) -> Result<Self, EngineError> {
        match degrees {
            90 | -270 => Ok(Rotation::Ccw90),
            -90 | 270 => Ok(Rotation::Cw90),
            180 | -180 => Ok(Rotation::Half),
            other => Err(EngineError::InvalidRotation(other)),
        }
    }

    /// The rotation that undoes this one.
    #[inline]
    pub fn inverse(self) -> Self {
        match self {
            Rotation::Ccw90 => Rotation::Cw90,
            Rotation::Cw90 => Rotation::Ccw90,
            Rotation::Half => Rotation::Half,
        }
    }
}

/// A 4x4 board of tile values.
///
/// `Grid` is a plain value: every transformation returns a new grid and
/// leaves the receiver alone, so a copy handed to a renderer or kept as a
/// snapshot can never alias the live board.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Grid(Rows);

impl Grid {
    /// A constant empty board (all zeros).
    pub const EMPTY: Grid = Grid([[0; SIZE]; SIZE]);

    /// A fresh all-zero board.
    #[inline]
    pub fn new() -> Self { Self::EMPTY }

    /// Build a grid from rows, top row first.
    #[inline]
    pub fn from_rows(rows: Rows) -> Self { Grid(rows) }

    /// Borrow the rows, top row first.
    #[inline]
    pub fn rows(&self) -> &Rows { &self.0 }

    /// Value at column `x`, row `y`. Panics if either is out of range.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Tile { self.0[y][x] }

    /// Set the value at column `x`, row `y`. Panics if either is out of range.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: Tile) { self.0[y][x] = value; }

    /// Count the number of empty cells.
    pub fn count_empty(&self) -> usize {
        self.0.iter().flatten().filter(|&&v| v == 0).count()
    }

    /// Coordinates `(x, y)` of every empty cell in row-major order.
    pub fn empty_cells(&self) -> Vec<(usize, usize)> {
        let mut cells = Vec::with_capacity(SIZE * SIZE);
        for (y, row) in self.0.iter().enumerate() {
            for (x, &v) in row.iter().enumerate() {
                if v == 0 {
                    cells.push((x, y));
                }
            }
        }
        cells
    }

    /// Return the highest tile value on the board (0 if empty).
    pub fn highest_tile(&self) -> Tile {
        self.0.iter().flatten().copied().max().unwrap_or(0)
    }

    /// Swap rows and columns.
    pub fn transpose(self) -> Self {
        let mut out = [[0; SIZE]; SIZE];
        for (y, row) in self.0.iter().enumerate() {
            for (x, &v) in row.iter().enumerate() {
                out[x][y] = v;
            }
        }
        Grid(out)
    }

    /// Reverse the element order within each row.
    pub fn reverse_rows(mut self) -> Self {
        for row in self.0.iter_mut() {
            row.reverse();
        }
        self
    }

    /// Rotate by a validated quarter-turn multiple.
    pub fn rotated(self, rotation: Rotation) -> Self {
        match rotation {
            Rotation::Ccw90 => self.reverse_rows().transpose(),
            Rotation::Cw90 => self.transpose().reverse_rows(),
            Rotation::Half => self.rotated(Rotation::Ccw90).rotated(Rotation::Ccw90),
        }
    }

    /// Rotate by `degrees` (counter-clockwise positive).
    ///
    /// ```
    /// use slide_2048::engine::Grid;
    /// let g = Grid::from_rows([[1, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);
    /// let r = g.rotate(90).unwrap();
    /// assert_eq!(r.rows()[3], [1, 0, 0, 0]);
    /// assert!(g.rotate(45).is_err());
    /// ```
    pub fn rotate(self, degrees: i32) -> Result<Self, EngineError> {
        Ok(self.rotated(Rotation::from_degrees(degrees)?))
    }

    /// Compact every row toward the left edge, keeping tile order.
    pub fn collapse_left(mut self) -> Self {
        for row in self.0.iter_mut() {
            collapse_row(row);
        }
        self
    }

    /// Merge equal neighbours toward the left edge and add every merged
    /// tile to `score`. Returns the new grid and score.
    ///
    /// Pairs are checked at the fixed positions (0,1), (1,2), (2,3) in that
    /// order and never re-examined, so `2 2 2 2` becomes `4 0 4 0` (and
    /// `4 4 0 0` once collapsed), never a single 8.
    pub fn combine_left(mut self, score: Score) -> (Self, Score) {
        let mut score = score;
        for row in self.0.iter_mut() {
            score = score.saturating_add(combine_row(row));
        }
        (self, score)
    }
}

fn collapse_row(row: &mut [Tile; SIZE]) {
    let mut packed = [0; SIZE];
    for (slot, &v) in packed.iter_mut().zip(row.iter().filter(|&&v| v != 0)) {
        *slot = v;
    }
    *row = packed;
}

fn combine_row(row: &mut [Tile; SIZE]) -> Score {
    let mut gained: Score = 0;
    for i in 0..SIZE - 1 {
        if row[i] != 0 && row[i] == row[i + 1] {
            row[i] = row[i].saturating_add(row[i + 1]);
            row[i + 1] = 0;
            gained = gained.saturating_add(row[i]);
        }
    }
    gained
}

impl From<Rows> for Grid { fn from(rows: Rows) -> Self { Grid::from_rows(rows) } }
impl From<Grid> for Rows { fn from(g: Grid) -> Self { g.0 } }

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Grid({:?})", self.0)
    }
}

const RULE: &str = "+-------+-------+-------+-------+";
const PAD: &str = "|       |       |       |       |";

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{RULE}")?;
        for row in self.0.iter() {
            writeln!(f, "{PAD}")?;
            let cells: Vec<String> = row.iter().map(|&v| format_val(v)).collect();
            writeln!(f, "|{}|", cells.join("|"))?;
            writeln!(f, "{PAD}")?;
            writeln!(f, "{RULE}")?;
        }
        Ok(())
    }
}

fn format_val(val: Tile) -> String {
    match val {
        0 => String::from("       "),
        v if v > 0 && (v as u64).is_power_of_two() => {
            let mut x = v.to_string();
            if x.len() > 7 {
                return String::from("SPECIAL");
            }
            while x.len() < 7 {
                match x.len() {
                    6 => x = format!(" {}", x),
                    _ => x = format!(" {} ", x),
                }
            }
            x
        }
        // debug edits can place values no merge would ever produce
        _ => String::from("SPECIAL"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Grid {
        Grid::from_rows([
            [1, 2, 3, 4],
            [5, 6, 7, 8],
            [9, 10, 11, 12],
            [13, 14, 15, 16],
        ])
    }

    #[test]
    fn new_is_empty_and_fresh() {
        let mut a = Grid::new();
        let b = Grid::new();
        a.set(1, 2, 8);
        assert_eq!(b, Grid::EMPTY);
        assert_eq!(a.get(1, 2), 8);
        assert_eq!(a.rows()[2][1], 8);
        assert_eq!(a.count_empty(), 15);
    }

    #[test]
    fn transpose_and_reverse() {
        let t = sample().transpose();
        assert_eq!(t.rows()[0], [1, 5, 9, 13]);
        assert_eq!(t.rows()[3], [4, 8, 12, 16]);
        let r = sample().reverse_rows();
        assert_eq!(r.rows()[1], [8, 7, 6, 5]);
    }

    #[test]
    fn rotate_ccw_moves_right_column_to_top() {
        let r = sample().rotate(90).unwrap();
        assert_eq!(r.rows()[0], [4, 8, 12, 16]);
        assert_eq!(r.rows()[3], [1, 5, 9, 13]);
        assert_eq!(sample().rotate(-270).unwrap(), r);
    }

    #[test]
    fn rotate_cw_moves_left_column_to_top() {
        let r = sample().rotate(-90).unwrap();
        assert_eq!(r.rows()[0], [13, 9, 5, 1]);
        assert_eq!(sample().rotate(270).unwrap(), r);
    }

    #[test]
    fn rotate_half_reverses_everything() {
        let r = sample().rotate(180).unwrap();
        assert_eq!(r.rows()[0], [16, 15, 14, 13]);
        assert_eq!(r.rows()[3], [4, 3, 2, 1]);
        assert_eq!(sample().rotate(-180).unwrap(), r);
    }

    #[test]
    fn rotation_round_trips() {
        let g = sample();
        assert_eq!(g.rotate(90).unwrap().rotate(-90).unwrap(), g);
        assert_eq!(g.rotate(180).unwrap().rotate(180).unwrap(), g);
        for rot in [Rotation::Ccw90, Rotation::Cw90, Rotation::Half] {
            assert_eq!(g.rotated(rot).rotated(rot.inverse()), g);
        }
    }

    #[test]
    fn invalid_rotation_is_an_error() {
        for deg in [0, 45, 360, -360, 91] {
            assert_eq!(sample().rotate(deg), Err(EngineError::InvalidRotation(deg)));
        }
    }

    #[test]
    fn collapse_packs_rows() {
        let g = Grid::from_rows([
            [0, 0, 0, 2],
            [0, 2, 0, 2],
            [4, 0, 0, 2],
            [2, 0, 0, 4],
        ]);
        let c = g.collapse_left();
        assert_eq!(
            c,
            Grid::from_rows([[2, 0, 0, 0], [2, 2, 0, 0], [4, 2, 0, 0], [2, 4, 0, 0]])
        );
    }

    #[test]
    fn combine_uses_fixed_pairs() {
        let g = Grid::from_rows([
            [2, 2, 0, 0],
            [2, 2, 2, 0],
            [4, 2, 0, 0],
            [2, 4, 0, 0],
        ]);
        let (c, score) = g.combine_left(0);
        assert_eq!(
            c,
            Grid::from_rows([[4, 0, 0, 0], [4, 0, 2, 0], [4, 2, 0, 0], [2, 4, 0, 0]])
        );
        assert_eq!(score, 8);
    }

    #[test]
    fn four_equal_tiles_do_not_cascade() {
        let g = Grid::from_rows([[2, 2, 2, 2], [0; 4], [0; 4], [0; 4]]);
        let (c, score) = g.collapse_left().combine_left(10);
        assert_eq!(c.collapse_left().rows()[0], [4, 4, 0, 0]);
        assert_eq!(score, 18);
    }

    #[test]
    fn pairs_merge_independently() {
        let g = Grid::from_rows([[2, 2, 4, 4], [0; 4], [0; 4], [0; 4]]);
        let (c, score) = g.combine_left(0);
        assert_eq!(c.collapse_left().rows()[0], [4, 8, 0, 0]);
        assert_eq!(score, 12);
    }

    #[test]
    fn zeros_never_score() {
        let (c, score) = Grid::EMPTY.combine_left(3);
        assert_eq!(c, Grid::EMPTY);
        assert_eq!(score, 3);
    }

    #[test]
    fn queries() {
        let g = Grid::from_rows([[0, 2, 0, 0], [0, 0, 64, 0], [0; 4], [0, 0, 0, 8]]);
        assert_eq!(g.count_empty(), 13);
        assert_eq!(g.highest_tile(), 64);
        let empties = g.empty_cells();
        assert_eq!(empties.len(), 13);
        assert!(!empties.contains(&(1, 0)));
        assert!(!empties.contains(&(2, 1)));
        assert!(!empties.contains(&(3, 3)));
    }

    #[test]
    fn display_marks_nonstandard_tiles() {
        let g = Grid::from_rows([[2, 2048, 3, -4], [0; 4], [0; 4], [0; 4]]);
        let s = g.to_string();
        assert!(s.contains("|   2   |  2048 |SPECIAL|SPECIAL|"));
        assert_eq!(s.lines().count(), 1 + 4 * 4);
    }
}
