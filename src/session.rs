//! One game from first spawn to game over (or quit).
//!
//! The session owns the grid, the score and the RNG. Everything outside the
//! engine (drawing, reading keys, the debug console) is reached through the
//! [`Renderer`], [`InputSource`] and [`DebugConsole`] traits, so a test can
//! drive a whole game with a scripted front end.

use log::{debug, info};
use rand::Rng;

use crate::engine::{self, Direction, Grid, MoveOutcome, Score, Tile, SIZE};
use crate::error::EngineError;

/// Read-only view handed to collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    pub grid: Grid,
    pub score: Score,
    pub highscore: Score,
}

/// One resolved input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Move(Direction),
    Quit,
    DebugRequest,
}

/// A typed edit from the debug console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugEdit {
    SetCell { x: usize, y: usize, value: Tile },
    SetScore(Score),
}

impl DebugEdit {
    /// Parse `"x y value"` into a cell edit. Range is checked on apply.
    pub fn parse(text: &str) -> Result<Self, EngineError> {
        let parts: Vec<&str> = text.split_whitespace().collect();
        let [x, y, value] = parts.as_slice() else {
            return Err(EngineError::InvalidEdit(format!("expected `x y value`, got {text:?}")));
        };
        Ok(DebugEdit::SetCell {
            x: parse_coord(x)?,
            y: parse_coord(y)?,
            value: parse_int(value)?,
        })
    }

    /// Parse a bare integer into a score override. Negative values are kept.
    pub fn parse_score(text: &str) -> Result<Self, EngineError> {
        Ok(DebugEdit::SetScore(parse_int(text.trim())?))
    }
}

fn parse_int(s: &str) -> Result<i64, EngineError> {
    s.parse().map_err(|_| EngineError::InvalidEdit(format!("{s:?} is not an integer")))
}

fn parse_coord(s: &str) -> Result<usize, EngineError> {
    let v = parse_int(s)?;
    usize::try_from(v).map_err(|_| EngineError::InvalidEdit(format!("coordinate {v} out of range 0..{SIZE}")))
}

/// What the debug console handed back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DebugCommand {
    Edit(DebugEdit),
    /// Text that could not be turned into an edit.
    Invalid(String),
    /// Leave the console without editing.
    Cancel,
}

impl From<Result<DebugEdit, EngineError>> for DebugCommand {
    fn from(r: Result<DebugEdit, EngineError>) -> Self {
        match r {
            Ok(edit) => DebugCommand::Edit(edit),
            Err(EngineError::InvalidEdit(msg)) => DebugCommand::Invalid(msg),
            Err(other) => DebugCommand::Invalid(other.to_string()),
        }
    }
}

pub trait Renderer {
    fn render(&mut self, view: &Snapshot);

    /// Informational message (e.g. a rejected edit).
    fn notice(&mut self, _message: &str) {}
}

pub trait InputSource {
    /// Block until the next event. `None` means the input was not
    /// recognised and is ignored.
    fn next_event(&mut self) -> Option<InputEvent>;
}

pub trait DebugConsole {
    fn request_edit(&mut self, view: &Snapshot) -> DebugCommand;

    /// The last edit was refused; the console may prompt again.
    fn reject(&mut self, error: &EngineError);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    GameOver,
    Quit,
}

/// Final result of [`Session::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameReport {
    pub final_score: Score,
    pub reason: EndReason,
    pub previous_highscore: Score,
    /// Set when the final score beat the baseline; the value to persist.
    pub new_highscore: Option<Score>,
    pub moves: u64,
}

pub struct Session<R: Rng> {
    grid: Grid,
    score: Score,
    highscore: Score,
    four_probability: f64,
    moves: u64,
    rng: R,
}

impl<R: Rng> Session<R> {
    /// Fresh game: empty grid, score 0.
    pub fn new(highscore: Score, rng: R) -> Self {
        Self::with_state(Grid::new(), 0, highscore, rng)
    }

    /// Start from an arbitrary grid and score.
    pub fn with_state(grid: Grid, score: Score, highscore: Score, rng: R) -> Self {
        Session { grid, score, highscore, four_probability: engine::FOUR_PROBABILITY, moves: 0, rng }
    }

    pub fn with_four_probability(mut self, p: f64) -> Self {
        self.four_probability = p;
        self
    }

    #[inline]
    pub fn grid(&self) -> &Grid { &self.grid }

    #[inline]
    pub fn score(&self) -> Score { self.score }

    #[inline]
    pub fn highscore(&self) -> Score { self.highscore }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot { grid: self.grid, score: self.score, highscore: self.highscore }
    }

    /// Place one random tile.
    pub fn spawn(&mut self) -> Result<(usize, usize), EngineError> {
        engine::spawn_tile_with(&mut self.grid, &mut self.rng, self.four_probability)
    }

    pub fn is_over(&self) -> bool { engine::is_terminal(&self.grid) }

    /// Apply a direction. On `Unchanged` nothing about the session changes.
    pub fn play_move(&mut self, direction: Direction) -> MoveOutcome {
        let outcome = engine::apply_move(&self.grid, self.score, direction);
        if let MoveOutcome::Moved { grid, score, gained } = outcome {
            self.grid = grid;
            self.score = score;
            self.moves += 1;
            debug!("move {:?}: +{} (score {})", direction, gained, score);
        }
        outcome
    }

    /// Overwrite one cell. `x` is the column, `y` the row, both `0..4`.
    pub fn set_cell(&mut self, x: usize, y: usize, value: Tile) -> Result<(), EngineError> {
        if x >= SIZE || y >= SIZE {
            return Err(EngineError::InvalidEdit(format!("cell ({x}, {y}) out of range 0..{SIZE}")));
        }
        self.grid.set(x, y, value);
        debug!("debug edit: cell ({x}, {y}) = {value}");
        Ok(())
    }

    /// Overwrite the score. Not validated.
    pub fn set_score(&mut self, value: Score) {
        self.score = value;
        debug!("debug edit: score = {value}");
    }

    pub fn apply_edit(&mut self, edit: DebugEdit) -> Result<(), EngineError> {
        match edit {
            DebugEdit::SetCell { x, y, value } => self.set_cell(x, y, value),
            DebugEdit::SetScore(value) => {
                self.set_score(value);
                Ok(())
            }
        }
    }

    /// Play until game over or quit.
    ///
    /// Loop: spawn, render, stop if terminal, then read events until one
    /// actually moves the board. No-op moves and unrecognised input are
    /// re-requested without spawning.
    pub fn run<F>(&mut self, io: &mut F) -> Result<GameReport, EngineError>
    where
        F: Renderer + InputSource + DebugConsole,
    {
        loop {
            self.spawn()?;
            io.render(&self.snapshot());
            if self.is_over() {
                return Ok(self.finish(EndReason::GameOver));
            }
            if !self.take_turn(io) {
                return Ok(self.finish(EndReason::Quit));
            }
        }
    }

    // Returns false on quit.
    fn take_turn<F>(&mut self, io: &mut F) -> bool
    where
        F: Renderer + InputSource + DebugConsole,
    {
        loop {
            match io.next_event() {
                None => continue,
                Some(InputEvent::Quit) => return false,
                Some(InputEvent::DebugRequest) => {
                    self.debug_console(io);
                    io.render(&self.snapshot());
                }
                Some(InputEvent::Move(dir)) => {
                    if self.play_move(dir).is_moved() {
                        return true;
                    }
                }
            }
        }
    }

    fn debug_console<F>(&mut self, io: &mut F)
    where
        F: Renderer + DebugConsole,
    {
        loop {
            let edit = match io.request_edit(&self.snapshot()) {
                DebugCommand::Cancel => return,
                DebugCommand::Edit(edit) => edit,
                DebugCommand::Invalid(msg) => {
                    let err = EngineError::InvalidEdit(msg);
                    io.notice(&err.to_string());
                    io.reject(&err);
                    continue;
                }
            };
            match self.apply_edit(edit) {
                Ok(()) => return,
                Err(err) => {
                    io.notice(&err.to_string());
                    io.reject(&err);
                }
            }
        }
    }

    fn finish(&self, reason: EndReason) -> GameReport {
        let new_highscore = (self.score > self.highscore).then_some(self.score);
        info!(
            "game ended ({:?}) after {} moves: score {}, highest tile {}",
            reason,
            self.moves,
            self.score,
            self.grid.highest_tile()
        );
        if let Some(hs) = new_highscore {
            info!("new high score {hs} (was {})", self.highscore);
        }
        GameReport {
            final_score: self.score,
            reason,
            previous_highscore: self.highscore,
            new_highscore,
            moves: self.moves,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};
    use std::collections::VecDeque;

    #[derive(Default)]
    struct Script {
        events: VecDeque<Option<InputEvent>>,
        edits: VecDeque<DebugCommand>,
        frames: Vec<Snapshot>,
        rejected: Vec<EngineError>,
    }

    impl Renderer for Script {
        fn render(&mut self, view: &Snapshot) { self.frames.push(*view); }
    }

    impl InputSource for Script {
        fn next_event(&mut self) -> Option<InputEvent> {
            self.events.pop_front().unwrap_or(Some(InputEvent::Quit))
        }
    }

    impl DebugConsole for Script {
        fn request_edit(&mut self, _view: &Snapshot) -> DebugCommand {
            self.edits.pop_front().unwrap_or(DebugCommand::Cancel)
        }
        fn reject(&mut self, error: &EngineError) { self.rejected.push(error.clone()); }
    }

    fn rng() -> StdRng { StdRng::seed_from_u64(11) }

    #[test]
    fn new_session_is_empty() {
        let s = Session::new(100, rng());
        assert_eq!(*s.grid(), Grid::EMPTY);
        assert_eq!(s.score(), 0);
        assert_eq!(s.highscore(), 100);
    }

    #[test]
    fn sessions_do_not_share_state() {
        let mut a = Session::new(0, rng());
        let b = Session::new(0, rng());
        a.set_cell(0, 0, 2).unwrap();
        assert_eq!(*b.grid(), Grid::EMPTY);
    }

    #[test]
    fn spawn_then_move_left() {
        let mut s = Session::new(0, rng());
        s.spawn().unwrap();
        assert_eq!(s.grid().count_empty(), 15);

        let start = Grid::from_rows([[0, 2, 0, 2], [0; 4], [0; 4], [0; 4]]);
        let mut s = Session::with_state(start, 0, 0, rng());
        assert!(s.play_move(Direction::Left).is_moved());
        assert_eq!(*s.grid(), Grid::from_rows([[4, 0, 0, 0], [0; 4], [0; 4], [0; 4]]));
        assert_eq!(s.score(), 4);
    }

    #[test]
    fn no_op_move_leaves_state_alone() {
        let start = Grid::from_rows([[2, 0, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let mut s = Session::with_state(start, 7, 0, rng());
        assert_eq!(s.play_move(Direction::Left), MoveOutcome::Unchanged);
        assert_eq!(s.play_move(Direction::Up), MoveOutcome::Unchanged);
        assert_eq!(*s.grid(), start);
        assert_eq!(s.score(), 7);
    }

    #[test]
    fn out_of_range_edit_is_rejected() {
        let mut s = Session::new(0, rng());
        let before = s.snapshot();
        assert!(matches!(s.set_cell(4, 0, 8), Err(EngineError::InvalidEdit(_))));
        assert!(matches!(s.set_cell(0, 9, 8), Err(EngineError::InvalidEdit(_))));
        assert_eq!(s.snapshot(), before);
        s.set_cell(3, 1, 8).unwrap();
        assert_eq!(s.grid().rows()[1][3], 8);
    }

    #[test]
    fn negative_score_override_is_accepted() {
        let mut s = Session::new(0, rng());
        s.apply_edit(DebugEdit::SetScore(-50)).unwrap();
        assert_eq!(s.score(), -50);
    }

    #[test]
    fn parse_debug_edits() {
        assert_eq!(DebugEdit::parse("1 2 8"), Ok(DebugEdit::SetCell { x: 1, y: 2, value: 8 }));
        assert_eq!(DebugEdit::parse(" 0 3 -7 "), Ok(DebugEdit::SetCell { x: 0, y: 3, value: -7 }));
        assert!(matches!(DebugEdit::parse("1 2"), Err(EngineError::InvalidEdit(_))));
        assert!(matches!(DebugEdit::parse("a 2 8"), Err(EngineError::InvalidEdit(_))));
        assert!(matches!(DebugEdit::parse("1 2 8.5"), Err(EngineError::InvalidEdit(_))));
        assert!(matches!(DebugEdit::parse("-1 2 8"), Err(EngineError::InvalidEdit(_))));
        assert_eq!(DebugEdit::parse_score("-12"), Ok(DebugEdit::SetScore(-12)));
        assert!(matches!(DebugEdit::parse_score("lots"), Err(EngineError::InvalidEdit(_))));
    }

    #[test]
    fn quit_before_any_move() {
        let mut s = Session::new(0, rng());
        let mut io = Script::default();
        let report = s.run(&mut io).unwrap();
        assert_eq!(report.reason, EndReason::Quit);
        assert_eq!(report.final_score, 0);
        assert_eq!(report.new_highscore, None);
        assert_eq!(io.frames.len(), 1);
        assert_eq!(io.frames[0].grid.count_empty(), 15);
    }

    #[test]
    fn unrecognised_input_and_no_ops_do_not_spawn() {
        // One tile in the top-left corner: Left and Up are no-ops.
        let mut grid = Grid::new();
        grid.set(0, 0, 2);
        let mut s = Session::with_state(grid, 0, 0, rng()).with_four_probability(0.0);
        // Fill every cell except (0, 0)'s right-hand neighbour so the first
        // spawn lands there deterministically.
        for y in 0..4 {
            for x in 0..4 {
                if (x, y) != (0, 0) && (x, y) != (1, 0) {
                    s.set_cell(x, y, if (x + y) % 2 == 0 { 8 } else { 16 }).unwrap();
                }
            }
        }
        let mut io = Script::default();
        io.events.extend([None, Some(InputEvent::Move(Direction::Up)), None]);
        let report = s.run(&mut io).unwrap();
        assert_eq!(report.reason, EndReason::Quit);
        assert_eq!(io.frames.len(), 1);
        assert_eq!(io.frames[0].grid.get(1, 0), 2);
        assert_eq!(s.grid().count_empty(), 0);
    }

    #[test]
    fn invalid_edits_are_reprompted() {
        let mut s = Session::new(0, rng());
        let mut io = Script::default();
        io.events.extend([Some(InputEvent::DebugRequest), Some(InputEvent::Quit)]);
        io.edits.extend([
            DebugCommand::from(DebugEdit::parse("x y z")),
            DebugCommand::Edit(DebugEdit::SetCell { x: 7, y: 0, value: 2 }),
            DebugCommand::Edit(DebugEdit::SetScore(5000)),
        ]);
        let report = s.run(&mut io).unwrap();
        assert_eq!(io.rejected.len(), 2);
        assert!(io.rejected.iter().all(|e| matches!(e, EngineError::InvalidEdit(_))));
        assert_eq!(report.final_score, 5000);
        assert_eq!(report.new_highscore, Some(5000));
        assert_eq!(report.previous_highscore, 0);
        // spawn frame + frame after the debug console
        assert_eq!(io.frames.len(), 2);
        assert_eq!(io.frames[1].score, 5000);
    }

    #[test]
    fn full_board_reports_game_over() {
        let grid = Grid::from_rows([
            [2, 4, 2, 4],
            [4, 2, 4, 2],
            [2, 4, 2, 4],
            [4, 2, 4, 0],
        ]);
        // Only a 2 or a 4 can land in the hole; either leaves no moves as
        // long as both neighbours differ from it.
        let mut s = Session::with_state(grid, 300, 1000, rng());
        s.set_cell(2, 3, 8).unwrap();
        s.set_cell(3, 2, 8).unwrap();
        let mut io = Script::default();
        let report = s.run(&mut io).unwrap();
        assert_eq!(report.reason, EndReason::GameOver);
        assert_eq!(report.final_score, 300);
        assert_eq!(report.new_highscore, None);
        assert_eq!(report.moves, 0);
    }

    #[test]
    fn spawning_on_a_full_board_surfaces() {
        let grid = Grid::from_rows([[2; 4]; 4]);
        let mut s = Session::with_state(grid, 0, 0, rng());
        let mut io = Script::default();
        assert_eq!(s.run(&mut io), Err(EngineError::ExhaustedBoard));
    }
}
