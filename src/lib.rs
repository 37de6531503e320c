//! slide-2048: a terminal 2048 game built around a small board engine
//!
//! This crate provides:
//! - A `Grid` value type with the rotate/collapse/combine primitives (`engine` module)
//! - Directional moves, tile spawning and game-over detection on top of them
//! - A `Session` that runs one game against pluggable render/input/debug front ends
//! - A high-score file and TOML configuration for the terminal binary
//!
//! Quick start:
//! ```
//! use slide_2048::engine::{apply_move, spawn_tile, Direction, Grid, MoveOutcome};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! // Deterministic board initialization with a seeded RNG
//! let mut rng = StdRng::seed_from_u64(42);
//! let mut g = Grid::new();
//! spawn_tile(&mut g, &mut rng).unwrap();
//! spawn_tile(&mut g, &mut rng).unwrap();
//!
//! assert_eq!(g.count_empty(), 14);
//!
//! // Two 2s in a row merge toward the wall and score 4
//! let g = Grid::from_rows([[0, 2, 0, 2], [0; 4], [0; 4], [0; 4]]);
//! match apply_move(&g, 0, Direction::Left) {
//!     MoveOutcome::Moved { grid, score, gained } => {
//!         assert_eq!(grid.rows()[0], [4, 0, 0, 0]);
//!         assert_eq!((score, gained), (4, 4));
//!     }
//!     MoveOutcome::Unchanged => unreachable!(),
//! }
//!
//! // A move that changes nothing is reported as such
//! let packed = Grid::from_rows([[2, 4, 0, 0], [8, 0, 0, 0], [0; 4], [0; 4]]);
//! assert!(!apply_move(&packed, 0, Direction::Left).is_moved());
//! ```
//!
//! Full loop with a scripted front end
//! ```
//! use slide_2048::engine::Direction;
//! use slide_2048::session::{
//!     DebugCommand, DebugConsole, EndReason, InputEvent, InputSource, Renderer, Session, Snapshot,
//! };
//! use slide_2048::EngineError;
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! struct Bot(u32);
//! impl Renderer for Bot {
//!     fn render(&mut self, _view: &Snapshot) {}
//! }
//! impl InputSource for Bot {
//!     fn next_event(&mut self) -> Option<InputEvent> {
//!         self.0 += 1;
//!         if self.0 > 200 { return Some(InputEvent::Quit); }
//!         Some(InputEvent::Move([Direction::Left, Direction::Down, Direction::Right, Direction::Up][self.0 as usize % 4]))
//!     }
//! }
//! impl DebugConsole for Bot {
//!     fn request_edit(&mut self, _view: &Snapshot) -> DebugCommand { DebugCommand::Cancel }
//!     fn reject(&mut self, _error: &EngineError) {}
//! }
//!
//! let mut session = Session::new(0, StdRng::seed_from_u64(123));
//! let report = session.run(&mut Bot(0)).unwrap();
//! assert!(matches!(report.reason, EndReason::GameOver | EndReason::Quit));
//! assert_eq!(report.final_score, session.score());
//! ```
//!
pub mod config;
pub mod engine;
mod error;
pub mod highscore;
pub mod session;

pub use error::EngineError;
