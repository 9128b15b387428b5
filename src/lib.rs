//! Falling-block puzzle engine: shape catalog, grid with placement rules,
//! line clearing and a time-accumulated drop loop, plus a session type that
//! wires the engine to a renderer, an input source and a score display.

pub mod app;
pub mod config;
pub mod error;
pub mod game;
pub mod grid;
pub mod input;
pub mod piece;
pub mod shapes;

pub use app::{App, Flow, InputSource, Renderer, ScoreSink, StopHandle, View};
pub use config::GameConfig;
pub use error::{Error, Result};
pub use game::{Game, GameEvent, GameState, Snapshot};
pub use grid::{CellState, Grid, GRID_HEIGHT, GRID_WIDTH};
pub use input::Command;
pub use piece::{Piece, PieceProvider, Position, RandomPieceProvider, SequencePieceProvider};
pub use shapes::{BlockColor, Shape, TetrominoType};
