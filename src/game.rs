use crate::config::GameConfig;
use crate::grid::{CellState, Grid, GRID_HEIGHT, GRID_WIDTH};
use crate::piece::{Piece, PieceProvider, RandomPieceProvider};

// ============================================================================
// Configuration
// ============================================================================

// Timing (in milliseconds)
pub const DEFAULT_DROP_INTERVAL_MS: u64 = 500;

// Scoring
pub const SCORE_PER_LINE: u32 = 100;

// ============================================================================
// Types
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameState {
    Running,
    GameOver,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum GameEvent {
    PieceMoved,
    PieceRotated,
    PieceLocked,
    LinesCleared(u32),
    PieceSpawned,
    GameOver,
}

/// Read-only view handed to renderers.
#[derive(Clone, Copy, Debug)]
pub struct Snapshot<'a> {
    pub grid: &'a Grid,
    pub current_piece: &'a Piece,
    pub next_piece: &'a Piece,
    pub score: u32,
    pub game_over: bool,
}

impl Snapshot<'_> {
    /// Locked cells with the current piece drawn on top. Piece cells above
    /// the first row are left out.
    pub fn render_grid(&self) -> Vec<Vec<CellState>> {
        let mut visual_grid = self.grid.rows().to_vec();

        for block in self.current_piece.blocks() {
            if block.y >= 0
                && block.y < GRID_HEIGHT as i16
                && block.x >= 0
                && block.x < GRID_WIDTH as i16
            {
                visual_grid[block.y as usize][block.x as usize] =
                    CellState::Filled(self.current_piece.color);
            }
        }

        visual_grid
    }
}

// ============================================================================
// Game
// ============================================================================

pub struct Game {
    grid: Grid,
    current_piece: Piece,
    next_piece: Piece,
    score: u32,
    state: GameState,
    drop_interval_ms: u64,
    drop_counter_ms: u64,
    piece_provider: Box<dyn PieceProvider>,
    events: Vec<GameEvent>,
}

impl Game {
    pub fn new() -> Self {
        Self::with_provider(Box::new(RandomPieceProvider::new()))
    }

    pub fn with_config(config: &GameConfig) -> Self {
        let provider = match config.seed {
            Some(seed) => RandomPieceProvider::seeded(seed),
            None => RandomPieceProvider::new(),
        };
        let mut game = Self::with_provider(Box::new(provider));
        game.drop_interval_ms = config.drop_interval_ms.max(1);
        game
    }

    pub fn with_provider(mut provider: Box<dyn PieceProvider>) -> Self {
        let current_piece = provider.next_piece();
        Self::with_grid_and_provider(Grid::new(), current_piece, provider)
    }

    pub fn with_grid(grid: Grid, current_piece: Piece) -> Self {
        Self::with_grid_and_provider(grid, current_piece, Box::new(RandomPieceProvider::new()))
    }

    pub fn with_grid_and_provider(
        grid: Grid,
        current_piece: Piece,
        mut provider: Box<dyn PieceProvider>,
    ) -> Self {
        let next_piece = provider.next_piece();

        Self {
            grid,
            current_piece,
            next_piece,
            score: 0,
            state: GameState::Running,
            drop_interval_ms: DEFAULT_DROP_INTERVAL_MS,
            drop_counter_ms: 0,
            piece_provider: provider,
            events: Vec::new(),
        }
    }

    pub fn is_valid_position(&self, piece: &Piece) -> bool {
        self.grid
            .is_valid_placement(&piece.shape, piece.position.x, piece.position.y)
    }

    pub fn move_piece(&mut self, dx: i16, dy: i16) -> bool {
        if self.is_game_over() {
            return false;
        }
        let x = self.current_piece.position.x + dx;
        let y = self.current_piece.position.y + dy;
        if self
            .grid
            .is_valid_placement(&self.current_piece.shape, x, y)
        {
            self.current_piece.position.x = x;
            self.current_piece.position.y = y;
            self.events.push(GameEvent::PieceMoved);
            true
        } else {
            false
        }
    }

    /// Rotates in place or not at all; there is no kick search.
    pub fn rotate_piece(&mut self) -> bool {
        if self.is_game_over() {
            return false;
        }
        let rotated = self.current_piece.shape.rotated();
        let Piece { position, .. } = self.current_piece;
        if self.grid.is_valid_placement(&rotated, position.x, position.y) {
            self.current_piece.shape = rotated;
            self.events.push(GameEvent::PieceRotated);
            true
        } else {
            false
        }
    }

    pub fn hard_drop(&mut self) {
        if self.is_game_over() {
            return;
        }
        let queued = self.events.len();
        while self.move_piece(0, 1) {}
        self.events.truncate(queued);
        self.merge_piece();
    }

    /// One gravity step: move down, or lock if the piece is resting.
    pub fn soft_drop(&mut self) {
        if self.is_game_over() {
            return;
        }
        if !self.move_piece(0, 1) {
            self.merge_piece();
        }
    }

    /// Locks the current piece, clears lines and promotes the next piece.
    ///
    /// If the promoted piece does not fit at its spawn position the game ends.
    pub fn merge_piece(&mut self) {
        if self.is_game_over() {
            return;
        }
        let Piece {
            ref shape,
            color,
            position,
        } = self.current_piece;
        self.grid.merge(shape, position.x, position.y, color);
        self.events.push(GameEvent::PieceLocked);

        self.clear_lines();

        let next = self.piece_provider.next_piece();
        self.current_piece = std::mem::replace(&mut self.next_piece, next);
        self.events.push(GameEvent::PieceSpawned);

        if !self.is_valid_position(&self.current_piece) {
            self.state = GameState::GameOver;
            self.events.push(GameEvent::GameOver);
        }
    }

    /// Clears full rows and scores a flat `SCORE_PER_LINE` for each.
    pub fn clear_lines(&mut self) -> u32 {
        if self.is_game_over() {
            return 0;
        }
        let cleared = self.grid.clear_lines();
        if cleared > 0 {
            self.score += cleared * SCORE_PER_LINE;
            self.events.push(GameEvent::LinesCleared(cleared));
        }
        cleared
    }

    /// Advances the drop timer. Once the accumulated time exceeds the drop
    /// interval, performs one soft drop and restarts the count from zero.
    pub fn tick(&mut self, elapsed_ms: u64) {
        if self.is_game_over() {
            return;
        }
        self.drop_counter_ms = self.drop_counter_ms.saturating_add(elapsed_ms);
        if self.drop_counter_ms > self.drop_interval_ms {
            self.drop_counter_ms = 0;
            self.soft_drop();
        }
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            grid: &self.grid,
            current_piece: &self.current_piece,
            next_piece: &self.next_piece,
            score: self.score,
            game_over: self.is_game_over(),
        }
    }

    /// Returns the visual grid state with the current piece overlaid
    pub fn render_grid(&self) -> Vec<Vec<CellState>> {
        self.snapshot().render_grid()
    }

    /// Takes and clears all pending events
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn current_piece(&self) -> &Piece {
        &self.current_piece
    }

    pub fn next_piece(&self) -> &Piece {
        &self.next_piece
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_game_over(&self) -> bool {
        self.state == GameState::GameOver
    }

    pub fn drop_interval_ms(&self) -> u64 {
        self.drop_interval_ms
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Test Helpers
// ============================================================================

pub mod test_helpers {
    use super::*;
    use crate::shapes::BlockColor;

    pub fn empty_grid() -> Grid {
        Grid::new()
    }

    pub fn fill_row(grid: &mut Grid, y: usize) {
        for x in 0..GRID_WIDTH {
            grid.set(x, y, CellState::Filled(BlockColor::Magenta));
        }
    }

    pub fn fill_row_with_gap(grid: &mut Grid, y: usize, gap_x: usize) {
        for x in 0..GRID_WIDTH {
            if x != gap_x {
                grid.set(x, y, CellState::Filled(BlockColor::Magenta));
            }
        }
    }
}
