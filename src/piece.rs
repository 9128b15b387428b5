use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::grid::GRID_WIDTH;
use crate::shapes::{BlockColor, Shape, TetrominoType};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Position {
    pub x: i16,
    pub y: i16,
}

// ============================================================================
// Piece
// ============================================================================

/// A falling piece. `position` is the top-left corner of the shape's
/// bounding box in grid coordinates; `y` may be negative.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Piece {
    pub shape: Shape,
    pub color: BlockColor,
    pub position: Position,
}

impl Piece {
    /// Places `shape` horizontally centered on the top row.
    pub fn spawn(shape: Shape, color: BlockColor) -> Self {
        let x = (GRID_WIDTH / 2) as i16 - (shape.width() / 2) as i16;
        Self::new_at(shape, color, x, 0)
    }

    pub fn new_at(shape: Shape, color: BlockColor, x: i16, y: i16) -> Self {
        Self {
            shape,
            color,
            position: Position { x, y },
        }
    }

    pub fn blocks(&self) -> Vec<Position> {
        self.shape
            .cells()
            .map(|(dx, dy)| Position {
                x: self.position.x + dx,
                y: self.position.y + dy,
            })
            .collect()
    }
}

// ============================================================================
// Piece Provider Trait
// ============================================================================

pub trait PieceProvider {
    fn next_piece(&mut self) -> Piece;
}

/// Uniform draw of shape and color, independently of each other.
pub struct RandomPieceProvider {
    rng: StdRng,
}

impl RandomPieceProvider {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomPieceProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl PieceProvider for RandomPieceProvider {
    fn next_piece(&mut self) -> Piece {
        let kind = TetrominoType::random(&mut self.rng);
        let color = BlockColor::random(&mut self.rng);
        Piece::spawn(kind.shape(), color)
    }
}

/// Cycles through a fixed list; used for deterministic games and tests.
pub struct SequencePieceProvider {
    pieces: Vec<(Shape, BlockColor)>,
    index: usize,
}

impl SequencePieceProvider {
    pub fn new(pieces: Vec<(Shape, BlockColor)>) -> Self {
        assert!(!pieces.is_empty(), "sequence needs at least one piece");
        Self { pieces, index: 0 }
    }

    /// Catalog shapes with colors assigned round-robin.
    pub fn from_types(types: Vec<TetrominoType>) -> Self {
        let pieces = types
            .into_iter()
            .enumerate()
            .map(|(i, kind)| (kind.shape(), BlockColor::ALL[i % BlockColor::ALL.len()]))
            .collect();
        Self::new(pieces)
    }
}

impl PieceProvider for SequencePieceProvider {
    fn next_piece(&mut self) -> Piece {
        let (shape, color) = &self.pieces[self.index % self.pieces.len()];
        self.index += 1;
        Piece::spawn(shape.clone(), *color)
    }
}
