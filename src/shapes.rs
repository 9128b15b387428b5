use rand::Rng;

// ============================================================================
// Shape Matrix
// ============================================================================

/// Occupancy matrix of a piece in one rotation. Rows are top to bottom.
///
/// A shape is never rotated in place: [`Shape::rotated`] returns a new matrix.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Shape {
    rows: Vec<Vec<bool>>,
}

impl Shape {
    pub fn new(rows: Vec<Vec<bool>>) -> Self {
        Self { rows }
    }

    /// Builds a shape from 0/1 rows, e.g. `&[&[1, 1, 1], &[0, 1, 0]]`.
    pub fn from_bits(rows: &[&[u8]]) -> Self {
        Self {
            rows: rows
                .iter()
                .map(|row| row.iter().map(|&bit| bit != 0).collect())
                .collect(),
        }
    }

    pub fn rows(&self) -> &[Vec<bool>] {
        &self.rows
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Width of the bounding box, taken from the first row.
    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    /// Offsets `(dx, dy)` of every occupied cell relative to the top-left corner.
    pub fn cells(&self) -> impl Iterator<Item = (i16, i16)> + '_ {
        self.rows.iter().enumerate().flat_map(|(i, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, &filled)| filled)
                .map(move |(j, _)| (j as i16, i as i16))
        })
    }

    /// Quarter turn: `rotated[i][j] = shape[j][width - 1 - i]`.
    ///
    /// The result has `width` rows and `height` columns. Applying it four times
    /// yields the original matrix.
    pub fn rotated(&self) -> Self {
        let width = self.width();
        let rows = (0..width)
            .map(|i| {
                self.rows
                    .iter()
                    .map(|row| row[row.len() - 1 - i])
                    .collect()
            })
            .collect();
        Self { rows }
    }

    /// Offset that centers this shape inside a `size`×`size` preview box,
    /// measured in half cells as `(size - width, size - height)`.
    pub fn preview_offset(&self, size: usize) -> (usize, usize) {
        (
            size.saturating_sub(self.width()),
            size.saturating_sub(self.height()),
        )
    }
}

// ============================================================================
// Catalog
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TetrominoType {
    I,
    O,
    T,
    L,
    J,
    S,
    Z,
}

impl TetrominoType {
    pub const ALL: [Self; 7] = [Self::I, Self::O, Self::T, Self::L, Self::J, Self::S, Self::Z];

    fn bits(&self) -> &'static [&'static [u8]] {
        match self {
            TetrominoType::I => &[&[1, 1, 1, 1]],
            TetrominoType::O => &[&[1, 1], &[1, 1]],
            TetrominoType::T => &[&[1, 1, 1], &[0, 1, 0]],
            TetrominoType::L => &[&[1, 1, 1], &[1, 0, 0]],
            TetrominoType::J => &[&[1, 1, 1], &[0, 0, 1]],
            TetrominoType::S => &[&[1, 1, 0], &[0, 1, 1]],
            TetrominoType::Z => &[&[0, 1, 1], &[1, 1, 0]],
        }
    }

    /// Spawn orientation of this tetromino.
    pub fn shape(&self) -> Shape {
        Shape::from_bits(self.bits())
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

/// Color tag stored in locked cells. Chosen independently of the shape.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BlockColor {
    Cyan,
    Yellow,
    Magenta,
    Red,
    Green,
    Blue,
}

impl BlockColor {
    pub const ALL: [Self; 6] = [
        Self::Cyan,
        Self::Yellow,
        Self::Magenta,
        Self::Red,
        Self::Green,
        Self::Blue,
    ];

    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            BlockColor::Cyan => (0x00, 0xf0, 0xf0),
            BlockColor::Yellow => (0xf0, 0xf0, 0x00),
            BlockColor::Magenta => (0xf0, 0x00, 0xf0),
            BlockColor::Red => (0xf0, 0x00, 0x00),
            BlockColor::Green => (0x00, 0xf0, 0x00),
            BlockColor::Blue => (0x00, 0x00, 0xf0),
        }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}
