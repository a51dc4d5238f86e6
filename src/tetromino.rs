use macroquad::prelude::Color;
use rand::Rng;

/// Row and column every new piece is anchored at.
pub const SPAWN_ROW: i32 = 0;
pub const SPAWN_COL: i32 = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TetrominoType {
    I, O, T, S, Z, J, L,
}

impl TetrominoType {
    pub const ALL: [TetrominoType; 7] = [
        TetrominoType::I,
        TetrominoType::O,
        TetrominoType::T,
        TetrominoType::S,
        TetrominoType::Z,
        TetrominoType::J,
        TetrominoType::L,
    ];

    /// Uniform pick over the seven variants.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    pub fn color(self) -> Color {
        PIECE_COLORS[self as usize]
    }
}

const PIECE_COLORS: [Color; 7] = [
    Color { r: 0.0, g: 1.0,   b: 1.0, a: 1.0 }, // I
    Color { r: 1.0, g: 1.0,   b: 0.0, a: 1.0 }, // O
    Color { r: 1.0, g: 0.0,   b: 1.0, a: 1.0 }, // T
    Color { r: 0.0, g: 1.0,   b: 0.0, a: 1.0 }, // S
    Color { r: 1.0, g: 0.0,   b: 0.0, a: 1.0 }, // Z
    Color { r: 0.0, g: 0.0,   b: 1.0, a: 1.0 }, // J
    Color { r: 1.0, g: 0.784, b: 0.0, a: 1.0 }, // L
];

/// `[col, row]` offsets from the anchor, one table per orientation.
/// The first entry of every state is the pivot `[0, 0]`.
const TETROMINO_SHAPES: [[[[i32; 2]; 4]; 4]; 7] = [
    // I
    [
        [[0, 0], [-1, 0], [1, 0], [2, 0]],
        [[0, 0], [0, -2], [0, -1], [0, 1]],
        [[0, 0], [-2, 0], [-1, 0], [1, 0]],
        [[0, 0], [0, -1], [0, 1], [0, 2]],
    ],
    // O
    [
        [[0, 0], [1, 0], [0, 1], [1, 1]],
        [[0, 0], [1, 0], [0, 1], [1, 1]],
        [[0, 0], [1, 0], [0, 1], [1, 1]],
        [[0, 0], [1, 0], [0, 1], [1, 1]],
    ],
    // T
    [
        [[0, 0], [-1, 0], [1, 0], [0, 1]],
        [[0, 0], [0, -1], [0, 1], [1, 0]],
        [[0, 0], [-1, 0], [1, 0], [0, -1]],
        [[0, 0], [0, -1], [0, 1], [-1, 0]],
    ],
    // S
    [
        [[0, 0], [-1, 0], [0, 1], [1, 1]],
        [[0, 0], [0, 1], [1, 0], [1, -1]],
        [[0, 0], [1, 0], [0, -1], [-1, -1]],
        [[0, 0], [-1, 0], [-1, 1], [0, -1]],
    ],
    // Z
    [
        [[0, 0], [0, 1], [-1, 1], [1, 0]],
        [[0, 0], [0, -1], [1, 0], [1, 1]],
        [[0, 0], [-1, 0], [0, -1], [1, -1]],
        [[0, 0], [0, 1], [-1, 0], [-1, -1]],
    ],
    // J
    [
        [[0, 0], [-1, 0], [-1, 1], [1, 0]],
        [[0, 0], [0, -1], [0, 1], [1, 1]],
        [[0, 0], [-1, 0], [1, 0], [1, -1]],
        [[0, 0], [0, -1], [0, 1], [-1, -1]],
    ],
    // L
    [
        [[0, 0], [-1, 0], [1, 0], [1, 1]],
        [[0, 0], [0, -1], [0, 1], [1, -1]],
        [[0, 0], [-1, 0], [1, 0], [-1, -1]],
        [[0, 0], [0, -1], [0, 1], [-1, 1]],
    ],
];

/// Cell offsets of `t_type` in the given orientation (taken mod 4).
pub fn shape(t_type: TetrominoType, orientation: u8) -> [[i32; 2]; 4] {
    TETROMINO_SHAPES[t_type as usize][(orientation % 4) as usize]
}

/// A falling piece. Value type: moves and rotations return a new piece so
/// callers can test a candidate before committing to it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tetromino {
    pub t_type: TetrominoType,
    pub row: i32,
    pub col: i32,
    pub orientation: u8,
}

impl Tetromino {
    pub fn new(t_type: TetrominoType) -> Self {
        Self::at(t_type, SPAWN_ROW, SPAWN_COL)
    }

    pub fn at(t_type: TetrominoType, row: i32, col: i32) -> Self {
        Tetromino {
            t_type,
            row,
            col,
            orientation: 0,
        }
    }

    pub fn color(&self) -> Color {
        self.t_type.color()
    }

    pub fn shape(&self) -> [[i32; 2]; 4] {
        shape(self.t_type, self.orientation)
    }

    /// Absolute `(row, col)` of every occupied cell.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> {
        let (row, col) = (self.row, self.col);
        self.shape()
            .into_iter()
            .map(move |[dx, dy]| (row + dy, col + dx))
    }

    pub fn moved(&self, d_row: i32, d_col: i32) -> Self {
        Tetromino {
            row: self.row + d_row,
            col: self.col + d_col,
            ..*self
        }
    }

    pub fn rotated(&self, clockwise: bool) -> Self {
        let orientation = if clockwise {
            (self.orientation + 1) % 4
        } else {
            (self.orientation + 3) % 4
        };
        Tetromino { orientation, ..*self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn every_shape_has_pivot_and_four_distinct_cells() {
        for t_type in TetrominoType::ALL {
            for orientation in 0..4 {
                let cells: HashSet<[i32; 2]> = shape(t_type, orientation).into_iter().collect();
                assert!(cells.contains(&[0, 0]), "{:?}/{} lacks pivot", t_type, orientation);
                assert_eq!(cells.len(), 4, "{:?}/{} has duplicates", t_type, orientation);
            }
        }
    }

    #[test]
    fn o_piece_ignores_orientation() {
        let base = shape(TetrominoType::O, 0);
        for orientation in 1..4 {
            assert_eq!(shape(TetrominoType::O, orientation), base);
        }
    }

    #[test]
    fn orientation_wraps() {
        assert_eq!(shape(TetrominoType::T, 5), shape(TetrominoType::T, 1));
    }

    #[test]
    fn rotation_cycles_both_ways() {
        let piece = Tetromino::new(TetrominoType::L);
        assert_eq!(piece.rotated(false).orientation, 3);
        assert_eq!(piece.rotated(true).orientation, 1);
        assert_eq!(piece.rotated(true).rotated(false), piece);

        let mut spun = piece;
        for _ in 0..4 {
            spun = spun.rotated(true);
        }
        assert_eq!(spun, piece);
    }

    #[test]
    fn cells_are_offset_from_anchor() {
        let piece = Tetromino::at(TetrominoType::I, 3, 5);
        let cells: Vec<_> = piece.cells().collect();
        assert_eq!(cells, vec![(3, 5), (3, 4), (3, 6), (3, 7)]);
    }

    #[test]
    fn random_draws_every_variant() {
        let mut rng = StdRng::seed_from_u64(7);
        let seen: HashSet<_> = (0..500).map(|_| TetrominoType::random(&mut rng)).collect();
        assert_eq!(seen.len(), 7);
    }
}
