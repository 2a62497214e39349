use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::align::aligners::constants::MoveKind;

/// One cell of the score matrix: the best score of aligning the prefixes ending at this cell,
/// the move that achieved it, and the `(row, col)` of the cell the move came from.
#[derive(Default, Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub struct AlignmentCell {
    pub score: i32,
    pub kind: MoveKind,
    pub from: (usize, usize),
}

impl AlignmentCell {
    pub fn new(score: i32, kind: MoveKind, from: (usize, usize)) -> Self {
        Self { score, kind, from }
    }

    /// The origin cell, which is its own predecessor.
    pub fn origin() -> Self {
        Self::new(0, MoveKind::Origin, (0, 0))
    }
}

/// The `(n+1) x (m+1)` dynamic programming matrix for aligning a sequence of length `n`
/// (rows) against one of length `m` (columns), stored row-major.
#[derive(Default, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub struct ScoreMatrix {
    rows: usize,
    cols: usize,
    matrix: Vec<AlignmentCell>,
}

impl ScoreMatrix {
    /// Allocates an empty matrix with room for aligning sequences of length `n` and `m`.
    /// Fails if the memory for the matrix cannot be reserved.
    pub fn with_capacity(n: usize, m: usize) -> Result<Self> {
        let rows = n + 1;
        let cols = m + 1;
        let len = rows.checked_mul(cols).with_context(|| {
            format!("Not enough memory: a {rows}x{cols} score matrix is too large")
        })?;
        let mut matrix = Vec::new();
        matrix.try_reserve_exact(len).with_context(|| {
            format!("Not enough memory: could not allocate a {rows}x{cols} score matrix")
        })?;
        Ok(ScoreMatrix { rows, cols, matrix })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// The number of cells filled so far.
    pub fn len(&self) -> usize {
        self.matrix.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matrix.is_empty()
    }

    /// True once every cell has been filled.
    pub fn is_full(&self) -> bool {
        self.matrix.len() == self.rows * self.cols
    }

    /// Appends the next cell in row-major order.
    #[inline(always)]
    pub fn push(&mut self, cell: AlignmentCell) {
        debug_assert!(!self.is_full());
        self.matrix.push(cell);
    }

    #[inline(always)]
    pub fn get(&self, i: usize, j: usize) -> &AlignmentCell {
        debug_assert!(i < self.rows);
        debug_assert!(j < self.cols);
        &self.matrix[i * self.cols + j]
    }

    /// The cell in the last row and column, holding the score of the full alignment.
    pub fn last(&self) -> &AlignmentCell {
        self.get(self.rows - 1, self.cols - 1)
    }

    /// Walks the predecessors from the last cell back to the origin, returning the moves in
    /// reverse order (last move first).  The matrix must be full.
    pub fn traceback(&self) -> Result<Vec<MoveKind>> {
        assert!(self.is_full(), "Bug: traceback on a partially filled matrix");
        let mut i = self.rows - 1;
        let mut j = self.cols - 1;
        let mut trace: Vec<MoveKind> = Vec::new();
        trace.try_reserve_exact(i + j).with_context(|| {
            format!("Not enough memory: could not allocate a traceback of length {}", i + j)
        })?;
        loop {
            let cell = self.get(i, j);
            if cell.kind == MoveKind::Origin {
                break;
            }
            let (from_i, from_j) = cell.from;
            debug_assert!(from_i + from_j < i + j, "predecessor must be closer to the origin");
            trace.push(cell.kind);
            i = from_i;
            j = from_j;
        }
        debug_assert_eq!((i, j), (0, 0));
        Ok(trace)
    }
}
