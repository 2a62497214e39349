use serde::{Deserialize, Serialize};

/// The default symbol used to render a gap.
pub const DEFAULT_GAP_CHAR: u8 = b'-';

/// The move that produced the score of a cell in the score matrix, and therefore the alignment
/// operation it contributes when tracing back.  Sequence A indexes the rows of the matrix and
/// sequence B the columns.
#[derive(Eq, PartialEq, Debug, Copy, Clone, Hash, Default, Serialize, Deserialize)]
pub enum MoveKind {
    /// The matrix origin; consumes nothing and terminates the traceback.
    #[default]
    Origin,
    Match,     // Consumes one A and one B symbol that are equal
    Mismatch,  // Consumes one A and one B symbol that differ
    GapInSeqB, // Consumes a single A symbol, aligned against a gap in B
    GapInSeqA, // Consumes a single B symbol, aligned against a gap in A
}

impl MoveKind {
    /// The CIGAR operator for this move.  Sequence B is treated as the reference, so a gap in B
    /// is an insertion and a gap in A is a deletion.
    pub fn as_char(&self) -> char {
        match *self {
            MoveKind::Origin => '*',
            MoveKind::Match => '=',
            MoveKind::Mismatch => 'X',
            MoveKind::GapInSeqB => 'I',
            MoveKind::GapInSeqA => 'D',
        }
    }

    pub fn length_on_a(&self) -> usize {
        use MoveKind::{GapInSeqA, GapInSeqB, Match, Mismatch, Origin};
        match *self {
            Match | Mismatch | GapInSeqB => 1,
            GapInSeqA | Origin => 0,
        }
    }

    pub fn length_on_b(&self) -> usize {
        use MoveKind::{GapInSeqA, GapInSeqB, Match, Mismatch, Origin};
        match *self {
            Match | Mismatch | GapInSeqA => 1,
            GapInSeqB | Origin => 0,
        }
    }

    pub fn is_gap(&self) -> bool {
        matches!(self, MoveKind::GapInSeqA | MoveKind::GapInSeqB)
    }
}
