use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::align::aligners::constants::MoveKind::{self, GapInSeqA, GapInSeqB, Match, Mismatch};

/// A global alignment between two sequences A and B.  A is the sequence that indexes the rows
/// of the score matrix and B the one that indexes the columns.
#[derive(Debug, Eq, PartialEq, Clone, Default, Serialize, Deserialize)]
pub struct Alignment {
    /// Needleman-Wunsch alignment score
    pub score: i32,

    /// Length of sequence A
    pub alen: usize,

    /// Length of sequence B
    pub blen: usize,

    /// Alignment operations, from the start of both sequences to their ends
    pub operations: Vec<MoveKind>,
}

impl Alignment {
    /// Builds the alignment from the moves found by traceback, which are ordered from the end
    /// of the alignment to its start.
    pub fn from_trace(score: i32, alen: usize, blen: usize, mut trace: Vec<MoveKind>) -> Self {
        trace.reverse();
        Self {
            score,
            alen,
            blen,
            operations: trace,
        }
    }

    /// The number of alignment columns.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn num_matches(&self) -> usize {
        self.operations.iter().filter(|op| **op == Match).count()
    }

    pub fn num_mismatches(&self) -> usize {
        self.operations.iter().filter(|op| **op == Mismatch).count()
    }

    pub fn num_gaps(&self) -> usize {
        self.operations.iter().filter(|op| op.is_gap()).count()
    }

    /// Checks that the operations consume each sequence exactly once, end to end.
    pub fn validate(&self) {
        let alen: usize = self.operations.iter().map(MoveKind::length_on_a).sum();
        let blen: usize = self.operations.iter().map(MoveKind::length_on_b).sum();
        assert!(
            !self.operations.contains(&MoveKind::Origin),
            "origin is not an alignment operation"
        );
        assert_eq!(self.alen, alen, "alen");
        assert_eq!(self.blen, blen, "blen");
    }

    /// Run-length encoded operations, e.g. `3=1I2=1X`.
    pub fn cigar(&self) -> String {
        self.operations
            .iter()
            .group_by(|op| **op)
            .into_iter()
            .map(|(op, group)| format!("{}{}", group.count(), op.as_char()))
            .join("")
    }

    /// Renders the alignment as two lines of equal length, the first for A and the second for
    /// B, with `gap` placed opposite each symbol that is aligned to a gap.
    pub fn render(&self, a: &[u8], b: &[u8], gap: u8) -> (Vec<u8>, Vec<u8>) {
        debug_assert_eq!(a.len(), self.alen);
        debug_assert_eq!(b.len(), self.blen);
        let mut top = Vec::with_capacity(self.len());
        let mut bottom = Vec::with_capacity(self.len());
        let mut a_index = 0;
        let mut b_index = 0;
        for op in &self.operations {
            match op {
                Match | Mismatch | GapInSeqB => {
                    top.push(a[a_index]);
                    a_index += 1;
                }
                _ => top.push(gap),
            }
            match op {
                Match | Mismatch | GapInSeqA => {
                    bottom.push(b[b_index]);
                    b_index += 1;
                }
                _ => bottom.push(gap),
            }
        }
        (top, bottom)
    }
}
