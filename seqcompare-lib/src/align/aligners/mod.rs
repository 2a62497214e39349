pub mod constants;

use anyhow::{anyhow, Result};
use derive_builder::Builder;
use log::debug;

use crate::align::{
    aligners::constants::{MoveKind, DEFAULT_GAP_CHAR},
    alignment::Alignment,
    pairwise::PairwiseDriver,
    scoring::{MatchFunc, MatchParams, Scoring},
    traceback::{AlignmentCell, ScoreMatrix},
};

#[derive(Copy, Clone, Debug, Builder)]
#[builder(name = "Builder", build_fn(name = "build_options"))]
pub struct Options {
    #[builder(default = "1")]
    match_score: i32,
    #[builder(default = "-1")]
    mismatch_score: i32,
    #[builder(default = "-1")]
    gap_score: i32,
    #[builder(default = "DEFAULT_GAP_CHAR")]
    gap_char: u8,
    #[builder(default = "1")]
    threads: usize,
}

impl Options {
    fn scoring(&self) -> Scoring<MatchParams> {
        Scoring::from_scores(self.match_score, self.mismatch_score, self.gap_score)
    }
}

impl Builder {
    pub fn build_aligner(&self) -> Result<GlobalAligner<MatchParams>> {
        let opts = self.build_options()?;
        Ok(GlobalAligner::new(opts.scoring()))
    }

    pub fn build_driver(&self) -> Result<PairwiseDriver<MatchParams>> {
        let opts = self.build_options()?;
        Ok(PairwiseDriver::new(
            GlobalAligner::new(opts.scoring()),
            opts.threads,
            opts.gap_char,
        ))
    }
}

/// A Needleman-Wunsch aligner with a linear gap score.
///
/// Sequence A indexes the rows of the score matrix and sequence B the columns.  Each cell keeps
/// the best of three moves: diagonal (A and B symbols aligned), up (an A symbol against a gap in
/// B), and left (a B symbol against a gap in A).  Ties are always broken in that order, so that
/// the same inputs produce the same alignment.
#[derive(Copy, Clone, Debug)]
pub struct GlobalAligner<F: MatchFunc> {
    scoring: Scoring<F>,
}

impl<F: MatchFunc> GlobalAligner<F> {
    pub fn new(scoring: Scoring<F>) -> Self {
        Self { scoring }
    }

    pub fn scoring(&self) -> &Scoring<F> {
        &self.scoring
    }

    /// Computes the optimal global alignment of `a` against `b`.  Fails if there is not enough
    /// memory for the score matrix or the traceback, or if a score overflows an `i32`.
    pub fn align(&self, a: &[u8], b: &[u8]) -> Result<Alignment> {
        debug!("Aligning sequences of length {} and {}", a.len(), b.len());
        let matrix = self.fill(a, b)?;
        let score = matrix.last().score;
        let trace = matrix.traceback()?;
        Ok(Alignment::from_trace(score, a.len(), b.len(), trace))
    }

    /// Fills the score matrix for `a` against `b`, in row-major order.
    pub fn fill(&self, a: &[u8], b: &[u8]) -> Result<ScoreMatrix> {
        let n = a.len();
        let m = b.len();
        let mut matrix = ScoreMatrix::with_capacity(n, m)?;
        let cols = m + 1;
        let gap = self.scoring.gap;
        let overflow = || {
            anyhow!(
                "Alignment score overflow: the scores are too large for sequences of length {} and {}",
                n,
                m
            )
        };

        // First row: only gaps in A
        matrix.push(AlignmentCell::origin());
        for j in 1..=m {
            matrix.push(AlignmentCell::new(
                self.scoring.gap_score(j).ok_or_else(overflow)?,
                MoveKind::GapInSeqA,
                (0, j - 1),
            ));
        }

        for i in 1..=n {
            // First column: only gaps in B
            matrix.push(AlignmentCell::new(
                self.scoring.gap_score(i).ok_or_else(overflow)?,
                MoveKind::GapInSeqB,
                (i - 1, 0),
            ));
            let x = a[i - 1];
            for j in 1..=m {
                let (diag_score, diag_kind) = self.scoring.diagonal(x, b[j - 1]);
                // NB: candidates are compared in i64 so that only the best score must fit an i32
                let diag = i64::from(matrix.get(i - 1, j - 1).score) + i64::from(diag_score);
                let up = i64::from(matrix.get(i - 1, j).score) + i64::from(gap);
                let left = i64::from(matrix.get(i, j - 1).score) + i64::from(gap);
                let best = diag.max(up).max(left);
                let score = i32::try_from(best).map_err(|_| overflow())?;

                // NB: the order of these checks is the tie-break: diagonal, then up, then left
                let cell = if best == diag {
                    AlignmentCell::new(score, diag_kind, (i - 1, j - 1))
                } else if best == up {
                    AlignmentCell::new(score, MoveKind::GapInSeqB, (i - 1, j))
                } else {
                    AlignmentCell::new(score, MoveKind::GapInSeqA, (i, j - 1))
                };
                matrix.push(cell);
            }
            debug_assert_eq!(matrix.len(), (i + 1) * cols);
        }

        Ok(matrix)
    }
}
