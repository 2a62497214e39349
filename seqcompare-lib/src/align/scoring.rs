use serde::{Deserialize, Serialize};

use crate::align::aligners::constants::MoveKind;

/// Trait required to instantiate a [`Scoring`] instance.
pub trait MatchFunc {
    fn score(&self, a: u8, b: u8) -> i32;
}

/// A simple match/mismatch scoring function over symbol equality.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub struct MatchParams {
    pub match_score: i32,
    pub mismatch_score: i32,
}

impl MatchParams {
    pub fn new(match_score: i32, mismatch_score: i32) -> Self {
        Self {
            match_score,
            mismatch_score,
        }
    }
}

impl MatchFunc for MatchParams {
    #[inline]
    fn score(&self, a: u8, b: u8) -> i32 {
        if a == b {
            self.match_score
        } else {
            self.mismatch_score
        }
    }
}

/// Details of scoring are encapsulated in this structure.
///
/// A linear gap model is used, so that a gap of length `k` scores `gap * k`.  No sign is
/// imposed on any of the scores.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub struct Scoring<F: MatchFunc> {
    pub gap: i32,
    pub match_fn: F,
}

impl Scoring<MatchParams> {
    /// Create a new `Scoring` from the match, mismatch and gap scores.
    pub fn from_scores(match_score: i32, mismatch_score: i32, gap: i32) -> Self {
        Self::new(gap, MatchParams::new(match_score, mismatch_score))
    }
}

impl<F: MatchFunc> Scoring<F> {
    pub fn new(gap: i32, match_fn: F) -> Self {
        Self { gap, match_fn }
    }

    /// The score of a gap of the given length, or `None` if it does not fit in an `i32`.
    #[inline]
    pub fn gap_score(&self, len: usize) -> Option<i32> {
        i32::try_from(len).ok()?.checked_mul(self.gap)
    }

    /// Scores aligning `a` against `b` on the diagonal, returning the score and whether this is
    /// a match or a mismatch.
    #[inline]
    pub fn diagonal(&self, a: u8, b: u8) -> (i32, MoveKind) {
        let kind = if a == b {
            MoveKind::Match
        } else {
            MoveKind::Mismatch
        };
        (self.match_fn.score(a, b), kind)
    }
}
