//! k-nearest-neighbour vote over a [`ReferenceSet`].

use crate::{Digit, ReferenceSet};
use serde::Serialize;
use sudoku_ocr_core::FeatureVector;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Neighbours consulted per query unless configured otherwise.
pub const DEFAULT_K: usize = 10;

/// Errors returned by [`KnnClassifier`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifyError {
    #[error("no reference data to classify against")]
    NoReferenceData,
    #[error("neighbour count k must be >= 1")]
    InvalidK,
}

/// One reference vector ranked against a query.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Neighbor {
    pub digit: Digit,
    pub distance: f32,
}

/// Winning label and the neighbourhood it was chosen from.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Classification {
    pub digit: Digit,
    /// Neighbours voting for `digit`.
    pub votes: usize,
    /// The `k` nearest references (fewer if the set is smaller), nearest first.
    pub neighbors: Vec<Neighbor>,
}

/// Brute-force k-NN classifier borrowing an immutable reference set.
#[derive(Clone, Copy, Debug)]
pub struct KnnClassifier<'a> {
    reference: &'a ReferenceSet,
    k: usize,
}

impl<'a> KnnClassifier<'a> {
    pub fn new(reference: &'a ReferenceSet, k: usize) -> Result<Self, ClassifyError> {
        if k == 0 {
            return Err(ClassifyError::InvalidK);
        }
        Ok(Self { reference, k })
    }

    #[inline]
    pub fn k(&self) -> usize {
        self.k
    }

    #[inline]
    pub fn reference(&self) -> &'a ReferenceSet {
        self.reference
    }

    /// Rank every reference vector by Euclidean distance to `query` and take
    /// the majority label among the `k` nearest.
    ///
    /// Equal distances keep reference order (labels ascending, then
    /// insertion order) and equal vote counts go to the lowest label, so the
    /// result is fully deterministic.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "trace", skip_all, fields(k = self.k))
    )]
    pub fn classify(&self, query: &FeatureVector) -> Result<Classification, ClassifyError> {
        let mut ranked: Vec<Neighbor> = self
            .reference
            .iter()
            .map(|(digit, v)| Neighbor {
                digit,
                distance: query.distance(v),
            })
            .collect();
        if ranked.is_empty() {
            return Err(ClassifyError::NoReferenceData);
        }

        // stable: ties keep reference order
        ranked.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        ranked.truncate(self.k);

        let mut tally = [0usize; 9];
        for n in &ranked {
            tally[usize::from(n.digit.get() - 1)] += 1;
        }

        let mut winner: Option<(Digit, usize)> = None;
        for (digit, count) in Digit::all().zip(tally) {
            if count > winner.map_or(0, |(_, best)| best) {
                winner = Some((digit, count));
            }
        }
        let (digit, votes) = winner.ok_or(ClassifyError::NoReferenceData)?;

        Ok(Classification {
            digit,
            votes,
            neighbors: ranked,
        })
    }
}
