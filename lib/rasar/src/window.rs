//! Close-training-compound (CTC) window
//!
//! The window is the head of a query's full neighbor list. Its weights are
//! normalized by the similarity mass of the *whole* list, so queries whose top
//! neighbors hold most of the available similarity get larger weights.

use rasarx_core::numeric::ratio;
use rasarx_similarity::{Neighbor, NeighborList};
use smallvec::SmallVec;

/// Default window cap.
pub const DEFAULT_CTC: usize = 10;

/// Selected close neighbors with their normalized weights
#[derive(Debug, Clone, PartialEq)]
pub struct CloseWindow {
    neighbors: SmallVec<[Neighbor; DEFAULT_CTC]>,
    weights: SmallVec<[f64; DEFAULT_CTC]>,
    total_similarity: f64,
}

impl CloseWindow {
    /// Take the first `min(cap, list.len())` neighbors of a ranked list.
    pub fn select(list: &NeighborList, cap: usize) -> Self {
        let total_similarity = list.total_similarity();
        let neighbors: SmallVec<[Neighbor; DEFAULT_CTC]> = list.top(cap).iter().copied().collect();
        // total == 0 makes every weight NaN; the prediction is then undefined.
        let weights = neighbors
            .iter()
            .map(|n| ratio(n.similarity, total_similarity))
            .collect();

        Self {
            neighbors,
            weights,
            total_similarity,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    pub fn neighbors(&self) -> &[Neighbor] {
        &self.neighbors
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn similarities(&self) -> SmallVec<[f64; DEFAULT_CTC]> {
        self.neighbors.iter().map(|n| n.similarity).collect()
    }

    pub fn responses(&self) -> impl Iterator<Item = f64> + '_ {
        self.neighbors.iter().map(|n| n.response)
    }

    /// Similarity mass of the untruncated list
    pub fn total_similarity(&self) -> f64 {
        self.total_similarity
    }

    /// Share of the total similarity mass held by the window
    pub fn weight_sum(&self) -> f64 {
        self.weights.iter().sum()
    }

    /// Kish effective sample size `(sum w)^2 / sum w^2`
    pub fn effective_size(&self) -> f64 {
        let sum = self.weight_sum();
        let sum_sq: f64 = self.weights.iter().map(|w| w * w).sum();
        ratio(sum * sum, sum_sq)
    }
}
