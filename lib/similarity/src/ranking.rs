//! Per-query neighbor ranking
//!
//! Every reference item becomes a [`Neighbor`] carrying its similarity, its
//! response and its reference position, and the tuple is sorted as a unit.
//! Sorting is stable: exact similarity ties keep the original reference order.

use crate::kernel::SimilarityMatrix;
use ordered_float::OrderedFloat;
use rasarx_core::{Error, ResponseVector, Result};
use rayon::prelude::*;
use std::cmp::Reverse;

/// One reference item as seen from a query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Position of the reference item in the reference matrix
    pub reference: usize,
    pub similarity: f64,
    pub response: f64,
}

/// Full similarity-descending neighbor list for one query item
#[derive(Debug, Clone, PartialEq)]
pub struct NeighborList {
    query_id: String,
    neighbors: Vec<Neighbor>,
    total_similarity: f64,
}

impl NeighborList {
    /// Rank one query's similarities against the aligned reference responses.
    ///
    /// `similarities` and `responses` are indexed by reference position.
    pub fn new(query_id: String, similarities: &[f64], responses: &[f64]) -> Self {
        debug_assert_eq!(similarities.len(), responses.len());
        let mut neighbors: Vec<Neighbor> = similarities
            .iter()
            .zip(responses)
            .enumerate()
            .map(|(reference, (&similarity, &response))| Neighbor {
                reference,
                similarity,
                response,
            })
            .collect();
        neighbors.sort_by_key(|n| Reverse(OrderedFloat(n.similarity)));

        // Mass over every reference item, not only the close window.
        let total_similarity = similarities.iter().sum();

        Self {
            query_id,
            neighbors,
            total_similarity,
        }
    }

    pub fn query_id(&self) -> &str {
        &self.query_id
    }

    pub fn neighbors(&self) -> &[Neighbor] {
        &self.neighbors
    }

    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    /// The `k` most similar neighbors (fewer if the list is shorter)
    pub fn top(&self, k: usize) -> &[Neighbor] {
        &self.neighbors[..k.min(self.neighbors.len())]
    }

    /// Sum of similarities over the untruncated list
    pub fn total_similarity(&self) -> f64 {
        self.total_similarity
    }

    pub fn similarities(&self) -> impl Iterator<Item = f64> + '_ {
        self.neighbors.iter().map(|n| n.similarity)
    }

    pub fn responses(&self) -> impl Iterator<Item = f64> + '_ {
        self.neighbors.iter().map(|n| n.response)
    }

    pub fn reference_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.neighbors.iter().map(|n| n.reference)
    }
}

/// Neighbor lists for every query row, in query order
#[derive(Debug, Clone, PartialEq)]
pub struct NeighborRanking {
    reference_ids: Vec<String>,
    lists: Vec<NeighborList>,
}

impl NeighborRanking {
    pub fn lists(&self) -> &[NeighborList] {
        &self.lists
    }

    pub fn len(&self) -> usize {
        self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    pub fn reference_ids(&self) -> &[String] {
        &self.reference_ids
    }

    /// Identifier of the reference item behind a neighbor
    pub fn reference_id(&self, neighbor: &Neighbor) -> &str {
        &self.reference_ids[neighbor.reference]
    }

    /// Reference identifiers of one query's list, in rank order
    pub fn ranked_ids(&self, query: usize) -> Vec<&str> {
        self.lists[query]
            .reference_indices()
            .map(|r| self.reference_ids[r].as_str())
            .collect()
    }
}

/// Rank every reference item for each query row by descending similarity
pub fn rank(similarity: &SimilarityMatrix, responses: &ResponseVector) -> Result<NeighborRanking> {
    if responses.len() != similarity.n_references() {
        return Err(Error::InvalidShape {
            expected: similarity.n_references(),
            actual: responses.len(),
        });
    }

    let lists = (0..similarity.n_queries())
        .into_par_iter()
        .map(|q| {
            NeighborList::new(
                similarity.query_ids()[q].clone(),
                similarity.row(q),
                responses.as_slice(),
            )
        })
        .collect();

    Ok(NeighborRanking {
        reference_ids: similarity.reference_ids().to_vec(),
        lists,
    })
}
