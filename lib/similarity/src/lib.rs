//! # RASARx Similarity
//!
//! Standardization, kernel similarity and neighbor ranking for read-across.
//!
//! ## Features
//!
//! - **Standardizer**: z-score scaling fitted on the reference set only
//! - **Kernels**: Gaussian (sigma = 1) and Laplacian (gamma = 1), exact pairwise evaluation
//! - **Self exclusion**: the diagonal is zeroed when a set is compared with itself
//! - **Ranking**: stable similarity-descending neighbor lists that keep the total similarity mass
//!
//! ## Example
//!
//! ```rust
//! use rasarx_core::{FeatureMatrix, ResponseVector};
//! use rasarx_similarity::{standardize, similarity, rank, Kernel};
//!
//! let ids = |v: &[&str]| v.iter().map(|s| s.to_string()).collect::<Vec<_>>();
//! let reference = FeatureMatrix::from_rows(
//!     ids(&["r1", "r2", "r3"]),
//!     ids(&["logp"]),
//!     vec![vec![1.0], vec![2.0], vec![4.0]],
//! ).unwrap();
//! let query = FeatureMatrix::from_rows(ids(&["q1"]), ids(&["logp"]), vec![vec![1.5]]).unwrap();
//!
//! let (std_ref, std_query) = standardize(&reference, &query).unwrap();
//! let sim = similarity(&std_ref, &std_query, Kernel::Gaussian).unwrap();
//! let responses = ResponseVector::new(vec![0.3, 0.5, 0.9]).unwrap();
//! let ranking = rank(&sim, &responses).unwrap();
//! assert_eq!(ranking.lists()[0].len(), 3);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ Standardize │────>│   Kernel    │────>│   Ranking   │
//! │ (ref stats) │     │ (q x r sim) │     │ (per query) │
//! └─────────────┘     └─────────────┘     └─────────────┘
//! ```

pub mod kernel;
pub mod ranking;
pub mod scaling;

pub use kernel::{similarity, Kernel, SimilarityMatrix};
pub use ranking::{rank, Neighbor, NeighborList, NeighborRanking};
pub use scaling::{standardize, Standardizer};
