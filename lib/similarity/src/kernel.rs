//! Similarity kernels and the query x reference similarity matrix
//!
//! Both kernels map a pair of standardized feature vectors to a score in (0, 1],
//! where 1.0 means identical. Bandwidths are fixed.

use rasarx_core::{Error, FeatureMatrix, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Supported similarity kernels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Kernel {
    /// `exp(-||q - r||^2 / 2)`, sigma = 1
    #[default]
    Gaussian,
    /// `exp(-||q - r||_1)`, gamma = 1
    Laplacian,
}

impl Kernel {
    /// Evaluate the kernel on two equally sized vectors
    ///
    /// # Arguments
    /// * `q` - Standardized query features
    /// * `r` - Standardized reference features
    ///
    /// # Returns
    /// Similarity score in (0.0, 1.0]
    #[inline]
    pub fn evaluate(self, q: &[f64], r: &[f64]) -> f64 {
        debug_assert_eq!(q.len(), r.len());
        match self {
            Kernel::Gaussian => {
                let sq: f64 = q.iter().zip(r).map(|(a, b)| (a - b) * (a - b)).sum();
                (-sq / 2.0).exp()
            }
            Kernel::Laplacian => {
                let l1: f64 = q.iter().zip(r).map(|(a, b)| (a - b).abs()).sum();
                (-l1).exp()
            }
        }
    }

    /// Human-readable label, as accepted by the upload form
    pub fn label(self) -> &'static str {
        match self {
            Kernel::Gaussian => "Gaussian Kernel",
            Kernel::Laplacian => "Laplacian Kernel",
        }
    }
}

impl fmt::Display for Kernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Kernel {
    type Err = Error;

    /// Accepts "Gaussian Kernel", "gaussian", "Laplacian Kernel", "laplacian"
    /// (case-insensitive). Anything else is an `InvalidConfiguration`.
    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_ascii_lowercase();
        let name = lower.strip_suffix("kernel").unwrap_or(&lower).trim();
        match name {
            "gaussian" => Ok(Kernel::Gaussian),
            "laplacian" => Ok(Kernel::Laplacian),
            _ => Err(Error::InvalidConfiguration(format!(
                "unsupported kernel '{}': expected 'Gaussian Kernel' or 'Laplacian Kernel'",
                s
            ))),
        }
    }
}

impl TryFrom<String> for Kernel {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

/// Dense similarity matrix, rows = query items, columns = reference items
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    query_ids: Vec<String>,
    reference_ids: Vec<String>,
    data: Vec<f64>,
    self_excluded: bool,
}

impl SimilarityMatrix {
    /// Compute every (query, reference) kernel value exactly
    ///
    /// When both matrices carry the same identifiers in the same order the
    /// diagonal is zeroed, so an item never counts as its own neighbor.
    pub fn compute(
        std_reference: &FeatureMatrix,
        std_query: &FeatureMatrix,
        kernel: Kernel,
    ) -> Result<Self> {
        std_reference.ensure_same_columns(std_query)?;
        if std_reference.is_empty() {
            return Err(Error::DegenerateInput("reference set is empty".to_string()));
        }
        if std_query.is_empty() {
            return Err(Error::DegenerateInput("query set is empty".to_string()));
        }

        let n_ref = std_reference.n_rows();
        let mut data = vec![0.0; std_query.n_rows() * n_ref];
        data.par_chunks_mut(n_ref)
            .enumerate()
            .for_each(|(qi, out)| {
                let q = std_query.row(qi);
                for (ri, slot) in out.iter_mut().enumerate() {
                    *slot = kernel.evaluate(q, std_reference.row(ri));
                }
            });

        let self_excluded = std_reference.same_ids(std_query);
        if self_excluded {
            for i in 0..n_ref {
                data[i * n_ref + i] = 0.0;
            }
        }

        debug!(
            kernel = %kernel,
            queries = std_query.n_rows(),
            references = n_ref,
            self_excluded,
            "computed similarity matrix"
        );

        Ok(Self {
            query_ids: std_query.ids().to_vec(),
            reference_ids: std_reference.ids().to_vec(),
            data,
            self_excluded,
        })
    }

    #[inline]
    pub fn n_queries(&self) -> usize {
        self.query_ids.len()
    }

    #[inline]
    pub fn n_references(&self) -> usize {
        self.reference_ids.len()
    }

    pub fn query_ids(&self) -> &[String] {
        &self.query_ids
    }

    pub fn reference_ids(&self) -> &[String] {
        &self.reference_ids
    }

    /// True when the diagonal was zeroed (reference evaluated against itself)
    pub fn self_excluded(&self) -> bool {
        self.self_excluded
    }

    /// Similarities of query `q` to every reference item, in reference order
    #[inline]
    pub fn row(&self, q: usize) -> &[f64] {
        let w = self.n_references();
        &self.data[q * w..(q + 1) * w]
    }

    #[inline]
    pub fn get(&self, q: usize, r: usize) -> f64 {
        self.data[q * self.n_references() + r]
    }
}

/// Compute the similarity matrix of two standardized matrices
pub fn similarity(
    std_reference: &FeatureMatrix,
    std_query: &FeatureMatrix,
    kernel: Kernel,
) -> Result<SimilarityMatrix> {
    SimilarityMatrix::compute(std_reference, std_query, kernel)
}
