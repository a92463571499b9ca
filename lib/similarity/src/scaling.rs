//! Per-feature z-score scaling
//!
//! Parameters are fitted on the reference matrix only and applied unchanged to
//! every matrix that is compared against it.

use rasarx_core::numeric::{mean, sample_std};
use rasarx_core::{Error, FeatureMatrix, Result};
use serde::Serialize;

/// Fitted per-column mean and sample standard deviation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Standardizer {
    columns: Vec<String>,
    means: Vec<f64>,
    stds: Vec<f64>,
}

impl Standardizer {
    /// Fit scaling parameters on the reference matrix.
    ///
    /// Fails with `DegenerateInput` when the matrix has fewer than two rows or a
    /// column has zero variance; dividing by a zero deviation is reported
    /// rather than masked.
    pub fn fit(reference: &FeatureMatrix) -> Result<Self> {
        if reference.is_empty() {
            return Err(Error::DegenerateInput("reference set is empty".to_string()));
        }
        if reference.n_rows() < 2 {
            return Err(Error::DegenerateInput(
                "at least two reference items are needed to estimate feature deviations".to_string(),
            ));
        }

        let mut means = Vec::with_capacity(reference.n_cols());
        let mut stds = Vec::with_capacity(reference.n_cols());
        for (j, name) in reference.columns().iter().enumerate() {
            let values: Vec<f64> = reference.column(j).collect();
            let sd = sample_std(&values);
            if sd == 0.0 {
                return Err(Error::DegenerateInput(format!(
                    "feature '{}' has zero variance in the reference set",
                    name
                )));
            }
            means.push(mean(&values));
            stds.push(sd);
        }

        Ok(Self {
            columns: reference.columns().to_vec(),
            means,
            stds,
        })
    }

    /// Apply the fitted parameters to a matrix with the same columns.
    pub fn transform(&self, matrix: &FeatureMatrix) -> Result<FeatureMatrix> {
        if matrix.columns() != self.columns.as_slice() {
            return Err(Error::InvalidConfiguration(format!(
                "feature columns differ: fitted on {:?}, got {:?}",
                self.columns,
                matrix.columns()
            )));
        }

        let mut data = Vec::with_capacity(matrix.as_slice().len());
        for row in matrix.rows() {
            data.extend(
                row.iter()
                    .zip(self.means.iter().zip(&self.stds))
                    .map(|(x, (m, s))| (x - m) / s),
            );
        }
        matrix.with_values(data)
    }

    pub fn means(&self) -> &[f64] {
        &self.means
    }

    pub fn stds(&self) -> &[f64] {
        &self.stds
    }
}

/// Standardize a reference/query pair with parameters fitted on the reference.
pub fn standardize(
    reference: &FeatureMatrix,
    query: &FeatureMatrix,
) -> Result<(FeatureMatrix, FeatureMatrix)> {
    reference.ensure_same_columns(query)?;
    let scaler = Standardizer::fit(reference)?;
    Ok((scaler.transform(reference)?, scaler.transform(query)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(ids: &[&str], cols: &[&str], rows: Vec<Vec<f64>>) -> FeatureMatrix {
        FeatureMatrix::from_rows(
            ids.iter().map(|s| s.to_string()).collect(),
            cols.iter().map(|s| s.to_string()).collect(),
            rows,
        )
        .unwrap()
    }

    #[test]
    fn test_fit_parameters() {
        let r = matrix(&["a", "b", "c"], &["x", "y"], vec![
            vec![1.0, 10.0],
            vec![2.0, 20.0],
            vec![3.0, 30.0],
        ]);
        let s = Standardizer::fit(&r).unwrap();
        assert_eq!(s.means(), &[2.0, 20.0]);
        assert!((s.stds()[0] - 1.0).abs() < 1e-12);
        assert!((s.stds()[1] - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_query_uses_reference_parameters() {
        let r = matrix(&["a", "b", "c"], &["x"], vec![vec![1.0], vec![2.0], vec![3.0]]);
        let q = matrix(&["q"], &["x"], vec![vec![5.0]]);
        let (sr, sq) = standardize(&r, &q).unwrap();
        assert_eq!(sr.column(0).collect::<Vec<_>>(), vec![-1.0, 0.0, 1.0]);
        assert_eq!(sq.row(0), &[3.0]);
        assert_eq!(sq.ids(), &["q".to_string()]);
    }

    #[test]
    fn test_zero_variance_reported() {
        let r = matrix(&["a", "b"], &["x", "flat"], vec![vec![1.0, 7.0], vec![2.0, 7.0]]);
        let err = Standardizer::fit(&r).unwrap_err();
        assert!(matches!(err, Error::DegenerateInput(ref msg) if msg.contains("flat")));
    }

    #[test]
    fn test_single_reference_row_rejected() {
        let r = matrix(&["a"], &["x"], vec![vec![1.0]]);
        assert!(matches!(Standardizer::fit(&r), Err(Error::DegenerateInput(_))));
    }

    #[test]
    fn test_empty_reference_rejected() {
        let r = matrix(&[], &["x"], vec![]);
        assert!(matches!(Standardizer::fit(&r), Err(Error::DegenerateInput(_))));
    }

    #[test]
    fn test_column_mismatch() {
        let r = matrix(&["a", "b"], &["x"], vec![vec![1.0], vec![2.0]]);
        let q = matrix(&["q"], &["z"], vec![vec![1.0]]);
        assert!(matches!(standardize(&r, &q), Err(Error::InvalidConfiguration(_))));
    }
}
