use crate::{Error, Result};
use ahash::AHashSet;
use serde::Serialize;

/// Dense row-major matrix of numeric features.
///
/// Rows are keyed by a unique item identifier and keep their insertion order;
/// columns are named features. Every value is finite.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureMatrix {
    ids: Vec<String>,
    columns: Vec<String>,
    data: Vec<f64>,
}

impl FeatureMatrix {
    /// Build a matrix from row-major values.
    pub fn new(ids: Vec<String>, columns: Vec<String>, data: Vec<f64>) -> Result<Self> {
        if columns.is_empty() {
            return Err(Error::DegenerateInput("feature matrix has no columns".to_string()));
        }

        let expected = ids.len() * columns.len();
        if data.len() != expected {
            return Err(Error::InvalidShape {
                expected,
                actual: data.len(),
            });
        }

        let mut seen = AHashSet::with_capacity(ids.len());
        for id in &ids {
            if !seen.insert(id.as_str()) {
                return Err(Error::DegenerateInput(format!("duplicate item identifier '{}'", id)));
            }
        }

        let mut seen_cols = AHashSet::with_capacity(columns.len());
        for col in &columns {
            if !seen_cols.insert(col.as_str()) {
                return Err(Error::InvalidConfiguration(format!("duplicate feature column '{}'", col)));
            }
        }

        if let Some(pos) = data.iter().position(|v| !v.is_finite()) {
            let (row, col) = (pos / columns.len(), pos % columns.len());
            return Err(Error::DegenerateInput(format!(
                "non-finite value for item '{}', feature '{}'",
                ids[row], columns[col]
            )));
        }

        Ok(Self { ids, columns, data })
    }

    /// Build a matrix from one vector per row.
    pub fn from_rows(ids: Vec<String>, columns: Vec<String>, rows: Vec<Vec<f64>>) -> Result<Self> {
        let width = columns.len();
        let mut data = Vec::with_capacity(rows.len() * width);
        for row in rows {
            if row.len() != width {
                return Err(Error::InvalidShape {
                    expected: width,
                    actual: row.len(),
                });
            }
            data.extend(row);
        }
        Self::new(ids, columns, data)
    }

    /// Same labels, new values. Used by transformations that keep the layout.
    pub fn with_values(&self, data: Vec<f64>) -> Result<Self> {
        Self::new(self.ids.clone(), self.columns.clone(), data)
    }

    #[inline]
    pub fn n_rows(&self) -> usize {
        self.ids.len()
    }

    #[inline]
    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    #[inline]
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    #[inline]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Values of row `i`.
    #[inline]
    pub fn row(&self, i: usize) -> &[f64] {
        let w = self.n_cols();
        &self.data[i * w..(i + 1) * w]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.data.chunks_exact(self.n_cols())
    }

    /// Values of column `j`, top to bottom.
    pub fn column(&self, j: usize) -> impl Iterator<Item = f64> + '_ {
        self.rows().map(move |row| row[j])
    }

    /// True when both matrices list exactly the same identifiers in the same order.
    pub fn same_ids(&self, other: &FeatureMatrix) -> bool {
        self.ids == other.ids
    }

    /// Fails unless `other` carries the same feature columns in the same order.
    pub fn ensure_same_columns(&self, other: &FeatureMatrix) -> Result<()> {
        if self.columns != other.columns {
            return Err(Error::InvalidConfiguration(format!(
                "feature columns differ: reference has {} columns {:?}, query has {} columns {:?}",
                self.n_cols(),
                self.columns,
                other.n_cols(),
                other.columns
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("m{}", i)).collect()
    }

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_matrix_creation() {
        let m = FeatureMatrix::from_rows(
            ids(2),
            cols(&["a", "b", "c"]),
            vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]],
        )
        .unwrap();

        assert_eq!(m.n_rows(), 2);
        assert_eq!(m.n_cols(), 3);
        assert_eq!(m.row(1), &[4.0, 5.0, 6.0]);
        assert_eq!(m.column(2).collect::<Vec<_>>(), vec![3.0, 6.0]);
        assert_eq!(m.rows().count(), 2);
    }

    #[test]
    fn test_shape_mismatch() {
        let err = FeatureMatrix::new(ids(2), cols(&["a", "b"]), vec![1.0, 2.0, 3.0]).unwrap_err();
        assert!(matches!(err, Error::InvalidShape { expected: 4, actual: 3 }));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let err = FeatureMatrix::new(
            vec!["x".to_string(), "x".to_string()],
            cols(&["a"]),
            vec![1.0, 2.0],
        )
        .unwrap_err();
        assert!(matches!(err, Error::DegenerateInput(_)));
    }

    #[test]
    fn test_non_finite_rejected() {
        let err = FeatureMatrix::new(ids(2), cols(&["a"]), vec![1.0, f64::NAN]).unwrap_err();
        assert!(err.to_string().contains("m1"));
    }

    #[test]
    fn test_no_columns_rejected() {
        assert!(matches!(
            FeatureMatrix::new(ids(0), vec![], vec![]),
            Err(Error::DegenerateInput(_))
        ));
    }

    #[test]
    fn test_column_check() {
        let a = FeatureMatrix::new(ids(1), cols(&["a", "b"]), vec![1.0, 2.0]).unwrap();
        let b = FeatureMatrix::new(ids(1), cols(&["b", "a"]), vec![1.0, 2.0]).unwrap();
        assert!(a.ensure_same_columns(&a.clone()).is_ok());
        assert!(matches!(
            a.ensure_same_columns(&b),
            Err(Error::InvalidConfiguration(_))
        ));
        assert!(a.same_ids(&b));
    }

    #[test]
    fn test_serialize() {
        let m = FeatureMatrix::new(ids(1), cols(&["a"]), vec![0.5]).unwrap();
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, r#"{"ids":["m0"],"columns":["a"],"data":[0.5]}"#);
    }
}
