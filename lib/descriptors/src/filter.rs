//! Low-variance descriptor removal

use crate::raw::RawTable;
use rasarx_core::numeric::sample_variance_skip_missing;
use rasarx_core::{Error, Result};
use tracing::debug;

/// Variance at or below which a generated descriptor is dropped
pub const DEFAULT_VARIANCE_FLOOR: f64 = 0.1;

/// Drops descriptor columns that barely vary across the reference set.
///
/// Variances come from the reference table only, ignoring missing cells;
/// the query table loses the same columns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VarianceFilter {
    floor: f64,
}

impl Default for VarianceFilter {
    fn default() -> Self {
        Self {
            floor: DEFAULT_VARIANCE_FLOOR,
        }
    }
}

/// Tables after filtering plus the names of the removed columns
#[derive(Debug, Clone)]
pub struct Filtered {
    pub reference: RawTable,
    pub query: RawTable,
    pub dropped: Vec<String>,
}

impl VarianceFilter {
    pub fn new(floor: f64) -> Self {
        Self { floor }
    }

    pub fn floor(&self) -> f64 {
        self.floor
    }

    /// Indices of reference columns that survive
    pub fn retained(&self, reference: &RawTable) -> Vec<usize> {
        (0..reference.n_cols())
            .filter(|&col| {
                let var = sample_variance_skip_missing(reference.column(col));
                // NaN variance (too few values) fails the comparison and is dropped
                var > self.floor
            })
            .collect()
    }

    pub fn apply(&self, reference: &RawTable, query: &RawTable) -> Result<Filtered> {
        if reference.columns() != query.columns() {
            return Err(Error::InvalidConfiguration(
                "reference and query descriptors differ".to_string(),
            ));
        }
        let keep = self.retained(reference);
        if keep.is_empty() {
            return Err(Error::DegenerateInput(format!(
                "no descriptor has variance above {}",
                self.floor
            )));
        }
        let dropped: Vec<String> = (0..reference.n_cols())
            .filter(|col| !keep.contains(col))
            .map(|col| reference.columns()[col].clone())
            .collect();
        debug!(
            kept = keep.len(),
            dropped = dropped.len(),
            floor = self.floor,
            "variance filter applied"
        );

        Ok(Filtered {
            reference: reference.select(&keep),
            query: query.select(&keep),
            dropped,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(ids: &[&str], columns: &[&str], values: Vec<Option<f64>>) -> RawTable {
        RawTable::new(
            ids.iter().map(|s| s.to_string()).collect(),
            columns.iter().map(|s| s.to_string()).collect(),
            values,
        )
        .unwrap()
    }

    #[test]
    fn test_drops_flat_columns() {
        // columns: varied, constant, tiny spread, varied with a gap
        let reference = raw(
            &["a", "b", "c"],
            &["w", "x", "y", "z"],
            vec![
                Some(1.0), Some(5.0), Some(1.0), Some(0.0),
                Some(2.0), Some(5.0), Some(1.1), None,
                Some(3.0), Some(5.0), Some(1.2), Some(4.0),
            ],
        );
        let query = raw(
            &["q"],
            &["w", "x", "y", "z"],
            vec![Some(9.0), Some(5.0), Some(1.0), Some(2.0)],
        );

        let out = VarianceFilter::default().apply(&reference, &query).unwrap();
        assert_eq!(out.reference.columns(), &["w".to_string(), "z".to_string()]);
        assert_eq!(out.query.get(0, 1), Some(2.0));
        assert_eq!(out.dropped, vec!["x".to_string(), "y".to_string()]);
    }

    #[test]
    fn test_floor_is_inclusive() {
        let reference = raw(&["a", "b"], &["x"], vec![Some(1.0), Some(1.0)]);
        let filter = VarianceFilter::new(0.0);
        assert!(filter.retained(&reference).is_empty());
    }

    #[test]
    fn test_everything_dropped_is_degenerate() {
        let reference = raw(&["a", "b"], &["x"], vec![Some(1.0), Some(1.0)]);
        let query = raw(&["q"], &["x"], vec![Some(1.0)]);
        assert!(matches!(
            VarianceFilter::default().apply(&reference, &query),
            Err(Error::DegenerateInput(_))
        ));
    }
}
