use rasarx_core::{Error, FeatureMatrix, Result};

/// Feature values before cleaning: any cell may be missing.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    ids: Vec<String>,
    columns: Vec<String>,
    values: Vec<Option<f64>>,
}

impl RawTable {
    pub fn new(ids: Vec<String>, columns: Vec<String>, values: Vec<Option<f64>>) -> Result<Self> {
        let expected = ids.len() * columns.len();
        if values.len() != expected {
            return Err(Error::InvalidShape {
                expected,
                actual: values.len(),
            });
        }
        Ok(Self { ids, columns, values })
    }

    pub fn n_rows(&self) -> usize {
        self.ids.len()
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.values[row * self.n_cols() + col]
    }

    pub fn column(&self, col: usize) -> impl Iterator<Item = Option<f64>> + '_ {
        (0..self.n_rows()).map(move |row| self.get(row, col))
    }

    /// Replace row identifiers, e.g. structures by item ids.
    pub fn with_ids(mut self, ids: Vec<String>) -> Result<Self> {
        if ids.len() != self.ids.len() {
            return Err(Error::InvalidShape {
                expected: self.ids.len(),
                actual: ids.len(),
            });
        }
        self.ids = ids;
        Ok(self)
    }

    /// Keep only the listed columns, in the listed order.
    pub fn select(&self, keep: &[usize]) -> RawTable {
        let mut values = Vec::with_capacity(self.n_rows() * keep.len());
        for row in 0..self.n_rows() {
            values.extend(keep.iter().map(|&col| self.get(row, col)));
        }
        RawTable {
            ids: self.ids.clone(),
            columns: keep.iter().map(|&col| self.columns[col].clone()).collect(),
            values,
        }
    }

    /// Convert to a dense matrix; any remaining missing value is an error.
    pub fn into_matrix(self) -> Result<FeatureMatrix> {
        let width = self.n_cols();
        let mut data = Vec::with_capacity(self.values.len());
        for (pos, value) in self.values.iter().enumerate() {
            match value {
                Some(v) => data.push(*v),
                None => {
                    return Err(Error::DegenerateInput(format!(
                        "missing value for item '{}', feature '{}'",
                        self.ids[pos / width],
                        self.columns[pos % width]
                    )))
                }
            }
        }
        FeatureMatrix::new(self.ids, self.columns, data)
    }
}
