use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether the reference response is an indicator (0/1) or a continuous value.
///
/// Decided once per invocation from the reference responses; it fixes the
/// metric schema for both the reference and the query evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseKind {
    Continuous,
    Binary,
}

impl ResponseKind {
    /// Classify a response vector.
    ///
    /// The test is `sum(values) == count(values == 1)`, which holds for every
    /// 0/1 vector.
    pub fn detect(values: &[f64]) -> Self {
        let sum: f64 = values.iter().sum();
        let ones = values.iter().filter(|&&v| v == 1.0).count();
        if sum == ones as f64 {
            ResponseKind::Binary
        } else {
            ResponseKind::Continuous
        }
    }

    pub fn is_binary(self) -> bool {
        matches!(self, ResponseKind::Binary)
    }
}

impl fmt::Display for ResponseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseKind::Continuous => write!(f, "continuous"),
            ResponseKind::Binary => write!(f, "binary"),
        }
    }
}

/// Reference responses, aligned with the rows of the reference feature matrix.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseVector {
    values: Vec<f64>,
}

impl ResponseVector {
    pub fn new(values: Vec<f64>) -> Result<Self> {
        if let Some(pos) = values.iter().position(|v| !v.is_finite()) {
            return Err(Error::DegenerateInput(format!(
                "reference response at row {} is missing or not finite",
                pos
            )));
        }
        Ok(Self { values })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    #[inline]
    pub fn get(&self, i: usize) -> f64 {
        self.values[i]
    }

    /// Global mean, the threshold of the polarity split.
    pub fn mean(&self) -> f64 {
        crate::numeric::mean(&self.values)
    }

    pub fn kind(&self) -> ResponseKind {
        ResponseKind::detect(&self.values)
    }
}
