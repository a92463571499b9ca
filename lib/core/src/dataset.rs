use crate::{Error, FeatureMatrix, ResponseKind, ResponseVector, Result};

/// Labeled reference items: features plus one response per row.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceSet {
    features: FeatureMatrix,
    responses: ResponseVector,
}

impl ReferenceSet {
    pub fn new(features: FeatureMatrix, responses: ResponseVector) -> Result<Self> {
        if features.is_empty() {
            return Err(Error::DegenerateInput("reference set is empty".to_string()));
        }
        if responses.len() != features.n_rows() {
            return Err(Error::InvalidShape {
                expected: features.n_rows(),
                actual: responses.len(),
            });
        }
        Ok(Self { features, responses })
    }

    pub fn features(&self) -> &FeatureMatrix {
        &self.features
    }

    pub fn responses(&self) -> &ResponseVector {
        &self.responses
    }

    pub fn len(&self) -> usize {
        self.features.n_rows()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn kind(&self) -> ResponseKind {
        self.responses.kind()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features(n: usize) -> FeatureMatrix {
        FeatureMatrix::new(
            (0..n).map(|i| format!("c{}", i)).collect(),
            vec!["x".to_string()],
            (0..n).map(|i| i as f64).collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_reference_set() {
        let set = ReferenceSet::new(features(3), ResponseVector::new(vec![0.0, 1.0, 1.0]).unwrap()).unwrap();
        assert_eq!(set.len(), 3);
        assert_eq!(set.kind(), ResponseKind::Binary);
    }

    #[test]
    fn test_misaligned_responses() {
        let err = ReferenceSet::new(features(3), ResponseVector::new(vec![1.0]).unwrap()).unwrap_err();
        assert!(matches!(err, Error::InvalidShape { expected: 3, actual: 1 }));
    }

    #[test]
    fn test_empty_reference() {
        let err = ReferenceSet::new(features(0), ResponseVector::new(vec![]).unwrap()).unwrap_err();
        assert!(matches!(err, Error::DegenerateInput(_)));
    }
}
