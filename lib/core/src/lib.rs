//! # RASARx Core
//!
//! Core types for the RASARx read-across engine.
//!
//! This crate provides the data model shared by every other crate:
//!
//! - [`FeatureMatrix`] - Row-keyed, column-named dense feature values
//! - [`ResponseVector`] - Reference responses aligned with matrix rows
//! - [`ReferenceSet`] - Features and responses of the labeled reference items
//! - [`ResponseKind`] - Binary vs continuous response, decided once per invocation
//! - [`Error`] - Invocation-level error taxonomy
//!
//! ## Example
//!
//! ```rust
//! use rasarx_core::{FeatureMatrix, ResponseVector, ResponseKind};
//!
//! let matrix = FeatureMatrix::from_rows(
//!     vec!["a".to_string(), "b".to_string()],
//!     vec!["logp".to_string(), "tpsa".to_string()],
//!     vec![vec![1.2, 40.0], vec![2.5, 61.3]],
//! ).unwrap();
//! assert_eq!(matrix.n_rows(), 2);
//!
//! let response = ResponseVector::new(vec![0.0, 1.0]).unwrap();
//! assert_eq!(response.kind(), ResponseKind::Binary);
//! ```

pub mod dataset;
pub mod error;
pub mod matrix;
pub mod numeric;
pub mod response;

pub use dataset::ReferenceSet;
pub use error::{Error, Result};
pub use matrix::FeatureMatrix;
pub use response::{ResponseKind, ResponseVector};
