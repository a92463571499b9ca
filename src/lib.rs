//! # RASARx
//!
//! Read-across structure-activity relationship (RASAR) descriptors.
//!
//! For every query item RASARx finds its most similar labeled reference items
//! (the close training compounds), predicts the response as their
//! similarity-weighted mean and reports dispersion, similarity and
//! class-balance statistics that describe how trustworthy that prediction is.
//!
//! ## Quick Start
//!
//! ### As a Server
//!
//! ```bash
//! rasarx serve --http-port 5000
//! curl -F train_file=@train.csv -F test_file=@test.csv http://localhost:5000/calculate_rasar
//! ```
//!
//! ### From the Command Line
//!
//! ```bash
//! rasarx compute --train train.csv --test test.csv --kernel laplacian --out-dir results
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use rasarx::prelude::*;
//!
//! let reference = Table::from_bytes(b"id,logp,tpsa,activity\na,1.0,20,2.1\nb,1.5,35,2.4\nc,3.0,80,5.0\n").unwrap();
//! let query = Table::from_bytes(b"id,logp,tpsa\nx,1.2,25\n").unwrap();
//!
//! let out = compute_tables(&reference, &query, DescriptorSource::UserDefined, RasarConfig::default(), None).unwrap();
//! assert_eq!(out.report.test[0].id, "x");
//! ```
//!
//! ## Crate Structure
//!
//! - [`rasarx-core`](https://docs.rs/rasarx-core) - Error taxonomy, feature matrix, responses
//! - [`rasarx-similarity`](https://docs.rs/rasarx-similarity) - Standardization, kernels, neighbor ranking
//! - [`rasarx-rasar`](https://docs.rs/rasarx-rasar) - Close-neighbor window and RASAR statistics
//! - [`rasarx-descriptors`](https://docs.rs/rasarx-descriptors) - CSV input and feature providers
//! - [`rasarx-api`](https://docs.rs/rasarx-api) - REST API and result export

use std::path::Path;

// Re-export core types
pub use rasarx_core::{
    Error, FeatureMatrix, ReferenceSet, ResponseKind, ResponseVector, Result,
};

// Re-export engine
pub use rasarx_rasar::{
    Metric, MetricRow, RasarConfig, RasarEngine, RasarMetrics, RasarReport, DEFAULT_CTC,
};
pub use rasarx_similarity::Kernel;

// Re-export input handling
pub use rasarx_descriptors::{
    DescriptorError, DescriptorGenerator, DescriptorSource, PreparedInput, Table,
};

// Re-export API
pub use rasarx_api::{OutputFormat, RestApi, ServerConfig};

/// Output of one invocation
#[derive(Debug, Clone)]
pub struct Computation {
    pub report: RasarReport,
    /// Generated descriptors removed by the variance filter
    pub dropped: Vec<String>,
}

/// Prepare both tables and evaluate the query set against the reference set.
pub fn compute_tables(
    reference: &Table,
    query: &Table,
    source: DescriptorSource,
    config: RasarConfig,
    generator: Option<&dyn DescriptorGenerator>,
) -> Result<Computation> {
    let engine = RasarEngine::new(config)?;
    let input = rasarx_descriptors::prepare(reference, query, source, generator)?;
    let report = engine.evaluate(&input.reference, &input.query)?;
    Ok(Computation {
        report,
        dropped: input.dropped,
    })
}

/// [`compute_tables`] on two CSV files
pub fn compute_files(
    train: &Path,
    test: &Path,
    source: DescriptorSource,
    config: RasarConfig,
    generator: Option<&dyn DescriptorGenerator>,
) -> Result<Computation> {
    let reference = Table::from_path(train)?;
    let query = Table::from_path(test)?;
    compute_tables(&reference, &query, source, config, generator)
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        compute_files, compute_tables, Computation, DescriptorGenerator, DescriptorSource, Error,
        FeatureMatrix, Kernel, Metric, MetricRow, OutputFormat, RasarConfig, RasarEngine,
        RasarReport, ReferenceSet, ResponseKind, ResponseVector, Result, Table,
    };
}

/// Result export helpers
pub mod export {
    pub use rasarx_api::export::{to_csv, write_report};
}
