//! # RASARx RASAR
//!
//! Read-across structure-activity relationship statistics.
//!
//! Given a labeled reference set and a query set, the engine predicts each
//! query's response from its close training compounds (CTC, at most 10) and
//! reports how reliable that prediction is.
//!
//! ## Metrics
//!
//! | Field | Meaning |
//! |-------|---------|
//! | `RA_function` | similarity-weighted mean response of the window |
//! | `SD_Activity`, `CV_Activity`, `Standard_Error (SE)` | weighted, bias-corrected dispersion (continuous responses only) |
//! | `Avg_similarity`, `SD_similarity`, `CV_similarity` | unweighted window similarity summary |
//! | `MaxPos`, `PosAvgSim`, `MaxNeg`, `NegAvgSim`, `AbsDiff` | polarity split around the reference mean |
//! | `gm`, `gm*AvgSim`, `gm*SD_Similarity` | signed class-balance index and its products |
//! | `sm1`, `sm2` | normalized polarity gaps |
//!
//! Undefined statistics (zero denominators) are `NaN` and never abort a row.
//!
//! ## Example
//!
//! ```rust
//! use rasarx_core::{FeatureMatrix, ReferenceSet, ResponseVector};
//! use rasarx_rasar::RasarEngine;
//!
//! let names = |v: &[&str]| v.iter().map(|s| s.to_string()).collect::<Vec<_>>();
//! let features = FeatureMatrix::from_rows(
//!     names(&["a", "b", "c", "d"]),
//!     names(&["logp", "tpsa"]),
//!     vec![vec![1.0, 20.0], vec![1.5, 35.0], vec![3.0, 80.0], vec![2.2, 41.0]],
//! ).unwrap();
//! let reference = ReferenceSet::new(features, ResponseVector::new(vec![2.1, 2.4, 5.0, 3.3]).unwrap()).unwrap();
//! let query = FeatureMatrix::from_rows(names(&["x"]), names(&["logp", "tpsa"]), vec![vec![1.2, 25.0]]).unwrap();
//!
//! let report = RasarEngine::default().evaluate(&reference, &query).unwrap();
//! assert_eq!(report.train.len(), 4);
//! assert_eq!(report.test.len(), 1);
//! ```

pub mod engine;
pub mod metrics;
pub mod stats;
pub mod window;

pub use engine::{RasarConfig, RasarEngine, RasarReport};
pub use metrics::{Metric, MetricRow, RasarMetrics};
pub use stats::compute_metrics;
pub use window::{CloseWindow, DEFAULT_CTC};
