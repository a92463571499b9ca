//! # RASARx API
//!
//! HTTP shell around the RASAR engine.
//!
//! - `POST /calculate_rasar`: multipart upload of `train_file` and `test_file`
//!   (CSV), with optional `method` and `descriptor_type` form fields.
//!   `?format=csv` returns both result sheets as CSV text inside a JSON body.
//! - `GET /health`: liveness probe.
//!
//! The [`export`] module writes the same results to disk for the CLI.

pub mod config;
pub mod error;
pub mod export;
pub mod rest;

pub use config::ServerConfig;
pub use error::ApiError;
pub use export::{to_csv, write_report, OutputFormat};
pub use rest::{routes, AppState, RestApi};
