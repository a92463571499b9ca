//! # RASARx Descriptors
//!
//! Feature acquisition for the RASAR engine: CSV parsing, feature providers
//! and the low-variance filter applied to generated descriptors.
//!
//! Chemical descriptor computation itself is not part of this crate. Callers
//! that want structure-based features register a [`DescriptorGenerator`].
//!
//! ```rust
//! use rasarx_descriptors::{prepare, DescriptorSource, Table};
//!
//! let reference = Table::from_bytes(b"id,logp,tpsa,activity\na,1.0,20,2.1\nb,1.5,35,2.4\nc,3.0,80,5.0\n").unwrap();
//! let query = Table::from_bytes(b"id,logp,tpsa\nx,1.2,25\n").unwrap();
//!
//! let input = prepare(&reference, &query, DescriptorSource::UserDefined, None).unwrap();
//! assert_eq!(input.reference.len(), 3);
//! assert_eq!(input.query.n_cols(), 2);
//! ```

pub mod filter;
pub mod pipeline;
pub mod provider;
pub mod raw;
pub mod table;

pub use filter::{Filtered, VarianceFilter, DEFAULT_VARIANCE_FLOOR};
pub use pipeline::{prepare, PreparedInput};
pub use provider::{
    DescriptorError, DescriptorGenerator, DescriptorSource, FeatureProvider,
    StructureFeatureProvider, TableFeatureProvider, SELECTED_DESCRIPTORS,
};
pub use raw::RawTable;
pub use table::Table;
