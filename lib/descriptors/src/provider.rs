//! Feature providers
//!
//! A provider turns item identifiers into a [`RawTable`] whose rows align 1:1
//! with the identifiers it was given. Structure-based descriptors come from an
//! external [`DescriptorGenerator`]; this crate only defines its interface.

use crate::raw::RawTable;
use ahash::AHashMap;
use rasarx_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The fixed descriptor subset used by [`DescriptorSource::Selected`]
pub const SELECTED_DESCRIPTORS: [&str; 12] = [
    "MolWt",
    "NumHDonors",
    "NumHAcceptors",
    "MolLogP",
    "TPSA",
    "NumRotatableBonds",
    "BalabanJ",
    "RingCount",
    "NumAliphaticRings",
    "NumAromaticRings",
    "FractionCSP3",
    "HeavyAtomCount",
];

/// Where feature vectors come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DescriptorSource {
    /// Numeric feature columns supplied in the uploaded tables
    #[default]
    UserDefined,
    /// [`SELECTED_DESCRIPTORS`] computed from structures
    Selected,
    /// Every descriptor the generator knows
    All,
}

impl DescriptorSource {
    pub fn label(self) -> &'static str {
        match self {
            DescriptorSource::UserDefined => "User Defined Descriptors",
            DescriptorSource::Selected => "Selected RDKit Descriptors",
            DescriptorSource::All => "All RDKit Descriptors",
        }
    }

    /// True when features are generated from structures
    pub fn needs_generator(self) -> bool {
        !matches!(self, DescriptorSource::UserDefined)
    }
}

impl fmt::Display for DescriptorSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DescriptorSource {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user defined descriptors" | "user" | "user-defined" | "userdefined" => {
                Ok(DescriptorSource::UserDefined)
            }
            "selected rdkit descriptors" | "selected" => Ok(DescriptorSource::Selected),
            "all rdkit descriptors" | "all" => Ok(DescriptorSource::All),
            _ => Err(Error::InvalidConfiguration(format!(
                "unsupported descriptor type '{}'",
                s
            ))),
        }
    }
}

/// Failures of an external descriptor generator
#[derive(Debug, Clone, thiserror::Error)]
pub enum DescriptorError {
    #[error("Invalid structure '{0}'")]
    InvalidStructure(String),

    #[error("Descriptor backend error: {0}")]
    Backend(String),
}

impl From<DescriptorError> for Error {
    fn from(e: DescriptorError) -> Self {
        match e {
            DescriptorError::InvalidStructure(_) => Error::Parse(e.to_string()),
            DescriptorError::Backend(_) => Error::DegenerateInput(e.to_string()),
        }
    }
}

/// Computes a fixed-width descriptor vector for a chemical structure.
///
/// A descriptor that cannot be computed for a structure is `None`.
pub trait DescriptorGenerator: Send + Sync {
    /// Names of every descriptor, in output order
    fn names(&self) -> Vec<String>;

    fn describe(&self, structure: &str) -> std::result::Result<Vec<Option<f64>>, DescriptorError>;
}

/// Supplies feature rows for a list of items
pub trait FeatureProvider {
    fn features(&self, items: &[String]) -> Result<RawTable>;
}

/// Serves rows of an already-parsed feature table by identifier
#[derive(Debug, Clone)]
pub struct TableFeatureProvider {
    table: RawTable,
    index: AHashMap<String, usize>,
}

impl TableFeatureProvider {
    pub fn new(table: RawTable) -> Self {
        let index = table
            .ids()
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), i))
            .collect();
        Self { table, index }
    }
}

impl FeatureProvider for TableFeatureProvider {
    fn features(&self, items: &[String]) -> Result<RawTable> {
        let width = self.table.n_cols();
        let mut values = Vec::with_capacity(items.len() * width);
        for item in items {
            let row = *self.index.get(item).ok_or_else(|| {
                Error::DegenerateInput(format!("no features for item '{}'", item))
            })?;
            values.extend((0..width).map(|col| self.table.get(row, col)));
        }
        RawTable::new(items.to_vec(), self.table.columns().to_vec(), values)
    }
}

/// Generates descriptors from structure identifiers
pub struct StructureFeatureProvider<'a> {
    generator: &'a dyn DescriptorGenerator,
    source: DescriptorSource,
}

impl<'a> StructureFeatureProvider<'a> {
    pub fn new(generator: &'a dyn DescriptorGenerator, source: DescriptorSource) -> Self {
        Self { generator, source }
    }

    /// Positions of the requested descriptors in the generator output
    fn selection(&self, names: &[String]) -> Result<Vec<usize>> {
        match self.source {
            DescriptorSource::Selected => SELECTED_DESCRIPTORS
                .iter()
                .map(|wanted| {
                    names.iter().position(|n| n == wanted).ok_or_else(|| {
                        Error::InvalidConfiguration(format!(
                            "descriptor generator does not provide '{}'",
                            wanted
                        ))
                    })
                })
                .collect(),
            _ => Ok((0..names.len()).collect()),
        }
    }
}

impl FeatureProvider for StructureFeatureProvider<'_> {
    /// `items` are structure identifiers; rows are labeled with them.
    fn features(&self, items: &[String]) -> Result<RawTable> {
        let names = self.generator.names();
        let mut values = Vec::with_capacity(items.len() * names.len());
        for structure in items {
            let row = self.generator.describe(structure)?;
            if row.len() != names.len() {
                return Err(Error::InvalidShape {
                    expected: names.len(),
                    actual: row.len(),
                });
            }
            values.extend(row);
        }
        let full = RawTable::new(items.to_vec(), names.clone(), values)?;
        Ok(full.select(&self.selection(&names)?))
    }
}
