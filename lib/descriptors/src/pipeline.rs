//! Turns uploaded tables into engine input
//!
//! * User-defined descriptors: every value column of the reference table but
//!   the last is a feature; the last is the response. A query table with as
//!   many columns as the reference table also carries a (ignored) response.
//! * Generated descriptors: the first value column holds structures and, in
//!   the reference table, the second holds the response. Descriptors are
//!   computed by a [`DescriptorGenerator`] and pass through the
//!   [`VarianceFilter`].

use crate::filter::VarianceFilter;
use crate::provider::{DescriptorGenerator, DescriptorSource, FeatureProvider, StructureFeatureProvider};
use crate::table::Table;
use rasarx_core::{Error, FeatureMatrix, ReferenceSet, ResponseVector, Result};
use tracing::info;

/// Engine-ready reference and query sets
#[derive(Debug, Clone)]
pub struct PreparedInput {
    pub reference: ReferenceSet,
    pub query: FeatureMatrix,
    /// Generated descriptors removed for low variance
    pub dropped: Vec<String>,
}

/// Build engine input from a reference and a query table.
///
/// `generator` is required for the generated-descriptor sources.
pub fn prepare(
    reference: &Table,
    query: &Table,
    source: DescriptorSource,
    generator: Option<&dyn DescriptorGenerator>,
) -> Result<PreparedInput> {
    if reference.is_empty() {
        return Err(Error::DegenerateInput("reference table has no rows".to_string()));
    }
    if query.is_empty() {
        return Err(Error::DegenerateInput("query table has no rows".to_string()));
    }

    let prepared = match source {
        DescriptorSource::UserDefined => prepare_user_defined(reference, query)?,
        _ => {
            let generator = generator.ok_or_else(|| {
                Error::InvalidConfiguration(format!(
                    "'{}' requires a descriptor generator",
                    source
                ))
            })?;
            prepare_generated(reference, query, source, generator)?
        }
    };

    info!(
        source = %source,
        references = prepared.reference.len(),
        queries = prepared.query.n_rows(),
        features = prepared.query.n_cols(),
        dropped = prepared.dropped.len(),
        "input prepared"
    );
    Ok(prepared)
}

fn prepare_user_defined(reference: &Table, query: &Table) -> Result<PreparedInput> {
    if reference.n_cols() < 2 {
        return Err(Error::InvalidConfiguration(
            "reference table needs at least one feature column and a response column".to_string(),
        ));
    }
    let width = reference.n_cols() - 1;
    let features = reference.numeric_block(width)?.into_matrix()?;
    let responses = response_vector(reference, width)?;

    // query response column, when present, is ignored
    let query_width = if query.n_cols() == reference.n_cols() {
        width
    } else {
        query.n_cols()
    };
    let query = query.numeric_block(query_width)?.into_matrix()?;
    features.ensure_same_columns(&query)?;

    Ok(PreparedInput {
        reference: ReferenceSet::new(features, responses)?,
        query,
        dropped: Vec::new(),
    })
}

fn prepare_generated(
    reference: &Table,
    query: &Table,
    source: DescriptorSource,
    generator: &dyn DescriptorGenerator,
) -> Result<PreparedInput> {
    if reference.n_cols() < 2 {
        return Err(Error::InvalidConfiguration(
            "reference table needs a structure column and a response column".to_string(),
        ));
    }
    let provider = StructureFeatureProvider::new(generator, source);
    let reference_raw = provider
        .features(&reference.text_column(0))?
        .with_ids(reference.ids().to_vec())?;
    let query_raw = provider
        .features(&query.text_column(0))?
        .with_ids(query.ids().to_vec())?;

    let filtered = VarianceFilter::default().apply(&reference_raw, &query_raw)?;
    let features = filtered.reference.into_matrix()?;
    let query = filtered.query.into_matrix()?;

    Ok(PreparedInput {
        reference: ReferenceSet::new(features, response_vector(reference, 1)?)?,
        query,
        dropped: filtered.dropped,
    })
}

fn response_vector(table: &Table, col: usize) -> Result<ResponseVector> {
    let values = table
        .numeric_column(col)?
        .into_iter()
        .map(|v| v.unwrap_or(f64::NAN))
        .collect();
    ResponseVector::new(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::tests::CountingGenerator;
    use rasarx_core::ResponseKind;

    fn table(text: &str) -> Table {
        Table::from_bytes(text.as_bytes()).unwrap()
    }

    #[test]
    fn test_user_defined_with_query_response() {
        let reference = table("id,a,b,y\nr1,1,2,0.5\nr2,2,1,1.5\nr3,3,5,2.5\n");
        let query = table("id,a,b,y\nq1,1.5,2,9\n");
        let input = prepare(&reference, &query, DescriptorSource::UserDefined, None).unwrap();

        assert_eq!(input.reference.features().columns(), &["a".to_string(), "b".to_string()]);
        assert_eq!(input.reference.responses().as_slice(), &[0.5, 1.5, 2.5]);
        assert_eq!(input.query.row(0), &[1.5, 2.0]);
        assert!(input.dropped.is_empty());
    }

    #[test]
    fn test_user_defined_without_query_response() {
        let reference = table("id,a,b,y\nr1,1,2,0\nr2,2,1,1\n");
        let query = table("id,a,b\nq1,1.5,2\nq2,0,0\n");
        let input = prepare(&reference, &query, DescriptorSource::UserDefined, None).unwrap();

        assert_eq!(input.query.n_rows(), 2);
        assert_eq!(input.reference.kind(), ResponseKind::Binary);
    }

    #[test]
    fn test_user_defined_column_mismatch() {
        let reference = table("id,a,b,y\nr1,1,2,0\nr2,2,1,1\n");
        let query = table("id,a,c\nq1,1.5,2\n");
        assert!(matches!(
            prepare(&reference, &query, DescriptorSource::UserDefined, None),
            Err(Error::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_missing_response_rejected() {
        let reference = table("id,a,y\nr1,1,0.5\nr2,2,\n");
        let query = table("id,a\nq1,1\n");
        assert!(matches!(
            prepare(&reference, &query, DescriptorSource::UserDefined, None),
            Err(Error::DegenerateInput(_))
        ));
    }

    #[test]
    fn test_missing_feature_rejected() {
        let reference = table("id,a,y\nr1,1,0.5\nr2,NA,1.0\n");
        let query = table("id,a\nq1,1\n");
        assert!(prepare(&reference, &query, DescriptorSource::UserDefined, None).is_err());
    }

    #[test]
    fn test_generated_requires_generator() {
        let reference = table("id,smiles,y\nr1,CCO,1\nr2,CCCC,2\n");
        let query = table("id,smiles\nq1,CC\n");
        assert!(matches!(
            prepare(&reference, &query, DescriptorSource::Selected, None),
            Err(Error::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_generated_descriptors_filtered() {
        let reference = table("id,smiles,y\nr1,CCO,1.0\nr2,CCCCCC,2.0\nr3,CCCCOCCCC,3.5\n");
        let query = table("id,smiles\nq1,CCCO\n");
        let input = prepare(
            &reference,
            &query,
            DescriptorSource::Selected,
            Some(&CountingGenerator),
        )
        .unwrap();

        // HeavyAtomCount is constant in the test generator
        assert_eq!(input.dropped, vec!["HeavyAtomCount".to_string()]);
        assert_eq!(input.query.n_cols(), 11);
        assert_eq!(input.reference.features().ids()[0], "r1");
        assert_eq!(input.reference.responses().as_slice(), &[1.0, 2.0, 3.5]);
    }

    #[test]
    fn test_generated_missing_descriptor_in_query() {
        // "Ipc" is undefined for ring structures and survives the filter
        let reference = table("id,smiles,y\nr1,CCO,1.0\nr2,CCCCCC,2.0\nr3,CCCCOCCCC,3.5\n");
        let query = table("id,smiles\nq1,C1CC1\n");
        let err = prepare(&reference, &query, DescriptorSource::All, Some(&CountingGenerator))
            .unwrap_err();
        assert!(matches!(err, Error::DegenerateInput(ref msg) if msg.contains("Ipc")));
    }
}
