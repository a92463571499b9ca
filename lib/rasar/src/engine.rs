//! RASAR engine: orchestrates scaling, similarity, ranking and statistics

use crate::metrics::{Metric, MetricRow};
use crate::stats::compute_metrics;
use crate::window::{CloseWindow, DEFAULT_CTC};
use rasarx_core::{Error, FeatureMatrix, ReferenceSet, ResponseKind, ResponseVector, Result};
use rasarx_similarity::{rank, similarity, Kernel, NeighborRanking, Standardizer};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Engine settings. The window cap is fixed, not learned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RasarConfig {
    #[serde(default)]
    pub kernel: Kernel,
    #[serde(default = "default_ctc")]
    pub ctc: usize,
}

fn default_ctc() -> usize {
    DEFAULT_CTC
}

impl Default for RasarConfig {
    fn default() -> Self {
        Self {
            kernel: Kernel::Gaussian,
            ctc: DEFAULT_CTC,
        }
    }
}

/// Result of one invocation: the reference set evaluated against itself and
/// the query set evaluated against the reference set.
#[derive(Debug, Clone, Serialize)]
pub struct RasarReport {
    pub kernel: Kernel,
    pub response_kind: ResponseKind,
    pub ctc: usize,
    pub features: Vec<String>,
    pub train: Vec<MetricRow>,
    pub test: Vec<MetricRow>,
}

impl RasarReport {
    pub fn schema(&self) -> &'static [Metric] {
        Metric::schema(self.response_kind)
    }
}

/// Stateless read-across engine
#[derive(Debug, Clone, Default)]
pub struct RasarEngine {
    config: RasarConfig,
}

impl RasarEngine {
    pub fn new(config: RasarConfig) -> Result<Self> {
        if config.ctc == 0 {
            return Err(Error::InvalidConfiguration(
                "close-neighbor window must hold at least one item".to_string(),
            ));
        }
        Ok(Self { config })
    }

    pub fn with_kernel(kernel: Kernel) -> Self {
        Self {
            config: RasarConfig {
                kernel,
                ..RasarConfig::default()
            },
        }
    }

    pub fn config(&self) -> &RasarConfig {
        &self.config
    }

    /// Metric rows for every ranked query, in query order.
    ///
    /// `responses` is the full reference response vector; its mean is the
    /// polarity threshold. Rows are independent and computed in parallel.
    pub fn compute(
        &self,
        ranking: &NeighborRanking,
        responses: &ResponseVector,
        kind: ResponseKind,
    ) -> Vec<MetricRow> {
        let threshold = responses.mean();
        let ctc = self.config.ctc;

        ranking
            .lists()
            .par_iter()
            .map(|list| {
                let window = CloseWindow::select(list, ctc);
                MetricRow::new(
                    list.query_id().to_string(),
                    kind,
                    compute_metrics(&window, threshold),
                )
            })
            .collect()
    }

    /// Evaluate `query` against the reference set.
    ///
    /// `kind` is passed in so both passes of an invocation share one schema.
    pub fn predict(
        &self,
        reference: &ReferenceSet,
        query: &FeatureMatrix,
        kind: ResponseKind,
    ) -> Result<Vec<MetricRow>> {
        let scaler = Standardizer::fit(reference.features())?;
        let std_reference = scaler.transform(reference.features())?;
        self.run(&std_reference, &scaler.transform(query)?, reference.responses(), kind)
    }

    /// Run both passes with one kernel and one response-kind decision.
    pub fn evaluate(&self, reference: &ReferenceSet, query: &FeatureMatrix) -> Result<RasarReport> {
        reference.features().ensure_same_columns(query)?;
        if query.is_empty() {
            return Err(Error::DegenerateInput("query set is empty".to_string()));
        }

        let kind = reference.kind();
        let scaler = Standardizer::fit(reference.features())?;
        let std_reference = scaler.transform(reference.features())?;
        let std_query = scaler.transform(query)?;
        debug!(
            references = std_reference.n_rows(),
            queries = std_query.n_rows(),
            features = scaler.means().len(),
            "standardized"
        );

        let train = self.run(&std_reference, &std_reference, reference.responses(), kind)?;
        let test = self.run(&std_reference, &std_query, reference.responses(), kind)?;

        info!(
            kernel = %self.config.kernel,
            response_kind = %kind,
            references = reference.len(),
            queries = query.n_rows(),
            features = query.n_cols(),
            "RASAR evaluation complete"
        );

        Ok(RasarReport {
            kernel: self.config.kernel,
            response_kind: kind,
            ctc: self.config.ctc.min(reference.len()),
            features: reference.features().columns().to_vec(),
            train,
            test,
        })
    }

    fn run(
        &self,
        std_reference: &FeatureMatrix,
        std_query: &FeatureMatrix,
        responses: &ResponseVector,
        kind: ResponseKind,
    ) -> Result<Vec<MetricRow>> {
        let sim = similarity(std_reference, std_query, self.config.kernel)?;
        let ranking = rank(&sim, responses)?;
        debug!(queries = ranking.len(), "ranked neighbors");
        let rows = self.compute(&ranking, responses, kind);
        debug!(rows = rows.len(), schema = %kind, "metrics computed");
        Ok(rows)
    }
}
