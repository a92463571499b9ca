//! Metric schema and per-item metric rows
//!
//! The schema is fixed by the [`ResponseKind`] of the reference set: a
//! continuous response yields all 17 metrics, a binary response drops the three
//! activity-dispersion metrics.

use rasarx_core::ResponseKind;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// One named RASAR statistic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    RaFunction,
    SdActivity,
    CvActivity,
    AvgSimilarity,
    SdSimilarity,
    CvSimilarity,
    StandardError,
    MaxPos,
    PosAvgSim,
    MaxNeg,
    NegAvgSim,
    AbsDiff,
    Gm,
    GmAvgSim,
    GmSdSim,
    Sm1,
    Sm2,
}

const CONTINUOUS_SCHEMA: [Metric; 17] = [
    Metric::RaFunction,
    Metric::SdActivity,
    Metric::CvActivity,
    Metric::AvgSimilarity,
    Metric::SdSimilarity,
    Metric::CvSimilarity,
    Metric::StandardError,
    Metric::MaxPos,
    Metric::PosAvgSim,
    Metric::MaxNeg,
    Metric::NegAvgSim,
    Metric::AbsDiff,
    Metric::Gm,
    Metric::GmAvgSim,
    Metric::GmSdSim,
    Metric::Sm1,
    Metric::Sm2,
];

const BINARY_SCHEMA: [Metric; 14] = [
    Metric::RaFunction,
    Metric::AvgSimilarity,
    Metric::SdSimilarity,
    Metric::CvSimilarity,
    Metric::MaxPos,
    Metric::PosAvgSim,
    Metric::MaxNeg,
    Metric::NegAvgSim,
    Metric::AbsDiff,
    Metric::Gm,
    Metric::GmAvgSim,
    Metric::GmSdSim,
    Metric::Sm1,
    Metric::Sm2,
];

impl Metric {
    /// Ordered output fields for a response kind
    pub fn schema(kind: ResponseKind) -> &'static [Metric] {
        match kind {
            ResponseKind::Continuous => &CONTINUOUS_SCHEMA,
            ResponseKind::Binary => &BINARY_SCHEMA,
        }
    }

    /// Column label used in exported tables
    pub fn label(self) -> &'static str {
        match self {
            Metric::RaFunction => "RA_function",
            Metric::SdActivity => "SD_Activity",
            Metric::CvActivity => "CV_Activity",
            Metric::AvgSimilarity => "Avg_similarity",
            Metric::SdSimilarity => "SD_similarity",
            Metric::CvSimilarity => "CV_similarity",
            Metric::StandardError => "Standard_Error (SE)",
            Metric::MaxPos => "MaxPos",
            Metric::PosAvgSim => "PosAvgSim",
            Metric::MaxNeg => "MaxNeg",
            Metric::NegAvgSim => "NegAvgSim",
            Metric::AbsDiff => "AbsDiff",
            Metric::Gm => "gm",
            Metric::GmAvgSim => "gm*AvgSim",
            Metric::GmSdSim => "gm*SD_Similarity",
            Metric::Sm1 => "sm1",
            Metric::Sm2 => "sm2",
        }
    }
}

/// Every statistic computed for one item, before schema selection.
///
/// Undefined statistics hold `NaN`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RasarMetrics {
    pub ra_function: f64,
    pub sd_activity: f64,
    pub cv_activity: f64,
    pub avg_similarity: f64,
    pub sd_similarity: f64,
    pub cv_similarity: f64,
    pub standard_error: f64,
    pub max_pos: f64,
    pub pos_avg_sim: f64,
    pub max_neg: f64,
    pub neg_avg_sim: f64,
    pub abs_diff: f64,
    pub gm: f64,
    pub gm_avg_sim: f64,
    pub gm_sd_sim: f64,
    pub sm1: f64,
    pub sm2: f64,
    /// Kish effective sample size of the window weights; not part of the output schema
    pub n_eff: f64,
}

impl RasarMetrics {
    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::RaFunction => self.ra_function,
            Metric::SdActivity => self.sd_activity,
            Metric::CvActivity => self.cv_activity,
            Metric::AvgSimilarity => self.avg_similarity,
            Metric::SdSimilarity => self.sd_similarity,
            Metric::CvSimilarity => self.cv_similarity,
            Metric::StandardError => self.standard_error,
            Metric::MaxPos => self.max_pos,
            Metric::PosAvgSim => self.pos_avg_sim,
            Metric::MaxNeg => self.max_neg,
            Metric::NegAvgSim => self.neg_avg_sim,
            Metric::AbsDiff => self.abs_diff,
            Metric::Gm => self.gm,
            Metric::GmAvgSim => self.gm_avg_sim,
            Metric::GmSdSim => self.gm_sd_sim,
            Metric::Sm1 => self.sm1,
            Metric::Sm2 => self.sm2,
        }
    }
}

/// Output record for one evaluated item
#[derive(Debug, Clone, PartialEq)]
pub struct MetricRow {
    pub id: String,
    pub kind: ResponseKind,
    pub metrics: RasarMetrics,
}

impl MetricRow {
    pub fn new(id: String, kind: ResponseKind, metrics: RasarMetrics) -> Self {
        Self { id, kind, metrics }
    }

    pub fn schema(&self) -> &'static [Metric] {
        Metric::schema(self.kind)
    }

    /// Value of a metric, or `None` when the row's schema omits it
    pub fn get(&self, metric: Metric) -> Option<f64> {
        self.schema()
            .contains(&metric)
            .then(|| self.metrics.get(metric))
    }

    /// `(label, value)` pairs in schema order
    pub fn fields(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        self.schema()
            .iter()
            .map(move |m| (m.label(), self.metrics.get(*m)))
    }
}

impl Serialize for MetricRow {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let schema = self.schema();
        let mut map = serializer.serialize_map(Some(schema.len() + 1))?;
        map.serialize_entry("id", &self.id)?;
        for (label, value) in self.fields() {
            map.serialize_entry(label, &value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_sizes() {
        assert_eq!(Metric::schema(ResponseKind::Continuous).len(), 17);
        assert_eq!(Metric::schema(ResponseKind::Binary).len(), 14);
    }

    #[test]
    fn test_binary_schema_drops_activity_dispersion() {
        let binary = Metric::schema(ResponseKind::Binary);
        for dropped in [Metric::SdActivity, Metric::CvActivity, Metric::StandardError] {
            assert!(!binary.contains(&dropped));
        }
        let continuous: Vec<_> = Metric::schema(ResponseKind::Continuous)
            .iter()
            .filter(|m| binary.contains(m))
            .collect();
        assert_eq!(continuous.len(), binary.len());
    }

    #[test]
    fn test_row_get_respects_schema() {
        let metrics = RasarMetrics {
            ra_function: 0.4,
            sd_activity: 0.1,
            ..Default::default()
        };
        let row = MetricRow::new("m1".to_string(), ResponseKind::Binary, metrics);
        assert_eq!(row.get(Metric::RaFunction), Some(0.4));
        assert_eq!(row.get(Metric::SdActivity), None);
        assert_eq!(row.fields().count(), 14);
    }

    #[test]
    fn test_row_serialization_order_and_nan() {
        let metrics = RasarMetrics {
            ra_function: 2.0,
            sd_activity: f64::NAN,
            ..Default::default()
        };
        let row = MetricRow::new("q1".to_string(), ResponseKind::Continuous, metrics);
        let json = serde_json::to_string(&row).unwrap();

        assert!(json.starts_with(r#"{"id":"q1","RA_function":2.0,"SD_Activity":null,"CV_Activity":0.0"#));
        assert!(json.ends_with(r#""sm1":0.0,"sm2":0.0}"#));
        assert!(json.contains(r#""Standard_Error (SE)":"#));
    }
}
