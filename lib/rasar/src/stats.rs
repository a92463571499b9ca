//! Similarity-weighted read-across statistics for one close window

use crate::metrics::RasarMetrics;
use crate::window::CloseWindow;
use rasarx_core::numeric::{mean, ratio, sample_std};

/// Neighbors on one side of the polarity threshold
#[derive(Debug, Clone, Copy, PartialEq, Default)]
struct PolaritySide {
    count: usize,
    max_similarity: f64,
    sum_similarity: f64,
}

impl PolaritySide {
    fn push(&mut self, similarity: f64) {
        if self.count == 0 || similarity > self.max_similarity {
            self.max_similarity = similarity;
        }
        self.count += 1;
        self.sum_similarity += similarity;
    }

    /// Maximum similarity, 0 for an empty side
    fn max(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.max_similarity
        }
    }

    /// Mean similarity, 0 for an empty side
    fn avg(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum_similarity / self.count as f64
        }
    }
}

/// Compute every statistic for one window.
///
/// `threshold` is the mean response of the full reference set; neighbors with
/// a response at or above it are "positive".
pub fn compute_metrics(window: &CloseWindow, threshold: f64) -> RasarMetrics {
    let weights = window.weights();
    let sims = window.similarities();
    let weight_sum = window.weight_sum();

    // Weighted prediction
    let weighted_response: f64 = weights
        .iter()
        .zip(window.responses())
        .map(|(w, y)| w * y)
        .sum();
    let ra_function = ratio(weighted_response, weight_sum);

    // Dispersion with small-sample correction
    let n_eff = window.effective_size();
    let weighted_ss: f64 = weights
        .iter()
        .zip(window.responses())
        .map(|(w, y)| w * (y - ra_function) * (y - ra_function))
        .sum();
    let sd_activity = (ratio(weighted_ss, weight_sum) * ratio(n_eff, n_eff - 1.0)).sqrt();
    let cv_activity = ratio(sd_activity, ra_function);
    let standard_error = ratio(sd_activity, n_eff.sqrt());

    let avg_similarity = mean(&sims);
    let sd_similarity = sample_std(&sims);
    let cv_similarity = ratio(sd_similarity, avg_similarity);

    // Polarity split around the reference mean
    let mut pos = PolaritySide::default();
    let mut neg = PolaritySide::default();
    for n in window.neighbors() {
        if n.response >= threshold {
            pos.push(n.similarity);
        } else {
            neg.push(n.similarity);
        }
    }
    let max_pos = pos.max();
    let max_neg = neg.max();
    let pos_avg_sim = pos.avg();
    let neg_avg_sim = neg.avg();
    let abs_diff = (max_pos - max_neg).abs();

    // Confidence index: 0 when balanced, +/-1 when one-sided
    let pos_frac = ratio(pos.count as f64, window.len() as f64);
    let balance = 2.0 * (pos_frac - 0.5).abs();
    let gm = if max_pos >= max_neg { balance } else { -balance };

    let sm1 = ratio(max_pos - max_neg, max_pos.max(max_neg));
    let sm2 = ratio(pos_avg_sim - neg_avg_sim, avg_similarity);

    RasarMetrics {
        ra_function,
        sd_activity,
        cv_activity,
        avg_similarity,
        sd_similarity,
        cv_similarity,
        standard_error,
        max_pos,
        pos_avg_sim,
        max_neg,
        neg_avg_sim,
        abs_diff,
        gm,
        gm_avg_sim: gm * avg_similarity,
        gm_sd_sim: gm * sd_similarity,
        sm1,
        sm2,
        n_eff,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::DEFAULT_CTC;
    use rasarx_similarity::NeighborList;

    fn window(sims: &[f64], responses: &[f64]) -> CloseWindow {
        let list = NeighborList::new("q".to_string(), sims, responses);
        CloseWindow::select(&list, DEFAULT_CTC)
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_equal_similarity_is_plain_average() {
        let w = window(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]);
        let m = compute_metrics(&w, 2.0);

        assert!(close(m.ra_function, 2.0));
        assert!(close(m.n_eff, 3.0));
        // sample standard deviation of [1, 2, 3]
        assert!(close(m.sd_activity, 1.0));
        assert!(close(m.cv_activity, 0.5));
        assert!(close(m.standard_error, 1.0 / 3.0f64.sqrt()));
        assert!(close(m.avg_similarity, 1.0));
        assert!(close(m.sd_similarity, 0.0));
        assert!(close(m.cv_similarity, 0.0));
    }

    #[test]
    fn test_polarity_split() {
        // threshold 0.5: responses 1,1 positive; 0,0 negative
        let w = window(&[0.9, 0.8, 0.6, 0.2], &[1.0, 0.0, 1.0, 0.0]);
        let m = compute_metrics(&w, 0.5);

        assert!(close(m.max_pos, 0.9));
        assert!(close(m.pos_avg_sim, 0.75));
        assert!(close(m.max_neg, 0.8));
        assert!(close(m.neg_avg_sim, 0.5));
        assert!(close(m.abs_diff, 0.1));
        // balanced window
        assert!(close(m.gm, 0.0));
        assert!(close(m.sm1, 0.1 / 0.9));
        assert!(close(m.sm2, 0.25 / 0.625));
    }

    #[test]
    fn test_one_sided_window() {
        let w = window(&[0.7, 0.4], &[0.0, 0.0]);
        let m = compute_metrics(&w, 0.5);

        assert_eq!(m.max_pos, 0.0);
        assert_eq!(m.pos_avg_sim, 0.0);
        assert!(close(m.max_neg, 0.7));
        // all negative and MaxNeg wins: gm = -1
        assert!(close(m.gm, -1.0));
        assert!(close(m.gm_avg_sim, -0.55));
        assert!(close(m.sm1, -1.0));
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let w = window(&[0.5, 0.3], &[2.0, 1.0]);
        let m = compute_metrics(&w, 2.0);
        assert!(close(m.max_pos, 0.5));
        assert!(close(m.max_neg, 0.3));
        assert!(close(m.gm, 0.0));
    }

    #[test]
    fn test_ra_function_within_response_range() {
        let responses = [4.2, -1.0, 3.3, 0.7, 9.1];
        let w = window(&[0.95, 0.6, 0.41, 0.4, 0.05], &responses);
        let m = compute_metrics(&w, 3.0);
        assert!(m.ra_function >= -1.0 && m.ra_function <= 9.1);
        assert!(m.n_eff >= 1.0 && m.n_eff <= 5.0);
    }

    #[test]
    fn test_single_effective_neighbor_undefined_sd() {
        // self-excluded pair: one real neighbor plus a zero-similarity self
        let w = window(&[0.8, 0.0], &[3.0, 5.0]);
        let m = compute_metrics(&w, 4.0);

        assert!(close(m.ra_function, 3.0));
        assert!(close(m.n_eff, 1.0));
        assert!(m.sd_activity.is_nan());
        assert!(m.cv_activity.is_nan());
        assert!(m.standard_error.is_nan());
        // the rest of the row is still computed
        assert!(close(m.avg_similarity, 0.4));
        assert!(close(m.max_neg, 0.8));
    }

    #[test]
    fn test_zero_prediction_gives_nan_cv() {
        let w = window(&[0.5, 0.5], &[-1.0, 1.0]);
        let m = compute_metrics(&w, 0.0);
        assert!(close(m.ra_function, 0.0));
        assert!(m.cv_activity.is_nan());
        assert!(m.sd_activity.is_finite());
    }

    #[test]
    fn test_zero_similarity_mass_is_undefined() {
        let w = window(&[0.0, 0.0, 0.0], &[1.0, 2.0, 3.0]);
        let m = compute_metrics(&w, 2.0);

        assert!(m.ra_function.is_nan());
        assert!(m.sd_activity.is_nan());
        assert_eq!(m.avg_similarity, 0.0);
        assert!(m.cv_similarity.is_nan());
        assert!(m.sm1.is_nan());
        assert!(m.sm2.is_nan());
        assert_eq!(m.abs_diff, 0.0);
    }
}
