//! Small numeric helpers shared by the similarity and statistics crates.
//!
//! Statistics that hit an exactly-zero denominator are reported as `NaN`
//! instead of aborting, so every division that can degenerate goes through
//! [`ratio`].

/// `num / den`, or `NaN` when `den` is exactly zero.
#[inline]
pub fn ratio(num: f64, den: f64) -> f64 {
    if den == 0.0 {
        f64::NAN
    } else {
        num / den
    }
}

/// Arithmetic mean; `NaN` for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    ratio(values.iter().sum(), values.len() as f64)
}

/// Sample standard deviation (n - 1 denominator); `NaN` for fewer than two values.
pub fn sample_std(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    (ss / (n - 1) as f64).sqrt()
}

/// Sample variance ignoring missing entries; `NaN` for fewer than two present values.
pub fn sample_variance_skip_missing<I>(values: I) -> f64
where
    I: IntoIterator<Item = Option<f64>>,
{
    let present: Vec<f64> = values.into_iter().flatten().filter(|v| v.is_finite()).collect();
    let sd = sample_std(&present);
    sd * sd
}
