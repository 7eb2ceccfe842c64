// src/utils/stats.rs
use ndarray::ArrayView1;

/// Mean over the non-NaN entries, or `None` if there are none.
pub fn nan_mean(values: ArrayView1<'_, f64>) -> Option<f64> {
    let (sum, count) = values
        .iter()
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// `sqrt(mean(x^2))`, or `None` for an empty input.
pub fn root_mean_square(values: ArrayView1<'_, f64>) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mean_sq = values.mapv(|v| v * v).mean()?;
    Some(mean_sq.sqrt())
}
