//! Nearest-rank percentiles

/// Value at `percentile` (0 to 100) of ascending `sorted_values`, using the
/// nearest-rank method: index `floor(n * percentile / 100)`, clamped to the
/// last element.
///
/// Returns `None` for empty input.
///
/// ```
/// use searchlog_stats::percentiles::nearest_rank;
///
/// let lengths = [4.0, 9.0, 30.0, 61.0, 300.0];
/// assert_eq!(nearest_rank(&lengths, 25.0), Some(9.0));
/// assert_eq!(nearest_rank(&lengths, 50.0), Some(30.0));
/// assert_eq!(nearest_rank(&lengths, 100.0), Some(300.0));
/// assert_eq!(nearest_rank(&[], 50.0), None);
/// ```
#[expect(
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss
)]
#[must_use]
pub fn nearest_rank(sorted_values: &[f64], percentile: f64) -> Option<f64> {
    debug_assert!(sorted_values.is_sorted_by(|a, b| a <= b));
    let last = sorted_values.len().checked_sub(1)?;
    let rank = (sorted_values.len() as f64 * percentile.clamp(0.0, 100.0) / 100.0) as usize;
    Some(sorted_values[rank.min(last)])
}

/// Nearest-rank values of several percentiles at once, in request order.
///
/// ```
/// use searchlog_stats::percentiles::nearest_ranks;
///
/// let values = [1.0, 2.0, 3.0, 4.0];
/// assert_eq!(nearest_ranks(&values, [25.0, 75.0, 90.0]), Some([2.0, 4.0, 4.0]));
/// ```
#[must_use]
pub fn nearest_ranks<const N: usize>(
    sorted_values: &[f64],
    percentiles: [f64; N],
) -> Option<[f64; N]> {
    if sorted_values.is_empty() {
        return None;
    }
    Some(percentiles.map(|p| nearest_rank(sorted_values, p).unwrap_or(f64::NAN)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_value() {
        for p in [0.0, 50.0, 100.0] {
            assert_eq!(nearest_rank(&[42.0], p), Some(42.0));
        }
    }

    #[test]
    fn test_out_of_range_percentile_clamps() {
        let values = [1.0, 2.0, 3.0];
        assert_eq!(nearest_rank(&values, -10.0), Some(1.0));
        assert_eq!(nearest_rank(&values, 250.0), Some(3.0));
    }

    #[test]
    fn test_even_count_takes_upper_middle() {
        assert_eq!(nearest_rank(&[10.0, 20.0, 30.0, 40.0], 50.0), Some(30.0));
    }

    #[test]
    fn test_nearest_ranks_empty() {
        assert_eq!(nearest_ranks(&[], [50.0, 90.0]), None);
    }
}
