use std::ops::Range;

/// A histogram over caller-supplied bin edges.
///
/// For edges `e0 < e1 < ... < en` the histogram has `n` bins. Bin `i` covers
/// the right-closed interval `(e[i], e[i + 1]]`; the first bin additionally
/// includes its lower edge `e0`. Values outside every bin are not assigned
/// to any bin but are still counted in [`total`](Self::total), so
/// [`fraction`](HistogramBin::fraction) is relative to every observed value.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedHistogram {
    /// The bins in ascending edge order.
    pub bins: Vec<HistogramBin>,
    /// Number of values observed, including values outside every bin.
    pub total: u64,
}

/// A single bin in a [`FixedHistogram`].
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    /// Lower (exclusive, except for the first bin) and upper (inclusive) edges.
    pub range: Range<f64>,
    /// The number of values that fall within this bin.
    pub count: u64,
}

impl HistogramBin {
    /// Share of `total` that fell in this bin; `0.0` when `total` is zero.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn fraction(&self, total: u64) -> f64 {
        if total == 0 {
            0.0
        } else {
            self.count as f64 / total as f64
        }
    }

    /// Label in interval notation, e.g. `(10, 30]`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("({}, {}]", self.range.start, self.range.end)
    }
}

impl FixedHistogram {
    /// Creates a histogram by assigning every value to its bin.
    ///
    /// # Panics
    ///
    /// Panics if `edges` is not strictly ascending.
    ///
    /// # Examples
    ///
    /// ```
    /// # use searchlog_stats::histogram::FixedHistogram;
    /// let histogram = FixedHistogram::new(&[0.0, 10.0, 30.0], [0.0, 10.0, 10.5, 31.0]);
    /// assert_eq!(histogram.bins[0].count, 2); // 0 and 10
    /// assert_eq!(histogram.bins[1].count, 1); // 10.5
    /// assert_eq!(histogram.total, 4); // 31 is outside every bin
    /// ```
    #[must_use]
    pub fn new<I>(edges: &[f64], values: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        assert!(
            edges.windows(2).all(|w| w[0] < w[1]),
            "bin edges must be strictly ascending"
        );

        let mut bins = edges
            .windows(2)
            .map(|w| HistogramBin {
                range: w[0]..w[1],
                count: 0,
            })
            .collect::<Vec<_>>();

        let mut total = 0;
        for value in values {
            total += 1;
            if let Some(idx) = bin_index(edges, value) {
                bins[idx].count += 1;
            }
        }

        Self { bins, total }
    }

    /// Fraction of all observed values per bin, in bin order.
    #[must_use]
    pub fn fractions(&self) -> Vec<f64> {
        self.bins.iter().map(|bin| bin.fraction(self.total)).collect()
    }
}

/// Index of the right-closed bin containing `value`.
fn bin_index(edges: &[f64], value: f64) -> Option<usize> {
    let (&first, rest) = edges.split_first()?;
    let &last = rest.last()?;
    if value.is_nan() || value < first || value > last {
        return None;
    }
    if value == first {
        return Some(0);
    }
    // First edge >= value closes the bin that contains it.
    let upper = edges.partition_point(|&edge| edge < value);
    Some(upper - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_right_closed_edges() {
        let edges = [0.0, 10.0, 30.0, 60.0];
        assert_eq!(bin_index(&edges, 0.0), Some(0));
        assert_eq!(bin_index(&edges, 10.0), Some(0));
        assert_eq!(bin_index(&edges, 10.1), Some(1));
        assert_eq!(bin_index(&edges, 30.0), Some(1));
        assert_eq!(bin_index(&edges, 60.0), Some(2));
    }

    #[test]
    fn test_out_of_range_values() {
        let edges = [0.0, 10.0];
        assert_eq!(bin_index(&edges, -1.0), None);
        assert_eq!(bin_index(&edges, 10.5), None);
        assert_eq!(bin_index(&edges, f64::NAN), None);
    }

    #[test]
    fn test_degenerate_edges() {
        assert_eq!(bin_index(&[], 1.0), None);
        assert_eq!(bin_index(&[5.0], 5.0), None);
        let histogram = FixedHistogram::new(&[5.0], [5.0, 6.0]);
        assert!(histogram.bins.is_empty());
        assert_eq!(histogram.total, 2);
    }

    #[test]
    fn test_fractions_use_all_values() {
        let histogram = FixedHistogram::new(&[0.0, 10.0, 20.0], [1.0, 2.0, 15.0, 100.0]);
        assert_eq!(histogram.fractions(), vec![0.5, 0.25]);
    }

    #[test]
    fn test_empty_values() {
        let histogram = FixedHistogram::new(&[0.0, 10.0], Vec::<f64>::new());
        assert_eq!(histogram.total, 0);
        assert_eq!(histogram.fractions(), vec![0.0]);
    }

    #[test]
    #[should_panic(expected = "strictly ascending")]
    fn test_unsorted_edges_panic() {
        let _ = FixedHistogram::new(&[0.0, 10.0, 5.0], Vec::<f64>::new());
    }

    #[test]
    fn test_bin_label() {
        let histogram = FixedHistogram::new(&[0.0, 10.0], Vec::<f64>::new());
        assert_eq!(histogram.bins[0].label(), "(0, 10]");
    }
}
