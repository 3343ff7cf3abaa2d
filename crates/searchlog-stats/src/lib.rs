//! Numeric summary helpers for the searchlog project.
//!
//! This crate provides the small set of statistical tools the analysis layer
//! builds on:
//!
//! - **Descriptive statistics**: mean, median, variance, standard deviation
//! - **Percentiles**: nearest-rank percentile lookup over sorted data
//! - **Fixed-edge histograms**: right-closed interval counts with
//!   caller-supplied bin edges
//!
//! # Modules
//!
//! - [`descriptive`]: Descriptive statistics for summarizing datasets
//! - [`percentiles`]: Nearest-rank percentiles
//! - [`histogram`]: Histograms over explicit bin edges
//!
//! # Examples
//!
//! ## Averaging daily ratios
//!
//! ```
//! use searchlog_stats::descriptive;
//!
//! let daily = [0.25, 0.5, 0.75];
//! assert_eq!(descriptive::mean(daily), Some(0.5));
//! assert_eq!(descriptive::mean(Vec::<f64>::new()), None);
//! ```
//!
//! ## Binning session lengths
//!
//! ```
//! use searchlog_stats::histogram::FixedHistogram;
//!
//! let histogram = FixedHistogram::new(&[0.0, 10.0, 30.0], [0.0, 5.0, 12.0, 45.0]);
//! assert_eq!(histogram.bins[0].count, 2);
//! assert_eq!(histogram.bins[1].count, 1);
//! assert_eq!(histogram.total, 4);
//! ```

pub mod descriptive;
pub mod histogram;
pub mod percentiles;
