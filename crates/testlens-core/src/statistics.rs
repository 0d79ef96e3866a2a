//! Descriptive statistics over score lists.
//!
//! Every function here is total: empty input yields `0.0` rather than an
//! error, so the results compose without special-casing at call sites.

use serde::{Deserialize, Serialize};

/// Arithmetic mean. Returns 0 for an empty slice.
pub fn mean(scores: &[f64]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    scores.iter().sum::<f64>() / scores.len() as f64
}

/// Median. Even-length input averages the two middle values.
pub fn median(scores: &[f64]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    let mut sorted = scores.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    }
}

/// Population standard deviation (divides by N, not N - 1).
pub fn standard_deviation(scores: &[f64]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    let avg = mean(scores);
    let variance = scores.iter().map(|s| (s - avg).powi(2)).sum::<f64>() / scores.len() as f64;
    variance.sqrt()
}

/// Percentage (0-100) of `true` flags.
pub fn passing_rate(pass_flags: &[bool]) -> f64 {
    if pass_flags.is_empty() {
        return 0.0;
    }
    let passed = pass_flags.iter().filter(|&&p| p).count();
    passed as f64 / pass_flags.len() as f64 * 100.0
}

/// Largest score, or 0 for an empty slice.
pub fn max(scores: &[f64]) -> f64 {
    scores.iter().copied().reduce(f64::max).unwrap_or(0.0)
}

/// Smallest score, or 0 for an empty slice.
pub fn min(scores: &[f64]) -> f64 {
    scores.iter().copied().reduce(f64::min).unwrap_or(0.0)
}

/// Class-level summary of a set of scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreSummary {
    /// Number of scores summarized.
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    /// Population standard deviation.
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    /// Percentage (0-100) of scores at or above the pass mark.
    pub passing_rate: f64,
}

impl ScoreSummary {
    /// Summarize `scores`, counting a score as passing when it is at least
    /// `pass_mark`.
    pub fn compute(scores: &[f64], pass_mark: f64) -> Self {
        let flags: Vec<bool> = scores.iter().map(|&s| s >= pass_mark).collect();
        Self {
            count: scores.len(),
            mean: mean(scores),
            median: median(scores),
            std_dev: standard_deviation(scores),
            min: min(scores),
            max: max(scores),
            passing_rate: passing_rate(&flags),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_empty_is_zero() {
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn mean_basic() {
        assert!((mean(&[1.0, 2.0, 3.0, 4.0]) - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn median_odd_count() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
    }

    #[test]
    fn median_even_count() {
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), 2.5);
    }

    #[test]
    fn median_of_empty_is_zero() {
        assert_eq!(median(&[]), 0.0);
    }

    #[test]
    fn standard_deviation_constant_input() {
        assert_eq!(standard_deviation(&[5.0, 5.0, 5.0, 5.0]), 0.0);
    }

    #[test]
    fn standard_deviation_is_population() {
        // Population SD of [2, 4, 4, 4, 5, 5, 7, 9] is exactly 2.
        let scores = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((standard_deviation(&scores) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn standard_deviation_of_empty_is_zero() {
        assert_eq!(standard_deviation(&[]), 0.0);
    }

    #[test]
    fn passing_rate_percentage() {
        assert_eq!(passing_rate(&[true, false, true, true]), 75.0);
        assert_eq!(passing_rate(&[]), 0.0);
        assert_eq!(passing_rate(&[false, false]), 0.0);
    }

    #[test]
    fn min_max() {
        let scores = [3.5, -1.0, 8.25, 0.0];
        assert_eq!(max(&scores), 8.25);
        assert_eq!(min(&scores), -1.0);
        assert_eq!(max(&[]), 0.0);
        assert_eq!(min(&[]), 0.0);
    }

    #[test]
    fn score_summary_uses_pass_mark() {
        let summary = ScoreSummary::compute(&[0.4, 0.5, 0.9, 1.0], 0.5);
        assert_eq!(summary.count, 4);
        assert_eq!(summary.passing_rate, 75.0);
        assert_eq!(summary.min, 0.4);
        assert_eq!(summary.max, 1.0);
        assert!((summary.median - 0.7).abs() < 1e-12);
    }

    #[test]
    fn score_summary_of_empty() {
        let summary = ScoreSummary::compute(&[], 0.5);
        assert_eq!(summary.count, 0);
        assert_eq!(summary.mean, 0.0);
        assert_eq!(summary.passing_rate, 0.0);
    }
}
