//! Upper-lower group discrimination index (D-value).
//!
//! Students are ranked by total test score; the top and bottom groups
//! (27% of the class each by default) are compared on how often they
//! answered the question correctly:
//!
//! D = correct_upper / G - correct_lower / G
//!
//! Ties in total score are broken by student id so the ranking, and hence
//! the index, is reproducible across runs.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Fraction of the class placed in each of the upper and lower groups.
pub const DEFAULT_GROUP_FRACTION: f64 = 0.27;

/// One student's standing on the test and on the question under analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedResponse {
    pub student_id: String,
    /// Total score on the test instance.
    pub total_score: f64,
    /// Whether the student answered this question correctly.
    pub correct: bool,
}

/// A computed discrimination index together with the group counts it came from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Discrimination {
    /// The D-value, in [-1, 1].
    pub index: f64,
    /// Size of each of the upper and lower groups.
    pub group_size: usize,
    pub upper_correct: usize,
    pub lower_correct: usize,
}

/// Size of the upper and lower groups for a class of `n` students.
///
/// `G = max(1, round(fraction * n))`, reduced to `floor(n / 2)` when the two
/// groups would otherwise overlap. Returns `None` when `n < 2`.
pub fn group_size(n: usize, fraction: f64) -> Option<usize> {
    if n < 2 {
        return None;
    }
    let mut g = ((fraction * n as f64).round() as usize).max(1);
    if 2 * g > n {
        g = n / 2;
    }
    Some(g)
}

/// Order responses by total score descending, then by student id ascending.
pub fn rank(responses: &[RankedResponse]) -> Vec<&RankedResponse> {
    let mut ranked: Vec<&RankedResponse> = responses.iter().collect();
    ranked.sort_by(|a, b| compare_standing(a, b));
    ranked
}

fn compare_standing(a: &RankedResponse, b: &RankedResponse) -> Ordering {
    b.total_score
        .total_cmp(&a.total_score)
        .then_with(|| a.student_id.cmp(&b.student_id))
}

/// Compute the discrimination index for one question.
///
/// Returns `None` when the class is too small to form two non-empty,
/// non-overlapping groups. An absent index is not the same as an index of 0.
pub fn calculate(responses: &[RankedResponse], fraction: f64) -> Option<Discrimination> {
    let g = group_size(responses.len(), fraction)?;
    let ranked = rank(responses);

    let upper_correct = ranked[..g].iter().filter(|r| r.correct).count();
    let lower_correct = ranked[ranked.len() - g..]
        .iter()
        .filter(|r| r.correct)
        .count();

    let index = upper_correct as f64 / g as f64 - lower_correct as f64 / g as f64;

    Some(Discrimination {
        index,
        group_size: g,
        upper_correct,
        lower_correct,
    })
}

/// Quality band of a discrimination index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiscriminationQuality {
    Excellent,
    Good,
    Marginal,
    Poor,
    VeryPoor,
    NotCalculated,
}

impl DiscriminationQuality {
    /// Band an optional D-value; `None` maps to [`DiscriminationQuality::NotCalculated`].
    pub fn from_index(d: Option<f64>) -> Self {
        match d {
            None => DiscriminationQuality::NotCalculated,
            Some(d) if d >= 0.40 => DiscriminationQuality::Excellent,
            Some(d) if d >= 0.30 => DiscriminationQuality::Good,
            Some(d) if d >= 0.20 => DiscriminationQuality::Marginal,
            Some(d) if d >= 0.10 => DiscriminationQuality::Poor,
            Some(_) => DiscriminationQuality::VeryPoor,
        }
    }
}

impl fmt::Display for DiscriminationQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscriminationQuality::Excellent => write!(f, "Excellent"),
            DiscriminationQuality::Good => write!(f, "Good"),
            DiscriminationQuality::Marginal => write!(f, "Marginal"),
            DiscriminationQuality::Poor => write!(f, "Poor"),
            DiscriminationQuality::VeryPoor => write!(f, "Very Poor / Revise"),
            DiscriminationQuality::NotCalculated => write!(f, "Not Calculated"),
        }
    }
}
