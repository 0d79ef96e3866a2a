//! Difficulty index (P-value): the proportion of test-takers who answered a
//! question correctly.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::Answer;

/// Compute the difficulty index over `answers`.
///
/// Only submitted answers count toward the denominator. Returns 0 when no
/// answer was submitted.
pub fn calculate(answers: &[Answer]) -> f64 {
    let (total, correct) = answers
        .iter()
        .filter(|a| a.submitted)
        .fold((0usize, 0usize), |(total, correct), a| {
            (total + 1, correct + usize::from(a.correct))
        });

    from_counts(correct, total)
}

/// P-value from already-counted submitted answers; 0 when `total` is 0.
pub fn from_counts(correct: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        correct as f64 / total as f64
    }
}

/// Difficulty band of a P-value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DifficultyCategory {
    Easy,
    Average,
    Difficult,
}

impl fmt::Display for DifficultyCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DifficultyCategory::Easy => write!(f, "Easy"),
            DifficultyCategory::Average => write!(f, "Average"),
            DifficultyCategory::Difficult => write!(f, "Difficult"),
        }
    }
}

/// Categorize a P-value. Both 0.25 and 0.75 are `Average`.
pub fn categorize(p: f64) -> DifficultyCategory {
    if p > 0.75 {
        DifficultyCategory::Easy
    } else if p >= 0.25 {
        DifficultyCategory::Average
    } else {
        DifficultyCategory::Difficult
    }
}
