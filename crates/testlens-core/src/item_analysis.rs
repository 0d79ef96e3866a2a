//! Per-question item analysis for a test instance.
//!
//! Groups the instance's answers by question, computes the difficulty and
//! discrimination indices for each, and flags items that need review.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::config::{AnalysisConfig, ReviewThresholds};
use crate::difficulty::{self, DifficultyCategory};
use crate::discrimination::{self, DiscriminationQuality, RankedResponse};
use crate::model::{Answer, AttemptScore, StudentAnswer};

/// Item statistics for one question of one test instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionStatistics {
    pub question_id: String,
    pub instance_id: String,
    /// Number of submitted answers.
    pub total_attempts: usize,
    /// Number of correct submitted answers.
    pub correct_count: usize,
    /// Proportion correct, in [0, 1].
    pub difficulty_index: f64,
    /// Upper-lower discrimination, in [-1, 1]; absent when the class is too
    /// small to form both groups.
    pub discrimination_index: Option<f64>,
    pub needs_review: bool,
}

impl QuestionStatistics {
    pub fn difficulty_category(&self) -> DifficultyCategory {
        difficulty::categorize(self.difficulty_index)
    }

    pub fn discrimination_quality(&self) -> DiscriminationQuality {
        DiscriminationQuality::from_index(self.discrimination_index)
    }
}

/// Whether an item should be reviewed given its indices.
pub fn needs_review(
    total_attempts: usize,
    difficulty_index: f64,
    discrimination_index: Option<f64>,
    review: &ReviewThresholds,
) -> bool {
    if total_attempts == 0 {
        return review.flag_unattempted;
    }
    difficulty_index > review.max_difficulty
        || difficulty_index < review.min_difficulty
        || discrimination_index.is_some_and(|d| d < review.min_discrimination)
}

/// Compute statistics for every question of a test instance.
///
/// `question_ids` gives the instance's questions in presentation order;
/// questions that only appear in `answers` follow, sorted by id. Questions
/// nobody answered are still emitted. Students are ranked by the total in
/// `scores`; a student with answers but no score record is ranked by the
/// sum of their answer points.
pub fn analyze_items(
    instance_id: &str,
    question_ids: &[String],
    answers: &[StudentAnswer],
    scores: &[AttemptScore],
    config: &AnalysisConfig,
) -> Vec<QuestionStatistics> {
    let mut by_question: BTreeMap<&str, Vec<&StudentAnswer>> = BTreeMap::new();
    for a in answers {
        by_question
            .entry(a.answer.question_id.as_str())
            .or_default()
            .push(a);
    }

    let totals = student_totals(answers, scores);

    let mut ordered: Vec<&str> = question_ids.iter().map(String::as_str).collect();
    let extras: Vec<&str> = by_question
        .keys()
        .copied()
        .filter(|q| !question_ids.iter().any(|id| id.as_str() == *q))
        .collect();
    if !question_ids.is_empty() && !extras.is_empty() {
        tracing::warn!(
            "{} answered question(s) not listed for instance '{}': {}",
            extras.len(),
            instance_id,
            extras.join(", ")
        );
    }
    ordered.extend(extras);

    let stats: Vec<QuestionStatistics> = ordered
        .into_iter()
        .map(|question_id| {
            let group = by_question
                .get(question_id)
                .map(Vec::as_slice)
                .unwrap_or_default();
            analyze_question(instance_id, question_id, group, &totals, config)
        })
        .collect();

    tracing::debug!(
        "analyzed {} question(s) for instance '{}' over {} student(s), {} flagged",
        stats.len(),
        instance_id,
        totals.len(),
        stats.iter().filter(|s| s.needs_review).count()
    );

    stats
}

fn analyze_question(
    instance_id: &str,
    question_id: &str,
    group: &[&StudentAnswer],
    totals: &BTreeMap<&str, f64>,
    config: &AnalysisConfig,
) -> QuestionStatistics {
    let submitted: Vec<&Answer> = group
        .iter()
        .map(|a| &a.answer)
        .filter(|a| a.submitted)
        .collect();
    let total_attempts = submitted.len();
    let correct_count = submitted.iter().filter(|a| a.correct).count();
    let difficulty_index = difficulty::from_counts(correct_count, total_attempts);

    let discrimination_index = if total_attempts == 0 {
        None
    } else {
        let mut correct_by_student: HashMap<&str, bool> = HashMap::new();
        for a in group.iter().filter(|a| a.answer.submitted) {
            *correct_by_student.entry(a.student_id.as_str()).or_default() |= a.answer.correct;
        }
        let responses: Vec<RankedResponse> = totals
            .iter()
            .map(|(&student_id, &total_score)| RankedResponse {
                student_id: student_id.to_string(),
                total_score,
                correct: correct_by_student
                    .get(student_id)
                    .copied()
                    .unwrap_or(false),
            })
            .collect();
        discrimination::calculate(&responses, config.group_fraction).map(|d| d.index)
    };

    QuestionStatistics {
        question_id: question_id.to_string(),
        instance_id: instance_id.to_string(),
        total_attempts,
        correct_count,
        difficulty_index,
        discrimination_index,
        needs_review: needs_review(
            total_attempts,
            difficulty_index,
            discrimination_index,
            &config.review,
        ),
    }
}

/// Total score per student: the attempt score when recorded, else the sum of
/// the student's answer points.
fn student_totals<'a>(
    answers: &'a [StudentAnswer],
    scores: &'a [AttemptScore],
) -> BTreeMap<&'a str, f64> {
    let mut totals: BTreeMap<&str, f64> = scores
        .iter()
        .map(|s| (s.student_id.as_str(), s.points_earned))
        .collect();

    let mut derived: BTreeMap<&str, f64> = BTreeMap::new();
    for a in answers {
        if !totals.contains_key(a.student_id.as_str()) {
            *derived.entry(a.student_id.as_str()).or_default() += a.answer.points_earned;
        }
    }
    totals.extend(derived);
    totals
}
