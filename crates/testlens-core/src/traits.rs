//! Read interfaces the engine fetches its records through.
//!
//! Persistence lives outside this crate; callers implement these traits over
//! whatever store holds the records. [`InMemoryStore`](crate::store::InMemoryStore)
//! implements all three for datasets loaded from TOML and for tests.

use anyhow::Result;

use crate::model::{Answer, AttemptScore, QuestionMeta, StudentAnswer};

// ---------------------------------------------------------------------------
// Answers
// ---------------------------------------------------------------------------

/// Source of submitted answers.
pub trait AnswerSource: Send + Sync {
    /// Every answer recorded for a test instance, across all students.
    fn instance_answers(&self, instance_id: &str) -> Result<Vec<StudentAnswer>>;

    /// One student's answers for a test instance.
    ///
    /// Returns `Ok(None)` when the student has no attempt record at all, and
    /// `Ok(Some(vec![]))` when an attempt exists without any answers.
    fn attempt_answers(&self, student_id: &str, instance_id: &str) -> Result<Option<Vec<Answer>>>;
}

// ---------------------------------------------------------------------------
// Scores
// ---------------------------------------------------------------------------

/// Source of per-student total scores.
pub trait ScoreSource: Send + Sync {
    /// Total score of every student who attempted a test instance.
    fn instance_scores(&self, instance_id: &str) -> Result<Vec<AttemptScore>>;
}

// ---------------------------------------------------------------------------
// Question metadata
// ---------------------------------------------------------------------------

/// Source of question lists and classification metadata.
pub trait QuestionCatalog: Send + Sync {
    /// Question ids of a test instance, in presentation order.
    fn instance_questions(&self, instance_id: &str) -> Result<Vec<String>>;

    /// Metadata for one question of a test instance, if any is recorded.
    ///
    /// Question ids are only unique within an instance.
    fn question_meta(&self, instance_id: &str, question_id: &str) -> Result<Option<QuestionMeta>>;
}
