//! Core data model types for testlens.
//!
//! These are the in-memory records the engine consumes: answers, attempt
//! scores, and the optional classification metadata attached to questions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One student's response to one question within one attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    /// The question this answer belongs to.
    pub question_id: String,
    /// Whether a choice was submitted. Unsubmitted answers are excluded
    /// from every accuracy denominator.
    pub submitted: bool,
    /// Whether the submitted choice was correct.
    pub correct: bool,
    /// Points earned for this answer.
    #[serde(default)]
    pub points_earned: f64,
}

impl Answer {
    /// An answer with a submitted choice.
    pub fn answered(question_id: impl Into<String>, correct: bool, points_earned: f64) -> Self {
        Self {
            question_id: question_id.into(),
            submitted: true,
            correct,
            points_earned,
        }
    }

    /// A question the student left blank.
    pub fn unanswered(question_id: impl Into<String>) -> Self {
        Self {
            question_id: question_id.into(),
            submitted: false,
            correct: false,
            points_earned: 0.0,
        }
    }
}

/// An [`Answer`] tagged with the student who gave it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentAnswer {
    pub student_id: String,
    pub answer: Answer,
}

/// A student's total score for one test instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptScore {
    pub student_id: String,
    pub points_earned: f64,
    pub points_possible: f64,
}

impl AttemptScore {
    /// Score as a fraction of the points possible (0 when nothing was possible).
    pub fn fraction(&self) -> f64 {
        if self.points_possible <= 0.0 {
            0.0
        } else {
            self.points_earned / self.points_possible
        }
    }
}

/// Classification metadata for a question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionMeta {
    pub question_id: String,
    #[serde(default)]
    pub cognitive_level: Option<CognitiveLevel>,
    #[serde(default)]
    pub topic: Option<String>,
    /// Answer-checking payload, when the question's kind is known.
    #[serde(default)]
    pub kind: Option<QuestionKind>,
    /// Points awarded for a correct answer.
    #[serde(default = "default_points")]
    pub points: f64,
}

fn default_points() -> f64 {
    1.0
}

/// Cognitive level of a question, following Bloom's revised taxonomy.
///
/// Ordering follows the taxonomy, from recall up to synthesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CognitiveLevel {
    Remember,
    Understand,
    Apply,
    Analyze,
    Evaluate,
    Create,
}

impl fmt::Display for CognitiveLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CognitiveLevel::Remember => write!(f, "Remember"),
            CognitiveLevel::Understand => write!(f, "Understand"),
            CognitiveLevel::Apply => write!(f, "Apply"),
            CognitiveLevel::Analyze => write!(f, "Analyze"),
            CognitiveLevel::Evaluate => write!(f, "Evaluate"),
            CognitiveLevel::Create => write!(f, "Create"),
        }
    }
}

impl FromStr for CognitiveLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "remember" | "knowledge" => Ok(CognitiveLevel::Remember),
            "understand" | "comprehension" => Ok(CognitiveLevel::Understand),
            "apply" | "application" => Ok(CognitiveLevel::Apply),
            "analyze" | "analyse" | "analysis" => Ok(CognitiveLevel::Analyze),
            "evaluate" | "evaluation" => Ok(CognitiveLevel::Evaluate),
            "create" | "synthesis" => Ok(CognitiveLevel::Create),
            other => Err(format!("unknown cognitive level: {other}")),
        }
    }
}

/// The closed set of question kinds, each carrying what it needs to check a
/// submitted choice.
///
/// The analytics core only ever sees boolean correctness; this type is used
/// where raw choices are graded, such as dataset loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionKind {
    MultipleChoice { options: Vec<String>, correct: String },
    TrueFalse { answer: bool },
}

impl QuestionKind {
    /// Whether `choice` is the correct response for this question.
    pub fn check(&self, choice: &str) -> bool {
        let choice = choice.trim();
        match self {
            QuestionKind::MultipleChoice { correct, .. } => {
                choice.eq_ignore_ascii_case(correct.trim())
            }
            QuestionKind::TrueFalse { answer } => parse_bool(choice) == Some(*answer),
        }
    }

    /// Whether `choice` is one of the responses this question offers.
    pub fn accepts(&self, choice: &str) -> bool {
        let choice = choice.trim();
        match self {
            QuestionKind::MultipleChoice { options, .. } => options
                .iter()
                .any(|o| o.trim().eq_ignore_ascii_case(choice)),
            QuestionKind::TrueFalse { .. } => parse_bool(choice).is_some(),
        }
    }
}

/// A test instance: one administration of a test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestInstance {
    /// Unique identifier for this instance.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// One student's single attempt at a test instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attempt {
    pub student_id: String,
    /// Raw score earned on the attempt.
    pub points_earned: f64,
    /// Points available on the attempt.
    pub points_possible: f64,
    #[serde(default)]
    pub answers: Vec<Answer>,
}

impl Attempt {
    /// The attempt's total score record.
    pub fn score(&self) -> AttemptScore {
        AttemptScore {
            student_id: self.student_id.clone(),
            points_earned: self.points_earned,
            points_possible: self.points_possible,
        }
    }
}

/// A test instance together with its questions and every attempt at it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub instance: TestInstance,
    /// Questions in presentation order.
    #[serde(default)]
    pub questions: Vec<QuestionMeta>,
    #[serde(default)]
    pub attempts: Vec<Attempt>,
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "true" | "t" | "yes" => Some(true),
        "false" | "f" | "no" => Some(false),
        _ => None,
    }
}
