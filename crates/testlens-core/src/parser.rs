//! TOML dataset parser.
//!
//! Loads test-instance datasets (questions plus student attempts) from TOML
//! files and directories, and validates them.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{
    Answer, Attempt, CognitiveLevel, Dataset, QuestionKind, QuestionMeta, TestInstance,
};

/// Intermediate TOML structure for parsing dataset files.
#[derive(Debug, Deserialize)]
struct TomlDatasetFile {
    instance: TomlInstance,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
    #[serde(default)]
    attempts: Vec<TomlAttempt>,
}

#[derive(Debug, Deserialize)]
struct TomlInstance {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    id: String,
    #[serde(default)]
    topic: Option<String>,
    #[serde(default)]
    cognitive_level: Option<String>,
    #[serde(default = "default_points")]
    points: f64,
    #[serde(default)]
    kind: Option<QuestionKind>,
}

fn default_points() -> f64 {
    1.0
}

#[derive(Debug, Deserialize)]
struct TomlAttempt {
    student: String,
    #[serde(default)]
    score: Option<f64>,
    #[serde(default)]
    points_possible: Option<f64>,
    #[serde(default)]
    answers: Vec<TomlAnswer>,
}

#[derive(Debug, Deserialize)]
struct TomlAnswer {
    question: String,
    #[serde(default)]
    choice: Option<String>,
    #[serde(default)]
    correct: Option<bool>,
    #[serde(default)]
    points: Option<f64>,
}

/// Parse a single TOML file into a [`Dataset`].
pub fn parse_dataset(path: &Path) -> Result<Dataset> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read dataset file: {}", path.display()))?;

    parse_dataset_str(&content, path)
}

/// Parse a TOML string into a [`Dataset`] (useful for testing).
///
/// Answers without an explicit `correct` flag are graded against the
/// question's kind; answers without `points` earn the question's points when
/// correct. An attempt without `score` totals its answer points.
pub fn parse_dataset_str(content: &str, source_path: &Path) -> Result<Dataset> {
    let parsed: TomlDatasetFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let questions = parsed
        .questions
        .into_iter()
        .map(|q| {
            let cognitive_level = q
                .cognitive_level
                .map(|l| {
                    l.parse::<CognitiveLevel>()
                        .map_err(|e| anyhow::anyhow!("question '{}': {}", q.id, e))
                })
                .transpose()?;
            Ok(QuestionMeta {
                question_id: q.id,
                cognitive_level,
                topic: q.topic,
                kind: q.kind,
                points: q.points,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let by_id: HashMap<&str, &QuestionMeta> = questions
        .iter()
        .map(|q| (q.question_id.as_str(), q))
        .collect();
    let total_points: f64 = questions.iter().map(|q| q.points).sum();

    let attempts = parsed
        .attempts
        .into_iter()
        .map(|a| {
            let answers: Vec<Answer> = a
                .answers
                .into_iter()
                .map(|ans| {
                    let meta = by_id.get(ans.question.as_str()).copied();
                    grade(ans, meta)
                })
                .collect();
            let points_earned = a
                .score
                .unwrap_or_else(|| answers.iter().map(|x| x.points_earned).sum());
            Attempt {
                student_id: a.student,
                points_earned,
                points_possible: a.points_possible.unwrap_or(total_points),
                answers,
            }
        })
        .collect();

    Ok(Dataset {
        instance: TestInstance {
            id: parsed.instance.id,
            name: parsed.instance.name,
            description: parsed.instance.description,
        },
        questions,
        attempts,
    })
}

fn grade(ans: TomlAnswer, meta: Option<&QuestionMeta>) -> Answer {
    let Some(choice) = ans.choice.filter(|c| !c.trim().is_empty()) else {
        return Answer::unanswered(ans.question);
    };

    let correct = ans.correct.unwrap_or_else(|| {
        meta.and_then(|m| m.kind.as_ref())
            .is_some_and(|kind| kind.check(&choice))
    });
    let points = ans.points.unwrap_or_else(|| match (correct, meta) {
        (true, Some(m)) => m.points,
        (true, None) => 1.0,
        (false, _) => 0.0,
    });

    Answer::answered(ans.question, correct, points)
}

/// Recursively load all `.toml` dataset files from a directory.
pub fn load_dataset_directory(dir: &Path) -> Result<Vec<Dataset>> {
    let mut sets = Vec::new();

    for path in dataset_files(dir)? {
        match parse_dataset(&path) {
            Ok(set) => sets.push(set),
            Err(e) => {
                tracing::warn!("skipping {}: {}", path.display(), e);
            }
        }
    }

    Ok(sets)
}

/// Every `.toml` file under `dir`, recursively, in sorted order.
fn dataset_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.path());

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.path();
        if path.is_dir() {
            files.extend(dataset_files(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            files.push(path);
        }
    }

    Ok(files)
}

/// Load a single dataset file, or every dataset under a directory.
pub fn load_datasets(path: &Path) -> Result<Vec<Dataset>> {
    if path.is_dir() {
        load_dataset_directory(path)
    } else {
        Ok(vec![parse_dataset(path)?])
    }
}

/// Choices recorded in a dataset file, keyed by (student, question).
///
/// Only used by validation, which needs the raw choices that grading
/// discards.
fn raw_choices(content: &str) -> Result<Vec<(String, String, String)>> {
    let parsed: TomlDatasetFile = toml::from_str(content)?;
    Ok(parsed
        .attempts
        .into_iter()
        .flat_map(|a| {
            let student = a.student;
            a.answers
                .into_iter()
                .filter_map(move |ans| ans.choice.map(|c| (student.clone(), ans.question, c)))
        })
        .collect())
}

/// A warning from dataset validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question or student the warning is about (if applicable).
    pub subject: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate a dataset for common issues.
pub fn validate_dataset(set: &Dataset) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    // Check for duplicate question IDs
    let mut seen_questions = HashSet::new();
    for q in &set.questions {
        if !seen_questions.insert(q.question_id.as_str()) {
            warnings.push(ValidationWarning {
                subject: Some(q.question_id.clone()),
                message: format!("duplicate question ID: {}", q.question_id),
            });
        }
    }

    // Check for students with more than one attempt
    let mut seen_students = HashSet::new();
    for a in &set.attempts {
        if !seen_students.insert(a.student_id.as_str()) {
            warnings.push(ValidationWarning {
                subject: Some(a.student_id.clone()),
                message: format!("duplicate attempt for student: {}", a.student_id),
            });
        }
    }

    // Check for attempts with no answers and answers to unknown questions
    let mut answered = HashSet::new();
    for a in &set.attempts {
        if a.answers.is_empty() {
            warnings.push(ValidationWarning {
                subject: Some(a.student_id.clone()),
                message: "attempt has no answers".into(),
            });
        }
        for ans in &a.answers {
            if ans.submitted {
                answered.insert(ans.question_id.as_str());
            }
            if !seen_questions.contains(ans.question_id.as_str()) {
                warnings.push(ValidationWarning {
                    subject: Some(a.student_id.clone()),
                    message: format!("answer references unknown question: {}", ans.question_id),
                });
            }
        }
        if a.points_possible > 0.0 && a.points_earned > a.points_possible {
            warnings.push(ValidationWarning {
                subject: Some(a.student_id.clone()),
                message: format!(
                    "score {} exceeds points possible {}",
                    a.points_earned, a.points_possible
                ),
            });
        }
    }

    // Check for questions nobody answered
    for q in &set.questions {
        if !answered.contains(q.question_id.as_str()) {
            warnings.push(ValidationWarning {
                subject: Some(q.question_id.clone()),
                message: "no student answered this question".into(),
            });
        }
    }

    warnings
}

/// Validate a dataset file, including checks that need the raw choices.
pub fn validate_dataset_file(path: &Path) -> Result<(Dataset, Vec<ValidationWarning>)> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read dataset file: {}", path.display()))?;
    let set = parse_dataset_str(&content, path)?;
    let mut warnings = validate_dataset(&set);

    let kinds: HashMap<&str, &QuestionKind> = set
        .questions
        .iter()
        .filter_map(|q| q.kind.as_ref().map(|k| (q.question_id.as_str(), k)))
        .collect();
    for (student, question, choice) in raw_choices(&content)? {
        if let Some(kind) = kinds.get(question.as_str()) {
            if !choice.trim().is_empty() && !kind.accepts(&choice) {
                warnings.push(ValidationWarning {
                    subject: Some(student),
                    message: format!("choice '{choice}' is not an option for question {question}"),
                });
            }
        }
    }

    Ok((set, warnings))
}

/// Validate a single dataset file, or every dataset file under a directory.
///
/// Files are checked from their raw content, so choice checks apply to
/// directories too. Unparsable files under a directory are skipped with a
/// warning, as when loading.
pub fn validate_datasets(path: &Path) -> Result<Vec<(Dataset, Vec<ValidationWarning>)>> {
    if !path.is_dir() {
        return Ok(vec![validate_dataset_file(path)?]);
    }

    let mut checked = Vec::new();
    for file in dataset_files(path)? {
        match validate_dataset_file(&file) {
            Ok(result) => checked.push(result),
            Err(e) => {
                tracing::warn!("skipping {}: {}", file.display(), e);
            }
        }
    }
    Ok(checked)
}
