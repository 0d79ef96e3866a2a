//! Per-student performance analysis for one attempt.
//!
//! Computes overall accuracy and accuracy broken down by cognitive level and
//! topic, classifies each breakdown group as a strength or weakness, and
//! attaches a fixed set of recommendations.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::model::{Answer, CognitiveLevel, QuestionMeta};
use crate::round4;

/// Topic label for questions without a topic.
pub const UNSPECIFIED_TOPIC: &str = "Unspecified";

/// Recommendation emitted when no weakness was found.
pub const AFFIRMATION: &str =
    "Excellent performance! Keep up the good work and continue challenging yourself.";

/// Recommendations emitted when at least one weakness was found.
pub const REMEDIATION: [&str; 2] = [
    "Focus your revision on the areas listed under weaknesses.",
    "Practice additional questions on the weak areas before the next test.",
];

/// One student's performance on one test instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReport {
    pub student_id: String,
    pub instance_id: String,
    /// Number of answered questions.
    pub total_questions: usize,
    pub correct_answers: usize,
    pub wrong_answers: usize,
    /// Correct / answered, rounded to 4 decimals.
    pub overall_accuracy: f64,
    /// Empty when no question metadata was available.
    pub accuracy_by_cognitive_level: BTreeMap<CognitiveLevel, f64>,
    /// Empty when no question metadata was available.
    pub accuracy_by_topic: BTreeMap<String, f64>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Default, Clone, Copy)]
struct Tally {
    total: usize,
    correct: usize,
}

impl Tally {
    fn record(&mut self, correct: bool) {
        self.total += 1;
        self.correct += usize::from(correct);
    }

    fn accuracy(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            round4(self.correct as f64 / self.total as f64)
        }
    }
}

/// Analyzes a single student's answers.
#[derive(Debug, Clone)]
pub struct PerformanceAnalyzer {
    strength_threshold: f64,
    weakness_threshold: f64,
}

impl Default for PerformanceAnalyzer {
    fn default() -> Self {
        Self::new(&AnalysisConfig::default())
    }
}

impl PerformanceAnalyzer {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            strength_threshold: config.strength_threshold,
            weakness_threshold: config.weakness_threshold,
        }
    }

    /// Build the performance report for one attempt.
    ///
    /// Unanswered questions are ignored. `metadata` may be empty, in which
    /// case the breakdown maps are empty and no strengths or weaknesses are
    /// reported. Fails with [`AnalysisError::NoAnswerData`] when nothing was
    /// answered.
    pub fn analyze(
        &self,
        student_id: &str,
        instance_id: &str,
        answers: &[Answer],
        metadata: &HashMap<String, QuestionMeta>,
    ) -> Result<PerformanceReport, AnalysisError> {
        let answered: Vec<&Answer> = answers.iter().filter(|a| a.submitted).collect();
        if answered.is_empty() {
            return Err(AnalysisError::NoAnswerData {
                student_id: student_id.to_string(),
                instance_id: instance_id.to_string(),
            });
        }

        let mut overall = Tally::default();
        let mut by_level: BTreeMap<CognitiveLevel, Tally> = BTreeMap::new();
        let mut by_topic: BTreeMap<String, Tally> = BTreeMap::new();

        for answer in &answered {
            overall.record(answer.correct);

            let Some(meta) = metadata.get(&answer.question_id) else {
                continue;
            };
            if let Some(level) = meta.cognitive_level {
                by_level.entry(level).or_default().record(answer.correct);
            }
            let topic = meta
                .topic
                .as_deref()
                .filter(|t| !t.trim().is_empty())
                .unwrap_or(UNSPECIFIED_TOPIC);
            by_topic
                .entry(topic.to_string())
                .or_default()
                .record(answer.correct);
        }

        let accuracy_by_cognitive_level: BTreeMap<CognitiveLevel, f64> = by_level
            .into_iter()
            .map(|(level, tally)| (level, tally.accuracy()))
            .collect();
        let accuracy_by_topic: BTreeMap<String, f64> = by_topic
            .into_iter()
            .map(|(topic, tally)| (topic, tally.accuracy()))
            .collect();

        let groups = accuracy_by_cognitive_level
            .iter()
            .map(|(level, &acc)| (format!("{level}-level questions"), acc))
            .chain(
                accuracy_by_topic
                    .iter()
                    .map(|(topic, &acc)| (format!("topic '{topic}'"), acc)),
            );

        let mut strengths = Vec::new();
        let mut weaknesses = Vec::new();
        for (label, acc) in groups {
            if acc >= self.strength_threshold {
                strengths.push(format!(
                    "Strong performance on {label}: {} correct",
                    percent(acc)
                ));
            } else if acc <= self.weakness_threshold {
                weaknesses.push(format!(
                    "Needs improvement on {label}: {} correct",
                    percent(acc)
                ));
            }
        }

        let recommendations = if weaknesses.is_empty() {
            vec![AFFIRMATION.to_string()]
        } else {
            REMEDIATION.iter().map(|r| r.to_string()).collect()
        };

        tracing::debug!(
            "analyzed {} answer(s) for student '{}' in '{}': {} strength(s), {} weakness(es)",
            overall.total,
            student_id,
            instance_id,
            strengths.len(),
            weaknesses.len()
        );

        Ok(PerformanceReport {
            student_id: student_id.to_string(),
            instance_id: instance_id.to_string(),
            total_questions: overall.total,
            correct_answers: overall.correct,
            wrong_answers: overall.total - overall.correct,
            overall_accuracy: overall.accuracy(),
            accuracy_by_cognitive_level,
            accuracy_by_topic,
            strengths,
            weaknesses,
            recommendations,
        })
    }
}

/// Whole percentage, with halves rounded away from zero.
fn percent(accuracy: f64) -> String {
    format!("{}%", (accuracy * 100.0).round())
}

/// Render a performance report as a plain-text block.
pub fn render_summary(report: &PerformanceReport) -> String {
    let rule = "=".repeat(48);
    let mut out = String::new();

    out.push_str(&format!("{rule}\nSTUDENT PERFORMANCE REPORT\n{rule}\n"));
    out.push_str(&format!("Student:          {}\n", report.student_id));
    out.push_str(&format!("Test instance:    {}\n\n", report.instance_id));
    out.push_str(&format!("Total questions:  {}\n", report.total_questions));
    out.push_str(&format!("Correct:          {}\n", report.correct_answers));
    out.push_str(&format!("Wrong:            {}\n", report.wrong_answers));
    out.push_str(&format!(
        "Overall accuracy: {:.2}%\n",
        report.overall_accuracy * 100.0
    ));

    for (title, lines) in [
        ("STRENGTHS", &report.strengths),
        ("WEAKNESSES", &report.weaknesses),
        ("RECOMMENDATIONS", &report.recommendations),
    ] {
        out.push_str(&format!("\n{title}\n"));
        if lines.is_empty() {
            out.push_str("  (none identified)\n");
        }
        for line in lines {
            out.push_str(&format!("  - {line}\n"));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(id: &str, level: Option<CognitiveLevel>, topic: Option<&str>) -> QuestionMeta {
        QuestionMeta {
            question_id: id.into(),
            cognitive_level: level,
            topic: topic.map(String::from),
            kind: None,
            points: 1.0,
        }
    }

    fn answers(prefix: &str, correct: usize, wrong: usize) -> Vec<Answer> {
        (0..correct + wrong)
            .map(|i| Answer::answered(format!("{prefix}{i}"), i < correct, 1.0))
            .collect()
    }

    fn analyze(answers: &[Answer], metadata: &HashMap<String, QuestionMeta>) -> PerformanceReport {
        PerformanceAnalyzer::default()
            .analyze("s1", "t1", answers, metadata)
            .unwrap()
    }

    #[test]
    fn seven_of_ten_without_metadata() {
        let report = analyze(&answers("q", 7, 3), &HashMap::new());
        assert_eq!(report.total_questions, 10);
        assert_eq!(report.correct_answers, 7);
        assert_eq!(report.wrong_answers, 3);
        assert_eq!(report.overall_accuracy, 0.7);
        assert!(report.accuracy_by_cognitive_level.is_empty());
        assert!(report.accuracy_by_topic.is_empty());
        assert!(report.strengths.is_empty());
        assert!(report.weaknesses.is_empty());
        assert_eq!(report.recommendations, vec![AFFIRMATION.to_string()]);
        assert!(report.recommendations[0].starts_with("Excellent performance"));
    }

    #[test]
    fn weak_cognitive_level_yields_weakness_and_remediation() {
        let answers = answers("q", 2, 8);
        let metadata: HashMap<String, QuestionMeta> = answers
            .iter()
            .map(|a| {
                (
                    a.question_id.clone(),
                    meta(&a.question_id, Some(CognitiveLevel::Analyze), Some("Proofs")),
                )
            })
            .collect();

        let report = analyze(&answers, &metadata);
        assert_eq!(
            report.accuracy_by_cognitive_level.get(&CognitiveLevel::Analyze),
            Some(&0.2)
        );
        assert!(report
            .weaknesses
            .iter()
            .any(|w| w.contains("Analyze") && w.contains("20%")));
        assert_eq!(report.recommendations.len(), 2);
        assert_eq!(report.recommendations[0], REMEDIATION[0]);
        assert_eq!(report.recommendations[1], REMEDIATION[1]);
    }

    #[test]
    fn unanswered_questions_are_not_counted() {
        let mut set = answers("q", 3, 1);
        set.push(Answer::unanswered("blank1"));
        set.push(Answer::unanswered("blank2"));

        let report = analyze(&set, &HashMap::new());
        assert_eq!(report.total_questions, 4);
        assert_eq!(report.wrong_answers, 1);
        assert_eq!(report.overall_accuracy, 0.75);
    }

    #[test]
    fn no_answered_questions_is_no_data_not_zero() {
        let analyzer = PerformanceAnalyzer::default();
        let blanks = vec![Answer::unanswered("q1"), Answer::unanswered("q2")];
        let err = analyzer
            .analyze("s1", "t1", &blanks, &HashMap::new())
            .unwrap_err();
        assert!(matches!(err, AnalysisError::NoAnswerData { .. }));

        let err = analyzer
            .analyze("s1", "t1", &[], &HashMap::new())
            .unwrap_err();
        assert!(matches!(err, AnalysisError::NoAnswerData { .. }));

        // All wrong is a valid zero, not an error.
        let report = analyze(&answers("q", 0, 3), &HashMap::new());
        assert_eq!(report.overall_accuracy, 0.0);
    }

    #[test]
    fn missing_topic_groups_as_unspecified() {
        let answers = answers("q", 1, 1);
        let metadata: HashMap<String, QuestionMeta> = [
            ("q0".to_string(), meta("q0", None, None)),
            ("q1".to_string(), meta("q1", None, Some("  "))),
        ]
        .into_iter()
        .collect();

        let report = analyze(&answers, &metadata);
        assert!(report.accuracy_by_cognitive_level.is_empty());
        assert_eq!(report.accuracy_by_topic.len(), 1);
        assert_eq!(report.accuracy_by_topic.get(UNSPECIFIED_TOPIC), Some(&0.5));
    }

    #[test]
    fn thresholds_are_inclusive_and_exclusive_between() {
        // Topic A: 4/5 = 0.80 (strength), B: 3/5 = 0.60 (weakness),
        // C: 7/10 = 0.70 (neither).
        let mut set = Vec::new();
        let mut metadata = HashMap::new();
        for (topic, correct, wrong) in [("A", 4, 1), ("B", 3, 2), ("C", 7, 3)] {
            for a in answers(topic, correct, wrong) {
                metadata.insert(
                    a.question_id.clone(),
                    meta(&a.question_id, None, Some(topic)),
                );
                set.push(a);
            }
        }

        let report = analyze(&set, &metadata);
        assert_eq!(report.strengths.len(), 1);
        assert!(report.strengths[0].contains("'A'"));
        assert!(report.strengths[0].contains("80%"));
        assert_eq!(report.weaknesses.len(), 1);
        assert!(report.weaknesses[0].contains("'B'"));
        assert!(!report
            .strengths
            .iter()
            .chain(&report.weaknesses)
            .any(|s| s.contains("'C'")));
    }

    #[test]
    fn accuracy_rounded_to_four_decimals() {
        let report = analyze(&answers("q", 1, 2), &HashMap::new());
        assert_eq!(report.overall_accuracy, 0.3333);
    }

    #[test]
    fn level_statements_precede_topic_statements() {
        let answers = answers("q", 5, 0);
        let metadata: HashMap<String, QuestionMeta> = answers
            .iter()
            .map(|a| {
                (
                    a.question_id.clone(),
                    meta(&a.question_id, Some(CognitiveLevel::Remember), Some("Algebra")),
                )
            })
            .collect();

        let report = analyze(&answers, &metadata);
        assert_eq!(report.strengths.len(), 2);
        assert!(report.strengths[0].contains("Remember"));
        assert!(report.strengths[1].contains("Algebra"));
    }

    #[test]
    fn percent_rounds_halves_up() {
        assert_eq!(percent(0.125), "13%");
        assert_eq!(percent(0.625), "63%");
        assert_eq!(percent(0.2), "20%");
        assert_eq!(percent(1.0), "100%");
        assert_eq!(percent(0.0), "0%");
    }

    #[test]
    fn statement_percentages_round_halves_up() {
        // 5 of 8 correct is 62.5%.
        let answers = answers("q", 5, 3);
        let metadata: HashMap<String, QuestionMeta> = answers
            .iter()
            .map(|a| {
                let m = meta(&a.question_id, Some(CognitiveLevel::Apply), None);
                (a.question_id.clone(), m)
            })
            .collect();

        let report = analyze(&answers, &metadata);
        assert!(report
            .weaknesses
            .iter()
            .any(|w| w == "Needs improvement on Apply-level questions: 63% correct"));
    }

    #[test]
    fn render_summary_sections() {
        let report = analyze(&answers("q", 7, 3), &HashMap::new());
        let text = render_summary(&report);

        assert!(text.contains("STUDENT PERFORMANCE REPORT"));
        assert!(text.contains("Total questions:  10"));
        assert!(text.contains("Correct:          7"));
        assert!(text.contains("Wrong:            3"));
        assert!(text.contains("Overall accuracy: 70.00%"));

        let strengths = text.find("STRENGTHS").unwrap();
        let weaknesses = text.find("WEAKNESSES").unwrap();
        let recommendations = text.find("RECOMMENDATIONS").unwrap();
        assert!(strengths < weaknesses && weaknesses < recommendations);
        assert_eq!(text.matches("(none identified)").count(), 2);
        assert!(text.contains(&format!("  - {AFFIRMATION}")));
    }
}
