//! Central analysis engine.
//!
//! Fetches records through the read interfaces and runs item analysis and
//! per-student performance analysis over them. The engine holds no mutable
//! state; every call reads fresh records and builds a fresh result.

use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::item_analysis::{analyze_items, QuestionStatistics};
use crate::performance::{PerformanceAnalyzer, PerformanceReport};
use crate::report::{InstanceSummary, ItemAnalysisReport};
use crate::statistics::ScoreSummary;
use crate::store::InMemoryStore;
use crate::traits::{AnswerSource, QuestionCatalog, ScoreSource};

/// The central analysis engine.
pub struct AnalysisEngine {
    answers: Arc<dyn AnswerSource>,
    scores: Arc<dyn ScoreSource>,
    catalog: Arc<dyn QuestionCatalog>,
    config: AnalysisConfig,
}

impl AnalysisEngine {
    pub fn new(
        answers: Arc<dyn AnswerSource>,
        scores: Arc<dyn ScoreSource>,
        catalog: Arc<dyn QuestionCatalog>,
        config: AnalysisConfig,
    ) -> Self {
        Self {
            answers,
            scores,
            catalog,
            config,
        }
    }

    /// Engine reading every record from one in-memory store.
    pub fn with_store(store: Arc<InMemoryStore>, config: AnalysisConfig) -> Self {
        Self::new(store.clone(), store.clone(), store, config)
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Difficulty, discrimination and review flag for every question of a
    /// test instance.
    pub fn compute_item_statistics(
        &self,
        instance_id: &str,
    ) -> Result<Vec<QuestionStatistics>, AnalysisError> {
        let question_ids = self.catalog.instance_questions(instance_id)?;
        let answers = self.answers.instance_answers(instance_id)?;
        let scores = self.scores.instance_scores(instance_id)?;

        Ok(analyze_items(
            instance_id,
            &question_ids,
            &answers,
            &scores,
            &self.config,
        ))
    }

    /// Performance report for one student's attempt at a test instance.
    pub fn analyze_student_performance(
        &self,
        student_id: &str,
        instance_id: &str,
    ) -> Result<PerformanceReport, AnalysisError> {
        let Some(answers) = self.answers.attempt_answers(student_id, instance_id)? else {
            return Err(AnalysisError::NoResultFound {
                student_id: student_id.to_string(),
                instance_id: instance_id.to_string(),
            });
        };

        let mut metadata = HashMap::new();
        for answer in answers.iter().filter(|a| a.submitted) {
            if metadata.contains_key(&answer.question_id) {
                continue;
            }
            if let Some(meta) = self.catalog.question_meta(instance_id, &answer.question_id)? {
                metadata.insert(answer.question_id.clone(), meta);
            }
        }

        PerformanceAnalyzer::new(&self.config).analyze(
            student_id,
            instance_id,
            &answers,
            &metadata,
        )
    }

    /// Full item-analysis report for a test instance, including the class
    /// score summary.
    pub fn build_item_report(
        &self,
        instance_id: &str,
        instance_name: &str,
    ) -> Result<ItemAnalysisReport, AnalysisError> {
        let items = self.compute_item_statistics(instance_id)?;
        let scores = self.scores.instance_scores(instance_id)?;

        let fractions: Vec<f64> = scores.iter().map(|s| s.fraction()).collect();
        let summary = ScoreSummary::compute(&fractions, self.config.pass_fraction);

        Ok(ItemAnalysisReport {
            id: Uuid::new_v4(),
            created_at: chrono::Utc::now(),
            instance: InstanceSummary {
                id: instance_id.to_string(),
                name: instance_name.to_string(),
                student_count: scores.len(),
                question_count: items.len(),
            },
            scores: summary,
            items,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        Answer, Attempt, CognitiveLevel, Dataset, QuestionMeta, StudentAnswer, TestInstance,
    };

    fn question(id: &str, level: CognitiveLevel, topic: &str) -> QuestionMeta {
        QuestionMeta {
            question_id: id.into(),
            cognitive_level: Some(level),
            topic: Some(topic.into()),
            kind: None,
            points: 1.0,
        }
    }

    fn attempt(student: &str, results: &[Option<bool>]) -> Attempt {
        let answers: Vec<Answer> = results
            .iter()
            .enumerate()
            .map(|(i, r)| match r {
                Some(correct) => Answer::answered(
                    format!("q{}", i + 1),
                    *correct,
                    f64::from(u8::from(*correct)),
                ),
                None => Answer::unanswered(format!("q{}", i + 1)),
            })
            .collect();
        Attempt {
            student_id: student.into(),
            points_earned: answers.iter().map(|a| a.points_earned).sum(),
            points_possible: results.len() as f64,
            answers,
        }
    }

    fn engine() -> AnalysisEngine {
        let dataset = Dataset {
            instance: TestInstance {
                id: "quiz".into(),
                name: "Weekly Quiz".into(),
                description: String::new(),
            },
            questions: vec![
                question("q1", CognitiveLevel::Remember, "Vocabulary"),
                question("q2", CognitiveLevel::Analyze, "Reading"),
                question("q3", CognitiveLevel::Analyze, "Reading"),
            ],
            attempts: vec![
                attempt("ana", &[Some(true), Some(true), Some(true)]),
                attempt("ben", &[Some(true), Some(false), Some(true)]),
                attempt("cai", &[Some(true), Some(false), None]),
                attempt("dee", &[Some(false), Some(false), Some(false)]),
                Attempt {
                    student_id: "eli".into(),
                    points_earned: 0.0,
                    points_possible: 3.0,
                    answers: vec![],
                },
            ],
        };
        AnalysisEngine::with_store(
            Arc::new(InMemoryStore::from_datasets([dataset])),
            AnalysisConfig::default(),
        )
    }

    #[test]
    fn item_statistics_cover_every_question() {
        let stats = engine().compute_item_statistics("quiz").unwrap();
        let ids: Vec<&str> = stats.iter().map(|s| s.question_id.as_str()).collect();
        assert_eq!(ids, vec!["q1", "q2", "q3"]);

        let q3 = &stats[2];
        assert_eq!(q3.total_attempts, 3);
        assert_eq!(q3.correct_count, 2);
        assert!(q3.discrimination_index.is_some());
        for s in &stats {
            assert!((0.0..=1.0).contains(&s.difficulty_index));
            if let Some(d) = s.discrimination_index {
                assert!((-1.0..=1.0).contains(&d));
            }
        }
    }

    #[test]
    fn student_report_uses_catalog_metadata() {
        let report = engine().analyze_student_performance("ben", "quiz").unwrap();
        assert_eq!(report.total_questions, 3);
        assert_eq!(report.correct_answers, 2);
        assert_eq!(report.overall_accuracy, 0.6667);
        assert_eq!(
            report.accuracy_by_cognitive_level.get(&CognitiveLevel::Analyze),
            Some(&0.5)
        );
        assert_eq!(report.accuracy_by_topic.get("Vocabulary"), Some(&1.0));
        assert!(!report.weaknesses.is_empty());
        assert_eq!(report.recommendations.len(), 2);
    }

    #[test]
    fn missing_attempt_is_no_result_found() {
        let err = engine()
            .analyze_student_performance("zed", "quiz")
            .unwrap_err();
        assert!(matches!(err, AnalysisError::NoResultFound { .. }));

        let err = engine()
            .analyze_student_performance("ana", "other")
            .unwrap_err();
        assert!(matches!(err, AnalysisError::NoResultFound { .. }));
    }

    #[test]
    fn empty_attempt_is_no_answer_data() {
        let err = engine()
            .analyze_student_performance("eli", "quiz")
            .unwrap_err();
        assert!(matches!(err, AnalysisError::NoAnswerData { .. }));
    }

    #[test]
    fn item_report_includes_score_summary() {
        let report = engine().build_item_report("quiz", "Weekly Quiz").unwrap();
        assert_eq!(report.instance.student_count, 5);
        assert_eq!(report.instance.question_count, 3);
        assert_eq!(report.scores.count, 5);
        assert_eq!(report.scores.max, 1.0);
        assert_eq!(report.scores.min, 0.0);
        // ana 3/3, ben 2/3 pass at 0.5; cai 1/3, dee 0, eli 0 do not.
        assert_eq!(report.scores.passing_rate, 40.0);
    }

    #[test]
    fn shared_question_ids_use_each_instance_metadata() {
        let week = |id: &str, level, topic: &str| Dataset {
            instance: TestInstance {
                id: id.into(),
                name: id.into(),
                description: String::new(),
            },
            questions: vec![question("q1", level, topic)],
            attempts: vec![attempt("s1", &[Some(true)])],
        };
        let engine = AnalysisEngine::with_store(
            Arc::new(InMemoryStore::from_datasets([
                week("week3", CognitiveLevel::Remember, "Fractions"),
                week("week4", CognitiveLevel::Create, "Geometry"),
            ])),
            AnalysisConfig::default(),
        );

        let report = engine.analyze_student_performance("s1", "week4").unwrap();
        assert_eq!(report.accuracy_by_topic.get("Geometry"), Some(&1.0));
        assert!(!report.accuracy_by_topic.contains_key("Fractions"));
        assert_eq!(
            report.accuracy_by_cognitive_level.get(&CognitiveLevel::Create),
            Some(&1.0)
        );
        assert!(!report
            .accuracy_by_cognitive_level
            .contains_key(&CognitiveLevel::Remember));
    }

    struct FailingSource;

    impl AnswerSource for FailingSource {
        fn instance_answers(&self, _: &str) -> anyhow::Result<Vec<StudentAnswer>> {
            anyhow::bail!("answer store offline")
        }

        fn attempt_answers(&self, _: &str, _: &str) -> anyhow::Result<Option<Vec<Answer>>> {
            anyhow::bail!("answer store offline")
        }
    }

    #[test]
    fn source_failures_propagate() {
        let store = Arc::new(InMemoryStore::new());
        let engine = AnalysisEngine::new(
            Arc::new(FailingSource),
            store.clone(),
            store,
            AnalysisConfig::default(),
        );

        let err = engine.compute_item_statistics("quiz").unwrap_err();
        assert!(matches!(err, AnalysisError::Source(_)));
        assert!(!err.is_missing_data());

        let err = engine.analyze_student_performance("s", "quiz").unwrap_err();
        assert!(err.to_string().contains("offline"));
    }

    #[test]
    fn repeated_analysis_is_identical() {
        let engine = engine();
        let first = engine.compute_item_statistics("quiz").unwrap();
        let second = engine.compute_item_statistics("quiz").unwrap();
        assert_eq!(first, second);

        let a = engine.analyze_student_performance("cai", "quiz").unwrap();
        let b = engine.analyze_student_performance("cai", "quiz").unwrap();
        assert_eq!(a, b);
    }
}
