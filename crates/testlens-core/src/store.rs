//! In-memory implementation of the read interfaces.

use std::collections::{BTreeMap, HashMap};

use anyhow::Result;

use crate::model::{
    Answer, Attempt, AttemptScore, Dataset, QuestionMeta, StudentAnswer, TestInstance,
};
use crate::traits::{AnswerSource, QuestionCatalog, ScoreSource};

#[derive(Debug, Clone)]
struct InstanceRecords {
    instance: TestInstance,
    question_ids: Vec<String>,
    questions: HashMap<String, QuestionMeta>,
    attempts: Vec<Attempt>,
}

/// Holds loaded datasets in memory and serves them through the
/// [`AnswerSource`], [`ScoreSource`] and [`QuestionCatalog`] traits.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    instances: BTreeMap<String, InstanceRecords>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from several datasets.
    pub fn from_datasets(datasets: impl IntoIterator<Item = Dataset>) -> Self {
        let mut store = Self::new();
        for dataset in datasets {
            store.insert(dataset);
        }
        store
    }

    /// Add a dataset. A later dataset with the same instance id replaces the
    /// earlier one. Within a dataset, the first definition of a question id
    /// wins.
    pub fn insert(&mut self, dataset: Dataset) {
        let Dataset {
            instance,
            questions,
            attempts,
        } = dataset;

        let question_ids = questions.iter().map(|q| q.question_id.clone()).collect();
        let mut by_id = HashMap::new();
        for meta in questions {
            if by_id.contains_key(&meta.question_id) {
                tracing::warn!(
                    "question '{}' defined twice in '{}', keeping the first definition",
                    meta.question_id,
                    instance.id
                );
                continue;
            }
            by_id.insert(meta.question_id.clone(), meta);
        }

        if self.instances.contains_key(&instance.id) {
            tracing::warn!("test instance '{}' loaded twice, replacing", instance.id);
        }
        self.instances.insert(
            instance.id.clone(),
            InstanceRecords {
                instance,
                question_ids,
                questions: by_id,
                attempts,
            },
        );
    }

    /// Ids of every loaded test instance, sorted.
    pub fn instance_ids(&self) -> Vec<&str> {
        self.instances.keys().map(String::as_str).collect()
    }

    /// The test instance with the given id.
    pub fn instance(&self, instance_id: &str) -> Option<&TestInstance> {
        self.instances.get(instance_id).map(|r| &r.instance)
    }

    fn attempts(&self, instance_id: &str) -> &[Attempt] {
        self.instances
            .get(instance_id)
            .map(|r| r.attempts.as_slice())
            .unwrap_or_default()
    }
}

impl AnswerSource for InMemoryStore {
    fn instance_answers(&self, instance_id: &str) -> Result<Vec<StudentAnswer>> {
        Ok(self
            .attempts(instance_id)
            .iter()
            .flat_map(|attempt| {
                attempt.answers.iter().map(|answer| StudentAnswer {
                    student_id: attempt.student_id.clone(),
                    answer: answer.clone(),
                })
            })
            .collect())
    }

    fn attempt_answers(&self, student_id: &str, instance_id: &str) -> Result<Option<Vec<Answer>>> {
        Ok(self
            .attempts(instance_id)
            .iter()
            .find(|a| a.student_id == student_id)
            .map(|a| a.answers.clone()))
    }
}

impl ScoreSource for InMemoryStore {
    fn instance_scores(&self, instance_id: &str) -> Result<Vec<AttemptScore>> {
        Ok(self.attempts(instance_id).iter().map(Attempt::score).collect())
    }
}

impl QuestionCatalog for InMemoryStore {
    fn instance_questions(&self, instance_id: &str) -> Result<Vec<String>> {
        Ok(self
            .instances
            .get(instance_id)
            .map(|r| r.question_ids.clone())
            .unwrap_or_default())
    }

    fn question_meta(
        &self,
        instance_id: &str,
        question_id: &str,
    ) -> Result<Option<QuestionMeta>> {
        Ok(self
            .instances
            .get(instance_id)
            .and_then(|r| r.questions.get(question_id))
            .cloned())
    }
}
