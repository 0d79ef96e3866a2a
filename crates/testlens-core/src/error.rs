//! Analysis error types.
//!
//! Only the orchestration layer can fail: the statistical functions are total
//! and return documented zero values for empty input. These variants let a
//! caller tell "there was nothing to analyze" apart from "the result is zero".

use thiserror::Error;

/// Errors returned by [`AnalysisEngine`](crate::engine::AnalysisEngine) and
/// [`PerformanceAnalyzer`](crate::performance::PerformanceAnalyzer).
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The student has no attempt record for the test instance.
    #[error("no result found for student '{student_id}' in test instance '{instance_id}'")]
    NoResultFound {
        student_id: String,
        instance_id: String,
    },

    /// An attempt exists but contains no answered questions.
    #[error("no answer data for student '{student_id}' in test instance '{instance_id}'")]
    NoAnswerData {
        student_id: String,
        instance_id: String,
    },

    /// A read interface failed to produce its records.
    #[error(transparent)]
    Source(#[from] anyhow::Error),
}

impl AnalysisError {
    /// Returns `true` if the error means the requested data does not exist,
    /// as opposed to a failure while reading it.
    pub fn is_missing_data(&self) -> bool {
        matches!(
            self,
            AnalysisError::NoResultFound { .. } | AnalysisError::NoAnswerData { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_data_classification() {
        let not_found = AnalysisError::NoResultFound {
            student_id: "s1".into(),
            instance_id: "t1".into(),
        };
        let no_answers = AnalysisError::NoAnswerData {
            student_id: "s1".into(),
            instance_id: "t1".into(),
        };
        let source = AnalysisError::from(anyhow::anyhow!("connection reset"));

        assert!(not_found.is_missing_data());
        assert!(no_answers.is_missing_data());
        assert!(!source.is_missing_data());
    }

    #[test]
    fn messages_name_the_student_and_instance() {
        let err = AnalysisError::NoAnswerData {
            student_id: "s7".into(),
            instance_id: "midterm".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("s7"));
        assert!(msg.contains("midterm"));
    }

    #[test]
    fn source_errors_are_transparent() {
        let err = AnalysisError::from(anyhow::anyhow!("store unavailable"));
        assert_eq!(err.to_string(), "store unavailable");
    }
}
