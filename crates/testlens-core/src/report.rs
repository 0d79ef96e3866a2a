//! Item-analysis report types with JSON persistence and markdown output.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::item_analysis::QuestionStatistics;
use crate::statistics::ScoreSummary;

/// A complete item-analysis report for one test instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemAnalysisReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// The analyzed test instance.
    pub instance: InstanceSummary,
    /// Summary of the class's score fractions.
    pub scores: ScoreSummary,
    /// Per-question statistics, in question order.
    pub items: Vec<QuestionStatistics>,
}

/// Summary of a test instance (without its records).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceSummary {
    pub id: String,
    pub name: String,
    pub student_count: usize,
    pub question_count: usize,
}

impl ItemAnalysisReport {
    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: ItemAnalysisReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// Items flagged for review.
    pub fn flagged(&self) -> impl Iterator<Item = &QuestionStatistics> {
        self.items.iter().filter(|s| s.needs_review)
    }

    /// Format the report as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!("## Item analysis: {}\n\n", self.instance.name));
        md.push_str(&format!(
            "**Summary:** {} students, {} questions, {} flagged for review\n\n",
            self.instance.student_count,
            self.instance.question_count,
            self.flagged().count()
        ));
        md.push_str(&format!(
            "**Scores:** mean {:.1}%, median {:.1}%, std dev {:.1}%, pass rate {:.1}%\n\n",
            self.scores.mean * 100.0,
            self.scores.median * 100.0,
            self.scores.std_dev * 100.0,
            self.scores.passing_rate
        ));

        if self.items.is_empty() {
            return md;
        }

        md.push_str("| Question | Attempts | Correct | Difficulty | Category | Discrimination | Quality | Review |\n");
        md.push_str("|----------|----------|---------|------------|----------|----------------|---------|--------|\n");
        for s in &self.items {
            let discrimination = s
                .discrimination_index
                .map(|d| format!("{d:.2}"))
                .unwrap_or_else(|| "-".to_string());
            md.push_str(&format!(
                "| {} | {} | {} | {:.2} | {} | {} | {} | {} |\n",
                s.question_id,
                s.total_attempts,
                s.correct_count,
                s.difficulty_index,
                s.difficulty_category(),
                discrimination,
                s.discrimination_quality(),
                if s.needs_review { "yes" } else { "" }
            ));
        }

        md
    }
}
