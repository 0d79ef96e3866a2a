//! The `testlens items` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use testlens_core::report::ItemAnalysisReport;
use testlens_report::html::write_html_report;

pub fn execute(
    dataset: PathBuf,
    instance: Option<String>,
    format: String,
    output: Option<PathBuf>,
    config: Option<PathBuf>,
) -> Result<()> {
    let loaded = super::load(&dataset, config.as_deref())?;
    let instance_id = super::resolve_instance(&loaded.store, instance)?;
    let instance_name = loaded
        .store
        .instance(&instance_id)
        .map(|i| i.name.clone())
        .unwrap_or_else(|| instance_id.clone());

    let report = loaded.engine.build_item_report(&instance_id, &instance_name)?;
    tracing::info!(
        "analyzed {} question(s) from {} attempt(s) in '{}'",
        report.instance.question_count,
        report.instance.student_count,
        instance_id
    );

    match format.as_str() {
        "text" => super::emit(&render_table(&report), output.as_deref())?,
        "json" => super::emit(&serde_json::to_string_pretty(&report)?, output.as_deref())?,
        "markdown" | "md" => super::emit(&report.to_markdown(), output.as_deref())?,
        "html" => {
            let path = super::default_output(output, format!("{instance_id}-items.html"));
            write_html_report(&report, &path)?;
            eprintln!("HTML report: {}", path.display());
        }
        other => anyhow::bail!("unknown format '{other}' (expected text, json, markdown, html)"),
    }

    Ok(())
}

fn render_table(report: &ItemAnalysisReport) -> String {
    let mut table = Table::new();
    table.set_header(vec![
        "Question",
        "Attempts",
        "Correct",
        "Difficulty",
        "Category",
        "Discrimination",
        "Quality",
        "Review",
    ]);

    for item in &report.items {
        let discrimination = item
            .discrimination_index
            .map(|d| format!("{d:.2}"))
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![
            Cell::new(&item.question_id),
            Cell::new(item.total_attempts),
            Cell::new(item.correct_count),
            Cell::new(format!("{:.2}", item.difficulty_index)),
            Cell::new(item.difficulty_category()),
            Cell::new(discrimination),
            Cell::new(item.discrimination_quality()),
            Cell::new(if item.needs_review { "REVIEW" } else { "" }),
        ]);
    }

    let s = &report.scores;
    format!(
        "Item analysis: {} ({} students, {} questions)\n\n{table}\n\n\
         Scores: mean {:.1}%, median {:.1}%, std dev {:.1}%, min {:.1}%, max {:.1}%\n\
         Pass rate: {:.1}%\n\
         {} question(s) flagged for review",
        report.instance.name,
        report.instance.student_count,
        report.instance.question_count,
        s.mean * 100.0,
        s.median * 100.0,
        s.std_dev * 100.0,
        s.min * 100.0,
        s.max * 100.0,
        s.passing_rate,
        report.flagged().count()
    )
}
