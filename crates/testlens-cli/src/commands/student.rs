//! The `testlens student` command.

use std::path::PathBuf;

use anyhow::Result;

use testlens_core::render_summary;
use testlens_report::html::write_performance_html;

pub fn execute(
    dataset: PathBuf,
    student: String,
    instance: Option<String>,
    format: String,
    output: Option<PathBuf>,
    config: Option<PathBuf>,
) -> Result<()> {
    let loaded = super::load(&dataset, config.as_deref())?;
    let instance_id = super::resolve_instance(&loaded.store, instance)?;

    let report = loaded
        .engine
        .analyze_student_performance(&student, &instance_id)?;

    match format.as_str() {
        "text" => super::emit(&render_summary(&report), output.as_deref())?,
        "json" => super::emit(&serde_json::to_string_pretty(&report)?, output.as_deref())?,
        "html" => {
            let path = super::default_output(output, format!("{instance_id}-{student}.html"));
            write_performance_html(&report, &path)?;
            eprintln!("HTML report: {}", path.display());
        }
        other => anyhow::bail!("unknown format '{other}' (expected text, json, html)"),
    }

    Ok(())
}
