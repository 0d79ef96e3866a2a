//! HTML report generator.
//!
//! Produces self-contained HTML files with all CSS/JS inlined.

use anyhow::Result;
use std::path::Path;

use testlens_core::performance::PerformanceReport;
use testlens_core::report::ItemAnalysisReport;

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

fn push_head(html: &mut String, title: &str) {
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!("<title>{}</title>\n", html_escape(title)));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");
}

fn push_raw_json<T: serde::Serialize>(html: &mut String, value: &T) {
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(&html_escape(
        &serde_json::to_string_pretty(value).unwrap_or_default(),
    ));
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");
}

/// Generate an HTML page from an item-analysis report.
pub fn generate_html(report: &ItemAnalysisReport) -> String {
    let mut html = String::new();
    push_head(
        &mut html,
        &format!("testlens item analysis: {}", report.instance.name),
    );

    // Header
    html.push_str("<header>\n");
    html.push_str("<h1>Item analysis</h1>\n");
    html.push_str(&format!(
        "<p class=\"meta\">Test: <strong>{}</strong> ({}) | {} students | {} questions | {}</p>\n",
        html_escape(&report.instance.name),
        html_escape(&report.instance.id),
        report.instance.student_count,
        report.instance.question_count,
        report.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</header>\n");

    // Score summary
    let s = &report.scores;
    html.push_str("<section class=\"dashboard\">\n");
    html.push_str("<h2>Scores</h2>\n");
    html.push_str("<table class=\"summary\">\n");
    html.push_str("<thead><tr><th>Students</th><th>Mean</th><th>Median</th><th>Std Dev</th><th>Min</th><th>Max</th><th>Pass Rate</th></tr></thead>\n");
    html.push_str(&format!(
        "<tbody><tr><td>{}</td><td>{:.1}%</td><td>{:.1}%</td><td>{:.1}%</td><td>{:.1}%</td><td>{:.1}%</td><td>{:.1}%</td></tr></tbody>\n",
        s.count,
        s.mean * 100.0,
        s.median * 100.0,
        s.std_dev * 100.0,
        s.min * 100.0,
        s.max * 100.0,
        s.passing_rate
    ));
    html.push_str("</table>\n");

    if !report.items.is_empty() {
        html.push_str("<h2>Difficulty</h2>\n");
        let rows: Vec<(String, f64)> = report
            .items
            .iter()
            .map(|i| (i.question_id.clone(), i.difficulty_index))
            .collect();
        html.push_str(&generate_bar_chart(&rows));
    }
    html.push_str("</section>\n");

    // Per-question statistics
    html.push_str("<section class=\"results\">\n");
    html.push_str("<h2>Questions</h2>\n");
    html.push_str(&format!(
        "<p class=\"meta\">{} flagged for review</p>\n",
        report.flagged().count()
    ));
    html.push_str("<table class=\"results-table\" id=\"results\">\n");
    html.push_str("<thead><tr><th onclick=\"sortTable(0)\">Question</th><th onclick=\"sortTable(1)\">Attempts</th><th onclick=\"sortTable(2)\">Correct</th><th onclick=\"sortTable(3)\">Difficulty</th><th onclick=\"sortTable(4)\">Category</th><th onclick=\"sortTable(5)\">Discrimination</th><th onclick=\"sortTable(6)\">Quality</th><th onclick=\"sortTable(7)\">Review</th></tr></thead>\n");
    html.push_str("<tbody>\n");

    for item in &report.items {
        let row_class = if item.needs_review { "fail" } else { "pass" };
        let discrimination = item
            .discrimination_index
            .map(|d| format!("{d:.2}"))
            .unwrap_or_else(|| "-".to_string());

        html.push_str(&format!(
            "<tr class=\"{}\"><td>{}</td><td>{}</td><td>{}</td><td>{:.2}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            row_class,
            html_escape(&item.question_id),
            item.total_attempts,
            item.correct_count,
            item.difficulty_index,
            item.difficulty_category(),
            discrimination,
            html_escape(&item.discrimination_quality().to_string()),
            if item.needs_review { "REVIEW" } else { "OK" }
        ));
    }

    html.push_str("</tbody></table>\n");
    html.push_str("</section>\n");

    push_raw_json(&mut html, report);

    // JavaScript for sorting
    html.push_str("<script>\n");
    html.push_str(JS);
    html.push_str("</script>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Generate an HTML page from a student performance report.
pub fn generate_performance_html(report: &PerformanceReport) -> String {
    let mut html = String::new();
    push_head(
        &mut html,
        &format!("testlens student report: {}", report.student_id),
    );

    html.push_str("<header>\n");
    html.push_str("<h1>Student performance</h1>\n");
    html.push_str(&format!(
        "<p class=\"meta\">Student: <strong>{}</strong> | Test: <strong>{}</strong></p>\n",
        html_escape(&report.student_id),
        html_escape(&report.instance_id)
    ));
    html.push_str("</header>\n");

    html.push_str("<section class=\"dashboard\">\n");
    html.push_str("<h2>Summary</h2>\n");
    html.push_str("<table class=\"summary\">\n");
    html.push_str("<thead><tr><th>Questions</th><th>Correct</th><th>Wrong</th><th>Accuracy</th></tr></thead>\n");
    html.push_str(&format!(
        "<tbody><tr><td>{}</td><td>{}</td><td>{}</td><td>{:.2}%</td></tr></tbody>\n",
        report.total_questions,
        report.correct_answers,
        report.wrong_answers,
        report.overall_accuracy * 100.0
    ));
    html.push_str("</table>\n");

    if !report.accuracy_by_cognitive_level.is_empty() {
        html.push_str("<h2>By cognitive level</h2>\n");
        let rows: Vec<(String, f64)> = report
            .accuracy_by_cognitive_level
            .iter()
            .map(|(level, acc)| (level.to_string(), *acc))
            .collect();
        html.push_str(&generate_bar_chart(&rows));
    }

    if !report.accuracy_by_topic.is_empty() {
        html.push_str("<h2>By topic</h2>\n");
        let rows: Vec<(String, f64)> = report
            .accuracy_by_topic
            .iter()
            .map(|(topic, acc)| (topic.clone(), *acc))
            .collect();
        html.push_str(&generate_bar_chart(&rows));
    }
    html.push_str("</section>\n");

    html.push_str("<section class=\"feedback\">\n");
    push_list(&mut html, "Strengths", "pass", &report.strengths);
    push_list(&mut html, "Weaknesses", "fail", &report.weaknesses);
    push_list(&mut html, "Recommendations", "", &report.recommendations);
    html.push_str("</section>\n");

    push_raw_json(&mut html, report);

    html.push_str("</body>\n</html>");
    html
}

fn push_list(html: &mut String, title: &str, class: &str, lines: &[String]) {
    html.push_str(&format!("<h2>{title}</h2>\n"));
    if lines.is_empty() {
        html.push_str("<p class=\"meta\">None identified.</p>\n");
        return;
    }
    html.push_str(&format!("<ul class=\"{class}\">\n"));
    for line in lines {
        html.push_str(&format!("<li>{}</li>\n", html_escape(line)));
    }
    html.push_str("</ul>\n");
}

/// Write an item-analysis HTML report to a file.
pub fn write_html_report(report: &ItemAnalysisReport, path: &Path) -> Result<()> {
    write_page(&generate_html(report), path)
}

/// Write a student performance HTML report to a file.
pub fn write_performance_html(report: &PerformanceReport, path: &Path) -> Result<()> {
    write_page(&generate_performance_html(report), path)
}

fn write_page(html: &str, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)?;
    Ok(())
}

/// Horizontal bar chart of fractions in `[0, 1]`.
fn generate_bar_chart(rows: &[(String, f64)]) -> String {
    let bar_height = 30;
    let max_width = 400;
    let padding = 10;
    let label_width = 200;

    let total_height = rows.len() * (bar_height + padding) + padding;

    let mut svg = format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        label_width + max_width + 60,
        total_height
    );

    for (i, (label, value)) in rows.iter().enumerate() {
        let y = i * (bar_height + padding) + padding;
        let width = (value.clamp(0.0, 1.0) * max_width as f64) as usize;

        let color = if *value >= 0.8 {
            "#22c55e"
        } else if *value > 0.6 {
            "#eab308"
        } else {
            "#ef4444"
        };

        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"14\" fill=\"currentColor\" text-anchor=\"end\" dominant-baseline=\"middle\">{}</text>\n",
            label_width - 10,
            y + bar_height / 2,
            html_escape(label)
        ));
        svg.push_str(&format!(
            "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" rx=\"4\"/>\n",
            label_width, y, width, bar_height, color
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"currentColor\" dominant-baseline=\"middle\">{:.1}%</text>\n",
            label_width + width + 8,
            y + bar_height / 2,
            value * 100.0
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --pass: #dcfce7; --fail: #fde2e2; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --pass: #064e3b; --fail: #7f1d1d; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; }
th { background: var(--border); cursor: pointer; }
.pass { background: var(--pass); }
.fail { background: var(--fail); }
ul { padding: 0.5rem 2rem; border-radius: 8px; }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
svg { margin: 1rem 0; }
"#;

const JS: &str = r#"
function sortTable(col) {
  const table = document.getElementById('results');
  const tbody = table.querySelector('tbody');
  const rows = Array.from(tbody.querySelectorAll('tr'));
  const asc = table.dataset.sortCol == col && table.dataset.sortDir == 'asc' ? false : true;
  rows.sort((a, b) => {
    const va = a.cells[col].textContent;
    const vb = b.cells[col].textContent;
    const na = parseFloat(va), nb = parseFloat(vb);
    if (!isNaN(na) && !isNaN(nb)) return asc ? na - nb : nb - na;
    return asc ? va.localeCompare(vb) : vb.localeCompare(va);
  });
  table.dataset.sortCol = col;
  table.dataset.sortDir = asc ? 'asc' : 'desc';
  rows.forEach(r => tbody.appendChild(r));
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use testlens_core::item_analysis::QuestionStatistics;
    use testlens_core::model::CognitiveLevel;
    use testlens_core::report::InstanceSummary;
    use testlens_core::statistics::ScoreSummary;

    fn make_item_report() -> ItemAnalysisReport {
        ItemAnalysisReport {
            id: uuid::Uuid::nil(),
            created_at: chrono::Utc::now(),
            instance: InstanceSummary {
                id: "midterm".into(),
                name: "Midterm <Algebra>".into(),
                student_count: 4,
                question_count: 2,
            },
            scores: ScoreSummary::compute(&[0.25, 0.5, 0.75, 1.0], 0.5),
            items: vec![
                QuestionStatistics {
                    question_id: "q-linear".into(),
                    instance_id: "midterm".into(),
                    total_attempts: 4,
                    correct_count: 2,
                    difficulty_index: 0.5,
                    discrimination_index: Some(1.0),
                    needs_review: false,
                },
                QuestionStatistics {
                    question_id: "q-trivial".into(),
                    instance_id: "midterm".into(),
                    total_attempts: 4,
                    correct_count: 4,
                    difficulty_index: 1.0,
                    discrimination_index: Some(0.0),
                    needs_review: true,
                },
            ],
        }
    }

    fn make_performance_report() -> PerformanceReport {
        let mut levels = BTreeMap::new();
        levels.insert(CognitiveLevel::Remember, 1.0);
        levels.insert(CognitiveLevel::Analyze, 0.5);
        let mut topics = BTreeMap::new();
        topics.insert("Fractions".to_string(), 0.5);
        PerformanceReport {
            student_id: "s-042".into(),
            instance_id: "midterm".into(),
            total_questions: 4,
            correct_answers: 3,
            wrong_answers: 1,
            overall_accuracy: 0.75,
            accuracy_by_cognitive_level: levels,
            accuracy_by_topic: topics,
            strengths: vec!["Strong performance on Remember-level questions: 100% correct".into()],
            weaknesses: vec!["Needs improvement on topic 'Fractions': 50% correct".into()],
            recommendations: vec!["Practice more".into()],
        }
    }

    #[test]
    fn html_report_contains_required_elements() {
        let html = generate_html(&make_item_report());

        assert!(html.contains("<html"));
        assert!(html.contains("</html>"));
        assert!(html.contains("q-linear"));
        assert!(html.contains("q-trivial"));
        assert!(html.contains("REVIEW"));
        assert!(html.contains("1 flagged for review"));
        assert!(html.contains("<svg"));
    }

    #[test]
    fn html_escapes_user_text() {
        let html = generate_html(&make_item_report());
        assert!(html.contains("Midterm &lt;Algebra&gt;"));
        assert!(!html.contains("Midterm <Algebra>"));
    }

    #[test]
    fn performance_html_lists_feedback() {
        let html = generate_performance_html(&make_performance_report());
        assert!(html.contains("s-042"));
        assert!(html.contains("75.00%"));
        assert!(html.contains("Remember"));
        assert!(html.contains("topic &#x27;Fractions&#x27;"));
        assert!(html.contains("Practice more"));
    }

    #[test]
    fn html_report_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("report.html");

        write_html_report(&make_item_report(), &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("<html"));

        let path = dir.path().join("student.html");
        write_performance_html(&make_performance_report(), &path).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("Student performance"));
    }
}
