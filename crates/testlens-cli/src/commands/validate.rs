//! The `testlens validate` command.

use std::path::PathBuf;

use anyhow::Result;

use testlens_core::parser::{self, ValidationWarning};

pub fn execute(dataset_path: PathBuf) -> Result<()> {
    let checked = parser::validate_datasets(&dataset_path)?;

    let mut total_warnings = 0;

    for (set, warnings) in &checked {
        println!(
            "Dataset: {} ({} questions, {} attempts)",
            set.instance.name,
            set.questions.len(),
            set.attempts.len()
        );
        for w in warnings {
            print_warning(w);
        }
        total_warnings += warnings.len();
    }

    if total_warnings == 0 {
        println!("All datasets valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}

fn print_warning(w: &ValidationWarning) {
    let prefix = w
        .subject
        .as_ref()
        .map(|id| format!("  [{id}]"))
        .unwrap_or_else(|| "  ".to_string());
    println!("{prefix} WARNING: {}", w.message);
}
