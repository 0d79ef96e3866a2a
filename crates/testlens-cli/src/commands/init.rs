//! The `testlens init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create testlens.toml
    if std::path::Path::new("testlens.toml").exists() {
        println!("testlens.toml already exists, skipping.");
    } else {
        std::fs::write("testlens.toml", SAMPLE_CONFIG)?;
        println!("Created testlens.toml");
    }

    // Create example dataset
    std::fs::create_dir_all("datasets")?;
    let example_path = std::path::Path::new("datasets/example.toml");
    if example_path.exists() {
        println!("datasets/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_DATASET)?;
        println!("Created datasets/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Run: testlens validate --dataset datasets/example.toml");
    println!("  2. Run: testlens items --dataset datasets/example.toml");
    println!("  3. Run: testlens student --dataset datasets/example.toml --student ada");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# testlens configuration

# Share of the class in each of the upper and lower discrimination groups.
group_fraction = 0.27

# Topic or cognitive-level accuracy reported as a strength / weakness.
strength_threshold = 0.80
weakness_threshold = 0.60

# Score fraction counted as a pass in the class summary.
pass_fraction = 0.50

[review]
max_difficulty = 0.90
min_difficulty = 0.15
min_discrimination = 0.20
flag_unattempted = true
"#;

const EXAMPLE_DATASET: &str = r#"[instance]
id = "example"
name = "Example Quiz"
description = "A small example dataset to get started"

[[questions]]
id = "capital"
topic = "Geography"
cognitive_level = "remember"
kind = { type = "multiple_choice", options = ["Paris", "Lyon", "Nice"], correct = "Paris" }

[[questions]]
id = "rivers"
topic = "Geography"
cognitive_level = "understand"
kind = { type = "true_false", answer = false }

[[questions]]
id = "population"
topic = "Statistics"
cognitive_level = "analyze"
points = 2.0

[[attempts]]
student = "ada"

[[attempts.answers]]
question = "capital"
choice = "Paris"

[[attempts.answers]]
question = "rivers"
choice = "false"

[[attempts.answers]]
question = "population"
choice = "B"
correct = true

[[attempts]]
student = "ben"

[[attempts.answers]]
question = "capital"
choice = "Lyon"

[[attempts.answers]]
question = "rivers"
choice = "false"

[[attempts.answers]]
question = "population"
choice = "A"
correct = false

[[attempts]]
student = "cy"

[[attempts.answers]]
question = "capital"
choice = "Paris"

[[attempts.answers]]
question = "rivers"
choice = "true"

[[attempts.answers]]
question = "population"
"#;
