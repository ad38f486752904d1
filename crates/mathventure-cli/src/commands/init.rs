//! The `mathventure init` command.

use anyhow::{Context, Result};

use mathventure_core::config::MathventureConfig;

pub fn execute() -> Result<()> {
    // Create mathventure.toml
    if std::path::Path::new("mathventure.toml").exists() {
        println!("mathventure.toml already exists, skipping.");
    } else {
        let config = toml::to_string_pretty(&MathventureConfig::default())
            .context("failed to render default config")?;
        std::fs::write("mathventure.toml", format!("{CONFIG_HEADER}{config}"))?;
        println!("Created mathventure.toml");
    }

    // Create example question set
    std::fs::create_dir_all("question-sets")?;
    let example_path = std::path::Path::new("question-sets/example.toml");
    if example_path.exists() {
        println!("question-sets/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_QUESTION_SET)?;
        println!("Created question-sets/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Run: mathventure validate --question-set question-sets/example.toml");
    println!("  2. Run: mathventure play --question-set question-sets/example.toml");
    println!("  3. Run: mathventure grade --answers \"1=x4,2=equal\" --question-set question-sets/example.toml");

    Ok(())
}

const CONFIG_HEADER: &str = "\
# mathventure configuration
# Delays are in milliseconds. MATHVENTURE_STORE overrides store_path.

";

const EXAMPLE_QUESTION_SET: &str = r#"[question_set]
id = "example"
name = "Example Question Set"
description = "A small question set to get started"

[[questions]]
id = 1
title = "Doubling the Radius"
prompt = "If you double a cylinder's radius and keep its height, its volume becomes..."
topic = "volume_reasoning"
answer = "x4"
options = ["x2", "x4", "x8"]
hint = "The radius is squared in πr²h."
solution = "(2r)² = 4r², so the volume is four times bigger."

[[questions]]
id = 2
title = "Tall or Wide"
prompt = "Beaker A has r = 3 cm, h = 100 cm. Beaker B has r = 15 cm, h = 4 cm. Which holds more?"
topic = "volume_reasoning"
answer = "equal"
options = [
    { token = "A", label = "Beaker A" },
    { token = "B", label = "Beaker B" },
    { token = "equal", label = "They hold the same" },
]

[[questions]]
id = 3
title = "Label Area"
prompt = "A can has r = 5 cm and h = 12 cm. What is the area of its label in cm²? Use π = 3.14."
topic = "cylinder_csa"
answer = 376.8
tolerance = 0.1
unit = "cm²"
hint = "The label is the curved surface: 2πrh."
solution = "CSA = 2 × 3.14 × 5 × 12 = 376.8 cm²."
"#;
