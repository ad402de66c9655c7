//! The `drillbook init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create drillbook.toml
    if std::path::Path::new("drillbook.toml").exists() {
        println!("drillbook.toml already exists, skipping.");
    } else {
        std::fs::write("drillbook.toml", SAMPLE_CONFIG)?;
        println!("Created drillbook.toml");
    }

    // Create example bank
    std::fs::create_dir_all("banks")?;
    let example_path = std::path::Path::new("banks/example.toml");
    if example_path.exists() {
        println!("banks/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_BANK)?;
        println!("Created banks/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Put your .xlsx / .ods / .toml question banks in banks/");
    println!("  2. Run: drillbook inspect");
    println!("  3. Run: drillbook practice example");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# drillbook configuration

# Where progress and wrong-question notebooks are stored.
store_dir = "./.drillbook"
# Where `drillbook practice <name>` looks for banks.
data_dir = "./banks"

progress_expiry_days = 30
short_answer_threshold = 0.70
sample_seed = 42
default_limit = 20

# Replace any of the classifier keyword lists:
# [keywords]
# essay = ["简述", "论述", "explain", "describe"]
"#;

const EXAMPLE_BANK: &str = r#"[bank]
id = "example"
section = "Basics"

[[questions]]
question = "下列说法中，对的请填✅，错的请填❌：水在标准大气压下100℃沸腾"
answer = "✅"

[[questions]]
question = "Which planet is closest to the sun?"
answer = "B"
options = "A. Venus\nB. Mercury\nC. Mars\nD. Earth"
explanation = "Mercury orbits at about 0.39 AU."

[[questions]]
question = "水的化学式是____"
answer = "H2O"

[[questions]]
question = "简述光合作用"
answer = "光合作用是植物利用光能把二氧化碳和水合成有机物并释放氧气的过程"
"#;
