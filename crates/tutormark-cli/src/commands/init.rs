//! The `tutormark init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create tutormark.toml
    if std::path::Path::new("tutormark.toml").exists() {
        println!("tutormark.toml already exists, skipping.");
    } else {
        std::fs::write("tutormark.toml", SAMPLE_CONFIG)?;
        println!("Created tutormark.toml");
    }

    // Create an example rules file
    std::fs::create_dir_all("rules")?;
    let example_path = std::path::Path::new("rules/example.toml");
    if example_path.exists() {
        println!("rules/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_RULES)?;
        println!("Created rules/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Edit tutormark.toml if you use the profile service");
    println!("  2. Run: tutormark validate --rules rules/example.toml");
    println!("  3. Run: tutormark run --rules rules --lesson lesson_10_step_1 --response \"...\"");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# tutormark configuration

# Personalized feedback needs the learner profile service; remove this
# section to run without it.
[profile]
base_url = "https://profiles.example.com"
token = "${TUTORMARK_PROFILE_TOKEN}"
timeout_secs = 10

[engine]
# rules_dir = "./rules"
parallelism = 4
"#;

const EXAMPLE_RULES: &str = r#"[[lessons]]
id = "lesson_10_step_1"

[[lessons.criteria]]
name = "Reflection Depth"
keywords = [
    "learned",
    "realized",
    "surprised",
    "challenge",
    "next time",
    "improve",
    "takeaway",
]
good_feedback = "✅ Great reflection on what you learned!"
bad_feedback = "⚠️ Try to reflect on what you learned and what surprised you."
improvement_tip = "💡 Name one thing you would do differently next time."

[[lessons.criteria]]
name = "Concrete Examples"
keywords = [
    "for example",
    "specifically",
    "instance",
    "during",
    "afterwards",
    "yesterday",
]
good_feedback = "✅ Solid use of concrete examples."
bad_feedback = "⚠️ Add a specific example from your own work."
"#;
