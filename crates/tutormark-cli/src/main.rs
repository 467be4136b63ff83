//! tutormark CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "tutormark", version, about = "Rule-based lesson response feedback")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a response or a JSONL batch
    Run {
        /// Lesson id (e.g. "lesson_2_step_1")
        #[arg(long)]
        lesson: Option<String>,

        /// Response text to evaluate
        #[arg(long)]
        response: Option<String>,

        /// JSONL file of evaluation requests
        #[arg(long)]
        input: Option<PathBuf>,

        /// Learner id for personalized feedback
        #[arg(long)]
        user: Option<String>,

        /// Directory of rule files loaded over the builtin catalog
        #[arg(long)]
        rules: Option<PathBuf>,

        /// Output directory for batch reports
        #[arg(long, default_value = "./tutormark-results")]
        output: PathBuf,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,

        /// Max concurrent evaluations in batch mode
        #[arg(long)]
        parallelism: Option<usize>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate rule TOML files
    Validate {
        /// Path to rule file or directory
        #[arg(long)]
        rules: PathBuf,
    },

    /// List the lessons in the catalog
    Lessons {
        /// Directory of rule files loaded over the builtin catalog
        #[arg(long)]
        rules: Option<PathBuf>,
    },

    /// Create starter config and an example rules file
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("tutormark=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            lesson,
            response,
            input,
            user,
            rules,
            output,
            format,
            parallelism,
            config,
        } => {
            commands::run::execute(
                lesson,
                response,
                input,
                user,
                rules,
                output,
                format,
                parallelism,
                config,
            )
            .await
        }
        Commands::Validate { rules } => commands::validate::execute(rules),
        Commands::Lessons { rules } => commands::lessons::execute(rules),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
