//! drillbook CLI: practice question banks from the terminal.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use drillbook_core::model::QuestionType;

mod commands;
mod config;

use commands::practice::PracticeOptions;
use commands::review::ReviewAction;

#[derive(Parser)]
#[command(
    name = "drillbook",
    version,
    about = "Spreadsheet-driven quiz and exam practice"
)]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show detected question types per sheet
    Inspect {
        /// Bank file, bank name or directory (default: data_dir)
        path: Option<PathBuf>,
    },

    /// Check banks for authoring mistakes
    Validate {
        /// Bank file, bank name or directory (default: data_dir)
        path: Option<PathBuf>,
    },

    /// Answer questions interactively
    Practice {
        /// Bank file or bank name
        bank: PathBuf,

        /// Only these types (comma-separated, e.g. "judgment,single")
        #[arg(long, value_delimiter = ',')]
        types: Vec<QuestionType>,

        /// Practice a single type
        #[arg(long, conflicts_with = "types")]
        focus: Option<QuestionType>,

        /// Practice these question numbers (comma-separated, 1-based)
        #[arg(long, value_delimiter = ',', conflicts_with_all = ["types", "focus"])]
        questions: Vec<usize>,

        /// Maximum number of questions; 0 for no limit
        #[arg(long)]
        limit: Option<usize>,

        /// Seed for sampling when the limit is exceeded
        #[arg(long)]
        seed: Option<u64>,

        /// Ignore saved progress and start over
        #[arg(long)]
        fresh: bool,

        /// Write the final summary as JSON to this file
        #[arg(long)]
        summary: Option<PathBuf>,

        /// Summary format: text, markdown, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Review the wrong-question notebook
    Review {
        /// Bank file or bank name
        bank: PathBuf,

        /// Only show notebook statistics
        #[arg(long)]
        stats: bool,

        /// Remove mastered questions
        #[arg(long, conflicts_with = "stats")]
        purge: bool,
    },

    /// Grade a single answer
    Grade {
        /// Bank file or bank name
        bank: PathBuf,

        /// Question number (1-based)
        #[arg(long)]
        question: usize,

        /// The answer to grade
        answer: String,

        /// Print the full assessment as JSON
        #[arg(long)]
        json: bool,
    },

    /// Clear saved progress for a bank
    Reset {
        /// Bank file or bank name
        bank: PathBuf,

        /// Also clear the wrong-question notebook
        #[arg(long)]
        notebook: bool,
    },

    /// Create starter config and example bank
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("drillbook=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.config;

    let result = match cli.command {
        Commands::Inspect { path } => commands::inspect::execute(path, config),
        Commands::Validate { path } => commands::validate::execute(path, config),
        Commands::Practice {
            bank,
            types,
            focus,
            questions,
            limit,
            seed,
            fresh,
            summary,
            format,
        } => {
            let options = PracticeOptions {
                types,
                focus,
                questions,
                limit,
                seed,
                fresh,
                summary,
                format,
            };
            commands::practice::execute(bank, options, config)
        }
        Commands::Review { bank, stats, purge } => {
            let action = if stats {
                ReviewAction::Stats
            } else if purge {
                ReviewAction::Purge
            } else {
                ReviewAction::Interactive
            };
            commands::review::execute(bank, action, config)
        }
        Commands::Grade {
            bank,
            question,
            answer,
            json,
        } => commands::grade::execute(bank, question, answer, json, config),
        Commands::Reset { bank, notebook } => commands::reset::execute(bank, notebook, config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
