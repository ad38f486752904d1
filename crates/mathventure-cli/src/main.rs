//! mathventure CLI — play the cylinder lesson in a terminal and grade quizzes.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;
mod host;

#[derive(Parser)]
#[command(
    name = "mathventure",
    version,
    about = "Interactive cylinder lesson with adaptive checks and a graded quiz"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play the lesson interactively (commands are read from stdin)
    Play {
        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Screen to open first
        #[arg(long, default_value = "1")]
        start: usize,

        /// Question-set TOML to use for the quiz screens
        #[arg(long)]
        question_set: Option<PathBuf>,

        /// Run every staged delay and the countdown instantly
        #[arg(long)]
        instant: bool,
    },

    /// Grade a set of answers without playing the lesson
    Grade {
        /// Answers as "1=C,2=B,4=439.6"
        #[arg(long)]
        answers: String,

        /// Question-set TOML (default: the built-in cylinder quiz)
        #[arg(long)]
        question_set: Option<PathBuf>,

        /// Learner name recorded in the report
        #[arg(long)]
        learner: Option<String>,

        /// Output directory for the report
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format: json, html, all
        #[arg(long, default_value = "json")]
        format: String,
    },

    /// Validate question-set TOML files
    Validate {
        /// Path to question-set file or directory
        #[arg(long)]
        question_set: PathBuf,
    },

    /// Compare two quiz reports
    Compare {
        /// Baseline report JSON
        #[arg(long)]
        baseline: PathBuf,

        /// Current report JSON
        #[arg(long)]
        current: PathBuf,

        /// Exit code 1 if a previously correct answer is now wrong
        #[arg(long)]
        fail_on_regression: bool,

        /// Output format: text, json, markdown
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Show the weak spots logged in the learner's store
    WeakSpots {
        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Clear saved answers and weak spots
    Reset {
        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Also forget the learner's name
        #[arg(long)]
        all: bool,
    },

    /// Create a starter config and example question set
    Init,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("mathventure=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Play {
            config,
            start,
            question_set,
            instant,
        } => commands::play::execute(config, start, question_set, instant).await,
        Commands::Grade {
            answers,
            question_set,
            learner,
            output,
            format,
        } => commands::grade::execute(answers, question_set, learner, output, format),
        Commands::Validate { question_set } => commands::validate::execute(question_set),
        Commands::Compare {
            baseline,
            current,
            fail_on_regression,
            format,
        } => commands::compare::execute(baseline, current, fail_on_regression, format),
        Commands::WeakSpots { config, json } => commands::weak_spots::execute(config, json),
        Commands::Reset { config, all } => commands::reset::execute(config, all),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
