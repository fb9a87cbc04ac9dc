use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "oogiri",
    version,
    about = "Oogiri AI: humor prompts from today's news, and a judge for your answers"
)]
pub struct Cli {
    /// Path to the YAML config (defaults apply when the file is missing)
    #[arg(long, global = true, default_value = "oogiri.yaml", env = "OOGIRI_CONFIG")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Write a sample config file
    Init(InitArgs),
    /// Generate three prompts for a theme
    Generate(GenerateArgs),
    /// Score an answer to a prompt
    Evaluate(EvaluateArgs),
    /// Curate the exemplar database
    Exemplars(ExemplarsArgs),
    /// List configured themes
    Themes,
    Version,
}

#[derive(clap::Args, Debug, Clone)]
pub struct InitArgs {
    /// Overwrite an existing config
    #[arg(long)]
    pub force: bool,
}

#[derive(clap::Args, Debug, Clone)]
pub struct GenerateArgs {
    #[arg(long)]
    pub theme: String,

    /// Use these headlines instead of the news feed (repeatable)
    #[arg(long = "headline")]
    pub headlines: Vec<String>,

    /// Store the prompts as questions in the exemplar database
    #[arg(long)]
    pub save: bool,

    /// Print a JSON document instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(clap::Args, Debug, Clone)]
pub struct EvaluateArgs {
    /// Evaluate against a stored question
    #[arg(long, conflicts_with = "prompt", required_unless_present = "prompt")]
    pub question_id: Option<i64>,

    /// Prompt text, for questions not in the database
    #[arg(long)]
    pub prompt: Option<String>,

    /// Headlines the prompt was based on
    #[arg(long, requires = "prompt")]
    pub source: Option<String>,

    #[arg(long)]
    pub answer: String,

    /// Store the answer with its score under the question
    #[arg(long, requires = "question_id")]
    pub save: bool,

    #[arg(long)]
    pub json: bool,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ExemplarsArgs {
    #[command(subcommand)]
    pub cmd: ExemplarsSub,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ExemplarsSub {
    /// Create the database tables
    Init,
    /// Add a hand-written question
    AddQuestion {
        #[arg(long)]
        theme: String,
        #[arg(long)]
        text: String,
        #[arg(long)]
        source: Option<String>,
        /// Flag as a prompt exemplar
        #[arg(long)]
        excellent: bool,
    },
    /// Add a scored answer to a stored question
    AddAnswer {
        #[arg(long)]
        question_id: i64,
        #[arg(long)]
        text: String,
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5), requires = "comment")]
        score: Option<u8>,
        #[arg(long)]
        comment: Option<String>,
        /// Flag as an evaluation exemplar
        #[arg(long)]
        excellent: bool,
    },
    /// Mark a question as a prompt exemplar
    FlagQuestion {
        id: i64,
        /// Remove the flag instead
        #[arg(long)]
        unset: bool,
    },
    /// Mark an answer as an evaluation exemplar
    FlagAnswer {
        id: i64,
        #[arg(long)]
        unset: bool,
    },
}
