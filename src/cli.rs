use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "challengeme")]
#[command(about = "Track personal coding challenges and pick one at random")]
pub struct Cli {
    /// Challenge database file (defaults to the platform data directory)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Directory of bundled challenge packs used to seed a new database
    #[arg(long = "defaults", global = true)]
    pub defaults_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Commands {
    /// List the saved programming languages
    GetLanguages,
    /// Save a programming language to pick challenges for
    AddLanguage {
        /// Name of the language, e.g. "rust"
        language: String,
    },
    /// List every challenge
    GetChallenges,
    /// Add a challenge of your own
    AddChallenge,
    /// Delete one of your own challenges
    DeleteChallenge,
    /// Pick a random unstarted challenge and a language to do it in
    PickChallenge,
    /// List challenges that are started but not finished
    ActiveChallenges,
    /// List finished challenges
    CompletedChallenges,
    /// Mark an active challenge as finished
    SetFinished,
}
