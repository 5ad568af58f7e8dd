//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "majorbracket")]
#[command(about = "Guided major-choice tournament client", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Configuration file (defaults to .majorbracket/config.yaml)
    #[arg(short, long, global = true, env = "MAJORBRACKET_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the URL to open for logging in
    Login,

    /// Finish logging in with the code from the login redirect
    Callback {
        /// Authorization code
        #[arg(long)]
        code: String,

        /// State value returned alongside the code
        #[arg(long)]
        state: String,
    },

    /// Show the logged-in user
    Whoami,

    /// Forget stored credentials
    Logout,

    /// Create a session from a questionnaire answers file (YAML or JSON)
    Start {
        /// Answers file
        #[arg(short, long)]
        answers: PathBuf,
    },

    /// List your sessions
    Sessions,

    /// Show the rounds, the pending comparison and the report of a session
    Show {
        /// Session ID
        id: String,
    },

    /// Decide the pending comparison of a session
    Choose {
        /// Session ID
        id: String,

        /// ID of the major that wins the comparison
        major_id: String,
    },

    /// Decide comparisons interactively until the report is ready
    Play {
        /// Session ID
        id: String,
    },
}
