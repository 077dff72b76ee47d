use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Dataforge - deterministic prompt engine for analytics requests
#[derive(Parser, Debug, Clone)]
#[command(name = "dataforge")]
#[command(version, long_about = None)]
#[command(about = "Turn short analytics requests into read-only SQL, transformation plans and data-quality rules")]
pub struct Args {
    /// Config file to use instead of ~/.config/dataforge/config.toml
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Generate shell completions
    #[arg(long, value_enum)]
    pub completions: Option<Shell>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Generate a read-only SQL query
    Sql {
        #[arg(required = true, num_args = 1..)]
        prompt: Vec<String>,
        /// Include the role prompt in the output
        #[arg(long)]
        system_prompt: bool,
    },
    /// Produce a transformation plan and code sketch
    Transform {
        #[arg(required = true, num_args = 1..)]
        prompt: Vec<String>,
    },
    /// Select data-quality rules
    Quality {
        #[arg(required = true, num_args = 1..)]
        prompt: Vec<String>,
    },
    /// Show the ranked intents for a prompt
    Classify {
        #[arg(required = true, num_args = 1..)]
        prompt: Vec<String>,
    },
    /// Show the entities extracted from a prompt
    Extract {
        #[arg(required = true, num_args = 1..)]
        prompt: Vec<String>,
    },
    /// Check that a SQL statement is read-only
    CheckSql {
        #[arg(value_name = "SQL")]
        sql: String,
    },
    /// Print the effective configuration as TOML
    Config,
}

impl Command {
    /// Prompt words joined back into one string
    pub fn prompt(&self) -> Option<String> {
        match self {
            Command::Sql { prompt, .. }
            | Command::Transform { prompt }
            | Command::Quality { prompt }
            | Command::Classify { prompt }
            | Command::Extract { prompt } => Some(prompt.join(" ")),
            Command::CheckSql { .. } | Command::Config => None,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Supported shells for completion generation
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}
