use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "sentiscope")]
#[command(about = "Sentiment dashboard for recent posts matching a keyword", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML config file (defaults to ./sentiscope.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch and analyze posts for one keyword
    Search {
        keyword: String,

        #[command(flatten)]
        source: SourceArgs,

        /// Print the raw result as JSON instead of the dashboard
        #[arg(long)]
        json: bool,
    },

    /// Read keywords from stdin until `quit`, reusing results within the session
    Interactive {
        #[command(flatten)]
        source: SourceArgs,
    },
}

#[derive(Debug, Clone, Args)]
pub struct SourceArgs {
    /// Number of posts to request (clamped to 10..=100)
    #[arg(short, long, default_value_t = 10)]
    pub count: u32,

    /// Read posts from the sample data file instead of the live API
    #[arg(long)]
    pub sample: bool,
}
