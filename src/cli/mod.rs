use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::graph::Depth;

#[derive(Debug, Parser)]
#[command(
    name = "social-extract",
    version,
    about = "Extract follower/following graphs",
    long_about = "Extract a bounded-radius follower/following graph starting from one or more seed accounts. Depth counts hops from the seeds; a .5 depth adds edges among the last hop's nodes without adding more nodes. Press Ctrl-C to stop early and keep what was collected so far."
)]
pub struct Cli {
    /// Only print errors and warnings
    #[arg(short, long, global = true, default_value_t = false)]
    pub quiet: bool,
    /// Print per-node progress
    #[arg(short, long, global = true, default_value_t = false, conflicts_with = "quiet")]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Get the follower/following graph around one or more seed accounts
    Graph {
        /// File to write `id<TAB>username` lines to
        username_file: PathBuf,
        /// File to write `follower<TAB>followee` lines to
        graph_file: PathBuf,
        /// Seed account IDs
        #[arg(required = true, num_args = 1..)]
        seeds: Vec<String>,
        /// Maximum number of hops from the seeds (multiple of 0.5) [default: 1]
        #[arg(long, value_parser = parse_depth)]
        depth: Option<Depth>,
        /// Maximum number of followers and of followees to traverse per user [default: 100]
        #[arg(long)]
        max_follow: Option<usize>,
        /// Users file of the offline dataset to crawl
        #[arg(long, env = "SOCIAL_EXTRACT_SOURCE_USERS")]
        source_users: Option<PathBuf>,
        /// Edges file of the offline dataset to crawl
        #[arg(long, env = "SOCIAL_EXTRACT_SOURCE_EDGES")]
        source_edges: Option<PathBuf>,
        /// Path to a TOML configuration file
        #[arg(long)]
        config: Option<PathBuf>,
        /// Also write the full result (including failures) as JSON
        #[arg(long)]
        json: Option<PathBuf>,
        /// Fetch each hop's frontier in parallel
        #[arg(long, default_value_t = false)]
        parallel: bool,
    },
    /// Get the ID for a username
    Id {
        username: String,
        /// Users file of the offline dataset
        #[arg(long, env = "SOCIAL_EXTRACT_SOURCE_USERS")]
        source_users: Option<PathBuf>,
        /// Edges file of the offline dataset
        #[arg(long, env = "SOCIAL_EXTRACT_SOURCE_EDGES")]
        source_edges: Option<PathBuf>,
        /// Path to a TOML configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn parse_depth(s: &str) -> Result<Depth, String> {
    s.parse::<Depth>().map_err(|e| e.to_string())
}

#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}
