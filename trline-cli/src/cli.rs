use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use trline_core::SpanPolicy;

#[derive(Parser, Debug)]
#[clap(author, version, about = "TR milestone timeline dashboard")]
pub struct Cli {
    /// Data file (CSV, JSON or YAML); the built-in sample is used when unusable
    #[clap(long, global = true)]
    pub data: Option<PathBuf>,

    /// Path to the config file (defaults to TRLINE_CONFIG or the user config dir)
    #[clap(long, global = true)]
    pub config: Option<PathBuf>,

    /// Handling of spans that end before they start (clamp, swap, keep);
    /// overrides the config file
    #[clap(long, global = true, value_parser = parse_span_policy)]
    pub span_policy: Option<SpanPolicy>,

    /// More log output (-v info, -vv debug)
    #[clap(long, short = 'v', action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the path to the config file
    Path,

    /// Print the effective configuration
    Show,

    /// Write a config file with default values
    Init {
        /// Overwrite an existing file
        #[clap(long)]
        force: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Draw the timeline chart
    Show {
        /// Only show these projects (repeatable); all projects when omitted
        #[clap(long = "project", short = 'p')]
        projects: Vec<String>,

        /// Start of the visible window
        #[clap(long)]
        from: Option<String>,

        /// End of the visible window
        #[clap(long)]
        to: Option<String>,

        /// Chart width in columns, excluding the name column
        #[clap(long, short = 'w', default_value_t = 100)]
        width: usize,

        /// Pick projects interactively
        #[clap(long, short = 'i')]
        interactive: bool,
    },

    /// List projects with their spans and total delay
    Projects,

    /// List every delayed milestone, largest delay first
    Delays,

    /// Print the monthly axis ticks
    Ticks,

    /// Export the derived timelines
    Export {
        /// Output format (json, yaml, markdown)
        #[clap(long, short = 'f', default_value = "json")]
        format: String,

        /// Output file path; prints to stdout when omitted
        #[clap(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Write an empty CSV data file with the expected headers
    Template {
        /// Output file path
        #[clap(long, short = 'o', default_value = "timeline.csv")]
        output: PathBuf,
    },

    /// Configuration commands
    #[clap(subcommand)]
    Config(ConfigCommand),
}

fn parse_span_policy(s: &str) -> Result<SpanPolicy, String> {
    SpanPolicy::from_str(s)
        .ok_or_else(|| format!("unknown span policy '{}' (use clamp, swap or keep)", s))
}
