//! CLI command definitions for the `hotelqa` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod analytics;
pub mod ask;
pub mod index;
pub mod status;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Answer questions about hotel bookings.
#[derive(Parser)]
#[command(name = "hotelqa", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export tracing spans to stdout via OpenTelemetry.
    #[arg(long, global = true, env = "HOTELQA_OTEL")]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Embed the dataset and persist the vector index.
    #[command(name = "build-index")]
    BuildIndex,

    /// Answer a question from the booking data.
    Ask {
        /// The question to answer.
        question: String,

        /// Number of records to retrieve (defaults to `retrieval.ask_top_k`).
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
    },

    /// Show the records retrieved for a query.
    Retrieve {
        /// Free-text query.
        query: String,

        /// Number of records to retrieve (defaults to `retrieval.default_top_k`).
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
    },

    /// Manage precomputed analytics (import, set, list, query).
    Analytics {
        #[command(subcommand)]
        action: AnalyticsCommand,
    },

    /// Start the REST API server.
    Serve {
        /// Port to listen on (defaults to `server.port`).
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (defaults to `server.host`).
        #[arg(long)]
        host: Option<String>,
    },

    /// Show data directory, dataset, index, and analytics status.
    Status,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum AnalyticsCommand {
    /// Import values from a JSON object of `{key: value}`.
    Import {
        /// Path to the JSON file.
        file: PathBuf,
    },

    /// Store a single value.
    Set {
        /// Analytics key (e.g. total_revenue).
        key: String,
        /// Preformatted value.
        value: String,
    },

    /// List stored values.
    #[command(alias = "ls")]
    List,

    /// Answer a keyword question from stored values.
    Query {
        /// The question (e.g. "What is the total revenue?").
        question: String,
    },
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_ask_with_top_k() {
        let cli = Cli::try_parse_from(["hotelqa", "--json", "ask", "Most common room type?", "-k", "5"]).unwrap();
        assert!(cli.json);
        match cli.command {
            Commands::Ask { question, top_k } => {
                assert_eq!(question, "Most common room type?");
                assert_eq!(top_k, Some(5));
            }
            _ => panic!("expected ask"),
        }
    }

    #[test]
    fn test_parse_analytics_set() {
        let cli = Cli::try_parse_from(["hotelqa", "analytics", "set", "total_revenue", "$1,000.00"]).unwrap();
        match cli.command {
            Commands::Analytics {
                action: AnalyticsCommand::Set { key, value },
            } => {
                assert_eq!(key, "total_revenue");
                assert_eq!(value, "$1,000.00");
            }
            _ => panic!("expected analytics set"),
        }
    }

    #[test]
    fn test_parse_build_index_and_verbosity() {
        let cli = Cli::try_parse_from(["hotelqa", "-vv", "build-index"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::BuildIndex));
    }
}
