pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::matcher::MatchMode;

#[derive(Parser, Debug)]
#[command(name = "larder")]
#[command(about = "Larder - recipe text parsing, tagging and search", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum ModeArg {
    #[default]
    Lexical,
    Semantic,
}

impl From<ModeArg> for MatchMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Lexical => MatchMode::Lexical,
            ModeArg::Semantic => MatchMode::Semantic,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse an ingredient block into structured lines
    Parse {
        /// File to read (stdin when omitted)
        input: Option<PathBuf>,
    },

    /// Decode a stored ingredients field into display lines
    Decode {
        /// Raw field value, JSON or plain text
        field: String,
    },

    /// Print the tag cloud of a recipes file
    Tags {
        /// JSON array of recipes
        recipes: PathBuf,
    },

    /// Search a recipes file
    Search {
        /// Search query
        query: String,

        /// JSON array of recipes
        #[arg(short, long)]
        recipes: PathBuf,

        /// Matching mode
        #[arg(short, long, value_enum, default_value_t = ModeArg::Lexical)]
        mode: ModeArg,

        /// Minimum semantic score to report
        #[arg(long)]
        min_score: Option<f32>,

        /// Maximum comparisons in flight
        #[arg(short, long)]
        concurrency: Option<usize>,
    },

    /// Compare one query with one piece of text
    Match {
        query: String,
        target: String,

        #[arg(short, long, value_enum, default_value_t = ModeArg::Lexical)]
        mode: ModeArg,
    },

    /// Show the tag vocabulary
    Vocab {
        /// Vocabulary file (defaults to TAGS_PATH)
        #[arg(short, long)]
        path: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_arguments() {
        let cli = Cli::try_parse_from([
            "larder",
            "search",
            "beans",
            "--recipes",
            "recipes.json",
            "--mode",
            "semantic",
            "--min-score",
            "0.4",
        ])
        .unwrap();

        match cli.command {
            Commands::Search {
                query,
                recipes,
                mode,
                min_score,
                ..
            } => {
                assert_eq!(query, "beans");
                assert_eq!(recipes, PathBuf::from("recipes.json"));
                assert_eq!(MatchMode::from(mode), MatchMode::Semantic);
                assert_eq!(min_score, Some(0.4));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_search_concurrency_only_from_flag() {
        let cli =
            Cli::try_parse_from(["larder", "search", "beans", "-r", "recipes.json"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Search {
                concurrency: None,
                ..
            }
        ));

        let cli = Cli::try_parse_from([
            "larder",
            "search",
            "beans",
            "-r",
            "recipes.json",
            "--concurrency",
            "3",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Search {
                concurrency: Some(3),
                ..
            }
        ));
    }

    #[test]
    fn test_parse_without_input_reads_stdin() {
        let cli = Cli::try_parse_from(["larder", "parse"]).unwrap();
        assert!(matches!(cli.command, Commands::Parse { input: None }));
    }
}
