//! CLI argument parsing for toolbelt

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "tb")]
#[command(author, version, about = "Sandboxed file, command and search tools for model-driven coding", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Sandbox root (overrides the config file)
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Enable verbose (debug) logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the enabled tools
    Tools,

    /// Print the enabled tool definitions as JSON
    Schema,

    /// Invoke one tool
    Call {
        /// Tool name (e.g. ReadFile, search_files)
        #[arg(required = true)]
        name: String,

        /// Tool input as a JSON object
        #[arg(short, long, conflicts_with = "input_file")]
        input: Option<String>,

        /// Read the JSON input from a file
        #[arg(short = 'f', long)]
        input_file: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_call() {
        let cli = Cli::parse_from(["tb", "--root", "/tmp/x", "call", "ReadFile", "--input", "{}"]);

        assert_eq!(cli.root, Some(PathBuf::from("/tmp/x")));
        match cli.command {
            Command::Call { name, input, input_file } => {
                assert_eq!(name, "ReadFile");
                assert_eq!(input.as_deref(), Some("{}"));
                assert!(input_file.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_input_sources_conflict() {
        let result = Cli::try_parse_from(["tb", "call", "ReadFile", "--input", "{}", "--input-file", "in.json"]);
        assert!(result.is_err());
    }
}
