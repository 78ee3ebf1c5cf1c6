//! CLI argument parsing for speedy-tui.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "speedy-tui")]
#[command(about = "Keyboard-driven search overlay for files, folders and applications", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable debug logging (logs to $TMPDIR/speedy-tui.log)
    #[arg(short, long)]
    pub debug: bool,

    /// Config file (default: ~/.config/speedy/config.json)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory to index instead of the configured roots (repeatable)
    #[arg(short, long = "root", value_name = "PATH")]
    pub roots: Vec<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interactive overlay (default)
    Tui,

    /// Show index stats
    Index,

    /// One-shot search query (for testing)
    Query {
        /// Search query
        query: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_tui() {
        let cli = Cli::try_parse_from(["speedy-tui"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.debug);
        assert!(cli.roots.is_empty());
    }

    #[test]
    fn test_query_with_roots() {
        let cli = Cli::try_parse_from([
            "speedy-tui",
            "--root",
            "/srv",
            "-r",
            "~/work",
            "query",
            "report",
        ])
        .unwrap();

        assert_eq!(cli.roots, vec!["/srv".to_string(), "~/work".to_string()]);
        assert!(matches!(cli.command, Some(Commands::Query { ref query }) if query == "report"));
    }

    #[test]
    fn test_verify_command() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
