use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Machine-readable JSON document
    Json,
    /// Colored human-readable summary (default)
    Terminal,
}

#[derive(Parser, Debug)]
#[command(name = "pytidy")]
#[command(about = "Python code quality analyzer and conservative refactorer", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze Python files for complexity, documentation and style issues
    Analyze {
        /// File or directory to analyze
        path: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Glob patterns for paths to skip
        #[arg(long = "ignore", value_delimiter = ',')]
        ignore: Option<Vec<String>>,
    },

    /// Rewrite Python files in place with conservative syntax-tree transforms
    Refactor {
        /// File or directory to refactor
        path: PathBuf,

        /// Copy the target to a timestamped sibling before rewriting
        #[arg(long)]
        backup: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Glob patterns for paths to skip
        #[arg(long = "ignore", value_delimiter = ',')]
        ignore: Option<Vec<String>>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn refactor_accepts_backup_flag() {
        let cli = Cli::try_parse_from(["pytidy", "refactor", "src", "--backup"]).unwrap();
        match cli.command {
            Commands::Refactor { backup, path, .. } => {
                assert!(backup);
                assert_eq!(path, PathBuf::from("src"));
            }
            _ => panic!("expected refactor subcommand"),
        }
    }

    #[test]
    fn analyze_defaults_to_terminal_format() {
        let cli = Cli::try_parse_from(["pytidy", "analyze", "."]).unwrap();
        match cli.command {
            Commands::Analyze { format, .. } => {
                assert!(matches!(format, OutputFormat::Terminal));
            }
            _ => panic!("expected analyze subcommand"),
        }
    }
}
