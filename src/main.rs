use anyhow::Result;
use clap::Parser;
use pytidy::cli::{Cli, Commands};
use pytidy::commands;

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            path,
            format,
            output,
            ignore,
        } => commands::run_analyze(path, format, output, ignore),
        Commands::Refactor {
            path,
            backup,
            format,
            output,
            ignore,
        } => commands::run_refactor(path, backup, format, output, ignore),
    }
}
