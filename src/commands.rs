//! Subcommand entry points wiring walker, pipeline and writers together.

use crate::cli::OutputFormat;
use crate::io::{self, JsonWriter, OutputWriter, TerminalWriter};
use crate::pipeline::{self, RefactorOptions};
use anyhow::{Context, Result};
use log::warn;
use std::fs::File;
use std::path::PathBuf;

pub fn run_analyze(
    path: PathBuf,
    format: OutputFormat,
    output: Option<PathBuf>,
    ignore: Option<Vec<String>>,
) -> Result<()> {
    let files = io::find_python_files(&path, ignore.unwrap_or_default())?;
    let report = pipeline::analyze(&files)?;

    match format {
        OutputFormat::Json => match output {
            Some(out) => {
                let file = File::create(&out)
                    .with_context(|| format!("creating {}", out.display()))?;
                JsonWriter::new(file).write_analysis(&report)?;
            }
            None => JsonWriter::new(std::io::stdout().lock()).write_analysis(&report)?,
        },
        OutputFormat::Terminal => {
            if output.is_some() {
                warn!("--output is ignored for terminal format");
            }
            TerminalWriter::new().write_analysis(&report)?;
        }
    }
    Ok(())
}

pub fn run_refactor(
    path: PathBuf,
    backup: bool,
    format: OutputFormat,
    output: Option<PathBuf>,
    ignore: Option<Vec<String>>,
) -> Result<()> {
    if backup {
        io::create_backup(&path)?;
    }

    let files = io::find_python_files(&path, ignore.unwrap_or_default())?;
    let root = if path.is_dir() {
        Some(path.clone())
    } else {
        path.parent().map(|p| p.to_path_buf())
    };
    let options = RefactorOptions {
        root,
        backup_created: backup,
    };
    let report = pipeline::refactor(&files, &options)?;

    match format {
        OutputFormat::Json => match output {
            Some(out) => {
                let file = File::create(&out)
                    .with_context(|| format!("creating {}", out.display()))?;
                JsonWriter::new(file).write_refactor(&report)?;
            }
            None => JsonWriter::new(std::io::stdout().lock()).write_refactor(&report)?,
        },
        OutputFormat::Terminal => {
            if output.is_some() {
                warn!("--output is ignored for terminal format");
            }
            TerminalWriter::new().write_refactor(&report)?;
        }
    }
    Ok(())
}
