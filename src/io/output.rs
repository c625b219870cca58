//! Report rendering: JSON for machines, colored terminal text for humans.

use crate::report::{AnalysisReport, RefactorReport};
use colored::*;
use std::io::Write;

pub trait OutputWriter {
    fn write_analysis(&mut self, report: &AnalysisReport) -> anyhow::Result<()>;
    fn write_refactor(&mut self, report: &RefactorReport) -> anyhow::Result<()>;
}

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_analysis(&mut self, report: &AnalysisReport) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        writeln!(self.writer, "{json}")?;
        Ok(())
    }

    fn write_refactor(&mut self, report: &RefactorReport) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        writeln!(self.writer, "{json}")?;
        Ok(())
    }
}

pub struct TerminalWriter;

impl Default for TerminalWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalWriter {
    pub fn new() -> Self {
        Self
    }
}

impl OutputWriter for TerminalWriter {
    fn write_analysis(&mut self, report: &AnalysisReport) -> anyhow::Result<()> {
        println!("{}", "Code Analysis Report".bold().cyan());
        println!("───────────────────────────────────────────");
        println!("{}", report.summary());
        println!("Total lines: {}", report.total_lines);
        println!();

        println!("{}", "Complexity".bold());
        println!(
            "  Average: {}  (functions analyzed: {})",
            report.complexity.average_complexity, report.complexity.total_functions_analyzed
        );
        let high = report.complexity.high_complexity_functions;
        if high > 0 {
            println!("  High-complexity functions: {}", high.to_string().red());
        } else {
            println!("  High-complexity functions: {}", "0".green());
        }
        println!();

        println!("{}", "Documentation".bold());
        println!(
            "  Functions: {}  Classes: {}  Modules: {}",
            report.documentation.functions_with_docstrings,
            report.documentation.classes_with_docstrings,
            report.documentation.modules_with_docstrings
        );
        println!();

        if !report.issues.is_empty() {
            println!("{}", "Issues".bold().yellow());
            for issue in &report.issues {
                println!("  - {issue}");
            }
            println!();
        }

        println!("{}", "Recommendations".bold());
        for rec in &report.recommendations {
            println!("  * {rec}");
        }
        Ok(())
    }

    fn write_refactor(&mut self, report: &RefactorReport) -> anyhow::Result<()> {
        println!("{}", "Refactor Report".bold().cyan());
        println!("───────────────────────────────────────────");
        println!("{}", report.summary());
        if report.backup_created {
            println!("{}", "Backup created before rewriting".green());
        }
        println!();

        if !report.files_modified.is_empty() {
            println!("{}", "Files modified".bold());
            for file in &report.files_modified {
                println!("  - {file}");
            }
            println!();
        }

        if report.changes_applied.is_empty() {
            println!("No changes were necessary.");
        } else {
            println!("{}", "Changes".bold());
            for change in &report.changes_applied {
                println!("  * {change}");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::QualityThresholds;

    #[test]
    fn json_writer_emits_valid_documents() {
        let analysis = AnalysisReport::from_files(&[], &QualityThresholds::default());
        let mut buf = Vec::new();
        JsonWriter::new(&mut buf).write_analysis(&analysis).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["total_files"], 0);

        let refactor = RefactorReport {
            files_considered: 2,
            files_modified: vec!["a.py".into()],
            changes_applied: vec!["a.py: Added docstring to function 'f'".into()],
            backup_created: true,
        };
        let mut buf = Vec::new();
        JsonWriter::new(&mut buf).write_refactor(&refactor).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["backup_created"], true);
        assert_eq!(value["files_modified"][0], "a.py");
    }
}
