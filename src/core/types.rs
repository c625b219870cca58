//! Common type definitions used across the codebase

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Per-function metadata produced by the complexity walk.
///
/// Records are created once per function-like node (sync and async defs,
/// methods and nested functions included) and are read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionRecord {
    pub name: String,
    pub line: usize,
    pub end_line: usize,
    pub has_docstring: bool,
    pub parameter_count: usize,
    /// Cyclomatic complexity, always >= 1
    pub complexity: u32,
}

impl FunctionRecord {
    /// Number of lines the function spans, inclusive
    pub fn span(&self) -> usize {
        self.end_line.saturating_sub(self.line) + 1
    }
}

/// Per-class metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassRecord {
    pub name: String,
    pub line: usize,
    pub has_docstring: bool,
    pub method_count: usize,
}

/// Documentation coverage counters, aggregated additively across files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentationStats {
    pub functions_with_docstrings: usize,
    pub functions_without_docstrings: usize,
    pub classes_with_docstrings: usize,
    pub classes_without_docstrings: usize,
    pub modules_with_docstrings: usize,
    pub modules_without_docstrings: usize,
}

impl DocumentationStats {
    pub fn merge(&mut self, other: &DocumentationStats) {
        self.functions_with_docstrings += other.functions_with_docstrings;
        self.functions_without_docstrings += other.functions_without_docstrings;
        self.classes_with_docstrings += other.classes_with_docstrings;
        self.classes_without_docstrings += other.classes_without_docstrings;
        self.modules_with_docstrings += other.modules_with_docstrings;
        self.modules_without_docstrings += other.modules_without_docstrings;
    }

    pub fn function_coverage(&self) -> f64 {
        coverage_percent(
            self.functions_with_docstrings,
            self.functions_without_docstrings,
        )
    }

    pub fn class_coverage(&self) -> f64 {
        coverage_percent(self.classes_with_docstrings, self.classes_without_docstrings)
    }

    pub fn module_coverage(&self) -> f64 {
        coverage_percent(self.modules_with_docstrings, self.modules_without_docstrings)
    }
}

/// with / (with + without) as a percentage, 0 when the denominator is 0
fn coverage_percent(with: usize, without: usize) -> f64 {
    let total = with + without;
    if total == 0 {
        0.0
    } else {
        with as f64 / total as f64 * 100.0
    }
}

/// Kinds of advisory quality issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    LongFunction,
    HighComplexity,
    TooManyParams,
    MissingDocstring,
    BadNaming,
    LongLine,
    TrailingWhitespace,
    BlankLineRun,
    SyntaxError,
}

/// One advisory issue; never fatal, accumulated per file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityIssue {
    pub kind: IssueKind,
    pub line: Option<usize>,
    pub message: String,
}

impl QualityIssue {
    pub fn new(kind: IssueKind, line: Option<usize>, message: impl Into<String>) -> Self {
        Self {
            kind,
            line,
            message: message.into(),
        }
    }
}

impl fmt::Display for QualityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Everything the analysis passes produce for one file.
///
/// Owned by the iteration that created it; cross-file state is limited to
/// additive aggregation in the reporter.
#[derive(Debug, Clone, Serialize)]
pub struct FileAnalysis {
    pub path: PathBuf,
    pub lines: usize,
    pub functions: Vec<FunctionRecord>,
    pub classes: Vec<ClassRecord>,
    pub issues: Vec<QualityIssue>,
    pub documentation: DocumentationStats,
}

impl FileAnalysis {
    /// Analysis for a file that could not be parsed or read: line count if
    /// known, a single issue carrying the skip reason, empty metrics.
    pub fn skipped(path: PathBuf, lines: usize, issue: QualityIssue) -> Self {
        Self {
            path,
            lines,
            functions: Vec::new(),
            classes: Vec::new(),
            issues: vec![issue],
            documentation: DocumentationStats::default(),
        }
    }

    pub fn complexity_scores(&self) -> impl Iterator<Item = u32> + '_ {
        self.functions.iter().map(|f| f.complexity)
    }
}
