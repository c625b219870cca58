//! Directory-level aggregation: merges per-file analyses into totals,
//! percentages and threshold-based recommendations.

use crate::config::QualityThresholds;
use crate::core::{DocumentationStats, FileAnalysis};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ComplexitySummary {
    /// Mean of all function scores, rounded to 2 decimals; 0 when none
    pub average_complexity: f64,
    pub high_complexity_functions: usize,
    pub total_functions_analyzed: usize,
    pub complexity_scores: Vec<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentationSummary {
    /// Coverage percentages formatted to one decimal, e.g. "87.5%"
    pub functions_with_docstrings: String,
    pub classes_with_docstrings: String,
    pub modules_with_docstrings: String,
    pub stats: DocumentationStats,
}

/// Aggregate result of an analysis run; constructed once, never mutated
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub total_files: usize,
    pub total_lines: usize,
    pub total_issues: usize,
    pub issues: Vec<String>,
    pub complexity: ComplexitySummary,
    pub documentation: DocumentationSummary,
    pub recommendations: Vec<String>,
}

impl AnalysisReport {
    pub fn from_files(files: &[FileAnalysis], thresholds: &QualityThresholds) -> Self {
        let total_lines = files.iter().map(|f| f.lines).sum();
        let issues: Vec<String> = files
            .iter()
            .flat_map(|f| f.issues.iter().map(|i| i.message.clone()))
            .collect();

        let scores: Vec<u32> = files.iter().flat_map(|f| f.complexity_scores()).collect();
        let average = if scores.is_empty() {
            0.0
        } else {
            let mean = scores.iter().map(|&s| s as f64).sum::<f64>() / scores.len() as f64;
            (mean * 100.0).round() / 100.0
        };
        let high = scores
            .iter()
            .filter(|&&s| s > thresholds.max_complexity)
            .count();

        let mut stats = DocumentationStats::default();
        for file in files {
            stats.merge(&file.documentation);
        }

        let complexity = ComplexitySummary {
            average_complexity: average,
            high_complexity_functions: high,
            total_functions_analyzed: scores.len(),
            complexity_scores: scores,
        };
        let documentation = DocumentationSummary {
            functions_with_docstrings: format!("{:.1}%", stats.function_coverage()),
            classes_with_docstrings: format!("{:.1}%", stats.class_coverage()),
            modules_with_docstrings: format!("{:.1}%", stats.module_coverage()),
            stats,
        };
        let recommendations = recommend(&complexity, &stats, issues.len(), thresholds);

        Self {
            total_files: files.len(),
            total_lines,
            total_issues: issues.len(),
            issues,
            complexity,
            documentation,
            recommendations,
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "Analyzed {} Python files with {} issues found",
            self.total_files, self.total_issues
        )
    }
}

/// Each rule is evaluated independently; all applicable ones are included.
/// When none fire, a single default recommendation is emitted.
fn recommend(
    complexity: &ComplexitySummary,
    stats: &DocumentationStats,
    total_issues: usize,
    thresholds: &QualityThresholds,
) -> Vec<String> {
    let mut recommendations = Vec::new();

    if complexity.high_complexity_functions > 0 {
        recommendations.push(format!(
            "Refactor {} high-complexity functions (complexity > {})",
            complexity.high_complexity_functions, thresholds.max_complexity
        ));
    }
    if complexity.average_complexity > thresholds.average_complexity_limit {
        recommendations.push(format!(
            "Consider simplifying code structure (average complexity: {})",
            complexity.average_complexity
        ));
    }
    if stats.function_coverage() < thresholds.function_coverage_target {
        recommendations.push(format!(
            "Improve function documentation coverage ({:.1}% documented)",
            stats.function_coverage()
        ));
    }
    if stats.class_coverage() < thresholds.class_coverage_target {
        recommendations.push(format!(
            "Add docstrings to classes ({:.1}% documented)",
            stats.class_coverage()
        ));
    }
    if total_issues > 0 {
        recommendations.push(format!(
            "Address {total_issues} code quality issues identified"
        ));
    }

    if recommendations.is_empty() {
        recommendations
            .push("Code quality looks good! Consider adding more comprehensive tests.".to_string());
    }
    recommendations
}

/// Aggregate result of a refactor run
#[derive(Debug, Clone, Serialize)]
pub struct RefactorReport {
    pub files_considered: usize,
    /// Relative paths of files actually rewritten, in input order
    pub files_modified: Vec<String>,
    /// Change-log lines, formatted "<relative path>: <message>"
    pub changes_applied: Vec<String>,
    /// Supplied by the caller; this crate does not create backups itself
    pub backup_created: bool,
}

impl RefactorReport {
    pub fn summary(&self) -> String {
        format!(
            "Refactored {} Python files using syntax-tree transforms (out of {} files).",
            self.files_modified.len(),
            self.files_considered
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{FunctionRecord, QualityIssue};
    use std::path::PathBuf;

    fn file_with(functions: Vec<FunctionRecord>, issues: Vec<QualityIssue>) -> FileAnalysis {
        let documented = functions.iter().filter(|f| f.has_docstring).count();
        let documentation = DocumentationStats {
            functions_with_docstrings: documented,
            functions_without_docstrings: functions.len() - documented,
            modules_without_docstrings: 1,
            ..Default::default()
        };
        FileAnalysis {
            path: PathBuf::from("x.py"),
            lines: 10,
            functions,
            classes: Vec::new(),
            issues,
            documentation,
        }
    }

    fn func(complexity: u32, has_docstring: bool) -> FunctionRecord {
        FunctionRecord {
            name: "f".into(),
            line: 1,
            end_line: 2,
            has_docstring,
            parameter_count: 0,
            complexity,
        }
    }

    #[test]
    fn empty_input_yields_zeroed_report() {
        let report = AnalysisReport::from_files(&[], &QualityThresholds::default());
        assert_eq!(report.total_files, 0);
        assert_eq!(report.complexity.average_complexity, 0.0);
        assert_eq!(report.documentation.functions_with_docstrings, "0.0%");
    }

    #[test]
    fn average_is_rounded_to_two_decimals() {
        let files = vec![file_with(
            vec![func(1, true), func(2, true), func(2, true)],
            vec![],
        )];
        let report = AnalysisReport::from_files(&files, &QualityThresholds::default());
        assert_eq!(report.complexity.average_complexity, 1.67);
    }

    #[test]
    fn high_complexity_triggers_recommendation() {
        let files = vec![file_with(vec![func(12, true)], vec![])];
        let report = AnalysisReport::from_files(&files, &QualityThresholds::default());
        assert_eq!(report.complexity.high_complexity_functions, 1);
        assert!(report
            .recommendations
            .iter()
            .any(|r| r.starts_with("Refactor 1 high-complexity")));
    }

    #[test]
    fn clean_input_gets_default_recommendation() {
        // class coverage of a class-less project is 0%, which would fire the
        // class-docstring rule, so the clean fixture needs a documented class
        let mut file = file_with(vec![func(1, true)], vec![]);
        file.classes = vec![crate::core::ClassRecord {
            name: "C".into(),
            line: 1,
            has_docstring: true,
            method_count: 0,
        }];
        file.documentation.classes_with_docstrings = 1;
        let report = AnalysisReport::from_files(&[file], &QualityThresholds::default());
        assert_eq!(
            report.recommendations,
            vec!["Code quality looks good! Consider adding more comprehensive tests.".to_string()]
        );
    }

    #[test]
    fn issue_messages_are_flattened_in_order() {
        use crate::core::IssueKind;
        let files = vec![file_with(
            vec![func(1, true)],
            vec![
                QualityIssue::new(IssueKind::LongLine, Some(1), "first"),
                QualityIssue::new(IssueKind::TrailingWhitespace, Some(2), "second"),
            ],
        )];
        let report = AnalysisReport::from_files(&files, &QualityThresholds::default());
        assert_eq!(report.issues, vec!["first", "second"]);
        assert_eq!(report.total_issues, 2);
    }
}
