//! Style and structure rules producing advisory quality issues

use crate::config::QualityThresholds;
use crate::core::{FunctionRecord, IssueKind, QualityIssue};
use once_cell::sync::Lazy;
use regex::Regex;

static SNAKE_CASE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z_][a-z0-9_]*$").unwrap());

/// Threshold checks over the records the complexity walk produced
pub fn check_functions(
    functions: &[FunctionRecord],
    thresholds: &QualityThresholds,
) -> Vec<QualityIssue> {
    let mut issues = Vec::new();
    for func in functions {
        let span = func.span();
        if span > thresholds.max_function_length {
            issues.push(QualityIssue::new(
                IssueKind::LongFunction,
                Some(func.line),
                format!("Function '{}' is too long ({} lines)", func.name, span),
            ));
        }
        if func.complexity > thresholds.max_complexity {
            issues.push(QualityIssue::new(
                IssueKind::HighComplexity,
                Some(func.line),
                format!(
                    "Function '{}' has high complexity ({})",
                    func.name, func.complexity
                ),
            ));
        }
        if func.parameter_count > thresholds.max_parameters {
            issues.push(QualityIssue::new(
                IssueKind::TooManyParams,
                Some(func.line),
                format!(
                    "Function '{}' has too many parameters ({})",
                    func.name, func.parameter_count
                ),
            ));
        }
        if !func.has_docstring && !func.name.starts_with('_') {
            issues.push(QualityIssue::new(
                IssueKind::MissingDocstring,
                Some(func.line),
                format!("Public function '{}' missing docstring", func.name),
            ));
        }
        if !SNAKE_CASE.is_match(&func.name) && !func.name.starts_with("__") {
            issues.push(QualityIssue::new(
                IssueKind::BadNaming,
                Some(func.line),
                format!("Function '{}' should use snake_case naming", func.name),
            ));
        }
    }
    issues
}

/// Raw-text checks: line length, trailing whitespace, blank-line runs
pub fn check_lines(source: &str, thresholds: &QualityThresholds) -> Vec<QualityIssue> {
    let mut issues = Vec::new();
    let mut blank_run_start: Option<usize> = None;
    let mut blank_run_len = 0usize;

    for (i, line) in source.lines().enumerate() {
        let lineno = i + 1;
        let width = line.chars().count();
        if width > thresholds.max_line_length {
            issues.push(QualityIssue::new(
                IssueKind::LongLine,
                Some(lineno),
                format!(
                    "Line {} exceeds {} characters ({} chars)",
                    lineno, thresholds.max_line_length, width
                ),
            ));
        }
        if line.ends_with(' ') || line.ends_with('\t') {
            issues.push(QualityIssue::new(
                IssueKind::TrailingWhitespace,
                Some(lineno),
                format!("Line {lineno} has trailing whitespace"),
            ));
        }
        if line.trim().is_empty() {
            if blank_run_start.is_none() {
                blank_run_start = Some(lineno);
            }
            blank_run_len += 1;
        } else {
            flush_blank_run(&mut issues, &mut blank_run_start, &mut blank_run_len);
        }
    }
    flush_blank_run(&mut issues, &mut blank_run_start, &mut blank_run_len);

    issues
}

/// One issue per maximal run of three or more blank lines
fn flush_blank_run(
    issues: &mut Vec<QualityIssue>,
    start: &mut Option<usize>,
    len: &mut usize,
) {
    if let Some(first) = start.take() {
        if *len >= 3 {
            let around = first + 2;
            issues.push(QualityIssue::new(
                IssueKind::BlankLineRun,
                Some(around),
                format!("Multiple consecutive blank lines around line {around}"),
            ));
        }
    }
    *len = 0;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, complexity: u32, params: usize, span: usize) -> FunctionRecord {
        FunctionRecord {
            name: name.to_string(),
            line: 1,
            end_line: span,
            has_docstring: false,
            parameter_count: params,
            complexity,
        }
    }

    #[test]
    fn too_many_params_and_missing_docstring_are_independent() {
        let issues = check_functions(
            &[record("handler", 1, 6, 2)],
            &QualityThresholds::default(),
        );
        assert!(issues.iter().any(|i| i.kind == IssueKind::TooManyParams));
        assert!(issues.iter().any(|i| i.kind == IssueKind::MissingDocstring));
    }

    #[test]
    fn private_functions_skip_docstring_check() {
        let issues = check_functions(
            &[record("_helper", 1, 0, 2)],
            &QualityThresholds::default(),
        );
        assert!(!issues.iter().any(|i| i.kind == IssueKind::MissingDocstring));
    }

    #[test]
    fn camel_case_flagged_but_dunder_exempt() {
        let camel = check_functions(
            &[record("doThing", 1, 0, 2)],
            &QualityThresholds::default(),
        );
        assert!(camel.iter().any(|i| i.kind == IssueKind::BadNaming));

        let dunder = check_functions(
            &[record("__init__", 1, 0, 2)],
            &QualityThresholds::default(),
        );
        assert!(!dunder.iter().any(|i| i.kind == IssueKind::BadNaming));
    }

    #[test]
    fn high_complexity_flagged_above_threshold() {
        let issues = check_functions(&[record("f", 11, 0, 2)], &QualityThresholds::default());
        assert!(issues.iter().any(|i| i.kind == IssueKind::HighComplexity));
        let issues = check_functions(&[record("f", 10, 0, 2)], &QualityThresholds::default());
        assert!(!issues.iter().any(|i| i.kind == IssueKind::HighComplexity));
    }

    #[test]
    fn long_lines_and_trailing_whitespace() {
        let long = "x".repeat(90);
        let source = format!("{long}\nok = 1 \n");
        let issues = check_lines(&source, &QualityThresholds::default());
        assert!(issues.iter().any(|i| i.kind == IssueKind::LongLine));
        assert!(issues
            .iter()
            .any(|i| i.kind == IssueKind::TrailingWhitespace && i.line == Some(2)));
    }

    #[test]
    fn blank_line_run_reported_once_per_window() {
        let source = "a = 1\n\n\n\n\nb = 2\n\n\nc = 3\n";
        let issues = check_lines(&source, &QualityThresholds::default());
        let runs: Vec<_> = issues
            .iter()
            .filter(|i| i.kind == IssueKind::BlankLineRun)
            .collect();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].line, Some(4));
    }
}
