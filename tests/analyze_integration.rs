//! End-to-end analysis over real files on disk.

use indoc::indoc;
use pytidy::pipeline;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn mixed_project_with_one_broken_file() {
    let dir = TempDir::new().unwrap();
    let utils = write(
        &dir,
        "utils.py",
        indoc! {r#"
            """Utility helpers."""


            def parse(value):
                """Parse a raw value."""
                if isinstance(value, str):
                    return value.strip()
                return value


            def dispatch(kind, a, b, c, d, e):
                if kind == "add":
                    return a + b
                elif kind == "sub":
                    return a - b
                elif kind == "mul":
                    return c * d
                elif kind == "div" and e:
                    return c / e
                return None
        "#},
    );
    let models = write(
        &dir,
        "models.py",
        indoc! {r#"
            """Models."""


            class Account:
                """A user account."""

                def balance(self):
                    """Current balance."""
                    return sum(t.amount for t in self.transactions)
        "#},
    );
    let broken = write(&dir, "broken.py", "def oops(:\n    pass\n");

    let report = pipeline::analyze(&[utils, models, broken]).unwrap();

    // all three files are counted even though one was skipped
    assert_eq!(report.total_files, 3);
    assert!(report
        .issues
        .iter()
        .any(|i| i.starts_with("Syntax error in broken.py:")));

    // metrics come only from the two parsable files
    assert_eq!(report.complexity.total_functions_analyzed, 3);
    assert!(report.complexity.average_complexity > 1.0);

    // dispatch: no docstring, 6 parameters
    assert!(report
        .issues
        .iter()
        .any(|i| i == "Public function 'dispatch' missing docstring"));
    assert!(report
        .issues
        .iter()
        .any(|i| i == "Function 'dispatch' has too many parameters (6)"));
}

#[test]
fn documentation_percentages_are_formatted() {
    let dir = TempDir::new().unwrap();
    let file = write(
        &dir,
        "half.py",
        indoc! {r#"
            """Module doc."""


            def documented():
                """Has one."""
                return 1


            def _bare():
                return 2
        "#},
    );

    let report = pipeline::analyze(&[file]).unwrap();
    assert_eq!(report.documentation.functions_with_docstrings, "50.0%");
    assert_eq!(report.documentation.modules_with_docstrings, "100.0%");
    assert_eq!(
        report.summary(),
        format!(
            "Analyzed 1 Python files with {} issues found",
            report.total_issues
        )
    );
}

#[test]
fn high_complexity_function_is_reported_and_recommended() {
    let dir = TempDir::new().unwrap();
    let mut body = String::from("def rate(n):\n    \"\"\"Rate n.\"\"\"\n    score = 0\n");
    for i in 0..12 {
        body.push_str(&format!("    if n > {i}:\n        score += 1\n"));
    }
    body.push_str("    return score\n");
    let file = write(&dir, "rate.py", &body);

    let report = pipeline::analyze(&[file]).unwrap();
    assert_eq!(report.complexity.high_complexity_functions, 1);
    assert_eq!(report.complexity.complexity_scores, vec![13]);
    assert!(report
        .issues
        .iter()
        .any(|i| i == "Function 'rate' has high complexity (13)"));
    assert!(report
        .recommendations
        .iter()
        .any(|r| r == "Refactor 1 high-complexity functions (complexity > 10)"));
}

#[test]
fn line_level_issues_surface_in_report() {
    let dir = TempDir::new().unwrap();
    let long = "#".repeat(95);
    let source = format!("\"\"\"Doc.\"\"\"\n{long}\nx = 1 \n\n\n\n\ny = 2\n");
    let file = write(&dir, "style.py", &source);

    let report = pipeline::analyze(&[file]).unwrap();
    assert!(report
        .issues
        .iter()
        .any(|i| i.starts_with("Line 2 exceeds 88 characters")));
    assert!(report
        .issues
        .iter()
        .any(|i| i == "Line 3 has trailing whitespace"));
    assert!(report
        .issues
        .iter()
        .any(|i| i.starts_with("Multiple consecutive blank lines")));
}
