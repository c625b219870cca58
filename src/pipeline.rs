//! Orchestration over file lists: per-file analysis and in-place refactoring.
//!
//! A file that cannot be read or parsed never aborts the run; it is recorded
//! (as a skipped analysis, or as a skip line in the change log) and the run
//! continues with the remaining files.

use crate::analyzers::{complexity, parse_module, quality, LineIndex};
use crate::config;
use crate::core::{Error, FileAnalysis, IssueKind, QualityIssue, Result};
use crate::refactoring::refactor_source;
use crate::report::{AnalysisReport, RefactorReport};
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};

pub struct RefactorOptions {
    /// Paths in reports are shown relative to this directory when set
    pub root: Option<PathBuf>,
    /// Recorded in the report; backups are taken by the caller beforehand
    pub backup_created: bool,
}

/// Analyze every file in the list and aggregate the results.
/// An empty list is an input error rather than an empty report.
pub fn analyze(paths: &[PathBuf]) -> Result<AnalysisReport> {
    if paths.is_empty() {
        return Err(Error::InvalidInput(
            "no Python files found to analyze".to_string(),
        ));
    }
    let thresholds = &config::get().thresholds;
    let files: Vec<FileAnalysis> = paths.iter().map(|p| analyze_file(p)).collect();
    Ok(AnalysisReport::from_files(&files, thresholds))
}

fn analyze_file(path: &Path) -> FileAnalysis {
    let basename = file_name(path);
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            warn!("could not read {}: {e}", path.display());
            return FileAnalysis::skipped(
                path.to_path_buf(),
                0,
                QualityIssue::new(
                    IssueKind::SyntaxError,
                    None,
                    format!("Failed to analyze {basename}: {e}"),
                ),
            );
        }
    };

    let lines = source.lines().count();
    let module = match parse_module(&source, path) {
        Ok(module) => module,
        Err(Error::Parse { line, message, .. }) => {
            debug!("parse failed in {}: {message} (line {line})", path.display());
            return FileAnalysis::skipped(
                path.to_path_buf(),
                lines,
                QualityIssue::new(
                    IssueKind::SyntaxError,
                    Some(line),
                    format!("Syntax error in {basename}: {message} (line {line})"),
                ),
            );
        }
        Err(e) => {
            return FileAnalysis::skipped(
                path.to_path_buf(),
                lines,
                QualityIssue::new(
                    IssueKind::SyntaxError,
                    None,
                    format!("Failed to analyze {basename}: {e}"),
                ),
            );
        }
    };

    let thresholds = &config::get().thresholds;
    let index = LineIndex::new(&source);
    let metrics = complexity::analyze_module(&module, &index);

    let mut issues = quality::check_functions(&metrics.functions, thresholds);
    issues.extend(quality::check_lines(&source, thresholds));
    issues.sort_by_key(|i| i.line.unwrap_or(0));

    FileAnalysis {
        path: path.to_path_buf(),
        lines,
        documentation: metrics.documentation_stats(),
        functions: metrics.functions,
        classes: metrics.classes,
        issues,
    }
}

/// Refactor every file in the list, rewriting only the files whose rendered
/// output differs from what is on disk. Detection-only findings still appear
/// in the change log even when nothing is written.
pub fn refactor(paths: &[PathBuf], options: &RefactorOptions) -> Result<RefactorReport> {
    if paths.is_empty() {
        return Err(Error::InvalidInput(
            "no Python files found to refactor".to_string(),
        ));
    }

    let mut files_modified = Vec::new();
    let mut changes_applied = Vec::new();

    for path in paths {
        let label = display_path(path, options.root.as_deref());
        match refactor_file(path) {
            Ok(outcome) => {
                for change in &outcome.change_log {
                    changes_applied.push(format!("{label}: {change}"));
                }
                if outcome.changed {
                    debug!("rewrote {}", path.display());
                    files_modified.push(label);
                }
            }
            Err(Error::Parse { line, message, .. }) => {
                warn!("skipping {label}: syntax error at line {line}: {message}");
                changes_applied.push(format!("{label}: Skipped (syntax error)"));
            }
            Err(Error::Serialize { reason, .. }) => {
                warn!("skipping {label}: {reason}");
                changes_applied.push(format!(
                    "{label}: Skipped (serialization failed: {reason})"
                ));
            }
            Err(e) => {
                warn!("skipping {label}: {e}");
                changes_applied.push(format!("{label}: refactor skipped due to error: {e}"));
            }
        }
    }

    Ok(RefactorReport {
        files_considered: paths.len(),
        files_modified,
        changes_applied,
        backup_created: options.backup_created,
    })
}

fn refactor_file(path: &Path) -> Result<crate::refactoring::RefactorOutcome> {
    let source = fs::read_to_string(path).map_err(|e| Error::file_access(path, e))?;
    let outcome = refactor_source(&source, path)?;
    if outcome.changed {
        let mut rendered = outcome.rendered.clone();
        if !rendered.ends_with('\n') {
            rendered.push('\n');
        }
        fs::write(path, rendered).map_err(|e| Error::file_access(path, e))?;
    }
    Ok(outcome)
}

fn display_path(path: &Path, root: Option<&Path>) -> String {
    root.and_then(|r| pathdiff::diff_paths(path, r))
        .unwrap_or_else(|| path.to_path_buf())
        .display()
        .to_string()
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn empty_path_list_is_invalid_input() {
        assert!(matches!(analyze(&[]), Err(Error::InvalidInput(_))));
        let options = RefactorOptions {
            root: None,
            backup_created: false,
        };
        assert!(matches!(refactor(&[], &options), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn broken_file_is_counted_but_skipped() {
        let dir = TempDir::new().unwrap();
        let good = write(&dir, "good.py", "def f():\n    \"\"\"f.\"\"\"\n    return 1\n");
        let bad = write(&dir, "bad.py", "def broken(:\n");

        let report = analyze(&[good, bad]).unwrap();
        assert_eq!(report.total_files, 2);
        assert_eq!(report.complexity.total_functions_analyzed, 1);
        assert!(report
            .issues
            .iter()
            .any(|i| i.starts_with("Syntax error in bad.py:")));
    }

    #[test]
    fn refactor_rewrites_and_logs_changes() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "calc.py",
            indoc! {"
                def sign(x):
                    if x >= 0:
                        return 'non-negative'
                    else:
                        return 'negative'
            "},
        );
        let options = RefactorOptions {
            root: Some(dir.path().to_path_buf()),
            backup_created: false,
        };
        let report = refactor(&[path.clone()], &options).unwrap();

        assert_eq!(report.files_modified, vec!["calc.py"]);
        assert!(report
            .changes_applied
            .contains(&"calc.py: Added docstring to function 'sign'".to_string()));
        assert!(report
            .changes_applied
            .contains(&"calc.py: Simplified return logic in function 'sign'".to_string()));

        let rewritten = fs::read_to_string(&path).unwrap();
        assert!(rewritten.contains("return 'non-negative' if x >= 0 else 'negative'"));
        assert!(rewritten.ends_with('\n'));
    }

    #[test]
    fn second_refactor_pass_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "a.py", "def f(x):\n    return x\n");
        let options = RefactorOptions {
            root: Some(dir.path().to_path_buf()),
            backup_created: false,
        };

        refactor(&[path.clone()], &options).unwrap();
        let after_first = fs::read_to_string(&path).unwrap();
        let report = refactor(&[path.clone()], &options).unwrap();

        assert!(report.files_modified.is_empty());
        assert_eq!(fs::read_to_string(&path).unwrap(), after_first);
    }

    #[test]
    fn syntax_error_becomes_skip_line() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "bad.py", "def broken(:\n");
        let before = fs::read_to_string(&path).unwrap();
        let options = RefactorOptions {
            root: Some(dir.path().to_path_buf()),
            backup_created: false,
        };
        let report = refactor(&[path.clone()], &options).unwrap();

        assert!(report.files_modified.is_empty());
        assert_eq!(
            report.changes_applied,
            vec!["bad.py: Skipped (syntax error)".to_string()]
        );
        assert_eq!(fs::read_to_string(&path).unwrap(), before);
    }

    #[test]
    fn unsupported_construct_becomes_skip_line() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "m.py",
            indoc! {"
                def f(x):
                    \"\"\"f.\"\"\"
                    match x:
                        case _:
                            return 0
            "},
        );
        let options = RefactorOptions {
            root: Some(dir.path().to_path_buf()),
            backup_created: false,
        };
        let report = refactor(&[path], &options).unwrap();
        assert!(report.files_modified.is_empty());
        assert!(report.changes_applied[0].starts_with("m.py: Skipped (serialization failed:"));
    }

    #[test]
    fn detection_only_finding_reaches_change_log_without_write() {
        let dir = TempDir::new().unwrap();
        // already in serializer-normal form, so no pass rewrites it
        let source = concat!(
            "\"\"\"Module.\"\"\"\n",
            "class Cleaner:\n",
            "    \"\"\"Cleaner class.\"\"\"\n",
            "    def normalize(self, items):\n",
            "        \"\"\"normalize function.\n\nArgs: self, items.\"\"\"\n",
            "        out = []\n",
            "        for item in items:\n",
            "            if isinstance(item, str):\n",
            "                out.append(item.strip())\n",
            "            elif isinstance(item, int):\n",
            "                out.append(str(item))\n",
            "        return out\n",
        );
        let path = write(&dir, "clean.py", source);
        let options = RefactorOptions {
            root: Some(dir.path().to_path_buf()),
            backup_created: false,
        };

        let report = refactor(&[path.clone()], &options).unwrap();
        assert!(report
            .changes_applied
            .iter()
            .any(|c| c.contains("Detected simple string/int normalization pattern")));

        // repeatable: the finding surfaces again on an unchanged file
        let report = refactor(&[path], &options).unwrap();
        assert!(report.files_modified.is_empty());
        assert!(report
            .changes_applied
            .iter()
            .any(|c| c.contains("Detected simple string/int normalization pattern")));
    }
}
