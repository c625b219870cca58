//! Tree-to-tree Python refactoring: parse, lower, rewrite, reprint.

pub mod lower;
pub mod serialize;
pub mod transform;
pub mod tree;

use crate::analyzers::parse_module;
use crate::core::{Error, Result};
use std::path::Path;

use transform::RefactorTransformer;

/// Result of refactoring a single source file in memory
#[derive(Debug, Clone)]
pub struct RefactorOutcome {
    /// True when the rendered output differs from the input source
    pub changed: bool,
    /// Full rewritten source, without a trailing newline
    pub rendered: String,
    pub change_log: Vec<String>,
}

/// Parses, rewrites and reprints one file's source. Fails with
/// [`Error::Parse`] on invalid syntax and [`Error::Serialize`] when the file
/// uses a construct the printer does not support; callers skip such files.
pub fn refactor_source(source: &str, path: &Path) -> Result<RefactorOutcome> {
    let parsed = parse_module(source, path)?;
    let lowered = lower::lower_module(&parsed).map_err(|reason| Error::Serialize {
        path: path.to_path_buf(),
        reason,
    })?;

    let mut transformer = RefactorTransformer::new();
    let rewritten = transformer.transform_module(lowered);
    let rendered = serialize::to_source(&rewritten);

    let changed = rendered.trim() != source.trim();
    Ok(RefactorOutcome {
        changed,
        rendered,
        change_log: transformer.into_change_log(),
    })
}
