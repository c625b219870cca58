use crate::core::{Error, Result};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// Recursive discovery of Python source files under a root.
/// Respects .gitignore and returns paths in sorted order so runs
/// are deterministic.
pub struct FileWalker {
    root: PathBuf,
    ignore_patterns: Vec<String>,
}

impl FileWalker {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            ignore_patterns: vec![],
        }
    }

    pub fn with_ignore_patterns(mut self, patterns: Vec<String>) -> Self {
        self.ignore_patterns = patterns;
        self
    }

    pub fn walk(&self) -> Result<Vec<PathBuf>> {
        if self.root.is_file() {
            return Ok(vec![self.root.clone()]);
        }
        if !self.root.exists() {
            return Err(Error::InvalidInput(format!(
                "path does not exist: {}",
                self.root.display()
            )));
        }

        let mut files = Vec::new();
        let walker = WalkBuilder::new(&self.root)
            .hidden(false)
            .git_ignore(true)
            .build();

        for entry in walker {
            let entry = entry
                .map_err(|e| Error::InvalidInput(format!("walk failed: {e}")))?;
            let path = entry.path();
            if path.is_file() && self.should_process(path) {
                files.push(path.to_path_buf());
            }
        }

        files.sort();
        Ok(files)
    }

    fn should_process(&self, path: &Path) -> bool {
        if path.extension().map_or(true, |ext| ext != "py") {
            return false;
        }
        let path_str = path.to_string_lossy();
        for pattern in &self.ignore_patterns {
            if glob::Pattern::new(pattern)
                .map(|p| p.matches(&path_str))
                .unwrap_or(false)
            {
                return false;
            }
        }
        true
    }
}

pub fn find_python_files(root: &Path, ignore_patterns: Vec<String>) -> Result<Vec<PathBuf>> {
    FileWalker::new(root.to_path_buf())
        .with_ignore_patterns(ignore_patterns)
        .walk()
}
