//! Source parsing front-end shared by the analysis and refactoring passes

pub mod complexity;
pub mod quality;

use crate::core::{Error, Result};
use rustpython_parser::{ast, Mode};
use std::path::Path;

/// Parse Python source into a module AST.
///
/// Only true grammar violations fail; the error carries an approximate
/// line computed from the parser's byte offset.
pub fn parse_module(source: &str, path: &Path) -> Result<ast::Mod> {
    rustpython_parser::parse(source, Mode::Module, &path.to_string_lossy()).map_err(|e| {
        let index = LineIndex::new(source);
        Error::Parse {
            path: path.to_path_buf(),
            line: index.line_of(e.offset.to_usize()),
            message: e.error.to_string(),
        }
    })
}

/// Top-level statements of a parsed module
pub fn module_body(module: &ast::Mod) -> &[ast::Stmt] {
    match module {
        ast::Mod::Module(m) => &m.body,
        _ => &[],
    }
}

/// Maps byte offsets to 1-based line numbers.
///
/// rustpython-parser attaches byte ranges to nodes and errors; reports and
/// quality issues want line numbers.
pub struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        for (i, b) in source.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self { line_starts }
    }

    /// 1-based line containing the given byte offset
    pub fn line_of(&self, offset: usize) -> usize {
        self.line_starts.partition_point(|&start| start <= offset)
    }
}
