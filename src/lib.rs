// Export modules for library usage
pub mod analyzers;
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod io;
pub mod pipeline;
pub mod refactoring;
pub mod report;

// Re-export commonly used types
pub use crate::core::{
    ClassRecord, DocumentationStats, Error, FileAnalysis, FunctionRecord, IssueKind, QualityIssue,
    Result,
};
pub use crate::refactoring::{refactor_source, RefactorOutcome};
pub use crate::report::{AnalysisReport, RefactorReport};
