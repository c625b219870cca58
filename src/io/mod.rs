pub mod backup;
pub mod output;
pub mod walker;

pub use backup::create_backup;
pub use output::{JsonWriter, OutputWriter, TerminalWriter};
pub use walker::{find_python_files, FileWalker};
