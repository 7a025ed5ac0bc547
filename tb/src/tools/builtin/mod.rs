//! Built-in tools exposed to the orchestrator

mod insert_edit_into_file;
mod read_file;
mod run_in_terminal;
mod search_files;

pub use insert_edit_into_file::{InsertEditIntoFileTool, InsertEditParams};
pub use read_file::{ReadFileParams, ReadFileTool};
pub use run_in_terminal::{CommandOutput, RunInTerminalParams, RunInTerminalTool, RuntimeInfo, detect_runtimes};
pub use search_files::{SearchFilesParams, SearchFilesTool};
