//! drush_task::prelude - grab-and-go imports for wiring a task

pub use crate::error::DrushError;
pub use crate::cmd::{Assume, CommandSpec, DrushOption, DrushParam};
pub use crate::render::{CommandLine, EscapeStyle, ExecMode, Renderer, ShellRenderer};
pub use crate::exec::{ExecutionResult, Executor};
#[cfg(feature = "exec")]
pub use crate::exec::ShellExecutor;
pub use crate::props::{MemoryStore, PropertyStore};
pub use crate::task::DrushTask;
pub use crate::config::BuildFile;
pub use crate::build::{Build, BuildReport};
