//! Execution and planning interfaces.

use std::env;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::cmd::CommandSpec;
use crate::error::DrushError;
use crate::render::{CommandLine, Renderer};

/// Exit code reported when the process could not be started at all.
pub const LAUNCH_FAILED: i32 = -1;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionResult {
    pub exit_code: i32,
    pub output_lines: Vec<String>,
}

impl ExecutionResult {
    pub fn succeeded(&self) -> bool { self.exit_code == 0 }

    pub fn joined(&self, glue: &str) -> String { self.output_lines.join(glue) }
}

pub trait Executor {
    fn exec(&self, line: &CommandLine, working_dir: Option<&Path>) -> Result<ExecutionResult, DrushError>;
}

/// Switches the process working directory and switches it back on drop.
///
/// Both directions are best effort: a failed change is logged and ignored.
pub struct WorkingDirGuard {
    previous: Option<PathBuf>,
}

impl WorkingDirGuard {
    pub fn enter(dir: &Path) -> Self {
        let previous = env::current_dir().ok();
        if let Err(e) = env::set_current_dir(dir) {
            debug!("could not change directory to {}: {}", dir.display(), e);
        }
        Self { previous }
    }
}

impl Drop for WorkingDirGuard {
    fn drop(&mut self) {
        if let Some(prev) = self.previous.take() {
            if let Err(e) = env::set_current_dir(&prev) {
                debug!("could not restore directory {}: {}", prev.display(), e);
            }
        }
    }
}

/// Renders the plan for a spec without running anything.
pub struct Planner<'a, R: Renderer> { pub renderer: &'a R }

impl<'a, R: Renderer> Planner<'a, R> {
    pub fn plan(&self, spec: &CommandSpec) -> Result<String, DrushError> {
        self.renderer.render_cmd_plan(spec)
    }
}

#[cfg(feature = "exec")]
pub struct ShellExecutor;

#[cfg(feature = "exec")]
impl Executor for ShellExecutor {
    fn exec(&self, line: &CommandLine, working_dir: Option<&Path>) -> Result<ExecutionResult, DrushError> {
        use std::process::{Command, Stdio};
        use tracing::warn;

        let mut command = match line {
            CommandLine::Shell(s) => {
                let mut c = if cfg!(windows) { Command::new("cmd") } else { Command::new("sh") };
                c.arg(if cfg!(windows) { "/C" } else { "-c" }).arg(s);
                c
            }
            CommandLine::Argv(argv) => {
                let (prog, args) = argv
                    .split_first()
                    .ok_or_else(|| DrushError::ExecError("empty argument vector".into()))?;
                let mut c = Command::new(prog);
                c.args(args);
                c
            }
        };
        command.stdin(Stdio::inherit()).stdout(Stdio::piped()).stderr(Stdio::inherit());

        let _guard = working_dir.map(WorkingDirGuard::enter);
        let output = match command.output() {
            Ok(o) => o,
            Err(e) => {
                warn!("failed to launch '{}': {}", line, e);
                return Ok(ExecutionResult { exit_code: LAUNCH_FAILED, output_lines: Vec::new() });
            }
        };

        Ok(ExecutionResult {
            exit_code: output.status.code().unwrap_or(LAUNCH_FAILED),
            output_lines: String::from_utf8_lossy(&output.stdout).lines().map(str::to_string).collect(),
        })
    }
}
