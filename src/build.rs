//! Runs the tasks of a build file in order against one shared property store.

use tracing::{info, warn};

use crate::config::BuildFile;
use crate::error::DrushError;
use crate::exec::Executor;
use crate::props::PropertyStore;
use crate::render::ExecMode;
use crate::task::DrushTask;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskReport {
    pub label: String,
    pub command_line: String,
    pub had_error: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub tasks: Vec<TaskReport>,
}

impl BuildReport {
    pub fn had_errors(&self) -> bool { self.tasks.iter().any(|t| t.had_error) }
}

pub struct Build<S: PropertyStore + Clone> {
    store: S,
    mode: Option<ExecMode>,
}

impl<S: PropertyStore + Clone> Build<S> {
    pub fn new(store: S) -> Self { Self { store, mode: None } }

    /// Force every task into the given mode, overriding per-task `mode`.
    pub fn with_mode(mut self, mode: ExecMode) -> Self { self.mode = Some(mode); self }

    /// Copy the file's properties into the store. Values already present win.
    pub fn seed(&self, file: &BuildFile) -> Result<(), DrushError> {
        for (k, v) in file.property_strings()? {
            if self.store.get(&k).is_none() {
                self.store.set(&k, &v);
            }
        }
        Ok(())
    }

    /// Run every task; the first halted task aborts the rest.
    pub fn run<E: Executor>(&self, file: &BuildFile, executor: &E) -> Result<BuildReport, DrushError> {
        self.seed(file)?;
        let mut report = BuildReport::default();
        for cfg in &file.tasks {
            let task = self.prepare(cfg)?;
            let command_line = task.command_line()?.to_string();
            info!("[{}]", cfg.label());
            let had_error = task.main(executor)?;
            if had_error {
                warn!("[{}] failed, continuing", cfg.label());
            }
            report.tasks.push(TaskReport { label: cfg.label().to_string(), command_line, had_error });
        }
        Ok(report)
    }

    /// Plan lines for every task, without executing.
    pub fn plan(&self, file: &BuildFile) -> Result<Vec<String>, DrushError> {
        self.seed(file)?;
        file.tasks.iter().map(|cfg| self.prepare(cfg)?.plan()).collect()
    }

    fn prepare(&self, cfg: &crate::config::TaskConfig) -> Result<DrushTask<S>, DrushError> {
        let mut task = DrushTask::new(self.store.clone());
        cfg.apply(&mut task)?;
        if let Some(mode) = self.mode {
            task.set_mode(mode);
        }
        Ok(task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::ExecutionResult;
    use crate::props::MemoryStore;
    use crate::render::CommandLine;
    use std::cell::RefCell;
    use std::path::Path;

    /// Replies with queued results in order.
    struct Scripted {
        replies: RefCell<Vec<ExecutionResult>>,
        seen: RefCell<Vec<String>>,
    }

    impl Scripted {
        fn new(mut replies: Vec<ExecutionResult>) -> Self {
            replies.reverse();
            Self { replies: RefCell::new(replies), seen: RefCell::default() }
        }
    }

    fn reply(exit_code: i32, lines: &[&str]) -> ExecutionResult {
        ExecutionResult { exit_code, output_lines: lines.iter().map(|s| s.to_string()).collect() }
    }

    impl Executor for Scripted {
        fn exec(&self, line: &CommandLine, _dir: Option<&Path>) -> Result<ExecutionResult, DrushError> {
            self.seen.borrow_mut().push(line.to_string());
            Ok(self.replies.borrow_mut().pop().unwrap_or_default())
        }
    }

    #[test]
    fn output_of_one_task_feeds_the_next() {
        let file = BuildFile::from_yaml(
            "tasks:\n  - command: sql-conf\n    return-property: db\n  - command: echo\n    params: [\"${db}\"]\n",
        )
        .unwrap();
        let exec = Scripted::new(vec![reply(0, &["mysql"]), reply(0, &[])]);
        let report = Build::new(MemoryStore::new()).run(&file, &exec).unwrap();
        assert_eq!(report.tasks.len(), 2);
        assert!(!report.had_errors());
        let seen = exec.seen.borrow();
        assert!(seen[1].ends_with("echo \"mysql\""), "{}", seen[1]);
    }

    #[test]
    fn non_halting_failure_continues() {
        let file = BuildFile::from_yaml(
            "tasks:\n  - command: a\n    haltonerror: false\n  - command: b\n",
        )
        .unwrap();
        let exec = Scripted::new(vec![reply(2, &[]), reply(0, &[])]);
        let report = Build::new(MemoryStore::new()).run(&file, &exec).unwrap();
        assert!(report.tasks[0].had_error);
        assert!(!report.tasks[1].had_error);
        assert!(report.had_errors());
    }

    #[test]
    fn halting_failure_stops_build() {
        let file = BuildFile::from_yaml("tasks:\n  - command: a\n  - command: b\n").unwrap();
        let exec = Scripted::new(vec![reply(5, &[]), reply(0, &[])]);
        let err = Build::new(MemoryStore::new()).run(&file, &exec).unwrap_err();
        assert!(matches!(err, DrushError::Halted { code: 5 }));
        assert_eq!(exec.seen.borrow().len(), 1);
    }

    #[test]
    fn defines_override_file_properties() {
        let file = BuildFile::from_yaml("properties:\n  drush.root: /file\ntasks:\n  - command: st\n").unwrap();
        let store = MemoryStore::new().with("drush.root", "/cli");
        let plans = Build::new(store).plan(&file).unwrap();
        assert_eq!(plans.len(), 1);
        assert!(plans[0].contains("--root=\"/cli\""), "{}", plans[0]);
    }

    #[test]
    fn forced_direct_mode() {
        let file = BuildFile::from_yaml("tasks:\n  - command: st\n    params: [\"a b\"]\n").unwrap();
        let exec = Scripted::new(vec![reply(0, &[])]);
        let report = Build::new(MemoryStore::new()).with_mode(ExecMode::Direct).run(&file, &exec).unwrap();
        assert_eq!(report.tasks[0].command_line, "drush --nocolor st a b");
    }
}
