//! The Drush build task: defaults from the property store, one execution, result propagation.

use std::path::PathBuf;

use tracing::{error, info};

use crate::cmd::{Assume, CommandSpec, DrushOption, DrushParam};
use crate::error::DrushError;
use crate::exec::{Executor, Planner};
use crate::props::{self, coerce_bool, PropertyStore};
use crate::render::{render_argv, CommandLine, EscapeStyle, ExecMode, Renderer, ShellRenderer};

pub struct DrushTask<S: PropertyStore> {
    spec: CommandSpec,
    store: S,
    mode: ExecMode,
    renderer: ShellRenderer,
}

impl<S: PropertyStore> DrushTask<S> {
    /// Create a task whose settings start from the store's `drush.*` defaults.
    pub fn new(store: S) -> Self {
        let mut task = Self {
            spec: CommandSpec::default(),
            store,
            mode: ExecMode::default(),
            renderer: ShellRenderer::default(),
        };
        task.init();
        task
    }

    fn init(&mut self) {
        let st = &self.store;
        let spec = &mut self.spec;
        if let Some(v) = st.get_non_empty(props::ALIAS) { spec.alias = Some(v); }
        if let Some(v) = st.get_non_empty(props::ALIAS_PATH) { spec.alias_search_paths = Some(v); }
        if let Some(v) = st.get_non_empty(props::ASSUME) { spec.assume_yes = Assume::from_config(&v); }
        if let Some(v) = st.get_non_empty(props::BIN) { spec.binary_path = v; }
        if let Some(v) = st.get_non_empty(props::COLOR) { spec.color_output = coerce_bool(&v); }
        if let Some(v) = st.get_non_empty(props::CONFIG) { spec.config_path = Some(PathBuf::from(v)); }
        if let Some(v) = st.get_non_empty(props::PIPE) { spec.pipe_mode = coerce_bool(&v); }
        if let Some(v) = st.get_non_empty(props::ROOT) { spec.root = Some(PathBuf::from(v)); }
        if let Some(v) = st.get_non_empty(props::SIMULATE) { spec.simulate = coerce_bool(&v); }
        if let Some(v) = st.get_non_empty(props::URI) { spec.uri = Some(v); }
        if let Some(v) = st.get_non_empty(props::VERBOSE) { spec.verbose = coerce_bool(&v); }
    }

    pub fn spec(&self) -> &CommandSpec { &self.spec }
    pub fn spec_mut(&mut self) -> &mut CommandSpec { &mut self.spec }
    pub fn store(&self) -> &S { &self.store }

    pub fn push_option(&mut self, opt: DrushOption) -> &mut Self { self.spec.options.push(opt); self }
    pub fn push_param(&mut self, param: DrushParam) -> &mut Self { self.spec.params.push(param); self }
    pub fn set_mode(&mut self, mode: ExecMode) -> &mut Self { self.mode = mode; self }
    pub fn set_escape_style(&mut self, style: EscapeStyle) -> &mut Self { self.renderer.style = style; self }

    pub fn command_line(&self) -> Result<CommandLine, DrushError> {
        match self.mode {
            ExecMode::Shell => Ok(CommandLine::Shell(self.renderer.render_cmd(&self.spec)?)),
            ExecMode::Direct => Ok(CommandLine::Argv(render_argv(&self.spec)?)),
        }
    }

    pub fn plan(&self) -> Result<String, DrushError> {
        self.spec.validate()?;
        Planner { renderer: &self.renderer }.plan(&self.spec)
    }

    /// Run the command once.
    ///
    /// Returns `Ok(true)` when the command failed but `halt_on_error` is off,
    /// `Ok(false)` on success, and `DrushError::Halted` otherwise.
    pub fn main<E: Executor>(&self, executor: &E) -> Result<bool, DrushError> {
        self.spec.validate()?;
        let line = self.command_line()?;

        info!("Executing: {}", line);
        let result = executor.exec(&line, self.spec.working_directory.as_deref())?;

        for l in &result.output_lines {
            info!("{}", l);
        }

        if let Some(name) = self.spec.return_property_name.as_deref().filter(|n| !n.is_empty()) {
            self.store.set(name, &result.joined(&self.spec.return_glue));
        }

        if self.spec.halt_on_error && !result.succeeded() {
            error!("Drush exited with code: {}", result.exit_code);
            return Err(DrushError::Halted { code: result.exit_code });
        }
        Ok(!result.succeeded())
    }
}
