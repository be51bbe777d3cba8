//! Command modeling: Drush options, parameters and the per-invocation spec.

use std::fmt;
use std::path::PathBuf;

use crate::error::DrushError;
use crate::render::{escape_shell_cmd, EscapeStyle};

pub const DEFAULT_BINARY: &str = "drush";

/// A named flag, rendered as `--name` or `--name="value"`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrushOption {
    pub name: String,
    pub value: Option<String>,
}

impl DrushOption {
    pub fn flag(name: impl Into<String>) -> Self {
        Self { name: name.into(), value: None }
    }

    pub fn with_value(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self { name: name.into(), value: Some(value.into()) }
    }

    /// Render the option. An empty value renders the same as no value.
    pub fn render(&self, style: EscapeStyle) -> Result<String, DrushError> {
        if self.name.is_empty() {
            return Err(DrushError::InvalidArgument("option name is empty".into()));
        }
        match self.value.as_deref() {
            Some(v) if !v.is_empty() => Ok(format!("--{}=\"{}\"", self.name, escape_shell_cmd(v, style))),
            _ => Ok(format!("--{}", self.name)),
        }
    }
}

impl fmt::Display for DrushOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.render(EscapeStyle::native()) {
            Ok(s) => f.write_str(&s),
            Err(_) => f.write_str("--"),
        }
    }
}

/// A positional argument following the command name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrushParam {
    pub value: String,
    pub escape: bool,
    pub quote: bool,
}

impl DrushParam {
    pub fn new(value: impl Into<String>) -> Self {
        Self { value: value.into(), escape: true, quote: true }
    }

    pub fn with_escape(mut self, escape: bool) -> Self { self.escape = escape; self }
    pub fn with_quote(mut self, quote: bool) -> Self { self.quote = quote; self }

    /// Escape first (if enabled), then wrap in double quotes (if enabled).
    pub fn render(&self, style: EscapeStyle) -> String {
        let value = if self.escape { escape_shell_cmd(&self.value, style) } else { self.value.clone() };
        if self.quote { format!("\"{}\"", value) } else { value }
    }
}

impl fmt::Display for DrushParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(EscapeStyle::native()))
    }
}

/// Answer given to every prompt: `--yes`, `--no`, or nothing at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Assume {
    #[default]
    Unset,
    Yes,
    No,
}

impl Assume {
    /// "yes"/"true" map to `Yes`, "no"/"false" to `No`, anything else to `Unset`.
    pub fn from_config(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "yes" | "true" => Assume::Yes,
            "no" | "false" => Assume::No,
            _ => Assume::Unset,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CommandSpec {
    pub binary_path: String,
    pub alias: Option<String>,
    pub root: Option<PathBuf>,
    pub uri: Option<String>,
    pub config_path: Option<PathBuf>,
    pub alias_search_paths: Option<String>,
    pub assume_yes: Assume,
    pub simulate: bool,
    pub pipe_mode: bool,
    pub verbose: bool,
    pub color_output: bool,
    pub working_directory: Option<PathBuf>,
    pub halt_on_error: bool,
    pub return_property_name: Option<String>,
    pub return_glue: String,
    pub command_name: Option<String>,
    pub options: Vec<DrushOption>,
    pub params: Vec<DrushParam>,
}

impl Default for CommandSpec {
    fn default() -> Self {
        Self {
            binary_path: DEFAULT_BINARY.to_string(),
            alias: None,
            root: None,
            uri: None,
            config_path: None,
            alias_search_paths: None,
            assume_yes: Assume::Unset,
            simulate: false,
            pipe_mode: false,
            verbose: false,
            color_output: false,
            working_directory: None,
            halt_on_error: true,
            return_property_name: None,
            return_glue: "\n".to_string(),
            command_name: None,
            options: Vec::new(),
            params: Vec::new(),
        }
    }
}

impl CommandSpec {
    pub fn new(command: impl Into<String>) -> Self {
        Self { command_name: Some(command.into()), ..Default::default() }
    }

    /// Options implied by the top-level settings, in their fixed order.
    pub fn derived_options(&self) -> Vec<DrushOption> {
        let mut opts = Vec::new();
        if !self.color_output { opts.push(DrushOption::flag("nocolor")); }
        if let Some(root) = &self.root {
            opts.push(DrushOption::with_value("root", root.display().to_string()));
        }
        if let Some(uri) = non_empty(&self.uri) { opts.push(DrushOption::with_value("uri", uri)); }
        if let Some(cfg) = &self.config_path {
            opts.push(DrushOption::with_value("config", cfg.display().to_string()));
        }
        if let Some(paths) = non_empty(&self.alias_search_paths) {
            opts.push(DrushOption::with_value("alias-path", paths));
        }
        match self.assume_yes {
            Assume::Yes => opts.push(DrushOption::flag("yes")),
            Assume::No => opts.push(DrushOption::flag("no")),
            Assume::Unset => {}
        }
        if self.simulate { opts.push(DrushOption::flag("simulate")); }
        if self.pipe_mode { opts.push(DrushOption::flag("pipe")); }
        if self.verbose { opts.push(DrushOption::flag("verbose")); }
        opts
    }

    /// Derived options followed by the explicit ones, without touching `self.options`.
    pub fn effective_options(&self) -> Vec<DrushOption> {
        let mut opts = self.derived_options();
        opts.extend(self.options.iter().cloned());
        opts
    }

    pub fn command(&self) -> &str { self.command_name.as_deref().unwrap_or("") }

    pub fn alias(&self) -> Option<&str> { non_empty(&self.alias) }

    pub fn validate(&self) -> Result<(), DrushError> {
        if self.command().is_empty() {
            return Err(DrushError::MissingAttribute("command"));
        }
        Ok(())
    }
}

fn non_empty(v: &Option<String>) -> Option<&str> {
    v.as_deref().filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const P: EscapeStyle = EscapeStyle::Posix;

    #[test]
    fn option_without_value_is_bare() {
        assert_eq!(DrushOption::flag("yes").render(P).unwrap(), "--yes");
        assert_eq!(DrushOption::with_value("yes", "").render(P).unwrap(), "--yes");
    }

    #[test]
    fn option_value_is_escaped_and_quoted() {
        let o = DrushOption::with_value("root", "/var/www");
        assert_eq!(o.render(P).unwrap(), "--root=\"/var/www\"");
        let o = DrushOption::with_value("exec", "a;b");
        assert_eq!(o.render(P).unwrap(), "--exec=\"a\\;b\"");
    }

    #[test]
    fn option_empty_name_rejected() {
        let err = DrushOption::with_value("", "x").render(P).unwrap_err();
        assert!(matches!(err, DrushError::InvalidArgument(_)));
        assert_eq!(DrushOption::flag("").to_string(), "--");
    }

    #[test]
    fn param_flag_combinations() {
        let v = "a&b";
        assert_eq!(DrushParam::new(v).render(P), "\"a\\&b\"");
        assert_eq!(DrushParam::new(v).with_quote(false).render(P), "a\\&b");
        assert_eq!(DrushParam::new(v).with_escape(false).render(P), "\"a&b\"");
        assert_eq!(DrushParam::new(v).with_escape(false).with_quote(false).render(P), "a&b");
        assert_eq!(DrushParam::new("").with_escape(false).with_quote(false).render(P), "");
    }

    #[test]
    fn assume_from_config() {
        assert_eq!(Assume::from_config("Yes"), Assume::Yes);
        assert_eq!(Assume::from_config("TRUE"), Assume::Yes);
        assert_eq!(Assume::from_config("no"), Assume::No);
        assert_eq!(Assume::from_config("false"), Assume::No);
        assert_eq!(Assume::from_config(""), Assume::Unset);
        assert_eq!(Assume::from_config("maybe"), Assume::Unset);
    }

    #[test]
    fn derived_options_order() {
        let spec = CommandSpec {
            root: Some("/r".into()),
            uri: Some("http://x".into()),
            config_path: Some("/c.yml".into()),
            alias_search_paths: Some("/a".into()),
            assume_yes: Assume::No,
            simulate: true,
            pipe_mode: true,
            verbose: true,
            ..CommandSpec::new("st")
        };
        let names: Vec<String> = spec.derived_options().into_iter().map(|o| o.name).collect();
        assert_eq!(names, ["nocolor", "root", "uri", "config", "alias-path", "no", "simulate", "pipe", "verbose"]);
    }

    #[test]
    fn effective_options_do_not_accumulate() {
        let mut spec = CommandSpec::new("st");
        spec.options.push(DrushOption::flag("full"));
        assert_eq!(spec.effective_options().len(), 2);
        assert_eq!(spec.effective_options().len(), 2);
        assert_eq!(spec.options.len(), 1);
    }

    #[test]
    fn validate_requires_command() {
        assert!(matches!(CommandSpec::default().validate(), Err(DrushError::MissingAttribute("command"))));
        assert!(CommandSpec::new("status").validate().is_ok());
    }
}
