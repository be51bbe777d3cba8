//! YAML build files: project properties plus an ordered list of Drush task declarations.
//!
//! ```yaml
//! properties:
//!   drush.root: /var/www/site
//! tasks:
//!   - command: sql-query
//!     alias: "@prod"
//!     haltonerror: "no"
//!     return-property: tables
//!     options:
//!       - name: db-prefix
//!     params:
//!       - "SHOW TABLES"
//!   - command: status
//!     params:
//!       - value: ${tables}
//!         escape: false
//! ```
//!
//! String attributes may reference properties as `${name}`. References are
//! resolved when the task runs, so a `return-property` written by an earlier
//! task is visible to later ones.

mod error;
mod expand;

pub use error::ConfigError;
pub use expand::expand;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::cmd::{Assume, DrushOption, DrushParam};
use crate::props::{coerce_bool, PropertyStore};
use crate::render::ExecMode;
use crate::task::DrushTask;

/// A boolean-ish attribute: a YAML bool, or any other scalar run through [`coerce_bool`].
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Flag {
    Bool(bool),
    Number(serde_yaml::Number),
    Text(String),
}

/// Accept any YAML scalar where text is expected; `10` becomes `"10"`.
fn scalar_text<'de, D>(de: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match serde_yaml::Value::deserialize(de)? {
        serde_yaml::Value::String(s) => Ok(s),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        serde_yaml::Value::Null => Ok(String::new()),
        _ => Err(serde::de::Error::custom("expected a scalar value")),
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OptionConfig {
    pub name: String,
    #[serde(default)]
    pub value: Option<String>,
}

/// A parameter, either as a bare string or with explicit escape/quote flags.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ParamConfig {
    Plain(#[serde(deserialize_with = "scalar_text")] String),
    Full {
        #[serde(deserialize_with = "scalar_text")]
        value: String,
        #[serde(default)]
        escape: Option<Flag>,
        #[serde(default)]
        quote: Option<Flag>,
    },
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModeConfig {
    #[default]
    Shell,
    Direct,
}

/// One Drush task declaration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct TaskConfig {
    /// Label used in reports; defaults to the command name.
    pub name: Option<String>,
    pub command: Option<String>,
    pub bin: Option<String>,
    pub alias: Option<String>,
    pub root: Option<String>,
    pub uri: Option<String>,
    pub config: Option<String>,
    pub alias_path: Option<String>,
    pub assume: Option<Flag>,
    pub simulate: Option<Flag>,
    pub pipe: Option<Flag>,
    pub verbose: Option<Flag>,
    pub color: Option<Flag>,
    pub dir: Option<String>,
    #[serde(alias = "haltonerror")]
    pub halt_on_error: Option<Flag>,
    #[serde(alias = "returnProperty")]
    pub return_property: Option<String>,
    #[serde(alias = "returnGlue")]
    pub return_glue: Option<String>,
    pub mode: Option<ModeConfig>,
    pub options: Vec<OptionConfig>,
    pub params: Vec<ParamConfig>,
}

impl TaskConfig {
    pub fn label(&self) -> &str {
        self.name.as_deref().or(self.command.as_deref()).unwrap_or("drush")
    }

    /// Apply the declared attributes on top of the task's property defaults.
    pub fn apply<S: PropertyStore>(&self, task: &mut DrushTask<S>) -> Result<(), ConfigError> {
        let mut options = Vec::with_capacity(self.options.len());
        for o in &self.options {
            let value = o.value.as_deref().map(|v| expand(v, task.store())).transpose()?;
            options.push(DrushOption { name: expand(&o.name, task.store())?, value });
        }
        let mut params = Vec::with_capacity(self.params.len());
        for p in &self.params {
            params.push(match p {
                ParamConfig::Plain(v) => DrushParam::new(expand(v, task.store())?),
                ParamConfig::Full { value, escape, quote } => DrushParam::new(expand(value, task.store())?)
                    .with_escape(flag_or(escape, true, task.store())?)
                    .with_quote(flag_or(quote, true, task.store())?),
            });
        }
        if let Some(mode) = &self.mode {
            task.set_mode(match mode {
                ModeConfig::Shell => ExecMode::Shell,
                ModeConfig::Direct => ExecMode::Direct,
            });
        }

        let store = task.store();
        let command = opt_text(&self.command, store)?;
        let bin = opt_text(&self.bin, store)?;
        let alias = opt_text(&self.alias, store)?;
        let root = opt_text(&self.root, store)?;
        let uri = opt_text(&self.uri, store)?;
        let config = opt_text(&self.config, store)?;
        let alias_path = opt_text(&self.alias_path, store)?;
        let dir = opt_text(&self.dir, store)?;
        let return_property = opt_text(&self.return_property, store)?;
        let assume = self.assume.as_ref().map(|f| assume_from(f, store)).transpose()?;
        let simulate = opt_flag(&self.simulate, store)?;
        let pipe = opt_flag(&self.pipe, store)?;
        let verbose = opt_flag(&self.verbose, store)?;
        let color = opt_flag(&self.color, store)?;
        let halt = opt_flag(&self.halt_on_error, store)?;

        let spec = task.spec_mut();
        if command.is_some() { spec.command_name = command; }
        if let Some(v) = bin { spec.binary_path = v; }
        if alias.is_some() { spec.alias = alias; }
        if let Some(v) = root { spec.root = Some(PathBuf::from(v)); }
        if uri.is_some() { spec.uri = uri; }
        if let Some(v) = config { spec.config_path = Some(PathBuf::from(v)); }
        if alias_path.is_some() { spec.alias_search_paths = alias_path; }
        if let Some(v) = dir { spec.working_directory = Some(PathBuf::from(v)); }
        if return_property.is_some() { spec.return_property_name = return_property; }
        // glue is taken verbatim; a newline or comma is the usual value
        if let Some(g) = &self.return_glue { spec.return_glue = g.clone(); }
        if let Some(v) = assume { spec.assume_yes = v; }
        if let Some(v) = simulate { spec.simulate = v; }
        if let Some(v) = pipe { spec.pipe_mode = v; }
        if let Some(v) = verbose { spec.verbose = v; }
        if let Some(v) = color { spec.color_output = v; }
        if let Some(v) = halt { spec.halt_on_error = v; }
        spec.options.extend(options);
        spec.params.extend(params);
        Ok(())
    }
}

fn opt_text<S: PropertyStore>(v: &Option<String>, store: &S) -> Result<Option<String>, ConfigError> {
    v.as_deref().map(|s| expand(s, store)).transpose()
}

fn opt_flag<S: PropertyStore>(f: &Option<Flag>, store: &S) -> Result<Option<bool>, ConfigError> {
    f.as_ref().map(|f| flag_value(f, store)).transpose()
}

fn flag_or<S: PropertyStore>(f: &Option<Flag>, default: bool, store: &S) -> Result<bool, ConfigError> {
    Ok(opt_flag(f, store)?.unwrap_or(default))
}

fn flag_value<S: PropertyStore>(f: &Flag, store: &S) -> Result<bool, ConfigError> {
    match f {
        Flag::Bool(b) => Ok(*b),
        Flag::Number(n) => Ok(coerce_bool(&n.to_string())),
        Flag::Text(s) => Ok(coerce_bool(&expand(s, store)?)),
    }
}

fn assume_from<S: PropertyStore>(f: &Flag, store: &S) -> Result<Assume, ConfigError> {
    match f {
        Flag::Bool(true) => Ok(Assume::Yes),
        Flag::Bool(false) => Ok(Assume::No),
        Flag::Number(_) => Ok(Assume::Unset),
        Flag::Text(s) => Ok(Assume::from_config(&expand(s, store)?)),
    }
}

/// A whole build file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BuildFile {
    pub properties: BTreeMap<String, serde_yaml::Value>,
    pub tasks: Vec<TaskConfig>,
}

impl BuildFile {
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::FileReadError {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&contents)
    }

    /// Property values rendered as strings.
    pub fn property_strings(&self) -> Result<Vec<(String, String)>, ConfigError> {
        self.properties
            .iter()
            .map(|(k, v)| {
                let s = match v {
                    serde_yaml::Value::Null => String::new(),
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::String(s) => s.clone(),
                    _ => return Err(ConfigError::InvalidConfig(format!("property '{}' must be a scalar", k))),
                };
                Ok((k.clone(), s))
            })
            .collect()
    }
}
