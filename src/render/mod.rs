//! Rendering strategies: shell-escaped command strings and shell-less argument vectors.

use std::fmt;

use crate::cmd::CommandSpec;
use crate::error::DrushError;

/// Which shell's escaping rules to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapeStyle { Posix, Windows }

impl EscapeStyle {
    pub fn native() -> Self {
        if cfg!(windows) { EscapeStyle::Windows } else { EscapeStyle::Posix }
    }

    fn escape_char(self) -> char {
        match self {
            EscapeStyle::Posix => '\\',
            EscapeStyle::Windows => '^',
        }
    }
}

impl Default for EscapeStyle {
    fn default() -> Self { EscapeStyle::native() }
}

/// How a task hands its command to the operating system.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExecMode {
    /// One escaped string interpreted by the platform shell.
    #[default]
    Shell,
    /// An argument vector spawned without a shell.
    Direct,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandLine {
    Shell(String),
    Argv(Vec<String>),
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandLine::Shell(s) => f.write_str(s),
            CommandLine::Argv(a) => f.write_str(&a.join(" ")),
        }
    }
}

/// Escape shell metacharacters so the value cannot start a new command.
///
/// This is a command-level escape, not full quoting. On Posix a `'` or `"` is
/// left alone when a matching quote follows it (the pair passes through);
/// unpaired quotes are backslash-escaped. On Windows every special character,
/// including `%`, `!` and both quotes, is prefixed with `^`.
pub fn escape_shell_cmd(s: &str, style: EscapeStyle) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len() + 8);
    let mut open_quote: Option<char> = None;
    for (i, &c) in chars.iter().enumerate() {
        match (style, c) {
            (EscapeStyle::Posix, '"' | '\'') => {
                if open_quote.is_none() && chars[i + 1..].contains(&c) {
                    open_quote = Some(c);
                } else if open_quote == Some(c) {
                    open_quote = None;
                } else {
                    out.push('\\');
                }
                out.push(c);
            }
            (EscapeStyle::Windows, '%' | '!' | '"' | '\'') => {
                out.push('^');
                out.push(c);
            }
            (_, c) if is_shell_meta(c) => {
                out.push(style.escape_char());
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

fn is_shell_meta(c: char) -> bool {
    matches!(c,
        '#' | '&' | ';' | '`' | '|' | '*' | '?' | '~' | '<' | '>' | '^'
        | '(' | ')' | '[' | ']' | '{' | '}' | '$' | '\\' | '\n')
}

pub trait Renderer {
    fn render_cmd(&self, spec: &CommandSpec) -> Result<String, DrushError>;
    fn render_cmd_plan(&self, spec: &CommandSpec) -> Result<String, DrushError> { self.render_cmd(spec) }
}

#[derive(Debug, Clone, Default)]
pub struct ShellRenderer { pub style: EscapeStyle }

impl ShellRenderer {
    pub fn new(style: EscapeStyle) -> Self { Self { style } }
    pub fn posix() -> Self { Self::new(EscapeStyle::Posix) }
    pub fn windows() -> Self { Self::new(EscapeStyle::Windows) }
}

impl Renderer for ShellRenderer {
    fn render_cmd(&self, spec: &CommandSpec) -> Result<String, DrushError> {
        if spec.binary_path.is_empty() {
            return Err(DrushError::InvalidArgument("binary path is empty".into()));
        }

        let mut parts: Vec<String> = Vec::new();
        parts.push(quote_prog(&spec.binary_path, self.style));

        // alias goes in verbatim
        if let Some(alias) = spec.alias() {
            parts.push(alias.to_string());
        }

        for opt in spec.effective_options() {
            parts.push(opt.render(self.style)?);
        }

        parts.push(spec.command().to_string());

        for param in &spec.params {
            parts.push(param.render(self.style));
        }

        Ok(parts.join(" "))
    }

    fn render_cmd_plan(&self, spec: &CommandSpec) -> Result<String, DrushError> {
        let mut s = self.render_cmd(spec)?;
        let mut metas = Vec::new();
        if let Some(dir) = &spec.working_directory { metas.push(format!("cwd={}", dir.display())); }
        if let Some(prop) = spec.return_property_name.as_deref().filter(|p| !p.is_empty()) {
            metas.push(format!("return={}", prop));
        }
        if !spec.halt_on_error { metas.push("halt-on-error=false".to_string()); }
        if !metas.is_empty() { s.push_str(&format!("  # {}", metas.join(", "))); }
        Ok(s)
    }
}

/// Token vector for shell-less execution: same order, no escaping or quoting.
pub fn render_argv(spec: &CommandSpec) -> Result<Vec<String>, DrushError> {
    if spec.binary_path.is_empty() {
        return Err(DrushError::InvalidArgument("binary path is empty".into()));
    }
    let mut argv = vec![spec.binary_path.clone()];
    if let Some(alias) = spec.alias() {
        argv.push(alias.to_string());
    }
    for opt in spec.effective_options() {
        if opt.name.is_empty() {
            return Err(DrushError::InvalidArgument("option name is empty".into()));
        }
        match opt.value.as_deref() {
            Some(v) if !v.is_empty() => argv.push(format!("--{}={}", opt.name, v)),
            _ => argv.push(format!("--{}", opt.name)),
        }
    }
    argv.push(spec.command().to_string());
    argv.extend(spec.params.iter().map(|p| p.value.clone()));
    Ok(argv)
}

fn quote_prog(p: &str, style: EscapeStyle) -> String {
    if is_simple_word(p, style) { p.to_string() } else { format!("\"{}\"", escape_shell_cmd(p, style)) }
}

fn is_simple_word(s: &str, style: EscapeStyle) -> bool {
    // cmd.exe expands %VAR%, so a percent sign forces quoting there
    s.chars().all(|c| match c {
        '%' => style == EscapeStyle::Posix,
        c => matches!(c,
            'a'..='z' | 'A'..='Z' | '0'..='9' | '_' | '-' | '.' | '/' | ':' | '+' | '@' | '=' | ','),
    })
}
