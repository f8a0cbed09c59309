//! Common utilities and helper functions.
//!
//! Command execution helpers, placeholder substitution for configuration
//! values, and the identifier case conversions shared by the catalog and the
//! scaffolder.

use std::{
    ffi::OsStr,
    ops::{Deref, DerefMut},
    path::Path,
    process::Output,
    sync::LazyLock,
};

use anyhow::Context;
use colored::Colorize;
use regex::{Captures, Regex};

/// A command builder wrapper with variable substitution support.
///
/// `Command` wraps `std::process::Command` and adds support for automatic
/// variable replacement in arguments.
pub struct Command {
    inner: std::process::Command,
    value_replace: Box<dyn Fn(&OsStr) -> String>,
}

impl Deref for Command {
    type Target = std::process::Command;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for Command {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}

impl Command {
    /// Creates a new command builder running in `workdir`.
    pub fn new<S>(
        program: S,
        workdir: &Path,
        value_replace: impl Fn(&OsStr) -> String + 'static,
    ) -> Command
    where
        S: AsRef<OsStr>,
    {
        let mut cmd = std::process::Command::new(program);
        cmd.current_dir(workdir);
        cmd.env("WORKSPACE_FOLDER", workdir.display().to_string());

        Self {
            inner: cmd,
            value_replace: Box::new(value_replace),
        }
    }

    /// Prints the command to stdout with colored formatting.
    pub fn print_cmd(&self) {
        let mut cmd_str = self.get_program().to_string_lossy().to_string();

        for arg in self.get_args() {
            cmd_str += " ";
            cmd_str += arg.to_string_lossy().as_ref();
        }

        println!("   {}", cmd_str.purple().bold());
    }

    /// Executes the command and captures stdout and stderr.
    ///
    /// A non-zero exit is not an error here; callers inspect `status`.
    pub fn capture(&mut self) -> anyhow::Result<Output> {
        self.print_cmd();
        let program = self.get_program().to_string_lossy().to_string();
        self.output()
            .with_context(|| format!("failed to spawn `{program}`"))
    }

    /// Adds an argument to the command with variable substitution.
    pub fn arg<S>(&mut self, arg: S) -> &mut Command
    where
        S: AsRef<OsStr>,
    {
        let value = (self.value_replace)(arg.as_ref());
        self.inner.arg(value);
        self
    }
}

static ENV_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{env:([^{}]*)\}").expect("valid placeholder regex"));

/// Replaces `${env:VAR_NAME}` placeholders with environment values.
///
/// Unset variables expand to an empty string. Anything that is not a complete
/// `env:` placeholder is left untouched.
///
/// ```rust
/// use blokgen::utils::replace_env_placeholders;
///
/// unsafe { std::env::set_var("BLOKGEN_DOC_VAR", "hello"); }
/// assert_eq!(replace_env_placeholders("Value: ${env:BLOKGEN_DOC_VAR}"), "Value: hello");
/// ```
pub fn replace_env_placeholders(input: &str) -> String {
    ENV_PLACEHOLDER
        .replace_all(input, |caps: &Captures| {
            let name = &caps[1];
            match std::env::var(name) {
                Ok(value) => {
                    debug!("Using {name} from environment");
                    value
                }
                Err(_) => String::new(),
            }
        })
        .into_owned()
}

/// `stats_section` / `stats-section` -> `StatsSection`.
pub fn to_pascal_case(s: &str) -> String {
    s.split(['_', '-'])
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// `stats_section` -> `statsSection`.
pub fn to_camel_case(s: &str) -> String {
    let pascal = to_pascal_case(s);
    let mut chars = pascal.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

static NON_IDENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9_]").expect("valid identifier regex"));
static UNDERSCORES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_+").expect("valid underscore regex"));

/// `HeroBanner` / `hero-banner` -> `hero_banner`.
pub fn to_snake_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    for ch in s.chars() {
        if ch.is_ascii_uppercase() {
            out.push('_');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    let out = out.strip_prefix('_').unwrap_or(&out).to_string();
    let out = NON_IDENT.replace_all(&out, "_");
    UNDERSCORES.replace_all(&out, "_").into_owned()
}

/// `hero_banner` / `heroBanner` -> `Hero Banner`.
pub fn to_display_name(s: &str) -> String {
    let mut spaced = String::with_capacity(s.len() + 4);
    for ch in s.chars() {
        match ch {
            '_' | '-' => spaced.push(' '),
            c if c.is_ascii_uppercase() => {
                spaced.push(' ');
                spaced.push(c);
            }
            c => spaced.push(c),
        }
    }
    spaced
        .split_whitespace()
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
