//! Advisory code review over the consuming app.
//!
//! Runs the configured type-check and lint commands in the app root and
//! condenses their output into a [`ReviewResult`]. Nothing here fails the
//! caller: spawn failures and tool errors all end up in `errors`.

use colored::Colorize;

use crate::ctx::AppContext;

/// Condensed result of both review commands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewResult {
    pub success: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub typecheck_passed: bool,
    pub lint_passed: bool,
}

/// Captured output of one finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    pub success: bool,
    /// Exit status as text, for messages.
    pub status: String,
    pub stdout: String,
    pub stderr: String,
}

impl From<std::process::Output> for ToolOutput {
    fn from(out: std::process::Output) -> Self {
        Self {
            success: out.status.success(),
            status: out.status.to_string(),
            stdout: String::from_utf8_lossy(&out.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
        }
    }
}

impl ToolOutput {
    /// Stderr when it has content, stdout otherwise.
    fn diagnostics(&self) -> &str {
        if self.stderr.trim().is_empty() {
            &self.stdout
        } else {
            &self.stderr
        }
    }
}

fn lines_matching(text: &str, pred: impl Fn(&str) -> bool) -> Vec<String> {
    text.lines()
        .filter(|l| pred(l))
        .map(|l| l.trim_end().to_string())
        .collect()
}

/// Returns `(passed, errors)` for a type-check run.
pub fn interpret_typecheck(out: &ToolOutput) -> (bool, Vec<String>) {
    let is_ts_error = |l: &str| l.contains("error TS");
    if out.success {
        let errors = lines_matching(&out.stderr, is_ts_error);
        return (errors.is_empty(), errors);
    }
    let errors = lines_matching(out.diagnostics(), is_ts_error);
    if errors.is_empty() {
        (false, vec![format!("TypeScript check failed: {}", out.status)])
    } else {
        (false, errors)
    }
}

/// Returns `(passed, errors, warnings)` for a lint run.
pub fn interpret_lint(out: &ToolOutput) -> (bool, Vec<String>, Vec<String>) {
    let mut warnings = lines_matching(&out.stdout, |l| l.contains("warning"));
    if out.success {
        return (true, Vec::new(), warnings);
    }
    let errors = lines_matching(out.diagnostics(), |l| {
        l.contains("error") && !l.contains("Warning")
    });
    if errors.is_empty() {
        warnings.push(format!(
            "Lint exited with {} without reporting errors",
            out.status
        ));
    }
    (errors.is_empty(), errors, warnings)
}

/// Runs review commands for an app context.
pub struct ReviewRunner<'a> {
    ctx: &'a AppContext,
}

impl<'a> ReviewRunner<'a> {
    pub fn new(ctx: &'a AppContext) -> Self {
        Self { ctx }
    }

    fn capture(&self, cmd: &str) -> anyhow::Result<ToolOutput> {
        Ok(self.ctx.shell_command(cmd).capture()?.into())
    }

    /// Runs the type-check and lint commands.
    ///
    /// `component` only labels the output; both tools check the whole app.
    pub fn run(&self, component: Option<&str>) -> ReviewResult {
        let review = &self.ctx.settings.review;
        match component {
            Some(name) => println!("{}", format!("Reviewing app after '{name}'").bold()),
            None => println!("{}", "Reviewing app".bold()),
        }

        let mut result = ReviewResult::default();

        match self.capture(&review.typecheck_cmd) {
            Ok(out) => {
                let (passed, errors) = interpret_typecheck(&out);
                result.typecheck_passed = passed;
                result.errors.extend(errors);
            }
            Err(e) => result.errors.push(format!("TypeScript check failed: {e:#}")),
        }

        match self.capture(&review.lint_cmd) {
            Ok(out) => {
                let (passed, errors, warnings) = interpret_lint(&out);
                result.lint_passed = passed;
                result.errors.extend(errors);
                result.warnings.extend(warnings);
            }
            Err(e) => result.errors.push(format!("Lint failed: {e:#}")),
        }

        result.success = result.errors.is_empty() && result.typecheck_passed && result.lint_passed;
        print_result(&result);
        result
    }
}

fn print_result(result: &ReviewResult) {
    let mark = |ok: bool| if ok { "passed".green() } else { "failed".red() };
    println!("   type-check {}", mark(result.typecheck_passed));
    println!("   lint       {}", mark(result.lint_passed));
    if result.success {
        println!("   {}", "Code review passed".green());
        return;
    }
    if !result.errors.is_empty() {
        println!("   {}", format!("Errors ({}):", result.errors.len()).red());
        for (i, e) in result.errors.iter().take(10).enumerate() {
            println!("      {}. {e}", i + 1);
        }
        if result.errors.len() > 10 {
            println!("      ... and {} more", result.errors.len() - 10);
        }
    }
    if !result.warnings.is_empty() {
        println!("   {}", format!("Warnings ({}):", result.warnings.len()).yellow());
        for (i, w) in result.warnings.iter().take(5).enumerate() {
            println!("      {}. {w}", i + 1);
        }
    }
}
