//! Local process execution with consistent error handling.

use std::process::{Command, Output};

use crate::error::{Error, Result};

/// Run a command and return stdout on success.
///
/// Returns trimmed stdout if the command succeeds. A command that cannot be
/// started or exits non-zero yields a `shell.execution_failed` error whose
/// trace carries stderr (or stdout when stderr is empty).
pub fn run(program: &str, args: &[&str], context: &str) -> Result<String> {
    let command_line = render_command(program, args);

    let output = Command::new(program).args(args).output().map_err(|e| {
        Error::shell_failed(&command_line, format!("failed to run {}", context), None).with_cause(e)
    })?;

    if !output.status.success() {
        let mut err = Error::shell_failed(
            &command_line,
            format!("{} failed: {}", context, command_line),
            output.status.code(),
        );
        let text = error_text(&output);
        if !text.is_empty() {
            err = err.with_cause(text);
        }
        return Err(err);
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Extract error text from command output.
///
/// Prefers stderr, falls back to stdout if stderr is empty.
pub fn error_text(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.trim().is_empty() {
        stderr.trim().to_string()
    } else {
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    }
}

fn render_command(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}
