// Shared helpers for spawning the external network tools

use anyhow::{Context, Result, anyhow};
use std::fmt;
use std::process::Command;

/// A single external command line, kept as data so it can be shown in
/// simulation mode before (or instead of) being run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    pub program: &'static str,
    pub args: Vec<String>,
}

impl ToolCommand {
    pub fn new(program: &'static str, args: &[&str]) -> Self {
        Self {
            program,
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// Run the command once, failing on spawn error or non-zero exit
    pub fn run(&self) -> Result<()> {
        let output = Command::new(self.program)
            .args(&self.args)
            .output()
            .context(format!("Failed to execute `{}`", self))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stderr = stderr.trim();
            return Err(if stderr.is_empty() {
                anyhow!("`{}` exited with {}", self, output.status)
            } else {
                anyhow!("`{}` exited with {}: {}", self, output.status, stderr)
            });
        }

        Ok(())
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Run a query command and return its stdout.
///
/// A non-zero exit is not an error here: whatever the tool printed is returned
/// and callers decide whether it is usable.
pub fn run_capture(program: &str, args: &[&str]) -> Result<String> {
    let output = Command::new(program)
        .args(args)
        .output()
        .context(format!("Failed to execute `{} {}`", program, args.join(" ")))?;

    if !output.status.success() {
        log::debug!(
            "`{} {}` exited with {}: {}",
            program,
            args.join(" "),
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Check if a tool can be spawned at all
pub fn tool_available(program: &str, version_arg: &str) -> bool {
    Command::new(program).arg(version_arg).output().is_ok()
}
